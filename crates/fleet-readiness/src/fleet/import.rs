use super::domain::{
    AlertRecord, InvalidEnumValue, OperatorId, OperatorRecord, SessionId, SessionRecord,
    SessionStatus, ValidationError,
};
use super::scoring::classify_cognitive_load;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;

/// Fleet state exchanged as a single JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetSnapshot {
    pub operators: Vec<OperatorRecord>,
    pub sessions: Vec<SessionRecord>,
    pub alerts: Vec<AlertRecord>,
}

impl FleetSnapshot {
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ImportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// The bundled three-driver reference fleet.
    pub fn reference() -> Result<Self, ImportError> {
        Ok(serde_json::from_str(include_str!(
            "../../fixtures/reference_fleet.json"
        ))?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read import source: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed sessions CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unrecognised timestamp '{value}'")]
    Timestamp { row: usize, value: String },
    #[error("row {row}: {source}")]
    Enum {
        row: usize,
        #[source]
        source: InvalidEnumValue,
    },
    #[error("row {row}: {source}")]
    Invalid {
        row: usize,
        #[source]
        source: ValidationError,
    },
}

/// Parses a telematics session export. A blank `Session End` marks the session as active.
pub fn import_sessions_csv<R: Read>(reader: R) -> Result<Vec<SessionRecord>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut sessions = Vec::new();

    for (index, record) in csv_reader.deserialize::<SessionRow>().enumerate() {
        let row = index + 1;
        let session = record?.into_session(row)?;
        session
            .validate()
            .map_err(|source| ImportError::Invalid { row, source })?;
        sessions.push(session);
    }

    Ok(sessions)
}

#[derive(Debug, Deserialize)]
struct SessionRow {
    #[serde(rename = "Session ID", default)]
    session_id: String,
    #[serde(rename = "Operator ID")]
    operator_id: String,
    #[serde(rename = "Operator Name")]
    operator_name: String,
    #[serde(rename = "Session Start")]
    session_start: String,
    #[serde(
        rename = "Session End",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    session_end: Option<String>,
    #[serde(rename = "Alertness")]
    alertness: f64,
    #[serde(rename = "Focus")]
    focus: f64,
    #[serde(rename = "Fatigue")]
    fatigue: f64,
    #[serde(rename = "Reaction Time")]
    reaction_time: f64,
    #[serde(rename = "Hours Since Rest")]
    hours_since_rest: f64,
    #[serde(rename = "Incidents", default)]
    incidents: Option<u32>,
    #[serde(
        rename = "Cognitive Load",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    cognitive_load: Option<String>,
}

impl SessionRow {
    fn into_session(self, row: usize) -> Result<SessionRecord, ImportError> {
        let session_start = parse_timestamp(row, &self.session_start)?;
        let session_end = self
            .session_end
            .as_deref()
            .map(|value| parse_timestamp(row, value))
            .transpose()?;
        let cognitive_load = self
            .cognitive_load
            .as_deref()
            .map(classify_cognitive_load)
            .transpose()
            .map_err(|source| ImportError::Enum { row, source })?;

        Ok(SessionRecord {
            id: SessionId(self.session_id),
            operator_id: OperatorId(self.operator_id),
            operator_name: self.operator_name,
            session_start,
            status: if session_end.is_some() {
                SessionStatus::Completed
            } else {
                SessionStatus::Active
            },
            session_end,
            alertness_score: self.alertness,
            focus_score: self.focus,
            fatigue_level: self.fatigue,
            reaction_time_ms: self.reaction_time,
            hours_since_rest: self.hours_since_rest,
            incident_count: self.incidents.unwrap_or(0),
            cognitive_load,
            performance_rating: None,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (read as UTC) or a bare date.
fn parse_timestamp(row: usize, value: &str) -> Result<DateTime<Utc>, ImportError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }

    if let Some(naive) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }

    Err(ImportError::Timestamp {
        row,
        value: value.to_string(),
    })
}
