use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raised when an enum-typed field receives a value outside its recognized set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} value '{value}'")]
pub struct InvalidEnumValue {
    pub field: &'static str,
    pub value: String,
}

/// Declares a closed enum whose wire form is a fixed snake_case identifier.
///
/// Generates `ordered()`, `as_str()`, `Display` and a `FromStr` that trims and
/// lowercases its input before matching, failing with [`InvalidEnumValue`].
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $field:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const fn ordered() -> &'static [Self] {
                &[$(Self::$variant),+]
            }

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::fleet::domain::InvalidEnumValue;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err($crate::fleet::domain::InvalidEnumValue {
                        field: $field,
                        value: raw.to_string(),
                    }),
                }
            }
        }
    };
}

pub(crate) use wire_enum;

/// Identifier wrapper for operators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperatorId(pub String);

/// Identifier wrapper for route sessions. Blank until the store assigns one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Identifier wrapper for alerts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlertId(pub String);

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

wire_enum! {
    /// Driving or dispatch assignment held by an operator.
    pub enum OperatorRole as "role" {
        LongHaulDriver => "long_haul_driver",
        RegionalDriver => "regional_driver",
        LocalDriver => "local_driver",
        TeamDriver => "team_driver",
        OwnerOperator => "owner_operator",
        Dispatcher => "dispatcher",
    }
}

impl OperatorRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LongHaulDriver => "Long Haul Driver",
            Self::RegionalDriver => "Regional Driver",
            Self::LocalDriver => "Local Driver",
            Self::TeamDriver => "Team Driver",
            Self::OwnerOperator => "Owner Operator",
            Self::Dispatcher => "Dispatcher",
        }
    }
}

wire_enum! {
    pub enum Department as "department" {
        LongHaul => "long_haul",
        Regional => "regional",
        LocalDelivery => "local_delivery",
        Refrigerated => "refrigerated",
        Hazmat => "hazmat",
        Flatbed => "flatbed",
    }
}

impl Department {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LongHaul => "Long Haul",
            Self::Regional => "Regional",
            Self::LocalDelivery => "Local Delivery",
            Self::Refrigerated => "Refrigerated",
            Self::Hazmat => "Hazmat",
            Self::Flatbed => "Flatbed",
        }
    }
}

wire_enum! {
    /// Duty status shown on the operator roster.
    pub enum OperatorStatus as "status" {
        Active => "active",
        OnBreak => "on_break",
        OffDuty => "off_duty",
        OnLeave => "on_leave",
    }
}

wire_enum! {
    pub enum CertificationLevel as "certification_level" {
        Junior => "junior",
        Standard => "standard",
        Senior => "senior",
        Expert => "expert",
    }
}

wire_enum! {
    pub enum SessionStatus as "session status" {
        Active => "active",
        Completed => "completed",
    }
}

wire_enum! {
    /// Metric family that triggered an alert.
    pub enum AlertType as "alert_type" {
        Fatigue => "fatigue",
        LowAlertness => "low_alertness",
        LowFocus => "low_focus",
        SlowReaction => "slow_reaction",
        HoursOfService => "hours_of_service",
        Incident => "incident",
    }
}

wire_enum! {
    pub enum Severity as "severity" {
        Info => "info",
        Warning => "warning",
        Critical => "critical",
    }
}

wire_enum! {
    pub enum AlertStatus as "alert status" {
        Active => "active",
        Acknowledged => "acknowledged",
        Resolved => "resolved",
    }
}

/// Roster entry for a driver or dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorRecord {
    pub id: OperatorId,
    pub name: String,
    pub employee_id: String,
    pub role: OperatorRole,
    pub department: Department,
    pub status: OperatorStatus,
    pub certification_level: CertificationLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

impl OperatorRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("employee_id", &self.employee_id)
    }

    pub fn apply(&mut self, update: OperatorUpdate) {
        let OperatorUpdate {
            name,
            employee_id,
            role,
            department,
            status,
            certification_level,
            contact_email,
            contact_phone,
        } = update;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(employee_id) = employee_id {
            self.employee_id = employee_id;
        }
        if let Some(role) = role {
            self.role = role;
        }
        if let Some(department) = department {
            self.department = department;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(level) = certification_level {
            self.certification_level = level;
        }
        if contact_email.is_some() {
            self.contact_email = contact_email;
        }
        if contact_phone.is_some() {
            self.contact_phone = contact_phone;
        }
    }
}

/// Operator payload before the store assigns an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOperator {
    pub name: String,
    pub employee_id: String,
    pub role: OperatorRole,
    pub department: Department,
    pub status: OperatorStatus,
    pub certification_level: CertificationLevel,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
}

impl NewOperator {
    pub fn into_record(self, id: OperatorId) -> OperatorRecord {
        OperatorRecord {
            id,
            name: self.name,
            employee_id: self.employee_id,
            role: self.role,
            department: self.department,
            status: self.status,
            certification_level: self.certification_level,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
        }
    }
}

/// Partial operator update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorUpdate {
    pub name: Option<String>,
    pub employee_id: Option<String>,
    pub role: Option<OperatorRole>,
    pub department: Option<Department>,
    pub status: Option<OperatorStatus>,
    pub certification_level: Option<CertificationLevel>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// One route session with the raw cognitive telemetry captured for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub id: SessionId,
    pub operator_id: OperatorId,
    pub operator_name: String,
    pub session_start: DateTime<Utc>,
    #[serde(default)]
    pub session_end: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub alertness_score: f64,
    pub focus_score: f64,
    pub fatigue_level: f64,
    #[serde(alias = "reaction_time")]
    pub reaction_time_ms: f64,
    pub hours_since_rest: f64,
    #[serde(default)]
    pub incident_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognitive_load: Option<crate::fleet::scoring::CognitiveLoad>,
    /// Rating supplied by the host system; the engine derives one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_rating: Option<crate::fleet::scoring::PerformanceRating>,
}

impl SessionRecord {
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Checks structural invariants and metric domains: scores in `[0, 100]`,
    /// reaction time and hours since rest non-negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("operator_name", &self.operator_name)?;

        match (self.status, self.session_end) {
            (SessionStatus::Active, Some(_)) | (SessionStatus::Completed, None) => {
                return Err(ValidationError::SessionEndMismatch {
                    status: self.status,
                });
            }
            (SessionStatus::Completed, Some(end)) if end < self.session_start => {
                return Err(ValidationError::SessionEndsBeforeStart);
            }
            _ => {}
        }

        for (metric, value, ceiling) in [
            ("alertness_score", self.alertness_score, Some(100.0)),
            ("focus_score", self.focus_score, Some(100.0)),
            ("fatigue_level", self.fatigue_level, Some(100.0)),
            ("reaction_time_ms", self.reaction_time_ms, None),
            ("hours_since_rest", self.hours_since_rest, None),
        ] {
            let in_range = value.is_finite()
                && value >= 0.0
                && ceiling.map_or(true, |ceiling| value <= ceiling);
            if !in_range {
                return Err(ValidationError::MetricOutOfRange { metric, value });
            }
        }

        Ok(())
    }
}

/// Alert raised against an operator's session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: AlertId,
    pub operator_id: OperatorId,
    pub operator_name: String,
    pub session_id: SessionId,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub metric_value: Option<f64>,
    #[serde(default)]
    pub threshold_value: Option<f64>,
    pub status: AlertStatus,
    #[serde(default)]
    pub acknowledged_by: Option<String>,
    #[serde(default)]
    pub acknowledged_at: Option<DateTime<Utc>>,
}

impl AlertRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("message", &self.message)?;
        let stamped = self.acknowledged_by.is_some() && self.acknowledged_at.is_some();
        let unstamped = self.acknowledged_by.is_none() && self.acknowledged_at.is_none();
        match self.status {
            AlertStatus::Active if unstamped => Ok(()),
            AlertStatus::Acknowledged | AlertStatus::Resolved if stamped => Ok(()),
            status => Err(ValidationError::AcknowledgementMismatch { status }),
        }
    }

    /// Marks an active alert as seen by `actor`.
    pub fn acknowledge(
        &mut self,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AlertTransitionError> {
        if self.status != AlertStatus::Active {
            return Err(AlertTransitionError::InvalidTransition {
                from: self.status,
                to: AlertStatus::Acknowledged,
            });
        }
        let actor = require_actor(actor)?;
        self.status = AlertStatus::Acknowledged;
        self.acknowledged_by = Some(actor);
        self.acknowledged_at = Some(at);
        Ok(())
    }

    /// Closes the alert for good. An earlier acknowledgement stamp is kept.
    pub fn resolve(&mut self, actor: &str, at: DateTime<Utc>) -> Result<(), AlertTransitionError> {
        match self.status {
            AlertStatus::Resolved => Err(AlertTransitionError::InvalidTransition {
                from: AlertStatus::Resolved,
                to: AlertStatus::Resolved,
            }),
            AlertStatus::Acknowledged => {
                require_actor(actor)?;
                self.status = AlertStatus::Resolved;
                Ok(())
            }
            AlertStatus::Active => {
                let actor = require_actor(actor)?;
                self.status = AlertStatus::Resolved;
                self.acknowledged_by = Some(actor);
                self.acknowledged_at = Some(at);
                Ok(())
            }
        }
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

fn require_actor(actor: &str) -> Result<String, AlertTransitionError> {
    let trimmed = actor.trim();
    if trimmed.is_empty() {
        Err(AlertTransitionError::MissingActor)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Record invariant violations detected at the store boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),
    #[error("session_end must be null exactly while the session is active (status {status})")]
    SessionEndMismatch { status: SessionStatus },
    #[error("session_end precedes session_start")]
    SessionEndsBeforeStart,
    #[error("{metric} value {value} is outside its allowed range")]
    MetricOutOfRange { metric: &'static str, value: f64 },
    #[error("acknowledgement fields do not match alert status {status}")]
    AcknowledgementMismatch { status: AlertStatus },
}

/// Illegal alert lifecycle moves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlertTransitionError {
    #[error("invalid alert transition from {from} to {to}")]
    InvalidTransition { from: AlertStatus, to: AlertStatus },
    #[error("acknowledging actor must not be empty")]
    MissingActor,
}
