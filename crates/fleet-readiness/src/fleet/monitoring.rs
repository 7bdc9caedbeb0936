//! Threshold evaluation that turns session telemetry into alert drafts.
//!
//! Unlike the display-oriented scoring engine, nothing here clamps: a metric
//! outside its domain is rejected so a corrupt reading cannot hide a breach.

use super::domain::{AlertId, AlertRecord, AlertStatus, AlertType, SessionRecord, Severity};
use super::scoring::{worst_hos_flag, HosFlag};
use serde::{Deserialize, Serialize};

/// Alert limits applied to a single session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Fatigue strictly above this raises a critical alert.
    pub fatigue_critical: f64,
    /// Alertness strictly below this raises a warning.
    pub alertness_warning: f64,
    pub focus_warning: f64,
    pub reaction_time_warning_ms: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            fatigue_critical: 35.0,
            alertness_warning: 80.0,
            focus_warning: 60.0,
            reaction_time_warning_ms: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    #[error("{metric} value {value} is outside its valid range")]
    OutOfRangeMetric { metric: &'static str, value: f64 },
}

/// Alert content before the store assigns an identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertDraft {
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: String,
    pub metric_value: Option<f64>,
    pub threshold_value: Option<f64>,
}

impl AlertDraft {
    pub fn into_record(self, id: AlertId, session: &SessionRecord) -> AlertRecord {
        AlertRecord {
            id,
            operator_id: session.operator_id.clone(),
            operator_name: session.operator_name.clone(),
            session_id: session.id.clone(),
            alert_type: self.alert_type,
            severity: self.severity,
            message: self.message,
            metric_value: self.metric_value,
            threshold_value: self.threshold_value,
            status: AlertStatus::Active,
            acknowledged_by: None,
            acknowledged_at: None,
        }
    }
}

fn check_percentage(metric: &'static str, value: f64) -> Result<f64, MetricError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(MetricError::OutOfRangeMetric { metric, value })
    }
}

fn check_non_negative(metric: &'static str, value: f64) -> Result<f64, MetricError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MetricError::OutOfRangeMetric { metric, value })
    }
}

/// Compares a session against `thresholds`, returning drafts ordered critical first.
pub fn evaluate_session(
    session: &SessionRecord,
    thresholds: &AlertThresholds,
) -> Result<Vec<AlertDraft>, MetricError> {
    let fatigue = check_percentage("fatigue_level", session.fatigue_level)?;
    let alertness = check_percentage("alertness_score", session.alertness_score)?;
    let focus = check_percentage("focus_score", session.focus_score)?;
    let reaction = check_non_negative("reaction_time_ms", session.reaction_time_ms)?;
    let hours = check_non_negative("hours_since_rest", session.hours_since_rest)?;

    let mut drafts = Vec::new();

    if fatigue > thresholds.fatigue_critical {
        drafts.push(AlertDraft {
            alert_type: AlertType::Fatigue,
            severity: Severity::Critical,
            message: format!(
                "Fatigue level {fatigue}% exceeded {}%",
                thresholds.fatigue_critical
            ),
            metric_value: Some(fatigue),
            threshold_value: Some(thresholds.fatigue_critical),
        });
    }

    if session.incident_count > 0 {
        drafts.push(AlertDraft {
            alert_type: AlertType::Incident,
            severity: Severity::Critical,
            message: format!(
                "{} safety incident(s) recorded during session",
                session.incident_count
            ),
            metric_value: Some(f64::from(session.incident_count)),
            threshold_value: None,
        });
    }

    if let Some(flag) = worst_hos_flag(hours) {
        drafts.push(AlertDraft {
            alert_type: AlertType::HoursOfService,
            severity: flag.severity(),
            message: format!("{hours}h since rest: {}", flag.label()),
            metric_value: Some(hours),
            threshold_value: Some(flag.threshold_hours()),
        });
    }

    if alertness < thresholds.alertness_warning {
        drafts.push(AlertDraft {
            alert_type: AlertType::LowAlertness,
            severity: Severity::Warning,
            message: format!(
                "Alertness {alertness}% below {}%",
                thresholds.alertness_warning
            ),
            metric_value: Some(alertness),
            threshold_value: Some(thresholds.alertness_warning),
        });
    }

    if focus < thresholds.focus_warning {
        drafts.push(AlertDraft {
            alert_type: AlertType::LowFocus,
            severity: Severity::Warning,
            message: format!("Focus {focus}% below {}%", thresholds.focus_warning),
            metric_value: Some(focus),
            threshold_value: Some(thresholds.focus_warning),
        });
    }

    if reaction > thresholds.reaction_time_warning_ms {
        drafts.push(AlertDraft {
            alert_type: AlertType::SlowReaction,
            severity: Severity::Warning,
            message: format!(
                "Reaction time {reaction}ms slower than {}ms",
                thresholds.reaction_time_warning_ms
            ),
            metric_value: Some(reaction),
            threshold_value: Some(thresholds.reaction_time_warning_ms),
        });
    }

    drafts.sort_by(|a, b| b.severity.cmp(&a.severity));
    Ok(drafts)
}

/// Whether the worst HOS condition for a session calls for pulling the driver.
pub fn requires_relief(session: &SessionRecord) -> bool {
    matches!(
        worst_hos_flag(session.hours_since_rest),
        Some(HosFlag::DrivingLimit | HosFlag::DutyWindowExceeded)
    )
}
