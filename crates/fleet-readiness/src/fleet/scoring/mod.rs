//! Readiness scoring engine.
//!
//! Every function here is pure: outputs depend only on the arguments, nothing
//! is cached, and calls are safe from any number of threads.

mod bands;
mod hos;

pub use bands::{
    classify_cognitive_load, classify_performance_band, classify_status_band, fleet_trend,
    CognitiveLoad, PerformanceRating, StatusBand, TrendIndicator, DEGRADED_FLOOR, GOOD_FLOOR,
    OPTIMAL_FLOOR,
};
pub use hos::{
    hours_of_service_flags, worst_hos_flag, HosFlag, BREAK_DUE_HOURS, DRIVING_LIMIT_HOURS,
    DUTY_WINDOW_HOURS,
};

use super::domain::{OperatorId, SessionId, SessionRecord};
use serde::Serialize;

/// Mean of alertness and focus, rounded half away from zero and clamped to `0..=100`.
///
/// Missing or non-finite inputs count as 0 so the result is always a valid score.
pub fn compute_vigilance_score(alertness: Option<f64>, focus: Option<f64>) -> u8 {
    let alertness = finite_or_zero(alertness);
    let focus = finite_or_zero(focus);
    let mean = ((alertness + focus) / 2.0).round();
    mean.clamp(0.0, 100.0) as u8
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Derived classification fields for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionAssessment {
    pub session_id: SessionId,
    pub operator_id: OperatorId,
    pub operator_name: String,
    pub vigilance_score: u8,
    pub performance_band: PerformanceRating,
    /// Host-reported rating when present, otherwise `performance_band`.
    pub performance_rating: PerformanceRating,
    pub status_band: StatusBand,
    pub status_indicator: &'static str,
    pub action_tag: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cognitive_load: Option<CognitiveLoad>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hos_flags: Vec<HosFlag>,
}

pub fn assess_session(session: &SessionRecord) -> SessionAssessment {
    let vigilance_score =
        compute_vigilance_score(Some(session.alertness_score), Some(session.focus_score));
    let performance_band = classify_performance_band(vigilance_score);
    let status_band = classify_status_band(vigilance_score);

    SessionAssessment {
        session_id: session.id.clone(),
        operator_id: session.operator_id.clone(),
        operator_name: session.operator_name.clone(),
        vigilance_score,
        performance_band,
        performance_rating: session.performance_rating.unwrap_or(performance_band),
        status_band,
        status_indicator: status_band.indicator(),
        action_tag: status_band.action_tag(),
        cognitive_load: session.cognitive_load,
        hos_flags: hours_of_service_flags(session.hours_since_rest),
    }
}

/// Average of `(alertness + focus) / 2` across sessions, rounded; 0 when empty.
pub fn average_readiness<'a, I>(sessions: I) -> u8
where
    I: IntoIterator<Item = &'a SessionRecord>,
{
    let (sum, count) = sessions.into_iter().fold((0.0_f64, 0_u32), |(sum, count), s| {
        let readiness = (finite_or_zero(Some(s.alertness_score))
            + finite_or_zero(Some(s.focus_score)))
            / 2.0;
        (sum + readiness, count + 1)
    });

    if count == 0 {
        return 0;
    }
    (sum / f64::from(count)).round().clamp(0.0, 100.0) as u8
}
