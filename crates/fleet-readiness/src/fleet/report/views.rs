use super::distribution::DistributionEntry;
use crate::fleet::domain::OperatorRole;
use crate::fleet::scoring::{PerformanceRating, SessionAssessment, TrendIndicator};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FleetOverview {
    pub total_operators: usize,
    pub active_operators: usize,
    pub drivers_on_route: usize,
    pub average_alertness: f64,
    pub alertness_trend: TrendIndicator,
    pub average_readiness: u8,
    pub active_alerts: usize,
    pub critical_alerts: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleCountEntry {
    pub role: OperatorRole,
    pub role_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricAverages {
    pub alertness: f64,
    pub focus: f64,
    pub fatigue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetAnalytics {
    pub session_count: usize,
    pub performance_distribution: Vec<DistributionEntry<PerformanceRating>>,
    pub role_distribution: Vec<RoleCountEntry>,
    pub averages: MetricAverages,
}

/// Active sessions ordered from least to most vigilant.
#[derive(Debug, Clone, Serialize)]
pub struct TriageBoard {
    pub entries: Vec<SessionAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_operator: Option<String>,
}
