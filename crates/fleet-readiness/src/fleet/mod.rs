//! Operator roster, route sessions, alerts and the readiness reports built on them.

pub mod domain;
pub mod import;
pub mod monitoring;
pub mod recommendations;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;
pub mod triage;

#[cfg(test)]
mod tests;

pub use domain::{
    AlertId, AlertRecord, AlertStatus, AlertType, CertificationLevel, Department,
    InvalidEnumValue, NewOperator, OperatorId, OperatorRecord, OperatorRole, OperatorStatus,
    OperatorUpdate, SessionId, SessionRecord, SessionStatus, Severity, ValidationError,
};
pub use import::{import_sessions_csv, FleetSnapshot, ImportError};
pub use monitoring::{evaluate_session, AlertDraft, AlertThresholds, MetricError};
pub use recommendations::{
    CannedRecommendationGenerator, GeneratorError, Priority, Recommendation,
    RecommendationGenerator, RecommendationReport, RecommendationRequest, RecommendationSet,
    RiskLevel,
};
pub use repository::{
    AlertQuery, AlertRepository, OperatorQuery, OperatorRepository, RepositoryError,
    SessionQuery, SessionRepository, SortOrder,
};
pub use router::fleet_router;
pub use scoring::{assess_session, compute_vigilance_score, SessionAssessment};
pub use service::{FleetMonitorService, FleetServiceError};
pub use store::{InMemoryFleetService, InMemoryFleetStore};
pub use triage::{build_recommendation_prompt, build_triage_summary_line};
