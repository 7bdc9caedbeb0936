use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::fleet::domain::{
    CertificationLevel, Department, NewOperator, OperatorId, OperatorRecord, OperatorRole,
    OperatorStatus, OperatorUpdate, SessionId, SessionRecord, SessionStatus,
};
use crate::fleet::monitoring::AlertThresholds;
use crate::fleet::recommendations::{
    CannedRecommendationGenerator, GeneratorError, RecommendationGenerator,
    RecommendationRequest, RecommendationSet,
};
use crate::fleet::repository::{OperatorQuery, OperatorRepository, RepositoryError, SortOrder};
use crate::fleet::service::FleetMonitorService;
use crate::fleet::store::{InMemoryAlertStore, InMemoryFleetService, InMemoryFleetStore, InMemorySessionStore};

pub(super) fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 23, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn operator(name: &str, employee_id: &str) -> OperatorRecord {
    OperatorRecord {
        id: OperatorId(format!("op-{employee_id}")),
        name: name.to_string(),
        employee_id: employee_id.to_string(),
        role: OperatorRole::RegionalDriver,
        department: Department::Regional,
        status: OperatorStatus::OnBreak,
        certification_level: CertificationLevel::Senior,
        contact_email: None,
        contact_phone: None,
    }
}

pub(super) fn new_operator(name: &str, employee_id: &str) -> NewOperator {
    NewOperator {
        name: name.to_string(),
        employee_id: employee_id.to_string(),
        role: OperatorRole::LocalDriver,
        department: Department::LocalDelivery,
        status: OperatorStatus::Active,
        certification_level: CertificationLevel::Junior,
        contact_email: Some("driver@axonlabs.com".to_string()),
        contact_phone: None,
    }
}

/// Active session with the given alertness, focus, fatigue and hours since rest.
pub(super) fn session(alertness: f64, focus: f64, fatigue: f64, hours: f64) -> SessionRecord {
    SessionRecord {
        id: SessionId("sess-test".to_string()),
        operator_id: OperatorId("op-2".to_string()),
        operator_name: "Sarah Chen".to_string(),
        session_start: at(12, 30),
        session_end: None,
        status: SessionStatus::Active,
        alertness_score: alertness,
        focus_score: focus,
        fatigue_level: fatigue,
        reaction_time_ms: 350.0,
        hours_since_rest: hours,
        incident_count: 0,
        cognitive_load: None,
        performance_rating: None,
    }
}

/// Sarah Chen's reference session: 65/70/40, 510 ms, 5 h, one incident.
pub(super) fn degraded_session() -> SessionRecord {
    SessionRecord {
        reaction_time_ms: 510.0,
        incident_count: 1,
        ..session(65.0, 70.0, 40.0, 5.0)
    }
}

pub(super) fn build_service() -> (InMemoryFleetService, InMemoryFleetStore) {
    let store = InMemoryFleetStore::seeded().expect("reference fleet seeds");
    let service = store.service(
        Arc::new(CannedRecommendationGenerator::reference()),
        AlertThresholds::default(),
    );
    (service, store)
}

pub(super) struct UnavailableOperators;

impl OperatorRepository for UnavailableOperators {
    fn filter(
        &self,
        _query: &OperatorQuery,
        _sort: SortOrder,
        _limit: Option<usize>,
    ) -> Result<Vec<OperatorRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &OperatorId) -> Result<Option<OperatorRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn create(&self, _operator: NewOperator) -> Result<OperatorRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(
        &self,
        _id: &OperatorId,
        _update: OperatorUpdate,
    ) -> Result<OperatorRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &OperatorId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn unavailable_service(
) -> FleetMonitorService<UnavailableOperators, InMemorySessionStore, InMemoryAlertStore> {
    FleetMonitorService::new(
        Arc::new(UnavailableOperators),
        Arc::new(InMemorySessionStore::default()),
        Arc::new(InMemoryAlertStore::default()),
        Arc::new(CannedRecommendationGenerator::reference()),
        AlertThresholds::default(),
    )
}

pub(super) struct OfflineGenerator;

impl RecommendationGenerator for OfflineGenerator {
    fn generate(
        &self,
        _request: &RecommendationRequest,
    ) -> Result<RecommendationSet, GeneratorError> {
        Err(GeneratorError::Unavailable("model endpoint timed out".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
