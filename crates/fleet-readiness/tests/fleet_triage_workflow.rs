//! End-to-end triage scenarios driven through the public store, service and router.
//!
//! A shift starts from the reference fleet, ingests a telematics export, raises
//! alerts and asks for staffing recommendations.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use fleet_readiness::fleet::scoring::StatusBand;
use fleet_readiness::fleet::{
    fleet_router, import_sessions_csv, AlertQuery, AlertStatus, AlertThresholds, AlertType,
    CannedRecommendationGenerator, FleetServiceError, InMemoryFleetStore, RepositoryError,
    RiskLevel, SessionId, SessionQuery, Severity,
};
use tower::ServiceExt;

const EXPORT: &str = "\
Session ID,Operator ID,Operator Name,Session Start,Session End,Alertness,Focus,Fatigue,Reaction Time,Hours Since Rest,Incidents,Cognitive Load
,op-3,Marcus Bell,2025-11-23T15:00:00Z,,52,48,38,540,11.5,0,high
,op-1,Alex Thompson,2025-11-23T06:00:00Z,2025-11-23T07:45:00Z,90,91,12,320,1,0,low
";

fn shift_store() -> InMemoryFleetStore {
    InMemoryFleetStore::seeded().expect("reference fleet seeds")
}

#[test]
fn imported_shift_reorders_triage_board() {
    let store = shift_store();
    let service = store.service(
        Arc::new(CannedRecommendationGenerator::reference()),
        AlertThresholds::default(),
    );

    for session in import_sessions_csv(EXPORT.as_bytes()).expect("export parses") {
        service.record_session(session).expect("session recorded");
    }

    let board = service.triage_board().expect("board");
    let names: Vec<&str> = board
        .entries
        .iter()
        .map(|entry| entry.operator_name.as_str())
        .collect();
    assert_eq!(names, ["Marcus Bell", "Sarah Chen", "Alex Thompson"]);
    assert_eq!(board.entries[0].vigilance_score, 50);
    assert_eq!(board.entries[0].status_band, StatusBand::Rest);
    assert_eq!(board.focus_operator.as_deref(), Some("Marcus Bell"));

    let completed = service
        .sessions(
            &SessionQuery {
                status: Some(fleet_readiness::fleet::SessionStatus::Completed),
                ..SessionQuery::default()
            },
            None,
        )
        .expect("listed");
    assert_eq!(completed.len(), 2);
}

#[test]
fn evaluation_raises_hours_of_service_alert() {
    let store = shift_store();
    let service = store.service(
        Arc::new(CannedRecommendationGenerator::reference()),
        AlertThresholds::default(),
    );
    let marcus = import_sessions_csv(EXPORT.as_bytes())
        .expect("export parses")
        .remove(0);
    let stored = service.record_session(marcus).expect("session recorded");

    let raised = service.evaluate_session(&stored.id).expect("evaluated");
    let kinds: Vec<(AlertType, Severity)> = raised
        .iter()
        .map(|alert| (alert.alert_type, alert.severity))
        .collect();
    assert_eq!(
        kinds,
        [
            (AlertType::Fatigue, Severity::Critical),
            (AlertType::HoursOfService, Severity::Critical),
            (AlertType::LowAlertness, Severity::Warning),
            (AlertType::LowFocus, Severity::Warning),
            (AlertType::SlowReaction, Severity::Warning),
        ]
    );

    let critical = service
        .alerts(
            &AlertQuery {
                status: Some(AlertStatus::Active),
                severity: Some(Severity::Critical),
                ..AlertQuery::default()
            },
            None,
        )
        .expect("listed");
    assert_eq!(critical.len(), 3);
}

#[test]
fn missing_session_is_not_found() {
    let service = shift_store().service(
        Arc::new(CannedRecommendationGenerator::reference()),
        AlertThresholds::default(),
    );
    let err = service
        .evaluate_session(&SessionId("sess-404".to_string()))
        .expect_err("missing");
    assert!(matches!(
        err,
        FleetServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn recommendations_flag_the_fatigued_driver() {
    let service = shift_store().service(
        Arc::new(CannedRecommendationGenerator::reference()),
        AlertThresholds::default(),
    );
    let report = service.generate_recommendations().expect("generated");

    let critical: Vec<&str> = report
        .recommendations
        .iter()
        .filter(|rec| rec.risk_level == RiskLevel::Critical)
        .map(|rec| rec.operator_name.as_str())
        .collect();
    assert_eq!(critical, ["Sarah Chen"]);
    let total: f64 = report
        .risk_distribution
        .iter()
        .map(|entry| entry.percentage)
        .sum();
    assert!((total - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn triage_route_serves_board() {
    let service = shift_store().service(
        Arc::new(CannedRecommendationGenerator::reference()),
        AlertThresholds::default(),
    );
    let router = fleet_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::get("/api/v1/fleet/triage")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(payload["focus_operator"], "Sarah Chen");
    assert_eq!(payload["entries"][0]["action_tag"], "MONITOR");
}
