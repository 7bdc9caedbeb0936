use super::common::*;

use crate::fleet::domain::{AlertId, AlertStatus, AlertType, Severity};
use crate::fleet::monitoring::{evaluate_session, requires_relief, AlertThresholds, MetricError};

#[test]
fn degraded_session_raises_critical_alerts_first() {
    let drafts =
        evaluate_session(&degraded_session(), &AlertThresholds::default()).expect("evaluates");

    let kinds: Vec<(AlertType, Severity)> = drafts
        .iter()
        .map(|draft| (draft.alert_type, draft.severity))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (AlertType::Fatigue, Severity::Critical),
            (AlertType::Incident, Severity::Critical),
            (AlertType::LowAlertness, Severity::Warning),
            (AlertType::SlowReaction, Severity::Warning),
        ]
    );
    assert_eq!(drafts[0].metric_value, Some(40.0));
    assert_eq!(drafts[0].threshold_value, Some(35.0));
}

#[test]
fn healthy_session_raises_nothing() {
    let drafts = evaluate_session(&session(85.0, 92.0, 15.0, 2.0), &AlertThresholds::default())
        .expect("evaluates");
    assert!(drafts.is_empty());
}

#[test]
fn thresholds_are_strict() {
    let drafts = evaluate_session(&session(80.0, 60.0, 35.0, 7.5), &AlertThresholds::default())
        .expect("evaluates");
    assert!(drafts.is_empty());
}

#[test]
fn out_of_range_fatigue_is_rejected() {
    let err = evaluate_session(&session(85.0, 92.0, 120.0, 2.0), &AlertThresholds::default())
        .expect_err("rejected");
    assert_eq!(
        err,
        MetricError::OutOfRangeMetric {
            metric: "fatigue_level",
            value: 120.0
        }
    );
}

#[test]
fn negative_reaction_time_is_rejected() {
    let mut reading = session(85.0, 92.0, 15.0, 2.0);
    reading.reaction_time_ms = -1.0;
    let err = evaluate_session(&reading, &AlertThresholds::default()).expect_err("rejected");
    assert!(matches!(
        err,
        MetricError::OutOfRangeMetric {
            metric: "reaction_time_ms",
            ..
        }
    ));
}

#[test]
fn hours_of_service_escalates_with_time_since_rest() {
    let warning = evaluate_session(&session(90.0, 90.0, 10.0, 9.0), &AlertThresholds::default())
        .expect("evaluates");
    assert_eq!(warning.len(), 1);
    assert_eq!(warning[0].alert_type, AlertType::HoursOfService);
    assert_eq!(warning[0].severity, Severity::Warning);
    assert_eq!(warning[0].threshold_value, Some(8.0));

    let critical = evaluate_session(&session(90.0, 90.0, 10.0, 11.5), &AlertThresholds::default())
        .expect("evaluates");
    assert_eq!(critical[0].severity, Severity::Critical);
    assert_eq!(critical[0].threshold_value, Some(11.0));
}

#[test]
fn custom_thresholds_are_honoured() {
    let thresholds = AlertThresholds {
        fatigue_critical: 45.0,
        alertness_warning: 60.0,
        ..AlertThresholds::default()
    };
    let drafts = evaluate_session(&degraded_session(), &thresholds).expect("evaluates");
    assert!(drafts
        .iter()
        .all(|draft| !matches!(draft.alert_type, AlertType::Fatigue | AlertType::LowAlertness)));
}

#[test]
fn relief_required_from_driving_limit() {
    assert!(!requires_relief(&session(90.0, 90.0, 10.0, 8.0)));
    assert!(requires_relief(&session(90.0, 90.0, 10.0, 11.0)));
    assert!(requires_relief(&session(90.0, 90.0, 10.0, 15.0)));
}

#[test]
fn drafts_become_active_alerts() {
    let reading = degraded_session();
    let draft = evaluate_session(&reading, &AlertThresholds::default())
        .expect("evaluates")
        .remove(0);
    let alert = draft.into_record(AlertId("alt-9".to_string()), &reading);

    assert_eq!(alert.status, AlertStatus::Active);
    assert_eq!(alert.session_id, reading.id);
    assert_eq!(alert.operator_name, "Sarah Chen");
    assert!(alert.validate().is_ok());
}
