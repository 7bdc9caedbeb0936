//! Natural-language triage text fed to the recommendation generator.
//!
//! Output is byte-stable for identical input: enum values render as their wire
//! identifiers and numbers use the shortest round-trip form (`65`, `5.5`).

use super::domain::{OperatorRecord, SessionRecord};

/// One line combining an operator's roster entry with a session's readings.
pub fn build_triage_summary_line(operator: &OperatorRecord, session: &SessionRecord) -> String {
    format!(
        "{} ({}, {}): {} | {}",
        operator.name,
        operator.role,
        operator.department,
        operator.status,
        session_metrics(session)
    )
}

fn session_metrics(session: &SessionRecord) -> String {
    format!(
        "Alertness {}%, Focus {}%, Fatigue {}%, Hours since rest: {}",
        session.alertness_score,
        session.focus_score,
        session.fatigue_level,
        session.hours_since_rest
    )
}

pub fn operator_status_line(operator: &OperatorRecord) -> String {
    format!(
        "- {} ({}, {}): {}",
        operator.name, operator.role, operator.department, operator.status
    )
}

pub fn active_session_line(session: &SessionRecord) -> String {
    format!("- {}: {}", session.operator_name, session_metrics(session))
}

/// Full prompt for the staffing recommendation request.
///
/// Lists the whole roster, then one [`active_session_line`] per active session.
/// Completed sessions are skipped.
pub fn build_recommendation_prompt(
    fleet_name: &str,
    operators: &[OperatorRecord],
    sessions: &[SessionRecord],
) -> String {
    let mut prompt = format!(
        "You are an AI system for {fleet_name} analyzing driver safety and cognitive readiness data for a trucking fleet.\n"
    );
    prompt.push_str("\nCurrent driver status:\n");
    for operator in operators {
        prompt.push_str(&operator_status_line(operator));
        prompt.push('\n');
    }

    prompt.push_str("\nActive route sessions with cognitive metrics:\n");
    for session in sessions.iter().filter(|session| session.is_active()) {
        prompt.push_str(&active_session_line(session));
        prompt.push('\n');
    }

    prompt.push_str(
        "\nBased on this data, provide 5-7 specific recommendations for optimal route assignment, driver safety, and fatigue risk mitigation. Consider:\n\
1. Driver cognitive readiness levels\n\
2. Hours of service (HOS) compliance and rest requirements\n\
3. Route-specific demands (long haul vs regional vs local)\n\
4. Risk assessment for each driver assignment\n\
5. Driver rotation and relief strategies\n\
\n\
Format each recommendation with a clear action, rationale, and risk level.",
    );

    prompt
}
