use super::distribution::aggregate_distribution;
use super::views::{FleetAnalytics, FleetOverview, MetricAverages, RoleCountEntry, TriageBoard};
use crate::fleet::domain::{
    AlertRecord, AlertStatus, OperatorRecord, OperatorStatus, SessionRecord, Severity,
};
use crate::fleet::scoring::{
    assess_session, average_readiness, fleet_trend, PerformanceRating, StatusBand,
};

fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold((0.0, 0_u32), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

pub fn fleet_overview(
    operators: &[OperatorRecord],
    sessions: &[SessionRecord],
    alerts: &[AlertRecord],
) -> FleetOverview {
    let active_sessions: Vec<&SessionRecord> =
        sessions.iter().filter(|session| session.is_active()).collect();
    let open_alerts: Vec<&AlertRecord> = alerts
        .iter()
        .filter(|alert| alert.status == AlertStatus::Active)
        .collect();

    let average_alertness = mean(active_sessions.iter().map(|s| s.alertness_score));

    FleetOverview {
        total_operators: operators.len(),
        active_operators: operators
            .iter()
            .filter(|op| op.status == OperatorStatus::Active)
            .count(),
        drivers_on_route: active_sessions.len(),
        average_alertness,
        alertness_trend: fleet_trend(average_alertness),
        average_readiness: average_readiness(active_sessions.iter().copied()),
        active_alerts: open_alerts.len(),
        critical_alerts: open_alerts
            .iter()
            .filter(|alert| alert.severity == Severity::Critical)
            .count(),
    }
}

pub fn fleet_analytics(operators: &[OperatorRecord], sessions: &[SessionRecord]) -> FleetAnalytics {
    let ratings = sessions
        .iter()
        .map(|session| assess_session(session).performance_rating);
    let performance_distribution = aggregate_distribution(ratings, PerformanceRating::ordered());

    let mut role_distribution: Vec<RoleCountEntry> = Vec::new();
    for operator in operators {
        match role_distribution
            .iter_mut()
            .find(|entry| entry.role == operator.role)
        {
            Some(entry) => entry.count += 1,
            None => role_distribution.push(RoleCountEntry {
                role: operator.role,
                role_label: operator.role.label(),
                count: 1,
            }),
        }
    }

    FleetAnalytics {
        session_count: sessions.len(),
        performance_distribution,
        role_distribution,
        averages: MetricAverages {
            alertness: mean(sessions.iter().map(|s| s.alertness_score)),
            focus: mean(sessions.iter().map(|s| s.focus_score)),
            fatigue: mean(sessions.iter().map(|s| s.fatigue_level)),
        },
    }
}

pub fn triage_board(sessions: &[SessionRecord]) -> TriageBoard {
    let mut entries: Vec<_> = sessions
        .iter()
        .filter(|session| session.is_active())
        .map(assess_session)
        .collect();
    entries.sort_by(|a, b| {
        a.vigilance_score
            .cmp(&b.vigilance_score)
            .then_with(|| a.operator_name.cmp(&b.operator_name))
    });

    let focus_operator = entries
        .first()
        .filter(|entry| entry.status_band != StatusBand::Ready)
        .map(|entry| entry.operator_name.clone());

    TriageBoard {
        entries,
        focus_operator,
    }
}
