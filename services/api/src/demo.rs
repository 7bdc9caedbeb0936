use crate::infra::{fleet_service, load_snapshot};
use chrono::Local;
use clap::Args;
use fleet_readiness::error::AppError;
use fleet_readiness::fleet::report::views::{FleetAnalytics, FleetOverview, TriageBoard};
use fleet_readiness::fleet::{
    import_sessions_csv, AlertRecord, AlertThresholds, FleetSnapshot, InMemoryFleetStore,
    RecommendationReport, SessionQuery,
};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct TriageArgs {
    /// Fleet snapshot JSON (`operators`, `sessions`, `alerts`). Defaults to the reference fleet.
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
    /// Telematics session export to record on top of the snapshot
    #[arg(long)]
    pub(crate) sessions_csv: Option<PathBuf>,
    /// Also print the staffing recommendation prompt
    #[arg(long)]
    pub(crate) prompt: bool,
    /// Emit the triage board as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the staffing recommendation portion of the demo.
    #[arg(long)]
    pub(crate) skip_recommendations: bool,
}

pub(crate) fn run_triage(args: TriageArgs) -> Result<(), AppError> {
    let TriageArgs {
        fixture,
        sessions_csv,
        prompt,
        json,
    } = args;

    let snapshot = match fixture {
        Some(path) => load_snapshot(&path)?,
        None => FleetSnapshot::reference()?,
    };
    let store = InMemoryFleetStore::from_snapshot(snapshot)?;
    let service = fleet_service(&store, AlertThresholds::default());

    if let Some(path) = sessions_csv {
        let reader = BufReader::new(File::open(path)?);
        for session in import_sessions_csv(reader)? {
            service.record_session(session)?;
        }
    }

    let board = service.triage_board()?;
    if json {
        let rendered = serde_json::to_string_pretty(&board).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_triage_board(&board);
        render_overview(&service.overview()?);
    }

    if prompt {
        println!("\nRecommendation prompt\n");
        println!("{}", service.recommendation_request()?.prompt);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!(
        "Fleet readiness demo ({})",
        Local::now().format("%Y-%m-%d %H:%M")
    );

    let store = InMemoryFleetStore::seeded()?;
    let service = fleet_service(&store, AlertThresholds::default());

    let board = service.triage_board()?;
    render_triage_board(&board);

    let mut raised = Vec::new();
    for session in service.sessions(&SessionQuery::active(), None)? {
        raised.extend(service.evaluate_session(&session.id)?);
    }
    render_alerts(&raised);

    render_overview(&service.overview()?);
    render_analytics(&service.analytics()?);

    if !args.skip_recommendations {
        render_recommendations(&service.generate_recommendations()?);
    }

    Ok(())
}

pub(crate) fn render_triage_board(board: &TriageBoard) {
    println!("\nTriage board (least vigilant first)");
    if board.entries.is_empty() {
        println!("- no drivers on route");
    }
    for entry in &board.entries {
        let hos = if entry.hos_flags.is_empty() {
            String::new()
        } else {
            let flags: Vec<&str> = entry.hos_flags.iter().map(|flag| flag.label()).collect();
            format!(" | HOS: {}", flags.join(", "))
        };
        println!(
            "- [{}] {} ({}) vigilance {} | {} | {}{}",
            entry.action_tag,
            entry.operator_name,
            entry.session_id,
            entry.vigilance_score,
            entry.performance_rating.label(),
            entry.status_indicator,
            hos
        );
    }

    if let Some(name) = &board.focus_operator {
        println!("Focus driver: {name}");
    }
}

fn render_alerts(alerts: &[AlertRecord]) {
    if alerts.is_empty() {
        println!("\nNew alerts: none");
        return;
    }

    println!("\nNew alerts");
    for alert in alerts {
        println!(
            "- [{}] {} ({}): {}",
            alert.severity, alert.operator_name, alert.alert_type, alert.message
        );
    }
}

pub(crate) fn render_overview(overview: &FleetOverview) {
    println!("\nFleet overview");
    println!(
        "- {} operators ({} active) | {} drivers on route",
        overview.total_operators, overview.active_operators, overview.drivers_on_route
    );
    println!(
        "- Average alertness {:.1}% ({}) | Average readiness {}%",
        overview.average_alertness, overview.alertness_trend, overview.average_readiness
    );
    println!(
        "- {} active alerts, {} critical",
        overview.active_alerts, overview.critical_alerts
    );
}

fn render_analytics(analytics: &FleetAnalytics) {
    println!("\nPerformance distribution ({} sessions)", analytics.session_count);
    for entry in &analytics.performance_distribution {
        println!(
            "- {}: {} ({}%)",
            entry.bucket.label(),
            entry.count,
            entry.rounded_percentage()
        );
    }

    println!("\nRoles");
    for entry in &analytics.role_distribution {
        println!("- {}: {}", entry.role_label, entry.count);
    }

    println!(
        "\nAverages: alertness {:.1}%, focus {:.1}%, fatigue {:.1}%",
        analytics.averages.alertness, analytics.averages.focus, analytics.averages.fatigue
    );
}

fn render_recommendations(report: &RecommendationReport) {
    println!("\nStaffing recommendations");
    for rec in &report.recommendations {
        println!(
            "- [{} / {}] {} -> {}: {}",
            rec.priority, rec.risk_level, rec.operator_name, rec.recommended_role, rec.action
        );
    }

    println!("\nRisk distribution");
    for entry in &report.risk_distribution {
        println!(
            "- {}: {} ({}%)",
            entry.bucket,
            entry.count,
            entry.rounded_percentage()
        );
    }

    println!("\nPriority distribution");
    for entry in &report.priority_distribution {
        println!(
            "- {}: {} ({}%)",
            entry.bucket,
            entry.count,
            entry.rounded_percentage()
        );
    }
}
