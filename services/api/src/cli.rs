use crate::demo::{run_demo, run_triage, DemoArgs, TriageArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fleet_readiness::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Fleet Readiness Monitor",
    about = "Score driver readiness, triage active routes and serve the fleet-safety API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print a triage board for a fleet snapshot
    Triage(TriageArgs),
    /// Walk through scoring, alerting and recommendations on the reference fleet
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Triage(args) => run_triage(args),
        Command::Demo(args) => run_demo(args),
    }
}
