mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use fleet_readiness::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
