pub mod distribution;
mod summary;
pub mod views;

pub use distribution::{aggregate_distribution, DistributionEntry};
pub use summary::{fleet_analytics, fleet_overview, triage_board};
