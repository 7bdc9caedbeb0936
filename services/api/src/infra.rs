use fleet_readiness::error::AppError;
use fleet_readiness::fleet::{
    AlertThresholds, CannedRecommendationGenerator, FleetSnapshot, InMemoryFleetService,
    InMemoryFleetStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires a service over `store` with the offline reference generator.
pub(crate) fn fleet_service(
    store: &InMemoryFleetStore,
    thresholds: AlertThresholds,
) -> InMemoryFleetService {
    store.service(
        Arc::new(CannedRecommendationGenerator::reference()),
        thresholds,
    )
}

pub(crate) fn load_snapshot(path: &Path) -> Result<FleetSnapshot, AppError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(FleetSnapshot::from_json_reader(reader)?)
}
