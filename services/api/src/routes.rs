use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use fleet_readiness::fleet::{
    fleet_router, AlertRepository, FleetMonitorService, OperatorRepository, SessionRepository,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_fleet_routes<O, S, A>(service: Arc<FleetMonitorService<O, S, A>>) -> axum::Router
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    fleet_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::fleet_service;
    use axum::body::Body;
    use axum::http::Request;
    use fleet_readiness::fleet::{AlertThresholds, InMemoryFleetStore};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let store = InMemoryFleetStore::seeded().expect("reference fleet seeds");
        let service = Arc::new(fleet_service(&store, AlertThresholds::default()));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_fleet_routes(service).layer(Extension(state))
    }

    async fn read_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request builds")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app(true).oneshot(get("/health")).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = app(false).oneshot(get("/ready")).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(read_json(response).await["status"], "initializing");

        let flag = Arc::new(AtomicBool::new(false));
        flag.store(true, Ordering::Release);
        let state = AppState {
            readiness: flag,
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_render_as_text() {
        let response = app(true).oneshot(get("/metrics")).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn fleet_routes_are_mounted() {
        let response = app(true)
            .oneshot(get("/api/v1/fleet/analytics"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["session_count"], 3);
        assert_eq!(payload["performance_distribution"][0]["bucket"], "optimal");
    }
}
