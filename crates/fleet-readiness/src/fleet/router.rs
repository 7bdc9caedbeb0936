use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    AlertId, AlertTransitionError, InvalidEnumValue, NewOperator, OperatorId, OperatorUpdate,
    SessionId, SessionRecord,
};
use super::repository::{
    AlertQuery, AlertRepository, OperatorQuery, OperatorRepository, RepositoryError,
    SessionQuery, SessionRepository,
};
use super::service::{FleetMonitorService, FleetServiceError};

type SharedService<O, S, A> = Arc<FleetMonitorService<O, S, A>>;

/// Router builder exposing the roster, session, alert and fleet report endpoints.
pub fn fleet_router<O, S, A>(service: SharedService<O, S, A>) -> Router
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/operators",
            get(list_operators_handler::<O, S, A>).post(create_operator_handler::<O, S, A>),
        )
        .route(
            "/api/v1/operators/:operator_id",
            put(update_operator_handler::<O, S, A>).delete(delete_operator_handler::<O, S, A>),
        )
        .route(
            "/api/v1/sessions",
            get(list_sessions_handler::<O, S, A>).post(record_session_handler::<O, S, A>),
        )
        .route(
            "/api/v1/sessions/:session_id/assessment",
            get(assessment_handler::<O, S, A>),
        )
        .route(
            "/api/v1/sessions/:session_id/evaluate",
            post(evaluate_handler::<O, S, A>),
        )
        .route("/api/v1/alerts", get(list_alerts_handler::<O, S, A>))
        .route(
            "/api/v1/alerts/:alert_id/acknowledge",
            post(acknowledge_handler::<O, S, A>),
        )
        .route(
            "/api/v1/alerts/:alert_id/resolve",
            post(resolve_handler::<O, S, A>),
        )
        .route("/api/v1/fleet/overview", get(overview_handler::<O, S, A>))
        .route("/api/v1/fleet/analytics", get(analytics_handler::<O, S, A>))
        .route("/api/v1/fleet/triage", get(triage_handler::<O, S, A>))
        .route(
            "/api/v1/recommendations",
            post(recommendations_handler::<O, S, A>),
        )
        .route(
            "/api/v1/recommendations/prompt",
            get(prompt_handler::<O, S, A>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OperatorListParams {
    search: Option<String>,
    department: Option<String>,
    status: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SessionListParams {
    operator_id: Option<String>,
    status: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AlertListParams {
    status: Option<String>,
    severity: Option<String>,
    operator_id: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActorPayload {
    actor: String,
}

/// Blank query values mean "no filter".
fn parse_filter<T>(raw: Option<String>) -> Result<Option<T>, InvalidEnumValue>
where
    T: FromStr<Err = InvalidEnumValue>,
{
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| value.parse())
        .transpose()
}

fn error_payload(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn invalid_enum_response(error: InvalidEnumValue) -> Response {
    error_payload(StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
}

fn service_error_response(error: FleetServiceError) -> Response {
    let status = match &error {
        FleetServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        FleetServiceError::Repository(RepositoryError::Conflict(_))
        | FleetServiceError::Transition(AlertTransitionError::InvalidTransition { .. }) => {
            StatusCode::CONFLICT
        }
        FleetServiceError::Repository(RepositoryError::Invalid(_))
        | FleetServiceError::Transition(AlertTransitionError::MissingActor)
        | FleetServiceError::Metric(_)
        | FleetServiceError::UnknownOperator(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FleetServiceError::Repository(RepositoryError::Unavailable(_))
        | FleetServiceError::Generator(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_payload(status, error.to_string())
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, FleetServiceError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn list_operators_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
    Query(params): Query<OperatorListParams>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    let query = match (parse_filter(params.department), parse_filter(params.status)) {
        (Ok(department), Ok(status)) => OperatorQuery {
            search: params.search,
            department,
            status,
        },
        (Err(error), _) | (_, Err(error)) => return invalid_enum_response(error),
    };
    respond(StatusCode::OK, service.operators(&query, params.limit))
}

pub(crate) async fn create_operator_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
    Json(operator): Json<NewOperator>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    respond(StatusCode::CREATED, service.register_operator(operator))
}

pub(crate) async fn update_operator_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
    Path(operator_id): Path<String>,
    Json(update): Json<OperatorUpdate>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.update_operator(&OperatorId(operator_id), update),
    )
}

pub(crate) async fn delete_operator_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
    Path(operator_id): Path<String>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    match service.remove_operator(&OperatorId(operator_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn list_sessions_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
    Query(params): Query<SessionListParams>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    let status = match parse_filter(params.status) {
        Ok(status) => status,
        Err(error) => return invalid_enum_response(error),
    };
    let query = SessionQuery {
        operator_id: params
            .operator_id
            .filter(|id| !id.trim().is_empty())
            .map(OperatorId),
        status,
    };
    respond(StatusCode::OK, service.sessions(&query, params.limit))
}

pub(crate) async fn record_session_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
    Json(session): Json<SessionRecord>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    respond(StatusCode::CREATED, service.record_session(session))
}

pub(crate) async fn assessment_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
    Path(session_id): Path<String>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    respond(StatusCode::OK, service.assess(&SessionId(session_id)))
}

pub(crate) async fn evaluate_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
    Path(session_id): Path<String>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.evaluate_session(&SessionId(session_id)),
    )
}

pub(crate) async fn list_alerts_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
    Query(params): Query<AlertListParams>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    let query = match (parse_filter(params.status), parse_filter(params.severity)) {
        (Ok(status), Ok(severity)) => AlertQuery {
            status,
            severity,
            operator_id: params
                .operator_id
                .filter(|id| !id.trim().is_empty())
                .map(OperatorId),
        },
        (Err(error), _) | (_, Err(error)) => return invalid_enum_response(error),
    };
    respond(StatusCode::OK, service.alerts(&query, params.limit))
}

pub(crate) async fn acknowledge_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
    Path(alert_id): Path<String>,
    Json(payload): Json<ActorPayload>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.acknowledge_alert(&AlertId(alert_id), &payload.actor),
    )
}

pub(crate) async fn resolve_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
    Path(alert_id): Path<String>,
    Json(payload): Json<ActorPayload>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.resolve_alert(&AlertId(alert_id), &payload.actor),
    )
}

pub(crate) async fn overview_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    respond(StatusCode::OK, service.overview())
}

pub(crate) async fn analytics_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    respond(StatusCode::OK, service.analytics())
}

pub(crate) async fn triage_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    respond(StatusCode::OK, service.triage_board())
}

pub(crate) async fn recommendations_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    respond(StatusCode::OK, service.generate_recommendations())
}

pub(crate) async fn prompt_handler<O, S, A>(
    State(service): State<SharedService<O, S, A>>,
) -> Response
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    respond(StatusCode::OK, service.recommendation_request())
}
