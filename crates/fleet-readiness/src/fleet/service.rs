use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    AlertId, AlertRecord, AlertStatus, AlertTransitionError, NewOperator, OperatorId,
    OperatorRecord, OperatorUpdate, SessionId, SessionRecord, Severity,
};
use super::monitoring::{evaluate_session, AlertThresholds, MetricError};
use super::recommendations::{
    response_schema, GeneratorError, RecommendationGenerator, RecommendationReport,
    RecommendationRequest,
};
use super::report::views::{FleetAnalytics, FleetOverview, TriageBoard};
use super::report::{fleet_analytics, fleet_overview, triage_board};
use super::repository::{
    AlertQuery, AlertRepository, OperatorQuery, OperatorRepository, RepositoryError,
    SessionQuery, SessionRepository, SortOrder,
};
use super::scoring::{assess_session, SessionAssessment};
use super::triage::build_recommendation_prompt;

pub const DEFAULT_FLEET_NAME: &str = "Axon Transport";

/// Service composing the entity stores, alert thresholds and recommendation generator.
pub struct FleetMonitorService<O, S, A> {
    operators: Arc<O>,
    sessions: Arc<S>,
    alerts: Arc<A>,
    generator: Arc<dyn RecommendationGenerator>,
    thresholds: AlertThresholds,
    fleet_name: String,
}

impl<O, S, A> FleetMonitorService<O, S, A>
where
    O: OperatorRepository + 'static,
    S: SessionRepository + 'static,
    A: AlertRepository + 'static,
{
    pub fn new(
        operators: Arc<O>,
        sessions: Arc<S>,
        alerts: Arc<A>,
        generator: Arc<dyn RecommendationGenerator>,
        thresholds: AlertThresholds,
    ) -> Self {
        Self {
            operators,
            sessions,
            alerts,
            generator,
            thresholds,
            fleet_name: DEFAULT_FLEET_NAME.to_string(),
        }
    }

    pub fn with_fleet_name(mut self, fleet_name: impl Into<String>) -> Self {
        self.fleet_name = fleet_name.into();
        self
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    pub fn register_operator(
        &self,
        operator: NewOperator,
    ) -> Result<OperatorRecord, FleetServiceError> {
        let record = self.operators.create(operator)?;
        info!(operator_id = %record.id, role = %record.role, "operator registered");
        Ok(record)
    }

    pub fn update_operator(
        &self,
        id: &OperatorId,
        update: OperatorUpdate,
    ) -> Result<OperatorRecord, FleetServiceError> {
        let record = self.operators.update(id, update)?;
        info!(operator_id = %id, status = %record.status, "operator updated");
        Ok(record)
    }

    /// Removes an operator. Their sessions and alerts are kept as history.
    pub fn remove_operator(&self, id: &OperatorId) -> Result<(), FleetServiceError> {
        self.operators.delete(id)?;
        info!(operator_id = %id, "operator removed");
        Ok(())
    }

    pub fn operator(&self, id: &OperatorId) -> Result<OperatorRecord, FleetServiceError> {
        Ok(self.operators.fetch(id)?.ok_or(RepositoryError::NotFound)?)
    }

    pub fn operators(
        &self,
        query: &OperatorQuery,
        limit: Option<usize>,
    ) -> Result<Vec<OperatorRecord>, FleetServiceError> {
        Ok(self.operators.filter(query, SortOrder::Descending, limit)?)
    }

    /// Stores a session for a rostered operator, filling a blank name from the roster.
    pub fn record_session(
        &self,
        mut session: SessionRecord,
    ) -> Result<SessionRecord, FleetServiceError> {
        let operator = self
            .operators
            .fetch(&session.operator_id)?
            .ok_or_else(|| FleetServiceError::UnknownOperator(session.operator_id.clone()))?;
        if session.operator_name.trim().is_empty() {
            session.operator_name = operator.name;
        }

        let stored = self.sessions.create(session)?;
        info!(
            session_id = %stored.id,
            operator_id = %stored.operator_id,
            status = %stored.status,
            "session recorded"
        );
        Ok(stored)
    }

    pub fn sessions(
        &self,
        query: &SessionQuery,
        limit: Option<usize>,
    ) -> Result<Vec<SessionRecord>, FleetServiceError> {
        Ok(self.sessions.filter(query, SortOrder::Descending, limit)?)
    }

    pub fn assess(&self, id: &SessionId) -> Result<SessionAssessment, FleetServiceError> {
        let session = self.sessions.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(assess_session(&session))
    }

    pub fn triage_board(&self) -> Result<TriageBoard, FleetServiceError> {
        let active = self
            .sessions
            .filter(&SessionQuery::active(), SortOrder::Descending, None)?;
        Ok(triage_board(&active))
    }

    /// Raises alerts for every threshold the session breaches.
    ///
    /// A breach already covered by an unresolved alert of the same type on the
    /// same session is not raised again. Returns only the newly stored alerts.
    pub fn evaluate_session(&self, id: &SessionId) -> Result<Vec<AlertRecord>, FleetServiceError> {
        let session = self.sessions.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        let drafts = evaluate_session(&session, &self.thresholds)?;

        let open = self.alerts.filter(
            &AlertQuery {
                operator_id: Some(session.operator_id.clone()),
                ..AlertQuery::default()
            },
            SortOrder::Descending,
            None,
        )?;

        let mut raised = Vec::new();
        for draft in drafts {
            let duplicate = open.iter().any(|alert| {
                alert.session_id == session.id
                    && alert.alert_type == draft.alert_type
                    && alert.status != AlertStatus::Resolved
            });
            if duplicate {
                continue;
            }

            let alert = self.alerts.create(draft, &session)?;
            if alert.severity == Severity::Critical {
                warn!(
                    alert_id = %alert.id,
                    session_id = %session.id,
                    alert_type = %alert.alert_type,
                    "critical alert raised"
                );
            } else {
                info!(
                    alert_id = %alert.id,
                    session_id = %session.id,
                    alert_type = %alert.alert_type,
                    "alert raised"
                );
            }
            raised.push(alert);
        }

        Ok(raised)
    }

    pub fn alerts(
        &self,
        query: &AlertQuery,
        limit: Option<usize>,
    ) -> Result<Vec<AlertRecord>, FleetServiceError> {
        Ok(self.alerts.filter(query, SortOrder::Descending, limit)?)
    }

    pub fn acknowledge_alert(
        &self,
        id: &AlertId,
        actor: &str,
    ) -> Result<AlertRecord, FleetServiceError> {
        let mut alert = self.alerts.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        alert.acknowledge(actor, Utc::now())?;
        let stored = self.alerts.update(alert)?;
        info!(alert_id = %id, actor, "alert acknowledged");
        Ok(stored)
    }

    pub fn resolve_alert(&self, id: &AlertId, actor: &str) -> Result<AlertRecord, FleetServiceError> {
        let mut alert = self.alerts.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        alert.resolve(actor, Utc::now())?;
        let stored = self.alerts.update(alert)?;
        info!(alert_id = %id, actor, "alert resolved");
        Ok(stored)
    }

    pub fn overview(&self) -> Result<FleetOverview, FleetServiceError> {
        let operators = self.operators.list(SortOrder::Descending, None)?;
        let sessions = self.sessions.list(SortOrder::Descending, None)?;
        let alerts = self.alerts.list(SortOrder::Descending, None)?;
        Ok(fleet_overview(&operators, &sessions, &alerts))
    }

    pub fn analytics(&self) -> Result<FleetAnalytics, FleetServiceError> {
        let operators = self.operators.list(SortOrder::Ascending, None)?;
        let sessions = self.sessions.list(SortOrder::Descending, None)?;
        Ok(fleet_analytics(&operators, &sessions))
    }

    /// Prompt and response contract describing the current roster and active routes.
    pub fn recommendation_request(&self) -> Result<RecommendationRequest, FleetServiceError> {
        let operators = self.operators.list(SortOrder::Ascending, None)?;
        let active = self
            .sessions
            .filter(&SessionQuery::active(), SortOrder::Ascending, None)?;

        Ok(RecommendationRequest {
            prompt: build_recommendation_prompt(&self.fleet_name, &operators, &active),
            response_schema: response_schema(),
        })
    }

    pub fn generate_recommendations(&self) -> Result<RecommendationReport, FleetServiceError> {
        let request = self.recommendation_request()?;
        let set = self.generator.generate(&request)?;
        info!(count = set.len(), "staffing recommendations generated");
        Ok(RecommendationReport::from(set))
    }
}

/// Error raised by the fleet monitoring service.
#[derive(Debug, thiserror::Error)]
pub enum FleetServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Metric(#[from] MetricError),
    #[error(transparent)]
    Transition(#[from] AlertTransitionError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error("operator {0} is not on the roster")]
    UnknownOperator(OperatorId),
}
