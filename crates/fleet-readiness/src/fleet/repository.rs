use serde::{Deserialize, Serialize};

use super::domain::{
    AlertId, AlertRecord, AlertStatus, Department, NewOperator, OperatorId, OperatorRecord,
    OperatorStatus, OperatorUpdate, SessionId, SessionRecord, SessionStatus, Severity,
    ValidationError,
};
use super::monitoring::AlertDraft;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    /// Newest first: the default for every listing.
    #[default]
    Descending,
}

/// Roster filter. `search` matches name or employee id, case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorQuery {
    pub search: Option<String>,
    pub department: Option<Department>,
    pub status: Option<OperatorStatus>,
}

impl OperatorQuery {
    pub fn matches(&self, operator: &OperatorRecord) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                operator.name.to_lowercase().contains(&term)
                    || operator.employee_id.to_lowercase().contains(&term)
            }
            _ => true,
        };
        let matches_department = self
            .department
            .map_or(true, |department| operator.department == department);
        let matches_status = self.status.map_or(true, |status| operator.status == status);

        matches_search && matches_department && matches_status
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionQuery {
    pub operator_id: Option<OperatorId>,
    pub status: Option<SessionStatus>,
}

impl SessionQuery {
    pub fn active() -> Self {
        Self {
            status: Some(SessionStatus::Active),
            ..Self::default()
        }
    }

    pub fn matches(&self, session: &SessionRecord) -> bool {
        self.operator_id
            .as_ref()
            .map_or(true, |id| &session.operator_id == id)
            && self.status.map_or(true, |status| session.status == status)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertQuery {
    pub status: Option<AlertStatus>,
    pub severity: Option<Severity>,
    pub operator_id: Option<OperatorId>,
}

impl AlertQuery {
    pub fn with_status(status: AlertStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn matches(&self, alert: &AlertRecord) -> bool {
        self.status.map_or(true, |status| alert.status == status)
            && self
                .severity
                .map_or(true, |severity| alert.severity == severity)
            && self
                .operator_id
                .as_ref()
                .map_or(true, |id| &alert.operator_id == id)
    }
}

/// Operator storage. Ids and employee ids are unique within the roster.
pub trait OperatorRepository: Send + Sync {
    fn filter(
        &self,
        query: &OperatorQuery,
        sort: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<OperatorRecord>, RepositoryError>;
    fn fetch(&self, id: &OperatorId) -> Result<Option<OperatorRecord>, RepositoryError>;
    fn create(&self, operator: NewOperator) -> Result<OperatorRecord, RepositoryError>;
    fn update(
        &self,
        id: &OperatorId,
        update: OperatorUpdate,
    ) -> Result<OperatorRecord, RepositoryError>;
    fn delete(&self, id: &OperatorId) -> Result<(), RepositoryError>;

    fn list(
        &self,
        sort: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<OperatorRecord>, RepositoryError> {
        self.filter(&OperatorQuery::default(), sort, limit)
    }
}

/// Session storage, sorted by `session_start`. Sessions are never cascaded from operators.
pub trait SessionRepository: Send + Sync {
    fn filter(
        &self,
        query: &SessionQuery,
        sort: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<SessionRecord>, RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
    /// Stores a session, assigning an id when the provided one is blank.
    fn create(&self, session: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    fn update(&self, session: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    fn delete(&self, id: &SessionId) -> Result<(), RepositoryError>;

    fn list(
        &self,
        sort: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<SessionRecord>, RepositoryError> {
        self.filter(&SessionQuery::default(), sort, limit)
    }
}

pub trait AlertRepository: Send + Sync {
    fn filter(
        &self,
        query: &AlertQuery,
        sort: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<AlertRecord>, RepositoryError>;
    fn fetch(&self, id: &AlertId) -> Result<Option<AlertRecord>, RepositoryError>;
    fn create(
        &self,
        draft: AlertDraft,
        session: &SessionRecord,
    ) -> Result<AlertRecord, RepositoryError>;
    fn update(&self, alert: AlertRecord) -> Result<AlertRecord, RepositoryError>;
    fn delete(&self, id: &AlertId) -> Result<(), RepositoryError>;

    fn list(
        &self,
        sort: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<AlertRecord>, RepositoryError> {
        self.filter(&AlertQuery::default(), sort, limit)
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
