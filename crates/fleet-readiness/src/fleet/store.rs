//! Mutex-guarded in-memory repositories.
//!
//! Identifiers are assigned from a per-table sequence (`op-000001`,
//! `sess-000001`, `alt-000001`), skipping any id already taken by a restored
//! record. Listings follow insertion order unless the entity has a natural
//! timestamp.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    AlertId, AlertRecord, NewOperator, OperatorId, OperatorRecord, OperatorUpdate, SessionId,
    SessionRecord,
};
use super::import::FleetSnapshot;
use super::monitoring::{AlertDraft, AlertThresholds};
use super::recommendations::RecommendationGenerator;
use super::repository::{
    AlertQuery, AlertRepository, OperatorQuery, OperatorRepository, RepositoryError,
    SessionQuery, SessionRepository, SortOrder,
};
use super::service::FleetMonitorService;

pub type InMemoryFleetService =
    FleetMonitorService<InMemoryOperatorStore, InMemorySessionStore, InMemoryAlertStore>;

#[derive(Debug)]
struct Row<V> {
    inserted: u64,
    record: V,
}

#[derive(Debug)]
struct Table<V> {
    prefix: &'static str,
    sequence: u64,
    inserted: u64,
    rows: BTreeMap<String, Row<V>>,
}

impl<V: Clone> Table<V> {
    fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            sequence: 0,
            inserted: 0,
            rows: BTreeMap::new(),
        }
    }

    fn next_id(&mut self) -> String {
        loop {
            self.sequence += 1;
            let id = format!("{}-{:06}", self.prefix, self.sequence);
            if !self.rows.contains_key(&id) {
                return id;
            }
        }
    }

    fn insert(&mut self, id: String, record: V) -> Result<V, RepositoryError> {
        if self.rows.contains_key(&id) {
            return Err(RepositoryError::Conflict(id));
        }
        self.inserted += 1;
        self.rows.insert(
            id,
            Row {
                inserted: self.inserted,
                record: record.clone(),
            },
        );
        Ok(record)
    }

    fn replace(&mut self, id: &str, record: V) -> Result<V, RepositoryError> {
        let row = self.rows.get_mut(id).ok_or(RepositoryError::NotFound)?;
        row.record = record.clone();
        Ok(record)
    }

    fn remove(&mut self, id: &str) -> Result<(), RepositoryError> {
        self.rows
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn get(&self, id: &str) -> Option<V> {
        self.rows.get(id).map(|row| row.record.clone())
    }

    /// Matching records ordered by `key`, ties broken by insertion order.
    fn select<K, P, F>(&self, predicate: P, key: F, sort: SortOrder, limit: Option<usize>) -> Vec<V>
    where
        K: Ord,
        P: Fn(&V) -> bool,
        F: Fn(&V) -> K,
    {
        let mut rows: Vec<&Row<V>> = self
            .rows
            .values()
            .filter(|row| predicate(&row.record))
            .collect();
        rows.sort_by(|a, b| {
            key(&a.record)
                .cmp(&key(&b.record))
                .then(a.inserted.cmp(&b.inserted))
        });
        if sort == SortOrder::Descending {
            rows.reverse();
        }
        rows.into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|row| row.record.clone())
            .collect()
    }
}

fn lock<V>(table: &Mutex<Table<V>>) -> Result<MutexGuard<'_, Table<V>>, RepositoryError> {
    table
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
}

fn employee_key(employee_id: &str) -> String {
    employee_id.trim().to_lowercase()
}

#[derive(Debug, Clone)]
pub struct InMemoryOperatorStore {
    table: Arc<Mutex<Table<OperatorRecord>>>,
}

impl Default for InMemoryOperatorStore {
    fn default() -> Self {
        Self {
            table: Arc::new(Mutex::new(Table::new("op"))),
        }
    }
}

impl InMemoryOperatorStore {
    /// Stores a record under its existing id.
    pub fn restore(&self, record: OperatorRecord) -> Result<OperatorRecord, RepositoryError> {
        record.validate()?;
        let mut table = lock(&self.table)?;
        ensure_unique_employee(&table, &record.employee_id, None)?;
        table.insert(record.id.0.clone(), record)
    }
}

fn ensure_unique_employee(
    table: &Table<OperatorRecord>,
    employee_id: &str,
    exclude: Option<&OperatorId>,
) -> Result<(), RepositoryError> {
    let key = employee_key(employee_id);
    let taken = table.rows.values().any(|row| {
        Some(&row.record.id) != exclude && employee_key(&row.record.employee_id) == key
    });
    if taken {
        Err(RepositoryError::Conflict(format!(
            "employee id {employee_id}"
        )))
    } else {
        Ok(())
    }
}

impl OperatorRepository for InMemoryOperatorStore {
    fn filter(
        &self,
        query: &OperatorQuery,
        sort: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<OperatorRecord>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table.select(|op| query.matches(op), |_| (), sort, limit))
    }

    fn fetch(&self, id: &OperatorId) -> Result<Option<OperatorRecord>, RepositoryError> {
        Ok(lock(&self.table)?.get(&id.0))
    }

    fn create(&self, operator: NewOperator) -> Result<OperatorRecord, RepositoryError> {
        let mut table = lock(&self.table)?;
        ensure_unique_employee(&table, &operator.employee_id, None)?;
        let id = table.next_id();
        let record = operator.into_record(OperatorId(id.clone()));
        record.validate()?;
        table.insert(id, record)
    }

    fn update(
        &self,
        id: &OperatorId,
        update: OperatorUpdate,
    ) -> Result<OperatorRecord, RepositoryError> {
        let mut table = lock(&self.table)?;
        let mut record = table.get(&id.0).ok_or(RepositoryError::NotFound)?;
        record.apply(update);
        record.validate()?;
        ensure_unique_employee(&table, &record.employee_id, Some(id))?;
        table.replace(&id.0, record)
    }

    fn delete(&self, id: &OperatorId) -> Result<(), RepositoryError> {
        lock(&self.table)?.remove(&id.0)
    }
}

#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    table: Arc<Mutex<Table<SessionRecord>>>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self {
            table: Arc::new(Mutex::new(Table::new("sess"))),
        }
    }
}

impl SessionRepository for InMemorySessionStore {
    fn filter(
        &self,
        query: &SessionQuery,
        sort: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<SessionRecord>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table.select(
            |session| query.matches(session),
            |session| session.session_start,
            sort,
            limit,
        ))
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Ok(lock(&self.table)?.get(&id.0))
    }

    fn create(&self, mut session: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        session.validate()?;
        let mut table = lock(&self.table)?;
        if session.id.0.trim().is_empty() {
            session.id = SessionId(table.next_id());
        }
        table.insert(session.id.0.clone(), session)
    }

    fn update(&self, session: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        session.validate()?;
        let mut table = lock(&self.table)?;
        let id = session.id.0.clone();
        table.replace(&id, session)
    }

    fn delete(&self, id: &SessionId) -> Result<(), RepositoryError> {
        lock(&self.table)?.remove(&id.0)
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryAlertStore {
    table: Arc<Mutex<Table<AlertRecord>>>,
}

impl Default for InMemoryAlertStore {
    fn default() -> Self {
        Self {
            table: Arc::new(Mutex::new(Table::new("alt"))),
        }
    }
}

impl InMemoryAlertStore {
    pub fn restore(&self, record: AlertRecord) -> Result<AlertRecord, RepositoryError> {
        record.validate()?;
        lock(&self.table)?.insert(record.id.0.clone(), record)
    }
}

impl AlertRepository for InMemoryAlertStore {
    fn filter(
        &self,
        query: &AlertQuery,
        sort: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<AlertRecord>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table.select(|alert| query.matches(alert), |_| (), sort, limit))
    }

    fn fetch(&self, id: &AlertId) -> Result<Option<AlertRecord>, RepositoryError> {
        Ok(lock(&self.table)?.get(&id.0))
    }

    fn create(
        &self,
        draft: AlertDraft,
        session: &SessionRecord,
    ) -> Result<AlertRecord, RepositoryError> {
        let mut table = lock(&self.table)?;
        let id = table.next_id();
        let record = draft.into_record(AlertId(id.clone()), session);
        record.validate()?;
        table.insert(id, record)
    }

    fn update(&self, alert: AlertRecord) -> Result<AlertRecord, RepositoryError> {
        alert.validate()?;
        let mut table = lock(&self.table)?;
        let id = alert.id.0.clone();
        table.replace(&id, alert)
    }

    fn delete(&self, id: &AlertId) -> Result<(), RepositoryError> {
        lock(&self.table)?.remove(&id.0)
    }
}

/// The three entity stores bundled for wiring into a service.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFleetStore {
    pub operators: InMemoryOperatorStore,
    pub sessions: InMemorySessionStore,
    pub alerts: InMemoryAlertStore,
}

impl InMemoryFleetStore {
    pub fn from_snapshot(snapshot: FleetSnapshot) -> Result<Self, RepositoryError> {
        let store = Self::default();
        for operator in snapshot.operators {
            store.operators.restore(operator)?;
        }
        for session in snapshot.sessions {
            store.sessions.create(session)?;
        }
        for alert in snapshot.alerts {
            store.alerts.restore(alert)?;
        }
        Ok(store)
    }

    /// Builds a service sharing this store's tables.
    pub fn service(
        &self,
        generator: Arc<dyn RecommendationGenerator>,
        thresholds: AlertThresholds,
    ) -> InMemoryFleetService {
        FleetMonitorService::new(
            Arc::new(self.operators.clone()),
            Arc::new(self.sessions.clone()),
            Arc::new(self.alerts.clone()),
            generator,
            thresholds,
        )
    }

    /// Store preloaded with the reference roster of three drivers.
    pub fn seeded() -> Result<Self, RepositoryError> {
        let snapshot = FleetSnapshot::reference()
            .map_err(|err| RepositoryError::Unavailable(format!("reference fleet: {err}")))?;
        Self::from_snapshot(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::domain::{CertificationLevel, Department, OperatorRole, OperatorStatus};

    fn new_operator(name: &str, employee_id: &str) -> NewOperator {
        NewOperator {
            name: name.to_string(),
            employee_id: employee_id.to_string(),
            role: OperatorRole::RegionalDriver,
            department: Department::Regional,
            status: OperatorStatus::Active,
            certification_level: CertificationLevel::Standard,
            contact_email: None,
            contact_phone: None,
        }
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let store = InMemoryOperatorStore::default();
        let first = store.create(new_operator("Dana Ruiz", "EMP-100")).expect("created");
        let second = store.create(new_operator("Lee Park", "EMP-101")).expect("created");
        assert_eq!(first.id, OperatorId("op-000001".to_string()));
        assert_eq!(second.id, OperatorId("op-000002".to_string()));

        let listed = store.list(SortOrder::Descending, None).expect("listed");
        assert_eq!(listed[0].id, second.id);
        assert_eq!(store.list(SortOrder::Ascending, Some(1)).expect("listed")[0].id, first.id);
    }

    #[test]
    fn duplicate_employee_id_is_a_conflict() {
        let store = InMemoryOperatorStore::default();
        store.create(new_operator("Dana Ruiz", "EMP-100")).expect("created");
        let err = store
            .create(new_operator("Dana Clone", " emp-100 "))
            .expect_err("duplicate rejected");
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[test]
    fn update_keeps_own_employee_id_and_rejects_blank_name() {
        let store = InMemoryOperatorStore::default();
        let created = store.create(new_operator("Dana Ruiz", "EMP-100")).expect("created");

        let updated = store
            .update(
                &created.id,
                OperatorUpdate {
                    employee_id: Some("EMP-100".to_string()),
                    status: Some(OperatorStatus::OnBreak),
                    ..OperatorUpdate::default()
                },
            )
            .expect("updated");
        assert_eq!(updated.status, OperatorStatus::OnBreak);

        let err = store
            .update(
                &created.id,
                OperatorUpdate {
                    name: Some("  ".to_string()),
                    ..OperatorUpdate::default()
                },
            )
            .expect_err("blank name rejected");
        assert!(matches!(err, RepositoryError::Invalid(_)));
        let stored = store.fetch(&created.id).expect("fetched").expect("present");
        assert_eq!(stored.name, "Dana Ruiz");
    }

    #[test]
    fn delete_missing_operator_is_not_found() {
        let store = InMemoryOperatorStore::default();
        let err = store
            .delete(&OperatorId("op-404".to_string()))
            .expect_err("missing");
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn seeded_store_lists_reference_fleet_newest_first() {
        let store = InMemoryFleetStore::seeded().expect("seeded");
        let operators = store
            .operators
            .list(SortOrder::Descending, None)
            .expect("listed");
        let ids: Vec<&str> = operators.iter().map(|op| op.id.0.as_str()).collect();
        assert_eq!(ids, ["op-3", "op-2", "op-1"]);

        let active = store
            .sessions
            .filter(&SessionQuery::active(), SortOrder::Descending, None)
            .expect("filtered");
        assert!(active.iter().all(SessionRecord::is_active));
        assert!(active
            .windows(2)
            .all(|pair| pair[0].session_start >= pair[1].session_start));
    }

    #[test]
    fn sequence_skips_restored_ids() {
        let store = InMemoryFleetStore::seeded().expect("seeded");
        let created = store
            .operators
            .create(new_operator("Dana Ruiz", "EMP-900"))
            .expect("created");
        assert_eq!(created.id, OperatorId("op-000001".to_string()));
        assert_eq!(
            store.operators.list(SortOrder::Descending, Some(1)).expect("listed")[0].id,
            created.id
        );
    }
}
