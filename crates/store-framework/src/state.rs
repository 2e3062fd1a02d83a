//! # Store State
//!
//! The materialized copy of remote state held by one Resource Store, and the transitions
//! that keep it coherent. Only the store actor mutates it; observers receive clones.
//!
//! ## Request lifecycle
//!
//! Every operation takes a [`Ticket`] when it starts and settles it exactly once:
//!
//! ```text
//!   begin(op) ──► in_flight += 1, error = None, seq = next
//!        │
//!        ▼ (transport call, store keeps serving other requests)
//!   settle(ticket, result)
//!        ├─ ticket older than last reset      ─► discarded
//!        ├─ list ticket older than latest list ─► discarded (superseded)
//!        ├─ Ok(outcome)                        ─► applied in one step
//!        └─ Err(error)                         ─► error field set, data untouched
//! ```

use crate::entity::StoreEntity;
use crate::error::{StoreError, StoreFailure};
use crate::filter::{FilterState, FilterUpdate};
use std::collections::HashSet;

/// Kind of store operation, used for fallback messages and supersession.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Fetch,
    Create,
    Update,
    Remove,
    Upload,
}

impl Operation {
    /// Message used when the server does not explain a failure.
    pub fn fallback_message<T: StoreEntity>(self) -> String {
        match self {
            Operation::List => format!("Failed to fetch {}", T::PLURAL),
            Operation::Fetch => format!("Failed to fetch {}", T::SINGULAR),
            Operation::Create => format!("Failed to create {}", T::SINGULAR),
            Operation::Update => format!("Failed to update {}", T::SINGULAR),
            Operation::Remove => format!("Failed to delete {}", T::SINGULAR),
            Operation::Upload => format!("Failed to upload {}", T::SINGULAR),
        }
    }
}

/// Handle for one in-flight operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub op: Operation,
    pub seq: u64,
}

/// One page of a list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: u64,
}

/// Successful result of a remote call, ready to be applied to the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T: StoreEntity> {
    Listed(Page<T>),
    Fetched(T),
    Created(T),
    Updated(T),
    Removed(T::Id),
}

/// Snapshot of a Resource Store.
#[derive(Debug, Clone)]
pub struct StoreState<T: StoreEntity> {
    records: Vec<T>,
    total: u64,
    selected: Option<T>,
    filters: FilterState<T::Filters>,
    default_limit: u32,
    in_flight: usize,
    error: Option<StoreFailure>,
    next_seq: u64,
    latest_list: u64,
    reset_mark: u64,
    version: u64,
}

impl<T: StoreEntity> StoreState<T> {
    pub fn new(default_limit: u32) -> Self {
        Self {
            records: Vec::new(),
            total: 0,
            selected: None,
            filters: FilterState::new(default_limit),
            default_limit,
            in_flight: 0,
            error: None,
            next_seq: 0,
            latest_list: 0,
            reset_mark: 0,
            version: 0,
        }
    }

    /// The Collection Snapshot: the current page, in server order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Server-side size of the filtered result.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    pub fn filters(&self) -> &FilterState<T::Filters> {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn error(&self) -> Option<&StoreFailure> {
        self.error.as_ref()
    }

    /// Bumped on every transition. Cheap change detection for observers.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn find(&self, id: &T::Id) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub(crate) fn begin(&mut self, op: Operation) -> Ticket {
        self.next_seq += 1;
        let seq = self.next_seq;
        if op == Operation::List {
            self.latest_list = seq;
        }
        self.in_flight += 1;
        self.error = None;
        self.version += 1;
        Ticket { op, seq }
    }

    /// Releases a ticket whose caller went away before the response arrived.
    pub(crate) fn abandon(&mut self, _ticket: Ticket) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.version += 1;
    }

    pub(crate) fn is_stale(&self, ticket: Ticket) -> bool {
        ticket.seq <= self.reset_mark
            || (ticket.op == Operation::List && ticket.seq < self.latest_list)
    }

    /// Applies the result of a remote call. Returns the outcome if it was applied.
    pub(crate) fn settle(
        &mut self,
        ticket: Ticket,
        result: Result<Outcome<T>, StoreError>,
    ) -> Result<Outcome<T>, StoreError> {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.version += 1;

        if self.is_stale(ticket) {
            return Err(StoreError::Superseded);
        }

        match result {
            Ok(outcome) => {
                self.apply(&outcome);
                Ok(outcome)
            }
            Err(error) => {
                if ticket.op == Operation::Fetch && matches!(error, StoreError::NotFound(_)) {
                    self.selected = None;
                }
                self.error = StoreFailure::from_error(&error);
                Err(error)
            }
        }
    }

    /// Records a failure that happened before any request was sent.
    pub(crate) fn reject(&mut self, error: &StoreError) {
        self.error = StoreFailure::from_error(error);
        self.version += 1;
    }

    pub(crate) fn apply_filters(&mut self, update: FilterUpdate<T::Filters>) -> bool {
        let changed = self.filters.apply(update);
        self.version += 1;
        changed
    }

    pub(crate) fn reset_filters(&mut self) {
        self.filters = FilterState::new(self.default_limit);
        self.version += 1;
    }

    /// Drops all cached data. Requests started before the reset are discarded on settle.
    pub(crate) fn reset(&mut self) {
        self.records.clear();
        self.total = 0;
        self.selected = None;
        self.filters = FilterState::new(self.default_limit);
        self.error = None;
        self.reset_mark = self.next_seq;
        self.version += 1;
    }

    fn apply(&mut self, outcome: &Outcome<T>) {
        match outcome {
            Outcome::Listed(page) => self.replace_page(page),
            Outcome::Fetched(record) => self.selected = Some(record.clone()),
            Outcome::Created(record) => self.append(record),
            Outcome::Updated(record) => self.patch(record),
            Outcome::Removed(id) => self.discard(id),
        }
    }

    fn replace_page(&mut self, page: &Page<T>) {
        let mut seen = HashSet::with_capacity(page.records.len());
        self.records = page
            .records
            .iter()
            .filter(|record| seen.insert(record.id().clone()))
            .cloned()
            .collect();
        self.total = page.total;
    }

    fn append(&mut self, record: &T) {
        match self.position(record.id()) {
            // A list that settled first may already hold the new record.
            Some(index) => self.records[index] = record.clone(),
            None => {
                self.records.push(record.clone());
                self.total += 1;
            }
        }
    }

    fn patch(&mut self, record: &T) {
        if let Some(index) = self.position(record.id()) {
            self.records[index] = record.clone();
        }
        if self
            .selected
            .as_ref()
            .is_some_and(|selected| selected.id() == record.id())
        {
            self.selected = Some(record.clone());
        }
    }

    fn discard(&mut self, id: &T::Id) {
        self.records.retain(|record| record.id() != id);
        self.total = self.total.saturating_sub(1);
        if self
            .selected
            .as_ref()
            .is_some_and(|selected| selected.id() == id)
        {
            self.selected = None;
        }
    }

    fn position(&self, id: &T::Id) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::NoFilters;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Job {
        id: String,
        status: String,
    }

    impl StoreEntity for Job {
        type Id = String;
        type Create = Job;
        type Update = Job;
        type Filters = NoFilters;

        const RESOURCE: &'static str = "/jobs";
        const SINGULAR: &'static str = "job";
        const PLURAL: &'static str = "jobs";

        fn id(&self) -> &String {
            &self.id
        }
    }

    fn job(id: &str, status: &str) -> Job {
        Job {
            id: id.into(),
            status: status.into(),
        }
    }

    fn listed(records: Vec<Job>, total: u64) -> Result<Outcome<Job>, StoreError> {
        Ok(Outcome::Listed(Page { records, total }))
    }

    fn seeded(records: Vec<Job>) -> StoreState<Job> {
        let mut state = StoreState::new(10);
        let total = records.len() as u64;
        let ticket = state.begin(Operation::List);
        state.settle(ticket, listed(records, total)).unwrap();
        state
    }

    #[test]
    fn late_response_from_superseded_list_is_discarded() {
        let mut state = StoreState::<Job>::new(10);
        let first = state.begin(Operation::List);
        let second = state.begin(Operation::List);

        state
            .settle(second, listed(vec![job("B", "new")], 1))
            .unwrap();
        let late = state.settle(first, listed(vec![job("A", "old")], 1));

        assert_eq!(late, Err(StoreError::Superseded));
        assert_eq!(state.records(), &[job("B", "new")]);
        assert!(!state.is_loading());
    }

    #[test]
    fn superseded_failure_does_not_set_error() {
        let mut state = StoreState::<Job>::new(10);
        let first = state.begin(Operation::List);
        let second = state.begin(Operation::List);
        state.settle(second, listed(vec![], 0)).unwrap();

        let _ = state.settle(
            first,
            Err(StoreError::Transport {
                message: "Failed to fetch jobs".into(),
                status: None,
            }),
        );

        assert!(state.error().is_none());
    }

    #[test]
    fn failed_list_keeps_stale_records() {
        let mut state = seeded(vec![job("O1", "pending")]);
        let ticket = state.begin(Operation::List);
        assert!(state.is_loading());

        let result = state.settle(
            ticket,
            Err(StoreError::Transport {
                message: "Failed to fetch jobs".into(),
                status: Some(500),
            }),
        );

        assert!(result.is_err());
        assert_eq!(state.records(), &[job("O1", "pending")]);
        assert_eq!(state.total(), 1);
        assert_eq!(state.error().unwrap().message, "Failed to fetch jobs");
        assert!(!state.is_loading());
    }

    #[test]
    fn update_patches_list_and_selection_in_place() {
        let mut state = seeded(vec![job("O1", "pending"), job("O2", "pending")]);
        let fetch = state.begin(Operation::Fetch);
        state
            .settle(fetch, Ok(Outcome::Fetched(job("O2", "pending"))))
            .unwrap();

        let update = state.begin(Operation::Update);
        state
            .settle(update, Ok(Outcome::Updated(job("O2", "completed"))))
            .unwrap();

        assert_eq!(state.records()[1], job("O2", "completed"));
        assert_eq!(state.selected(), Some(&job("O2", "completed")));
        assert_eq!(state.total(), 2);
    }

    #[test]
    fn create_appends_and_counts_once() {
        let mut state = seeded(vec![job("O1", "pending")]);
        let create = state.begin(Operation::Create);
        state
            .settle(create, Ok(Outcome::Created(job("O2", "pending"))))
            .unwrap();
        assert_eq!(state.records().len(), 2);
        assert_eq!(state.total(), 2);

        // Same identity again must not duplicate the key.
        let create = state.begin(Operation::Create);
        state
            .settle(create, Ok(Outcome::Created(job("O2", "in-progress"))))
            .unwrap();
        assert_eq!(state.records().len(), 2);
        assert_eq!(state.records()[1].status, "in-progress");
        assert_eq!(state.total(), 2);
    }

    #[test]
    fn remove_drops_record_selection_and_one_from_total() {
        let mut state = seeded(vec![job("O1", "pending"), job("O2", "pending")]);
        let fetch = state.begin(Operation::Fetch);
        state
            .settle(fetch, Ok(Outcome::Fetched(job("O1", "pending"))))
            .unwrap();

        let remove = state.begin(Operation::Remove);
        state
            .settle(remove, Ok(Outcome::Removed("O1".into())))
            .unwrap();

        assert!(state.find(&"O1".to_string()).is_none());
        assert_eq!(state.total(), 1);
        assert!(state.selected().is_none());
    }

    #[test]
    fn not_found_clears_selection() {
        let mut state = seeded(vec![]);
        let fetch = state.begin(Operation::Fetch);
        state
            .settle(fetch, Ok(Outcome::Fetched(job("O1", "pending"))))
            .unwrap();

        let fetch = state.begin(Operation::Fetch);
        let _ = state.settle(fetch, Err(StoreError::NotFound("job O9 not found".into())));

        assert!(state.selected().is_none());
        assert_eq!(
            state.error().map(|failure| failure.is_retryable()),
            Some(false)
        );
    }

    #[test]
    fn duplicate_ids_in_page_are_collapsed() {
        let state = seeded(vec![job("O1", "a"), job("O1", "b"), job("O2", "c")]);
        assert_eq!(state.records(), &[job("O1", "a"), job("O2", "c")]);
    }

    #[test]
    fn requests_started_before_reset_are_discarded() {
        let mut state = seeded(vec![job("O1", "pending")]);
        let create = state.begin(Operation::Create);
        state.reset();

        let result = state.settle(create, Ok(Outcome::Created(job("O2", "pending"))));

        assert_eq!(result, Err(StoreError::Superseded));
        assert!(state.records().is_empty());
        assert_eq!(state.total(), 0);
        assert!(!state.is_loading());
    }

    #[test]
    fn begin_clears_previous_error() {
        let mut state = StoreState::<Job>::new(10);
        state.reject(&StoreError::Validation("Name is required".into()));
        assert!(state.error().is_some());

        state.begin(Operation::List);
        assert!(state.error().is_none());
    }

    #[test]
    fn fallback_messages_name_the_resource() {
        assert_eq!(
            Operation::List.fallback_message::<Job>(),
            "Failed to fetch jobs"
        );
        assert_eq!(
            Operation::Remove.fallback_message::<Job>(),
            "Failed to delete job"
        );
    }
}
