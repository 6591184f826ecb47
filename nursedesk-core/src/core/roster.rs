//! Client-side mirror of the server's nurse collection.

use crate::query::{self, SortColumn, SortState};
use crate::NurseRecord;

/// The in-memory record collection held by a client, plus its table view state.
///
/// The collection changes only through four mutation points, each called
/// after the matching API call succeeds:
///
/// - [`Roster::replace_all`] on initial load or explicit reload,
/// - [`Roster::apply_created`] prepends a new record,
/// - [`Roster::apply_updated`] replaces a record by id,
/// - [`Roster::apply_removed`] removes a record by id.
///
/// The roster never re-fetches after a mutation, so it can drift from the
/// server's order if another client writes concurrently.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    records: Vec<NurseRecord>,
    sort: SortState,
    search: String,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[NurseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: i64) -> Option<&NurseRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn replace_all(&mut self, records: Vec<NurseRecord>) {
        self.records = records;
    }

    pub fn apply_created(&mut self, record: NurseRecord) {
        self.records.insert(0, record);
    }

    /// Replaces the record with the same id in place. Returns `false` if the
    /// roster does not hold that id.
    pub fn apply_updated(&mut self, record: NurseRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Removes the record with `id`. Returns `false` if it was not present.
    pub fn apply_removed(&mut self, id: i64) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort.toggle(column);
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// The rows to display: the collection sorted, then filtered by the search query.
    pub fn visible(&self) -> Vec<NurseRecord> {
        let sorted = self.sort.apply(&self.records);
        query::filter(&sorted, &self.search)
    }
}
