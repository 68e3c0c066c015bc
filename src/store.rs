//! Accumulation store: in-memory results of one run, keyed by test case.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::{AppError, AppResult};
use crate::models::{TestCaseId, TestData};

/// Concurrent map from test case identity to its result record.
///
/// Safe for concurrent inserts and keyed updates from different test cases;
/// callers never take locks of their own.
#[derive(Debug, Default)]
pub struct ResultStore {
    records: DashMap<TestCaseId, TestData>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record.
    pub fn clear(&self) {
        self.records.clear();
    }

    /// Insert a record unless one already exists for `id`. Returns whether it was inserted.
    pub fn insert_if_absent(&self, id: TestCaseId, data: TestData) -> bool {
        match self.records.entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(data);
                true
            }
        }
    }

    /// Mutate the record for `id` in place.
    pub fn update<R>(&self, id: TestCaseId, f: impl FnOnce(&mut TestData) -> R) -> AppResult<R> {
        let mut record = self
            .records
            .get_mut(&id)
            .ok_or(AppError::UnknownTestCase(id))?;
        Ok(f(record.value_mut()))
    }

    /// A copy of the record for `id`.
    pub fn get(&self, id: TestCaseId) -> Option<TestData> {
        self.records.get(&id).map(|r| r.value().clone())
    }

    /// A copy of every record, in no particular order.
    pub fn snapshot(&self) -> Vec<TestData> {
        self.records.iter().map(|r| r.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
