//! Visitor that collects one result per test case and saves the batch when the run ends.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::db::TestDataSink;
use crate::error::AppResult;
use crate::models::{TestData, TestMessage};
use crate::store::ResultStore;

use super::TestMessageVisitor;

/// Accumulates results in a [`ResultStore`] and hands them to a [`TestDataSink`]
/// when the assembly finishes.
///
/// The store is cleared when an assembly starts, not after saving: between
/// runs it still holds the previous run's records.
pub struct TestFinishedVisitor {
    store: Arc<ResultStore>,
    sink: Arc<dyn TestDataSink>,
}

impl TestFinishedVisitor {
    pub fn new(store: Arc<ResultStore>, sink: Arc<dyn TestDataSink>) -> Self {
        TestFinishedVisitor { store, sink }
    }

    /// Create a visitor with its own empty store.
    pub fn with_sink(sink: Arc<dyn TestDataSink>) -> Self {
        Self::new(Arc::new(ResultStore::new()), sink)
    }

    /// The store this visitor accumulates into.
    pub fn store(&self) -> &Arc<ResultStore> {
        &self.store
    }
}

#[async_trait]
impl TestMessageVisitor for TestFinishedVisitor {
    async fn on_message(&self, message: &TestMessage) -> AppResult<bool> {
        match message {
            TestMessage::AssemblyStarting(starting) => {
                debug!(assembly = %starting.assembly_name, "Clearing accumulated results");
                self.store.clear();
            }
            TestMessage::TestCaseStarting(starting) => {
                let tc = &starting.test_case;
                if !self
                    .store
                    .insert_if_absent(tc.id, TestData::new(tc.display_name.clone()))
                {
                    debug!(test_case = %tc.id, "Test case already tracked, keeping first record");
                }
            }
            TestMessage::TestFinished(finished) => {
                let completed_at = Utc::now();
                self.store.update(finished.test_case.id, |data| {
                    data.finish(finished.execution_time, completed_at)
                })?;
            }
            TestMessage::TestPassed(passed) => {
                self.store
                    .update(passed.test_case.id, |data| data.passed = true)?;
            }
            TestMessage::AssemblyFinished(finished) => {
                let records = self.store.snapshot();
                let saved = self.sink.save_batch(records).await?;
                info!(assembly = %finished.assembly_name, saved, "Persisted test results");
            }
            TestMessage::TestStarting(_)
            | TestMessage::TestFailed(_)
            | TestMessage::TestSkipped(_)
            | TestMessage::TestCaseFinished(_) => {}
        }
        Ok(true)
    }
}
