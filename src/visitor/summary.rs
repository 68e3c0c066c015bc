//! Visitor that tallies outcomes and logs a one-line summary per run.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::info;

use crate::error::AppResult;
use crate::models::TestMessage;

use super::TestMessageVisitor;

/// Totals observed for the current run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub started: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct RunSummaryVisitor {
    started: AtomicUsize,
    passed: AtomicUsize,
    failed: AtomicUsize,
    skipped: AtomicUsize,
}

impl RunSummaryVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            started: self.started.load(Ordering::Relaxed),
            passed: self.passed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        for counter in [&self.started, &self.passed, &self.failed, &self.skipped] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

#[async_trait]
impl TestMessageVisitor for RunSummaryVisitor {
    async fn on_message(&self, message: &TestMessage) -> AppResult<bool> {
        match message {
            TestMessage::AssemblyStarting(_) => self.reset(),
            TestMessage::TestCaseStarting(_) => {
                self.started.fetch_add(1, Ordering::Relaxed);
            }
            TestMessage::TestPassed(_) => {
                self.passed.fetch_add(1, Ordering::Relaxed);
            }
            TestMessage::TestFailed(_) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
            TestMessage::TestSkipped(_) => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
            }
            TestMessage::AssemblyFinished(finished) => {
                let summary = self.summary();
                let elapsed_ms =
                    u64::try_from(finished.execution_time.as_millis()).unwrap_or(u64::MAX);
                info!(
                    assembly = %finished.assembly_name,
                    started = summary.started,
                    passed = summary.passed,
                    failed = summary.failed,
                    skipped = summary.skipped,
                    elapsed_ms,
                    "Test run finished"
                );
            }
            TestMessage::TestStarting(_)
            | TestMessage::TestFinished(_)
            | TestMessage::TestCaseFinished(_) => {}
        }
        Ok(true)
    }
}
