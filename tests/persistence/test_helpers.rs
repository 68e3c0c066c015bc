//! Shared helpers for persistence tests.

use std::sync::Arc;
use std::time::Duration;

use testrun_visitors::config::{Config, DatabaseConfig, Environment};
use testrun_visitors::db::DbPool;
use testrun_visitors::error::AppResult;
use testrun_visitors::models::{MessageKind, TestCase, TestMessage};
use testrun_visitors::visitor::{
    RunSummaryVisitor, TestFinishedVisitor, TestMessageVisitor, VisitorObserver,
};

/// Assembly name used by every scenario.
pub const ASSEMBLY: &str = "Acme.Tests.dll";

/// Create a fresh in-memory database with the schema applied.
pub async fn create_test_pool() -> DbPool {
    // A single connection keeps every query on the same in-memory database.
    let database = DatabaseConfig {
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::with_url("sqlite::memory:")
    };
    let config = Config {
        environment: Environment::Development,
        database,
        run_migrations: true,
    };

    let pool = DbPool::new(&config)
        .await
        .expect("Failed to open in-memory SQLite database");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

/// The visitors a runner would register for one run.
pub struct Harness {
    pub pool: DbPool,
    pub accumulator: Arc<TestFinishedVisitor>,
    pub summary: Arc<RunSummaryVisitor>,
    pub observer: VisitorObserver,
}

pub async fn create_harness() -> Harness {
    let pool = create_test_pool().await;
    let accumulator = Arc::new(TestFinishedVisitor::with_sink(Arc::new(pool.clone())));
    let summary = Arc::new(RunSummaryVisitor::new());
    let observer = VisitorObserver::new(
        MessageKind::AssemblyFinished,
        vec![
            Arc::clone(&accumulator) as Arc<dyn TestMessageVisitor>,
            Arc::clone(&summary) as Arc<dyn TestMessageVisitor>,
        ],
    );

    Harness {
        pool,
        accumulator,
        summary,
        observer,
    }
}

impl Harness {
    /// Deliver messages in order, stopping at the first error.
    pub async fn deliver(&self, messages: Vec<TestMessage>) -> AppResult<()> {
        for message in &messages {
            assert!(self.observer.on_message(message).await?);
        }
        Ok(())
    }
}

/// Start, finish and optionally pass one test case.
pub fn case_messages(tc: &TestCase, elapsed: Duration, passed: bool) -> Vec<TestMessage> {
    let mut messages = vec![
        TestMessage::test_case_starting(tc),
        TestMessage::test_finished(tc, elapsed),
    ];
    if passed {
        messages.push(TestMessage::test_passed(tc, elapsed));
    }
    messages
}

pub fn assembly_finished(tests_run: u32, tests_failed: u32) -> TestMessage {
    TestMessage::assembly_finished(ASSEMBLY, tests_run, tests_failed, 0, Duration::from_millis(500))
}
