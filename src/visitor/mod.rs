//! Visitors over the runner's lifecycle message stream.
//!
//! The runner calls [`TestMessageVisitor::on_message`] once per message and
//! awaits it before delivering the next message from the same thread. Messages
//! for different test cases may be delivered concurrently.

pub mod observer;
pub mod summary;
pub mod test_finished;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::TestMessage;

pub use observer::VisitorObserver;
pub use summary::{RunSummary, RunSummaryVisitor};
pub use test_finished::TestFinishedVisitor;

/// Receives lifecycle messages from the runner.
#[async_trait]
pub trait TestMessageVisitor: Send + Sync {
    /// Handle one message. `Ok(false)` asks the runner to stop delivering messages;
    /// an error aborts the run.
    async fn on_message(&self, message: &TestMessage) -> AppResult<bool>;
}
