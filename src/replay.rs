//! Replay of a recorded lifecycle message stream.
//!
//! The stream is newline-delimited JSON, one [`TestMessage`] per line. Blank
//! lines are ignored.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::error::AppResult;
use crate::models::TestMessage;
use crate::visitor::TestMessageVisitor;

/// How a replay ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// Messages handed to the visitor
    pub delivered: usize,
    /// True if the visitor asked to stop before the stream ended
    pub stopped: bool,
}

/// Parse each line of `reader` and deliver it to `visitor` in order.
///
/// A line that does not parse fails with [`AppError::InvalidInput`] before
/// it reaches the visitor. Delivery stops at the first visitor error or when
/// the visitor returns `false`.
///
/// [`AppError::InvalidInput`]: crate::error::AppError::InvalidInput
pub async fn replay<R>(reader: R, visitor: &dyn TestMessageVisitor) -> AppResult<ReplayOutcome>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut outcome = ReplayOutcome::default();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let message: TestMessage = serde_json::from_str(&line)?;
        debug!(kind = %message.kind(), "Replaying message");
        outcome.delivered += 1;

        if !visitor.on_message(&message).await? {
            info!(
                "Visitor requested stop after {} message(s)",
                outcome.delivered
            );
            outcome.stopped = true;
            break;
        }
    }

    Ok(outcome)
}
