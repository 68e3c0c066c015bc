//! Fan-out visitor that lets several subscribers observe one message stream.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use crate::error::AppResult;
use crate::models::{MessageKind, TestMessage};

use super::TestMessageVisitor;

/// Forwards every message to all subscribed visitors, in subscription order,
/// before applying its own handling.
///
/// Its own handling always continues the run and raises a completion signal
/// once a message of the `terminal` kind has been seen.
pub struct VisitorObserver {
    visitors: RwLock<Vec<Arc<dyn TestMessageVisitor>>>,
    terminal: MessageKind,
    finished: watch::Sender<bool>,
}

impl VisitorObserver {
    /// Create an observer with an initial set of subscribers. `None` entries are skipped.
    pub fn new<I>(terminal: MessageKind, visitors: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Arc<dyn TestMessageVisitor>>>,
    {
        let (finished, _) = watch::channel(false);
        let observer = VisitorObserver {
            visitors: RwLock::new(Vec::new()),
            terminal,
            finished,
        };
        observer.add_visitors(visitors);
        observer
    }

    /// Subscribe more visitors. `None` entries are skipped; duplicates are kept.
    pub fn add_visitors<I>(&self, visitors: I)
    where
        I: IntoIterator,
        I::Item: Into<Option<Arc<dyn TestMessageVisitor>>>,
    {
        let mut list = self
            .visitors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        list.extend(
            visitors
                .into_iter()
                .filter_map(|v| -> Option<Arc<dyn TestMessageVisitor>> { v.into() }),
        );
    }

    /// Number of subscribed visitors.
    pub fn len(&self) -> usize {
        self.visitors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn terminal(&self) -> MessageKind {
        self.terminal
    }

    /// Whether a terminal message has passed through.
    pub fn is_finished(&self) -> bool {
        *self.finished.borrow()
    }

    /// Wait until a terminal message has passed through.
    pub async fn wait_finished(&self) {
        let mut rx = self.finished.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|finished| *finished).await;
    }

    fn snapshot(&self) -> Vec<Arc<dyn TestMessageVisitor>> {
        self.visitors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn handle(&self, message: &TestMessage) -> bool {
        if message.kind() == self.terminal {
            self.finished.send_replace(true);
        }
        true
    }
}

#[async_trait]
impl TestMessageVisitor for VisitorObserver {
    async fn on_message(&self, message: &TestMessage) -> AppResult<bool> {
        let visitors = self.snapshot();
        debug!(kind = %message.kind(), subscribers = visitors.len(), "Forwarding message");

        for visitor in &visitors {
            visitor.on_message(message).await?;
        }

        Ok(self.handle(message))
    }
}
