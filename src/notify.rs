//! Coarse-grained change notifications.
//!
//! Stores announce `{table, kind}` tokens after each committed write; the
//! token carries no payload, so subscribers re-run their own filtered
//! queries. Clients consume the feed over the `GET /events` SSE stream.

use serde::Serialize;
use tokio::sync::broadcast;

const FEED_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Bills,
    BillItems,
    FoodItems,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Change {
    pub table: Table,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<Change>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(FEED_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.tx.subscribe()
    }

    /// Fire-and-forget: a feed with no subscribers drops the token.
    pub fn publish(&self, table: Table, kind: ChangeKind) {
        let _ = self.tx.send(Change { table, kind });
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}
