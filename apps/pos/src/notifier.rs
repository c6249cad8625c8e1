//! # Change Notifier
//!
//! Fans change events out to every live subscriber so dashboards and "my
//! orders" views converge without polling.
//!
//! ## Contract
//! - One logical channel per entity kind (`Orders`, `Tables`).
//! - Payloads are coarse signals - kind, action, entity id - prompting the
//!   subscriber to re-fetch, not field-level diffs.
//! - At-least-once for a live subscriber: a slow consumer may lose the
//!   oldest events in a burst (the channel lags), but newer events are
//!   retained, so there is always a signal after any burst; the re-fetch it
//!   triggers self-heals whatever was skipped.
//! - Teardown is explicit: dropping or [`Subscription::close`]-ing the
//!   subscription removes the receiver, so nothing keeps delivering to a
//!   defunct viewer.
//! - Delivery failures are non-fatal: notifying with zero subscribers is a
//!   successful no-op.
//!
//! Any viewer filtering (a customer seeing only their own orders) happens
//! at the consumer after the signal, not here.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

/// Default broadcast capacity per entity kind.
const DEFAULT_CAPACITY: usize = 256;

/// The entity collections that emit change signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Orders,
    Tables,
}

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Insert,
    Update,
    Delete,
}

/// A coarse change signal: "entity X of kind K changed".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: EntityKind,
    pub action: ChangeAction,
    pub entity_id: String,
}

impl ChangeEvent {
    pub fn insert(kind: EntityKind, entity_id: impl Into<String>) -> Self {
        ChangeEvent {
            kind,
            action: ChangeAction::Insert,
            entity_id: entity_id.into(),
        }
    }

    pub fn update(kind: EntityKind, entity_id: impl Into<String>) -> Self {
        ChangeEvent {
            kind,
            action: ChangeAction::Update,
            entity_id: entity_id.into(),
        }
    }

    pub fn delete(kind: EntityKind, entity_id: impl Into<String>) -> Self {
        ChangeEvent {
            kind,
            action: ChangeAction::Delete,
            entity_id: entity_id.into(),
        }
    }
}

/// The process-wide fan-out hub. Cheap to clone; clones share channels.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    orders_tx: broadcast::Sender<ChangeEvent>,
    tables_tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    /// Creates a notifier with the given per-channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (orders_tx, _) = broadcast::channel(capacity);
        let (tables_tx, _) = broadcast::channel(capacity);
        ChangeNotifier {
            orders_tx,
            tables_tx,
        }
    }

    fn channel(&self, kind: EntityKind) -> &broadcast::Sender<ChangeEvent> {
        match kind {
            EntityKind::Orders => &self.orders_tx,
            EntityKind::Tables => &self.tables_tx,
        }
    }

    /// Opens a subscription to one entity kind. The subscription sees every
    /// event published after this call.
    pub fn subscribe(&self, kind: EntityKind) -> Subscription {
        debug!(?kind, "New change subscription");
        Subscription {
            kind,
            rx: self.channel(kind).subscribe(),
        }
    }

    /// Publishes a change signal to all current subscribers of its kind.
    pub fn notify(&self, event: ChangeEvent) {
        match self.channel(event.kind).send(event.clone()) {
            Ok(delivered) => {
                debug!(?event.kind, ?event.action, entity_id = %event.entity_id, delivered, "Change notified")
            }
            // nobody is watching; the next explicit fetch covers them
            Err(_) => debug!(?event.kind, "Change dropped, no subscribers"),
        }
    }

    /// Number of live subscribers for a kind (diagnostics and tests).
    pub fn subscriber_count(&self, kind: EntityKind) -> usize {
        self.channel(kind).receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        ChangeNotifier::new(DEFAULT_CAPACITY)
    }
}

/// A live subscription to one entity kind's change events.
#[derive(Debug)]
pub struct Subscription {
    kind: EntityKind,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    /// Waits for the next change signal.
    ///
    /// Returns `None` once the notifier is gone. If this consumer fell
    /// behind and the channel dropped its oldest events, the skip is logged
    /// and the next retained event is delivered - the consumer's re-fetch
    /// on that event covers the gap.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(kind = ?self.kind, skipped, "Subscriber lagging, events skipped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Adapts the subscription into a `Stream` of change events; lagged
    /// gaps are skipped as in [`Subscription::recv`].
    pub fn into_stream(self) -> impl Stream<Item = ChangeEvent> {
        BroadcastStream::new(self.rx).filter_map(|result| result.ok())
    }

    /// Explicitly tears the subscription down. Equivalent to dropping it;
    /// the name exists so disconnect paths read as deliberate.
    pub fn close(self) {
        debug!(kind = ?self.kind, "Subscription closed");
    }
}
