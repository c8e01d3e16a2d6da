//! In-process fan-out of signal changes to WebSocket sessions.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tokio::sync::broadcast;

use crate::{model::signal::SignalEventKind, server::model::signal::Signal};

/// Default number of events a slow session may lag behind before it skips ahead.
pub const DEFAULT_HUB_CAPACITY: usize = 256;

/// One change to a signal, shared between all sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    /// Position in the hub's event stream, used as STOMP `message-id`
    pub sequence: u64,
    pub kind: SignalEventKind,
    pub signal: Signal,
}

/// Broadcasts signal events to every connected session.
///
/// Cloning shares the same channel.
#[derive(Clone)]
pub struct SignalHub {
    sender: broadcast::Sender<Arc<SignalEvent>>,
    sequence: Arc<AtomicU64>,
}

impl SignalHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Publishes an event.
    ///
    /// # Returns
    /// - `usize` - Number of sessions that will receive it; 0 when nobody listens
    pub fn publish(&self, kind: SignalEventKind, signal: Signal) -> usize {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;

        let event = Arc::new(SignalEvent {
            sequence,
            kind,
            signal,
        });

        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<SignalEvent>> {
        self.sender.subscribe()
    }
}

impl Default for SignalHub {
    fn default() -> Self {
        Self::new(DEFAULT_HUB_CAPACITY)
    }
}
