//! Per-room subscriber set and last-value cache.

use std::collections::HashMap;

use parking_lot::Mutex;
use relay_common::RoomId;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::payload::Payload;

/// Sending half of a subscriber's delivery queue.
pub type Sink = mpsc::Sender<Payload>;

/// Outcome of a single [`Room::publish`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Subscribers the payload was queued for.
    pub delivered: usize,
    /// Subscribers removed because their queue was closed or full.
    pub dropped: usize,
}

struct RoomState {
    subscribers: HashMap<String, Sink>,
    last: Option<Payload>,
    closed: bool,
}

/// One relay room.
///
/// `subscribers`, `last` and `closed` sit behind a single `parking_lot::Mutex`
/// so publishes to a room are serialized against each other and against
/// (un)subscribes. Every critical section is non-blocking: delivery is a
/// `try_send` into each subscriber's bounded queue.
pub struct Room {
    id: RoomId,
    state: Mutex<RoomState>,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            state: Mutex::new(RoomState {
                subscribers: HashMap::new(),
                last: None,
                closed: false,
            }),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Register `sink` under `subscriber_id` and return the replay snapshot.
    ///
    /// Registration and the snapshot read happen under the same lock, so every
    /// publish is seen either in the snapshot or through the sink, never both.
    /// A closed room keeps no sinks: the sink is dropped here and the
    /// subscriber's stream ends after the replay.
    pub fn subscribe(&self, subscriber_id: impl Into<String>, sink: Sink) -> Option<Payload> {
        let mut state = self.state.lock();
        if !state.closed {
            state.subscribers.insert(subscriber_id.into(), sink);
        }
        state.last.clone()
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, subscriber_id: &str) -> bool {
        self.state.lock().subscribers.remove(subscriber_id).is_some()
    }

    /// Store `payload` as the room's last value and queue it for every
    /// subscriber.
    ///
    /// A subscriber whose queue is closed or full is removed; the remaining
    /// subscribers are unaffected and the publish itself never fails.
    pub fn publish(&self, payload: Payload) -> PublishReport {
        let mut report = PublishReport::default();
        let mut state = self.state.lock();
        state.last = Some(payload.clone());

        let room_id = &self.id;
        state.subscribers.retain(|subscriber_id, sink| {
            match sink.try_send(payload.clone()) {
                Ok(()) => {
                    report.delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        room_id = %room_id,
                        subscriber_id = %subscriber_id,
                        "subscriber queue full, dropping subscriber"
                    );
                    report.dropped += 1;
                    false
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(
                        room_id = %room_id,
                        subscriber_id = %subscriber_id,
                        "subscriber gone, removing"
                    );
                    report.dropped += 1;
                    false
                }
            }
        });

        report
    }

    /// Drop every sink and refuse new registrations. Returns the number of
    /// subscribers disconnected.
    pub fn close(&self) -> usize {
        let mut state = self.state.lock();
        state.closed = true;
        let count = state.subscribers.len();
        state.subscribers.clear();
        count
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    pub fn last(&self) -> Option<Payload> {
        self.state.lock().last.clone()
    }
}
