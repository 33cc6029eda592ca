//! A subscriber's end of a room.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use relay_common::id::{prefix, prefixed_ulid};
use tokio::sync::mpsc;

use super::payload::Payload;
use super::room::Room;

/// A live membership in a [`Room`].
///
/// Yields every payload published to the room after registration, in publish
/// order. The stream ends when the room drops this subscriber (closed room,
/// stalled queue). Dropping the subscription unregisters it from the room;
/// this happens exactly once, however the connection ended.
pub struct Subscription {
    id: String,
    room: Arc<Room>,
    receiver: mpsc::Receiver<Payload>,
}

impl Subscription {
    /// Join `room` with a queue of `capacity` payloads.
    ///
    /// Returns the subscription and the room's last payload, which the caller
    /// must deliver before anything the subscription yields.
    pub fn open(room: Arc<Room>, capacity: usize) -> (Self, Option<Payload>) {
        let id = prefixed_ulid(prefix::SUBSCRIBER);
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let replay = room.subscribe(id.clone(), sender);

        tracing::info!(
            room_id = %room.id(),
            subscriber_id = %id,
            replay = replay.is_some(),
            "subscriber joined"
        );

        (Self { id, room, receiver }, replay)
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Stream for Subscription {
    type Item = Payload;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let removed = self.room.unsubscribe(&self.id);
        tracing::info!(
            room_id = %self.room.id(),
            subscriber_id = %self.id,
            removed,
            "subscriber left"
        );
    }
}
