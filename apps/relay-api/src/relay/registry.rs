//! Registry of relay rooms.

use std::sync::Arc;

use dashmap::DashMap;
use relay_common::RoomId;

use super::room::Room;

/// Shared registry of all rooms, keyed by id.
///
/// Uses `DashMap` for shard-level concurrency; each [`Room`] carries its own
/// lock, so traffic in one room never contends with another. Rooms are created
/// on first access and are never evicted.
pub struct RoomRegistry {
    rooms: DashMap<RoomId, Arc<Room>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Return the room for `id`, creating an empty one if needed.
    ///
    /// Concurrent first calls for the same id all observe the same instance.
    pub fn get_or_create(&self, id: &RoomId) -> Arc<Room> {
        if let Some(room) = self.rooms.get(id) {
            return room.clone();
        }
        self.rooms
            .entry(id.clone())
            .or_insert_with(|| {
                tracing::debug!(room_id = %id, "room created");
                Arc::new(Room::new(id.clone()))
            })
            .clone()
    }

    pub fn get(&self, id: &RoomId) -> Option<Arc<Room>> {
        self.rooms.get(id).map(|room| room.clone())
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Close every room, ending all open subscriber streams.
    /// Returns the number of subscribers disconnected.
    pub fn shutdown(&self) -> usize {
        let rooms: Vec<Arc<Room>> = self.rooms.iter().map(|r| r.value().clone()).collect();
        let disconnected: usize = rooms.iter().map(|room| room.close()).sum();
        tracing::info!(rooms = rooms.len(), disconnected, "room registry shut down");
        disconnected
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
