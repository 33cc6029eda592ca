pub mod id;
pub mod room_id;

pub use room_id::{InvalidRoomId, RoomId};
