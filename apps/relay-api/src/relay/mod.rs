pub mod payload;
pub mod registry;
pub mod room;
pub mod subscription;

pub use payload::Payload;
pub use registry::RoomRegistry;
pub use room::{PublishReport, Room};
pub use subscription::Subscription;
