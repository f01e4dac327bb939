//! Domain layer: value objects, entities and the interfaces the relay needs
//! from the infrastructure layer (dependency inversion).

mod entity;
mod pusher;
mod registry;
mod value_object;

pub use entity::{ChatMessage, Member, Room, RoomError, RoomSummary};
pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use registry::RoomRegistry;
pub use value_object::{
    ClientId, ClientIdFactory, DomainError, RoomId, RoomIdFactory, Timestamp, SESSION_ID_LENGTH,
};
