//! Concrete `RoomRegistry` implementations.

mod inmemory;

pub use inmemory::InMemoryRoomRegistry;
