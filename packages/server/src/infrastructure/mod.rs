//! Infrastructure layer: concrete registry and pusher implementations, wire
//! DTOs, and the external speech API gateway.

pub mod dto;
pub mod openai;
pub mod pusher;
pub mod registry;
