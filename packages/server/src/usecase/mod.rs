//! UseCase layer: one struct per operation the connection handlers and HTTP
//! endpoints perform, each depending only on the domain traits.

mod broadcast;
mod disconnect;
mod error;
mod join_session;
mod send_message;
mod session_status;
mod signaling;
mod update_profile;

pub use broadcast::BroadcastDispatcher;
pub use disconnect::{Departure, DisconnectUseCase};
pub use error::{JoinError, SendMessageError};
pub use join_session::{JoinOutcome, JoinSessionUseCase};
pub use send_message::{PostedMessage, SendMessageUseCase};
pub use session_status::{SessionActivity, SessionStatusUseCase};
pub use signaling::SignalingUseCase;
pub use update_profile::{Rename, UpdateProfileUseCase};
