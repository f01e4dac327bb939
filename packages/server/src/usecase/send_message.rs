//! UseCase: appending and stamping a chat message.

use std::sync::Arc;

use idobata_shared::time::now_millis;

use crate::domain::{ChatMessage, ClientId, RoomId, RoomRegistry, Timestamp};

use super::error::SendMessageError;

/// A chat message accepted into the room history, together with the members
/// it must be delivered to.
#[derive(Debug)]
pub struct PostedMessage {
    pub message: ChatMessage,
    /// Members present at append time, in registration order. The caller
    /// delivers to exactly this set; anyone joining later replays the message
    /// from history instead, so nobody sees it twice.
    pub recipients: Vec<ClientId>,
}

/// Stamps an inbound chat text with the sender's current display name and a
/// server-side timestamp, then appends it to the room history. The caller
/// delivers the returned message to the returned recipients, sender included;
/// clients do not locally echo.
pub struct SendMessageUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl SendMessageUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(
        &self,
        room_id: &RoomId,
        sender: &ClientId,
        text: String,
    ) -> Result<PostedMessage, SendMessageError> {
        let sender_name = self
            .registry
            .display_name(room_id, sender)
            .await
            .ok_or_else(|| SendMessageError::SenderNotInRoom(room_id.as_str().to_string()))?;

        let message = ChatMessage::new(
            sender.clone(),
            sender_name,
            text,
            Timestamp::new(now_millis()),
        );
        let recipients = self.registry.append_message(room_id, message.clone()).await;

        tracing::info!(
            "Message from {} in room {}: {}",
            message.sender,
            room_id.as_str(),
            message.text
        );
        Ok(PostedMessage {
            message,
            recipients,
        })
    }
}
