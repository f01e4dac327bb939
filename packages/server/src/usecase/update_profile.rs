//! UseCase: member profile updates (display name, avatar).

use std::sync::Arc;

use crate::domain::{ClientId, RoomId, RoomRegistry};

/// A display-name change that actually happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub old_name: String,
    pub new_name: String,
}

impl Rename {
    /// The system notice announcing this rename
    pub fn notice(&self) -> String {
        format!(
            "\"{}\" changed their name to \"{}\"",
            self.old_name, self.new_name
        )
    }
}

/// Applies `update-user` frames. A rename is broadcast (via the returned
/// `Rename`) only when the new name is non-empty and actually different;
/// avatar updates are stored without any broadcast.
pub struct UpdateProfileUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl UpdateProfileUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(
        &self,
        room_id: &RoomId,
        client_id: &ClientId,
        name: Option<String>,
        avatar: Option<String>,
    ) -> Option<Rename> {
        if let Some(avatar) = avatar {
            self.registry.set_avatar(room_id, client_id, avatar).await;
        }

        let new_name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())?;
        let old_name = self
            .registry
            .rename_member(room_id, client_id, &new_name)
            .await?;

        tracing::info!(
            "Member in room {} renamed: {} -> {}",
            room_id.as_str(),
            old_name,
            new_name
        );
        Some(Rename { old_name, new_name })
    }
}
