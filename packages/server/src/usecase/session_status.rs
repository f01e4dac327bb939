//! UseCase: HTTP-facing session queries.

use std::sync::Arc;

use crate::domain::{RoomId, RoomIdFactory, RoomRegistry, RoomSummary};

/// Activity snapshot of one session id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionActivity {
    pub session_id: String,
    pub active: bool,
    pub participants: usize,
}

/// Read-only session queries plus new-session id minting.
pub struct SessionStatusUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl SessionStatusUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Mint a fresh session id. The room itself materializes only when the
    /// first client joins over WebSocket.
    pub fn new_session(&self) -> RoomId {
        RoomIdFactory::generate()
    }

    /// Whether a session is live and how many members it has
    pub async fn activity(&self, session_id: &str) -> SessionActivity {
        let Ok(room_id) = RoomId::new(session_id) else {
            return SessionActivity {
                session_id: session_id.to_string(),
                active: false,
                participants: 0,
            };
        };

        let active = self.registry.exists(&room_id).await;
        let participants = if active {
            self.registry.member_count(&room_id).await
        } else {
            0
        };
        SessionActivity {
            session_id: session_id.to_string(),
            active,
            participants,
        }
    }

    /// Snapshots of all live rooms (debug endpoint)
    pub async fn summaries(&self) -> Vec<RoomSummary> {
        self.registry.room_summaries().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientIdFactory, Member, Timestamp, SESSION_ID_LENGTH};
    use crate::infrastructure::registry::InMemoryRoomRegistry;

    fn setup() -> (Arc<InMemoryRoomRegistry>, SessionStatusUseCase) {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = SessionStatusUseCase::new(registry.clone());
        (registry, usecase)
    }

    #[tokio::test]
    async fn test_new_session_mints_numeric_id_without_creating_a_room() {
        // given:
        let (registry, usecase) = setup();

        // when:
        let session_id = usecase.new_session();

        // then:
        assert_eq!(session_id.as_str().len(), SESSION_ID_LENGTH);
        assert!(!registry.exists(&session_id).await);
    }

    #[tokio::test]
    async fn test_activity_for_unknown_session() {
        // given:
        let (_, usecase) = setup();

        // when:
        let activity = usecase.activity("99999999").await;

        // then:
        assert!(!activity.active);
        assert_eq!(activity.participants, 0);
    }

    #[tokio::test]
    async fn test_activity_reports_member_count() {
        // given:
        let (registry, usecase) = setup();
        let room_id = RoomId::new("12345678").unwrap();
        registry.get_or_create(&room_id, Timestamp::new(1000)).await;
        for _ in 0..2 {
            registry
                .add_member(
                    &room_id,
                    Member::guest(ClientIdFactory::generate(), Timestamp::new(1000)),
                )
                .await
                .unwrap();
        }

        // when:
        let activity = usecase.activity("12345678").await;

        // then:
        assert_eq!(
            activity,
            SessionActivity {
                session_id: "12345678".to_string(),
                active: true,
                participants: 2,
            }
        );
    }
}
