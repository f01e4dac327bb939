//! WebSocket wire envelopes.
//!
//! Inbound and outbound frames are closed tagged enums dispatched on the JSON
//! `type` field. Anything a client sends with an unrecognized type lands in
//! `ClientFrame::Unknown` and is dropped without severing the connection;
//! malformed JSON fails deserialization and is dropped the same way.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ChatMessage;

/// Inbound chat payload. Current clients send `text`; older ones send
/// `message`, so both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatText {
    #[serde(alias = "message")]
    pub text: String,
}

/// Inbound profile update; absent fields leave the member untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// Inbound signaling room join
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignalJoin {
    pub room: String,
    pub user: String,
}

/// Inbound point-to-point signaling envelope. The SDP/candidate payload is
/// opaque to the relay and carried through untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignalBody {
    pub target: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// Inbound room-wide data relay
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataRelay {
    pub data: Value,
}

/// Frames a client may send.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientFrame {
    Chat(ChatText),
    UpdateUser(ProfileUpdate),
    Join(SignalJoin),
    Leave,
    Offer(SignalBody),
    Answer(SignalBody),
    IceCandidate(SignalBody),
    Message(DataRelay),
    /// Forward-compatible catch-all; unknown types are logged and ignored
    #[serde(other)]
    Unknown,
}

/// Outbound chat message body, also the element type of `history` frames.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    pub client_id: String,
    pub sender: String,
    pub message: String,
    pub timestamp: i64,
}

impl From<ChatMessage> for ChatBody {
    fn from(message: ChatMessage) -> Self {
        Self {
            client_id: message.client_id.into_string(),
            sender: message.sender,
            message: message.text,
            timestamp: message.timestamp.value(),
        }
    }
}

/// Outbound signaling envelope: the sender's identity is attached as `user`
/// and the opaque payload is forwarded verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct SignalForward {
    pub user: String,
    pub target: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl SignalForward {
    pub fn new(user: impl Into<String>, body: SignalBody) -> Self {
        Self {
            user: user.into(),
            target: body.target,
            payload: body.payload,
        }
    }
}

/// Frames the server may send.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerFrame {
    /// Initial ack after connect
    #[serde(rename_all = "camelCase")]
    Session {
        session_id: String,
        client_id: String,
    },
    /// One-time backlog push; each element serializes as a `chat` frame
    History { messages: Vec<ServerFrame> },
    Chat(ChatBody),
    /// Presence and rename notices
    System { message: String, timestamp: i64 },
    UserJoined { user: String },
    Leave { user: String },
    /// Room-wide data relay with the sender attached
    Message { user: String, data: Value },
    Offer(SignalForward),
    Answer(SignalForward),
    IceCandidate(SignalForward),
}

impl ServerFrame {
    pub fn chat(message: ChatMessage) -> Self {
        Self::Chat(ChatBody::from(message))
    }

    pub fn history(messages: Vec<ChatMessage>) -> Self {
        Self::History {
            messages: messages.into_iter().map(Self::chat).collect(),
        }
    }

    /// Serialize to the single wire representation shared by every recipient
    /// of a broadcast. These frames contain nothing that can fail to
    /// serialize.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("server frames serialize to JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientId, Timestamp};

    #[test]
    fn test_parse_chat_frame_with_text_field() {
        // given:
        let raw = r#"{"type":"chat","text":"hi"}"#;

        // when:
        let frame: ClientFrame = serde_json::from_str(raw).unwrap();

        // then:
        assert_eq!(frame, ClientFrame::Chat(ChatText { text: "hi".into() }));
    }

    #[test]
    fn test_parse_chat_frame_with_message_alias() {
        // given: the field spelling used in the observed client scenario
        let raw = r#"{"type":"chat","message":"hi"}"#;

        // when:
        let frame: ClientFrame = serde_json::from_str(raw).unwrap();

        // then:
        assert_eq!(frame, ClientFrame::Chat(ChatText { text: "hi".into() }));
    }

    #[test]
    fn test_parse_update_user_frame() {
        // given:
        let raw = r#"{"type":"update-user","name":"Bob"}"#;

        // when:
        let frame: ClientFrame = serde_json::from_str(raw).unwrap();

        // then:
        assert_eq!(
            frame,
            ClientFrame::UpdateUser(ProfileUpdate {
                name: Some("Bob".into()),
                avatar: None,
            })
        );
    }

    #[test]
    fn test_parse_ice_candidate_keeps_payload_opaque() {
        // given:
        let raw = r#"{"type":"ice-candidate","target":"bob","candidate":{"sdpMid":"0"}}"#;

        // when:
        let frame: ClientFrame = serde_json::from_str(raw).unwrap();

        // then:
        match frame {
            ClientFrame::IceCandidate(body) => {
                assert_eq!(body.target, "bob");
                assert_eq!(body.payload["candidate"]["sdpMid"], "0");
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_parses_to_unknown_variant() {
        // given:
        let raw = r#"{"type":"telemetry","lag":42}"#;

        // when:
        let frame: ClientFrame = serde_json::from_str(raw).unwrap();

        // then:
        assert_eq!(frame, ClientFrame::Unknown);
    }

    #[test]
    fn test_malformed_json_fails_to_parse() {
        // given:
        let raw = "not json at all";

        // when / then:
        assert!(serde_json::from_str::<ClientFrame>(raw).is_err());
    }

    #[test]
    fn test_session_frame_uses_camel_case_keys() {
        // given:
        let frame = ServerFrame::Session {
            session_id: "12345678".into(),
            client_id: "abc".into(),
        };

        // when:
        let value: Value = serde_json::from_str(&frame.encode()).unwrap();

        // then:
        assert_eq!(value["type"], "session");
        assert_eq!(value["sessionId"], "12345678");
        assert_eq!(value["clientId"], "abc");
    }

    #[test]
    fn test_history_frame_nests_chat_frames() {
        // given:
        let messages = vec![ChatMessage::new(
            ClientId::new("c1").unwrap(),
            "Guest",
            "hello",
            Timestamp::new(1000),
        )];

        // when:
        let value: Value = serde_json::from_str(&ServerFrame::history(messages).encode()).unwrap();

        // then: each history element is a full chat frame
        assert_eq!(value["type"], "history");
        assert_eq!(value["messages"][0]["type"], "chat");
        assert_eq!(value["messages"][0]["sender"], "Guest");
        assert_eq!(value["messages"][0]["message"], "hello");
        assert_eq!(value["messages"][0]["timestamp"], 1000);
    }

    #[test]
    fn test_signal_forward_attaches_sender_and_payload() {
        // given:
        let raw = r#"{"type":"offer","target":"bob","sdp":"v=0..."}"#;
        let ClientFrame::Offer(body) = serde_json::from_str::<ClientFrame>(raw).unwrap() else {
            panic!("expected offer");
        };

        // when:
        let forward = ServerFrame::Offer(SignalForward::new("alice", body));
        let value: Value = serde_json::from_str(&forward.encode()).unwrap();

        // then:
        assert_eq!(value["type"], "offer");
        assert_eq!(value["user"], "alice");
        assert_eq!(value["target"], "bob");
        assert_eq!(value["sdp"], "v=0...");
    }

    #[test]
    fn test_user_joined_frame_tag_is_kebab_case() {
        // given:
        let frame = ServerFrame::UserJoined {
            user: "alice".into(),
        };

        // when:
        let value: Value = serde_json::from_str(&frame.encode()).unwrap();

        // then:
        assert_eq!(value["type"], "user-joined");
        assert_eq!(value["user"], "alice");
    }
}
