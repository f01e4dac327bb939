//! Ephemeral chat & WebRTC signaling relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-server
//! cargo run --bin idobata-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use idobata_server::{
    infrastructure::{
        openai::OpenAiSpeechGateway, pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry,
    },
    ui::{state::AppState, Server},
    usecase::{
        BroadcastDispatcher, DisconnectUseCase, JoinSessionUseCase, SendMessageUseCase,
        SessionStatusUseCase, SignalingUseCase, UpdateProfileUseCase,
    },
};
use idobata_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "idobata-server")]
#[command(about = "Ephemeral chat and WebRTC signaling relay server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry + MessagePusher
    // 2. UseCases + BroadcastDispatcher
    // 3. Speech gateway (external collaborator)
    // 4. AppState
    // 5. Server

    // 1. Registry (in-memory, injected everywhere, no global room map)
    let registry = Arc::new(InMemoryRoomRegistry::new());
    let pusher = Arc::new(WebSocketMessagePusher::new());

    // 2. UseCases
    let join_session_usecase = Arc::new(JoinSessionUseCase::new(registry.clone(), pusher.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(registry.clone()));
    let update_profile_usecase = Arc::new(UpdateProfileUseCase::new(registry.clone()));
    let disconnect_usecase = Arc::new(DisconnectUseCase::new(registry.clone(), pusher.clone()));
    let signaling_usecase = Arc::new(SignalingUseCase::new(registry.clone(), pusher.clone()));
    let session_status_usecase = Arc::new(SessionStatusUseCase::new(registry.clone()));
    let dispatcher = Arc::new(BroadcastDispatcher::new(registry.clone(), pusher.clone()));

    // 3. Speech gateway
    let speech = Arc::new(OpenAiSpeechGateway::from_env());

    // 4. AppState
    let state = Arc::new(AppState {
        join_session_usecase,
        send_message_usecase,
        update_profile_usecase,
        disconnect_usecase,
        signaling_usecase,
        session_status_usecase,
        dispatcher,
        speech,
    });

    // 5. Run the server
    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
