//! WebSocket handling for game clients.
//!
//! Every connection gets a fresh id which is also its player id. Replies and
//! errors go to the sender only; every successful change to a game is
//! followed by a `GameState` snapshot broadcast to all of that game's
//! connections.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

mod ws_action;
mod ws_dialogue;
mod ws_session;

use tavern_shared::{ClientMessage, ErrorCode, ServerMessage};

use super::connections::{ConnectionError, ConnectionManager};
use super::monster_ai::MonsterAi;
use crate::app::App;
use crate::use_cases::{ActionOutcome, ResolutionError};

/// Buffer size for per-connection message channel.
const CONNECTION_CHANNEL_BUFFER: usize = 256;

/// Combined state for WebSocket handlers.
pub struct WsState {
    pub app: Arc<App>,
    pub connections: Arc<ConnectionManager>,
    pub monster_ai: Arc<MonsterAi>,
}

/// WebSocket upgrade handler - entry point for new connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<WsState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let connection_id = Uuid::new_v4();

    // Create a bounded channel for sending messages to this client
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(CONNECTION_CHANNEL_BUFFER);

    state.connections.register(connection_id, tx.clone()).await;

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    // Spawn a task to forward messages from the channel to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize server message");
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(msg) => {
                    if let Some(response) = handle_message(msg, &state, connection_id).await {
                        if tx.try_send(response).is_err() {
                            tracing::warn!(
                                connection_id = %connection_id,
                                "Failed to send response, channel full or closed"
                            );
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(connection_id = %connection_id, error = %e, "Failed to parse message");
                    let _ = tx.try_send(error_response(
                        ErrorCode::BadRequest,
                        format!("Invalid message format: {}", e),
                    ));
                }
            },
            Ok(Message::Ping(_)) => {
                let _ = tx.try_send(ServerMessage::Pong);
            }
            Ok(Message::Close(_)) => {
                tracing::info!(connection_id = %connection_id, "WebSocket closed by client");
                break;
            }
            Err(e) => {
                tracing::error!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Clean up. The player stays in its game.
    state.connections.unregister(connection_id).await;
    send_task.abort();

    tracing::info!(connection_id = %connection_id, "WebSocket connection terminated");
}

/// Dispatch a parsed client message to the appropriate handler.
async fn handle_message(
    msg: ClientMessage,
    state: &WsState,
    connection_id: Uuid,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Heartbeat => Some(ServerMessage::Pong),

        // Session
        ClientMessage::JoinGame { game_id, name } => {
            ws_session::handle_join_game(state, connection_id, game_id, name).await
        }
        ClientMessage::SelectCampaign { campaign_id } => {
            ws_session::handle_select_campaign(state, connection_id, campaign_id).await
        }
        ClientMessage::CreateCharacter {
            name,
            race,
            class,
            abilities,
            armor_class,
        } => {
            let new = crate::use_cases::NewCharacter {
                name,
                race,
                class,
                abilities,
                armor_class,
            };
            ws_session::handle_create_character(state, connection_id, new).await
        }
        ClientMessage::ExportCharacter => {
            ws_session::handle_export_character(state, connection_id).await
        }

        // Actions and items
        ClientMessage::Action { action } => {
            ws_action::handle_action(state, connection_id, action).await
        }
        ClientMessage::SpawnMonster { monster_type } => {
            ws_action::handle_spawn_monster(state, connection_id, monster_type).await
        }
        ClientMessage::GiveItem { item_id, player_id } => {
            ws_action::handle_give_item(state, connection_id, item_id, player_id).await
        }
        ClientMessage::UseItem { item_id } => {
            ws_action::handle_use_item(state, connection_id, item_id).await
        }

        // Dialogue
        ClientMessage::StartDialogue {
            dialogue_id,
            conversation_id,
        } => ws_dialogue::handle_start_dialogue(state, connection_id, dialogue_id, conversation_id)
            .await,
        ClientMessage::ChooseDialogueOption {
            dialogue_id,
            conversation_id,
            node_id,
            option_index,
        } => {
            ws_dialogue::handle_choose_option(
                state,
                connection_id,
                dialogue_id,
                conversation_id,
                node_id,
                option_index,
            )
            .await
        }

        ClientMessage::Unknown => {
            tracing::debug!(connection_id = %connection_id, "Ignoring unknown message type");
            Some(error_response(
                ErrorCode::BadRequest,
                "Unknown message type".to_string(),
            ))
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn action_result(outcome: impl Into<ActionOutcome>) -> ServerMessage {
    let ActionOutcome { message, result } = outcome.into();
    ServerMessage::ActionResult { message, result }
}

fn error_response(code: ErrorCode, message: String) -> ServerMessage {
    ServerMessage::Error { code, message }
}

/// Map a resolution failure to the error sent back to the caller.
fn resolution_error(connection_id: Uuid, error: ResolutionError) -> ServerMessage {
    tracing::warn!(connection_id = %connection_id, error = %error, "Action rejected");
    let code = if error.is_not_found() {
        ErrorCode::NotFound
    } else {
        ErrorCode::BadRequest
    };
    error_response(code, error.to_string())
}

/// The game a connection has joined, or the error to send back.
async fn require_joined(state: &WsState, connection_id: Uuid) -> Result<String, ServerMessage> {
    state
        .connections
        .require_game(connection_id)
        .await
        .map_err(|e| match e {
            ConnectionError::NotJoined => error_response(ErrorCode::NotJoined, e.to_string()),
            ConnectionError::NotFound => error_response(ErrorCode::InternalError, e.to_string()),
        })
}

/// Send the current snapshot of a game to all of its connections.
async fn broadcast_game_state(state: &WsState, game_id: &str) {
    if let Some(game) = state.app.use_cases.session.game_state(game_id) {
        state
            .connections
            .broadcast_to_game(game_id, ServerMessage::GameState { state: game })
            .await;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::app::test_support::{app_with, sample_content};
    use crate::infrastructure::ports::RandomPort;
    use std::time::Duration;

    pub struct TestClient {
        pub connection_id: Uuid,
        pub rx: mpsc::Receiver<ServerMessage>,
    }

    impl TestClient {
        /// Drain everything queued for this client.
        pub fn drain(&mut self) -> Vec<ServerMessage> {
            let mut messages = Vec::new();
            while let Ok(msg) = self.rx.try_recv() {
                messages.push(msg);
            }
            messages
        }
    }

    pub fn ws_state(random: Arc<dyn RandomPort>) -> Arc<WsState> {
        let app = app_with(sample_content(), random);
        let connections = Arc::new(ConnectionManager::new());
        let monster_ai = Arc::new(MonsterAi::new(
            app.clone(),
            connections.clone(),
            Duration::from_secs(60),
        ));
        Arc::new(WsState {
            app,
            connections,
            monster_ai,
        })
    }

    pub async fn connect(state: &WsState) -> TestClient {
        let connection_id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(CONNECTION_CHANNEL_BUFFER);
        state.connections.register(connection_id, tx).await;
        TestClient { connection_id, rx }
    }

    pub async fn send(
        state: &WsState,
        client: &TestClient,
        msg: ClientMessage,
    ) -> Option<ServerMessage> {
        handle_message(msg, state, client.connection_id).await
    }

    pub async fn join(state: &WsState, client: &mut TestClient, game_id: &str, name: &str) {
        send(
            state,
            client,
            ClientMessage::JoinGame {
                game_id: game_id.to_string(),
                name: name.to_string(),
            },
        )
        .await;
        client.drain();
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::infrastructure::clock::FixedRandom;

    #[tokio::test]
    async fn heartbeat_gets_pong() {
        let state = ws_state(Arc::new(FixedRandom(1)));
        let client = connect(&state).await;

        let reply = send(&state, &client, ClientMessage::Heartbeat).await;

        assert!(matches!(reply, Some(ServerMessage::Pong)));
    }

    #[tokio::test]
    async fn game_messages_require_a_joined_game() {
        let state = ws_state(Arc::new(FixedRandom(1)));
        let client = connect(&state).await;

        let reply = send(
            &state,
            &client,
            ClientMessage::UseItem {
                item_id: "potion".into(),
            },
        )
        .await;

        match reply {
            Some(ServerMessage::Error { code, .. }) => assert_eq!(code, ErrorCode::NotJoined),
            other => panic!("Expected NotJoined error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_message_is_a_bad_request() {
        let state = ws_state(Arc::new(FixedRandom(1)));
        let client = connect(&state).await;

        let reply = send(&state, &client, ClientMessage::Unknown).await;

        assert!(matches!(
            reply,
            Some(ServerMessage::Error {
                code: ErrorCode::BadRequest,
                ..
            })
        ));
    }

    #[test]
    fn resolution_errors_map_to_codes() {
        let id = Uuid::new_v4();
        assert!(matches!(
            resolution_error(id, ResolutionError::not_found("Monster", "orc-1")),
            ServerMessage::Error {
                code: ErrorCode::NotFound,
                ..
            }
        ));
        assert!(matches!(
            resolution_error(id, ResolutionError::invalid_state("Cannot heal a monster")),
            ServerMessage::Error {
                code: ErrorCode::BadRequest,
                ..
            }
        ));
    }
}
