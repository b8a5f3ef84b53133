use super::*;

use crate::use_cases::NewCharacter;

pub(super) async fn handle_join_game(
    state: &WsState,
    connection_id: Uuid,
    game_id: String,
    name: String,
) -> Option<ServerMessage> {
    if game_id.trim().is_empty() {
        return Some(error_response(
            ErrorCode::BadRequest,
            "Game id must not be empty".to_string(),
        ));
    }

    if let Err(e) = state.connections.join_game(connection_id, &game_id).await {
        return Some(error_response(ErrorCode::InternalError, e.to_string()));
    }

    let player_id = connection_id.to_string();
    let player = state.app.use_cases.session.join(&game_id, &player_id, &name);

    // The joiner gets `Joined` first, then the snapshot everyone receives.
    state
        .connections
        .send_to(
            connection_id,
            ServerMessage::Joined {
                game_id: game_id.clone(),
                player,
            },
        )
        .await;
    broadcast_game_state(state, &game_id).await;
    None
}

pub(super) async fn handle_select_campaign(
    state: &WsState,
    connection_id: Uuid,
    campaign_id: String,
) -> Option<ServerMessage> {
    let game_id = match require_joined(state, connection_id).await {
        Ok(id) => id,
        Err(e) => return Some(e),
    };

    match state.app.use_cases.campaigns.select(&game_id, &campaign_id) {
        Ok(campaign) => {
            state
                .connections
                .broadcast_to_game(&game_id, ServerMessage::CampaignSelected { campaign })
                .await;
            broadcast_game_state(state, &game_id).await;
            None
        }
        Err(e) => Some(resolution_error(connection_id, e)),
    }
}

pub(super) async fn handle_create_character(
    state: &WsState,
    connection_id: Uuid,
    new: NewCharacter,
) -> Option<ServerMessage> {
    let game_id = match require_joined(state, connection_id).await {
        Ok(id) => id,
        Err(e) => return Some(e),
    };

    match state
        .app
        .use_cases
        .characters
        .create(&game_id, &connection_id.to_string(), new)
    {
        Ok(resolved) => {
            broadcast_game_state(state, &game_id).await;
            Some(action_result(resolved))
        }
        Err(e) => Some(resolution_error(connection_id, e)),
    }
}

pub(super) async fn handle_export_character(
    state: &WsState,
    connection_id: Uuid,
) -> Option<ServerMessage> {
    let game_id = match require_joined(state, connection_id).await {
        Ok(id) => id,
        Err(e) => return Some(e),
    };

    let character = state
        .app
        .use_cases
        .characters
        .export(&game_id, &connection_id.to_string());
    Some(ServerMessage::CharacterExport { character })
}
