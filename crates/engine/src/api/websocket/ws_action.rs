use super::*;

pub(super) async fn handle_action(
    state: &WsState,
    connection_id: Uuid,
    action: serde_json::Value,
) -> Option<ServerMessage> {
    let game_id = match require_joined(state, connection_id).await {
        Ok(id) => id,
        Err(e) => return Some(e),
    };

    match state
        .app
        .use_cases
        .actions
        .handle(&game_id, &connection_id.to_string(), action)
    {
        Ok(outcome) => {
            broadcast_game_state(state, &game_id).await;
            Some(action_result(outcome))
        }
        Err(e) => Some(resolution_error(connection_id, e)),
    }
}

pub(super) async fn handle_spawn_monster(
    state: &WsState,
    connection_id: Uuid,
    monster_type: String,
) -> Option<ServerMessage> {
    let game_id = match require_joined(state, connection_id).await {
        Ok(id) => id,
        Err(e) => return Some(e),
    };

    match state.app.use_cases.monsters.spawn(&game_id, &monster_type) {
        Ok(resolved) => {
            state.monster_ai.start(&game_id, &resolved.result.id);
            broadcast_game_state(state, &game_id).await;
            Some(action_result(resolved))
        }
        Err(e) => Some(resolution_error(connection_id, e)),
    }
}

/// Give an item to `player_id`, or to the sender when absent.
pub(super) async fn handle_give_item(
    state: &WsState,
    connection_id: Uuid,
    item_id: String,
    player_id: Option<String>,
) -> Option<ServerMessage> {
    let game_id = match require_joined(state, connection_id).await {
        Ok(id) => id,
        Err(e) => return Some(e),
    };
    let player_id = player_id.unwrap_or_else(|| connection_id.to_string());

    match state.app.use_cases.items.give(&game_id, &player_id, &item_id) {
        Ok(resolved) => {
            broadcast_game_state(state, &game_id).await;
            Some(action_result(resolved))
        }
        Err(e) => Some(resolution_error(connection_id, e)),
    }
}

pub(super) async fn handle_use_item(
    state: &WsState,
    connection_id: Uuid,
    item_id: String,
) -> Option<ServerMessage> {
    let game_id = match require_joined(state, connection_id).await {
        Ok(id) => id,
        Err(e) => return Some(e),
    };

    match state
        .app
        .use_cases
        .items
        .use_item(&game_id, &connection_id.to_string(), &item_id)
    {
        Ok(resolved) => {
            broadcast_game_state(state, &game_id).await;
            Some(action_result(resolved))
        }
        Err(e) => Some(resolution_error(connection_id, e)),
    }
}
