use super::*;

use crate::use_cases::DialogueStep;

fn step_message(dialogue_id: String, conversation_id: String, step: DialogueStep) -> ServerMessage {
    match step {
        DialogueStep::Node {
            node_id,
            text,
            options,
        } => ServerMessage::DialogueNode {
            dialogue_id,
            conversation_id,
            node_id,
            text,
            options,
        },
        DialogueStep::Ended => ServerMessage::DialogueEnded {
            dialogue_id,
            conversation_id,
        },
    }
}

/// Starting a conversation changes nothing, so only the sender hears about it.
pub(super) async fn handle_start_dialogue(
    state: &WsState,
    connection_id: Uuid,
    dialogue_id: String,
    conversation_id: String,
) -> Option<ServerMessage> {
    if let Err(e) = require_joined(state, connection_id).await {
        return Some(e);
    }

    match state
        .app
        .use_cases
        .dialogue
        .start(&dialogue_id, &conversation_id)
    {
        Ok(step) => Some(step_message(dialogue_id, conversation_id, step)),
        Err(e) => Some(resolution_error(connection_id, e)),
    }
}

pub(super) async fn handle_choose_option(
    state: &WsState,
    connection_id: Uuid,
    dialogue_id: String,
    conversation_id: String,
    node_id: String,
    option_index: usize,
) -> Option<ServerMessage> {
    let game_id = match require_joined(state, connection_id).await {
        Ok(id) => id,
        Err(e) => return Some(e),
    };

    match state.app.use_cases.dialogue.choose(
        &game_id,
        &connection_id.to_string(),
        &dialogue_id,
        &conversation_id,
        &node_id,
        option_index,
    ) {
        Ok(step) => {
            // Rewards may have changed the game.
            broadcast_game_state(state, &game_id).await;
            Some(step_message(dialogue_id, conversation_id, step))
        }
        Err(e) => Some(resolution_error(connection_id, e)),
    }
}
