//! Joining games and reading their state.

use std::sync::Arc;

use tavern_domain::{Game, Player};

use crate::stores::{log_line, GameRegistry};

pub struct Session {
    registry: Arc<GameRegistry>,
}

impl Session {
    pub fn new(registry: Arc<GameRegistry>) -> Self {
        Self { registry }
    }

    /// Join a game, creating it on first use.
    ///
    /// Joining again with the same player id keeps the first name.
    pub fn join(&self, game_id: &str, player_id: &str, name: &str) -> Player {
        self.registry.update(game_id, |game| {
            let (player, added) = game.add_player(player_id, name);
            let player = player.clone();
            if added {
                log_line(game, format!("{} joined the game", player.name));
                tracing::info!(game_id = %game_id, player_id = %player_id, "Player joined");
            }
            player
        })
    }

    /// Snapshot of a game, `None` if it was never created.
    pub fn game_state(&self, game_id: &str) -> Option<Game> {
        self.registry.get_game(game_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, SystemRandom};
    use chrono::Utc;

    fn session() -> Session {
        Session::new(Arc::new(GameRegistry::new(
            Arc::new(FixedClock(Utc::now())),
            Arc::new(SystemRandom::new()),
        )))
    }

    #[test]
    fn first_join_wins_the_name() {
        let session = session();

        session.join("g1", "p1", "Rowan");
        let again = session.join("g1", "p1", "Someone Else");

        assert_eq!(again.name, "Rowan");
        let state = session.game_state("g1").unwrap();
        assert_eq!(state.players.len(), 1);
        assert_eq!(state.log, vec!["Rowan joined the game"]);
    }

    #[test]
    fn unknown_game_has_no_state() {
        assert!(session().game_state("nowhere").is_none());
    }
}
