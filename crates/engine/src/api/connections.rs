//! Connection management for WebSocket clients.
//!
//! Tracks connected clients and the game each one has joined. A connection id
//! doubles as the player id inside that game.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use tavern_shared::ServerMessage;

/// Information about a connected client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Unique ID for this connection
    pub connection_id: Uuid,
    /// The game this connection has joined, if any
    pub game_id: Option<String>,
}

impl ConnectionInfo {
    /// Player id used for this connection inside its game.
    pub fn player_id(&self) -> String {
        self.connection_id.to_string()
    }
}

/// Manages all active WebSocket connections.
pub struct ConnectionManager {
    /// Map of connection_id -> (ConnectionInfo, sender channel)
    connections: RwLock<HashMap<Uuid, (ConnectionInfo, mpsc::Sender<ServerMessage>)>>,
}

pub type SharedConnectionManager = Arc<ConnectionManager>;

impl ConnectionManager {
    /// Create a new connection manager.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    pub async fn register(&self, connection_id: Uuid, sender: mpsc::Sender<ServerMessage>) {
        let info = ConnectionInfo {
            connection_id,
            game_id: None,
        };
        let mut connections = self.connections.write().await;
        connections.insert(connection_id, (info, sender));
        tracing::debug!(connection_id = %connection_id, "Connection registered");
    }

    /// Unregister a connection. The player stays in its game.
    pub async fn unregister(&self, connection_id: Uuid) {
        let mut connections = self.connections.write().await;
        if let Some((info, _)) = connections.remove(&connection_id) {
            tracing::debug!(
                connection_id = %connection_id,
                game_id = ?info.game_id,
                "Connection unregistered"
            );
        }
    }

    /// Get connection info by ID.
    pub async fn get(&self, connection_id: Uuid) -> Option<ConnectionInfo> {
        let connections = self.connections.read().await;
        connections.get(&connection_id).map(|(info, _)| info.clone())
    }

    /// Associate a connection with a game, leaving any previous one.
    pub async fn join_game(
        &self,
        connection_id: Uuid,
        game_id: &str,
    ) -> Result<(), ConnectionError> {
        let mut connections = self.connections.write().await;
        let (info, _) = connections
            .get_mut(&connection_id)
            .ok_or(ConnectionError::NotFound)?;
        info.game_id = Some(game_id.to_string());
        tracing::info!(
            connection_id = %connection_id,
            game_id = %game_id,
            "Connection joined game"
        );
        Ok(())
    }

    /// The game a connection has joined.
    pub async fn require_game(&self, connection_id: Uuid) -> Result<String, ConnectionError> {
        let connections = self.connections.read().await;
        let (info, _) = connections
            .get(&connection_id)
            .ok_or(ConnectionError::NotFound)?;
        info.game_id.clone().ok_or(ConnectionError::NotJoined)
    }

    /// Get all connections in a game.
    pub async fn get_game_connections(&self, game_id: &str) -> Vec<ConnectionInfo> {
        let connections = self.connections.read().await;
        connections
            .values()
            .filter(|(info, _)| info.game_id.as_deref() == Some(game_id))
            .map(|(info, _)| info.clone())
            .collect()
    }

    /// Broadcast a message to all connections in a game.
    ///
    /// A full channel drops the message for that connection only.
    pub async fn broadcast_to_game(&self, game_id: &str, message: ServerMessage) {
        let connections = self.connections.read().await;
        for (info, sender) in connections.values() {
            if info.game_id.as_deref() == Some(game_id) {
                if let Err(e) = sender.try_send(message.clone()) {
                    tracing::warn!(
                        connection_id = %info.connection_id,
                        game_id = %game_id,
                        error = %e,
                        "Failed to broadcast message"
                    );
                }
            }
        }
    }

    /// Send a message to one connection.
    pub async fn send_to(&self, connection_id: Uuid, message: ServerMessage) {
        let connections = self.connections.read().await;
        if let Some((_, sender)) = connections.get(&connection_id) {
            if let Err(e) = sender.try_send(message) {
                tracing::warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to send message"
                );
            }
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during connection operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    #[error("Connection not found")]
    NotFound,
    #[error("Join a game first")]
    NotJoined,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_reaches_only_the_game() {
        let manager = ConnectionManager::new();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        let (tx_c, mut rx_c) = mpsc::channel(4);
        manager.register(a, tx_a).await;
        manager.register(b, tx_b).await;
        manager.register(c, tx_c).await;
        manager.join_game(a, "g1").await.unwrap();
        manager.join_game(b, "g1").await.unwrap();
        manager.join_game(c, "g2").await.unwrap();

        manager.broadcast_to_game("g1", ServerMessage::Pong).await;

        assert!(matches!(rx_a.try_recv(), Ok(ServerMessage::Pong)));
        assert!(matches!(rx_b.try_recv(), Ok(ServerMessage::Pong)));
        assert!(rx_c.try_recv().is_err());
        assert_eq!(manager.get_game_connections("g1").await.len(), 2);
    }

    #[tokio::test]
    async fn full_channel_drops_instead_of_blocking() {
        let manager = ConnectionManager::new();
        let id = Uuid::new_v4();
        let (tx, mut rx) = mpsc::channel(1);
        manager.register(id, tx).await;
        manager.join_game(id, "g1").await.unwrap();

        manager.broadcast_to_game("g1", ServerMessage::Pong).await;
        manager.broadcast_to_game("g1", ServerMessage::Pong).await;

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn require_game_distinguishes_unknown_and_unjoined() {
        let manager = ConnectionManager::new();
        let id = Uuid::new_v4();
        assert_eq!(manager.require_game(id).await, Err(ConnectionError::NotFound));

        let (tx, _rx) = mpsc::channel(1);
        manager.register(id, tx).await;
        assert_eq!(manager.require_game(id).await, Err(ConnectionError::NotJoined));

        manager.join_game(id, "g1").await.unwrap();
        assert_eq!(manager.require_game(id).await, Ok("g1".to_string()));

        manager.unregister(id).await;
        assert!(manager.get(id).await.is_none());
        assert_eq!(manager.connection_count().await, 0);
    }
}
