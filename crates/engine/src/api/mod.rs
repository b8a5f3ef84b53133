//! API layer - HTTP and WebSocket entry points.

pub mod connections;
pub mod http;
pub mod monster_ai;
pub mod websocket;

pub use connections::{ConnectionManager, SharedConnectionManager};
pub use monster_ai::MonsterAi;
