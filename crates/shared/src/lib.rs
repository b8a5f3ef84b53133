//! Tavern Shared - types exchanged between the Engine and its clients
//!
//! - WebSocket message types (`ClientMessage`, `ServerMessage`)
//! - Error classification (`ErrorCode`)
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - serde, serde_json and the domain crate
//! 2. **No business logic** - pure data types and serialization

pub mod messages;
pub mod responses;

pub use messages::{ClientMessage, ServerMessage};
pub use responses::ErrorCode;
