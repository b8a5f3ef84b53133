//! Tavern Engine library.
//!
//! Server side of the Tavern tabletop engine: a shared registry of live games,
//! the rules resolution built on top of it, and the WebSocket/HTTP gateway.
//!
//! ## Structure
//!
//! - `stores/` - The in-memory game registry
//! - `use_cases/` - Rules resolution (combat, spells, items, dialogue, ...)
//! - `infrastructure/` - Configuration, content loading, clock and randomness
//! - `api/` - HTTP and WebSocket entry points, monster AI scheduling
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
