//! Lobby lifecycle for Cardclash.
//!
//! Each lobby runs as an isolated Tokio task (actor model) owning its
//! membership, its match session, and its round-advance timer. Commands
//! arrive on a channel and are processed strictly in order — the single
//! logical owner every session's state needs.
//!
//! # Key types
//!
//! - [`LobbyRegistry`] — creates/destroys lobbies, routes players
//! - [`LobbyHandle`] — send commands to a running lobby actor
//! - [`MatchSession`] — the per-match state machine
//! - [`LobbyConfig`] — round delay and game rules
//! - [`LobbyError`] — the validation error taxonomy

mod actor;
mod config;
mod error;
mod player;
mod registry;
mod scheduler;
mod session;

pub use actor::{EventSender, LobbyHandle};
pub use config::LobbyConfig;
pub use error::LobbyError;
pub use player::SessionPlayer;
pub use registry::LobbyRegistry;
pub use session::{MatchSession, ReadyOutcome};
