//! # Cardclash
//!
//! A real-time, session-based two-player card battle server.
//!
//! Players create and join lobbies by short code, get dealt randomized
//! hands from the card catalog, pick a main and a support card, and ready
//! up; the server resolves each round deterministically and advances
//! rounds automatically until one side runs out of HP.
//!
//! The layers, bottom up: catalog (card config) → protocol (wire
//! language) → battle (pure resolver) → lobby (actors owning sessions) →
//! this crate (WebSocket server and per-connection handlers).

mod error;
mod handler;
mod server;

pub use error::CardclashError;
pub use server::{Server, ServerBuilder};
