//! Wire protocol for Cardclash.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Types** ([`PlayerId`], [`LobbyCode`], [`Recipient`], the match
//!   views and [`RoundResult`]) — the structures that travel on the wire.
//! - **Intents** ([`ClientIntent`]) — everything a client can ask for.
//! - **Events** ([`ServerEvent`]) — everything the server announces.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to and from bytes.
//!
//! The protocol layer sits between the transport (raw frames) and the
//! lobby layer (game state). It knows nothing about connections or
//! sessions — only how messages are shaped.

mod codec;
mod error;
mod event;
mod intent;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use event::{MatchOutcome, ServerEvent};
pub use intent::ClientIntent;
pub use types::{
    LobbyCode, MatchPhase, MatchView, PlayerId, PlayerRoundReport,
    PlayerSummary, PlayerView, Recipient, RoundResult, TriggerReport,
};
