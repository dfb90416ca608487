//! Error types for the lobby layer.
//!
//! These are the validation errors: each is recovered locally and
//! surfaced as a single `Error` event to the originating connection, and
//! none of them mutates state. Races against lobby teardown are not
//! errors at all — those paths are benign no-ops.

use cardclash_catalog::CardId;
use cardclash_protocol::LobbyCode;

/// Errors that can occur during lobby and match operations.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// No lobby exists under this code.
    #[error("lobby {0} not found")]
    LobbyNotFound(LobbyCode),

    /// The lobby already has both players.
    #[error("lobby {0} is full")]
    LobbyFull(LobbyCode),

    /// Another member already uses this display name.
    #[error("the name {0:?} is already taken")]
    DuplicateName(String),

    /// The card id is not in the player's current hand.
    #[error("card {0} is not in your hand")]
    CardNotOwned(CardId),

    /// A main card was submitted for the support slot or vice versa.
    #[error("card {0} cannot go in that slot")]
    WrongCategory(CardId),

    /// The player has spent all gamble attempts this round.
    #[error("no gamble attempts left")]
    NoGamblesLeft,
}
