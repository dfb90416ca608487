//! Client intents: everything a connected player can ask the server to do.

use cardclash_catalog::CardId;
use serde::{Deserialize, Serialize};

use crate::types::LobbyCode;

/// An inbound request from a client.
///
/// Internally tagged (`{"type": "SelectCard", "card_id": 3, ...}`), which
/// keeps the JSON flat and easy to produce from a browser client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientIntent {
    /// Create a lobby; the creator becomes host.
    CreateLobby { name: String },

    /// Join an existing lobby by its 4-digit code.
    JoinLobby { name: String, code: LobbyCode },

    /// Start the match (host only, requires a full lobby).
    StartMatch,

    /// Select a card from the hand into the main or support slot.
    SelectCard { card_id: CardId, is_support: bool },

    /// Clear the main or support slot.
    UnselectCard { is_support: bool },

    /// Move a hand card into the single inventory slot.
    SaveToInventory { card_id: CardId },

    /// Move the inventory card back into the hand.
    UseFromInventory,

    /// Redeal the hand, spending one of the bounded gamble attempts.
    Gamble,

    /// Lock in the current selection for resolution.
    Ready,

    /// Restart the match from the ended state.
    PlayAgain,

    /// Abandon the match and return to the lobby screen.
    ReturnToLobby,

    /// Leave the lobby entirely.
    LeaveLobby,
}
