//! Core wire types: identity, addressing, match views, round results.

use std::fmt;

use cardclash_catalog::{Card, MainCard, SupportCard};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's identity for the lifetime of their connection.
///
/// There is no account system — the connection handle IS the player, so
/// this is just a newtype over the connection's numeric id. Serialized as
/// a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A lobby's shareable short code: four decimal digits, unique among
/// active lobbies, regenerated on collision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LobbyCode(pub String);

impl LobbyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LobbyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should receive an event?
// ---------------------------------------------------------------------------

/// Specifies who should receive a server event.
///
/// Lobby operations return `(Recipient, ServerEvent)` pairs; the lobby
/// actor fans them out over the per-player senders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every member of the lobby.
    All,
    /// One specific player.
    Player(PlayerId),
    /// Everyone except the specified player.
    AllExcept(PlayerId),
}

// ---------------------------------------------------------------------------
// Lobby membership
// ---------------------------------------------------------------------------

/// One entry in a lobby's membership list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
}

// ---------------------------------------------------------------------------
// Match views
// ---------------------------------------------------------------------------

/// The match session's lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPhase {
    Selecting,
    Ended,
}

/// One player as seen in a broadcast state snapshot.
///
/// The `hand` is populated ONLY in the view tailored for its owner; every
/// other recipient sees an empty sequence. Selections are public.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub hp: i64,
    pub ready: bool,
    pub selected_card: Option<MainCard>,
    pub selected_support: Option<SupportCard>,
    pub hand: Vec<Card>,
    pub gambles_used: u32,
}

/// A snapshot of the match, tailored per recipient (hand redaction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    pub round: u32,
    pub phase: MatchPhase,
    pub players: Vec<PlayerView>,
}

// ---------------------------------------------------------------------------
// Round results
// ---------------------------------------------------------------------------

/// Whether a bonus fired this round, and the human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerReport {
    pub triggered: bool,
    pub reason: Option<String>,
}

impl TriggerReport {
    pub fn none() -> Self {
        Self {
            triggered: false,
            reason: None,
        }
    }

    pub fn fired(reason: String) -> Self {
        Self {
            triggered: true,
            reason: Some(reason),
        }
    }
}

/// One side's share of a resolved round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRoundReport {
    pub id: PlayerId,
    pub name: String,
    pub card: MainCard,
    pub support: Option<SupportCard>,
    /// Final damage this side dealt, after bonuses and multipliers.
    pub damage_dealt: i64,
    /// Damage absorbed by this side's battle card.
    pub card_damage_taken: i64,
    /// Overflow forwarded to this side's player HP.
    pub player_damage_taken: i64,
    pub healed: i64,
    /// Player HP after damage and healing, clamped to the valid range.
    pub hp: i64,
    /// Whether this side's battle card ended the round above 0 hp.
    pub card_survived: bool,
    pub counter: TriggerReport,
    pub boost: TriggerReport,
}

/// The full outcome of one resolved round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub player1: PlayerRoundReport,
    pub player2: PlayerRoundReport,
    /// The side that inflicted strictly more total damage, if any.
    pub round_winner: Option<PlayerId>,
    pub game_over: bool,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    #[test]
    fn test_lobby_code_serializes_as_plain_string() {
        let json = serde_json::to_string(&LobbyCode("4217".into())).unwrap();
        assert_eq!(json, "\"4217\"");
    }

    #[test]
    fn test_match_phase_is_lowercase_on_the_wire() {
        let json = serde_json::to_string(&MatchPhase::Selecting).unwrap();
        assert_eq!(json, "\"selecting\"");
        let json = serde_json::to_string(&MatchPhase::Ended).unwrap();
        assert_eq!(json, "\"ended\"");
    }

    #[test]
    fn test_recipient_round_trip() {
        for r in [
            Recipient::All,
            Recipient::Player(PlayerId(3)),
            Recipient::AllExcept(PlayerId(9)),
        ] {
            let bytes = serde_json::to_vec(&r).unwrap();
            let decoded: Recipient = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(r, decoded);
        }
    }

    #[test]
    fn test_trigger_report_constructors() {
        assert!(!TriggerReport::none().triggered);
        let fired = TriggerReport::fired("reason".into());
        assert!(fired.triggered);
        assert_eq!(fired.reason.as_deref(), Some("reason"));
    }

    #[test]
    fn test_player_view_redacted_hand_serializes_empty() {
        let view = PlayerView {
            id: PlayerId(1),
            name: "ada".into(),
            hp: 100,
            ready: false,
            selected_card: None,
            selected_support: None,
            hand: Vec::new(),
            gambles_used: 0,
        };
        let json: serde_json::Value = serde_json::to_value(&view).unwrap();
        assert_eq!(json["hand"], serde_json::json!([]));
    }
}
