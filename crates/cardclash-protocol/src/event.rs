//! Server events: everything the server announces to clients.

use cardclash_catalog::Card;
use serde::{Deserialize, Serialize};

use crate::types::{
    LobbyCode, MatchView, PlayerSummary, RoundResult,
};

/// How a finished match ended.
///
/// A simultaneous knockout is a [`Tie`](Self::Tie) and carries no loser
/// attribution; a decided match always names both players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchOutcome {
    Winner { winner: String, loser: String },
    Tie,
}

/// An outbound event to one or more clients.
///
/// Broadcast state snapshots ([`GameUpdated`](Self::GameUpdated),
/// [`MatchStarted`](Self::MatchStarted)) are tailored per recipient: any
/// hand other than the recipient's own is an empty sequence. Hand
/// contents only ever travel in the unicast [`YourHand`](Self::YourHand).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    // -- Lobby lifecycle --
    LobbyCreated {
        code: LobbyCode,
    },
    LobbyJoined {
        code: LobbyCode,
    },
    PlayersUpdated {
        players: Vec<PlayerSummary>,
    },
    PlayerJoined {
        name: String,
    },
    PlayerLeft {
        name: String,
    },

    // -- Match flow --
    MatchStarted {
        state: MatchView,
    },
    YourHand {
        hand: Vec<Card>,
        round: u32,
        inventory: Option<Card>,
    },
    SelectionAck {
        card: Card,
    },
    GameUpdated {
        state: MatchView,
    },
    ReadinessWaiting {
        waiting_for: Vec<String>,
    },
    GambleResult {
        attempts_used: u32,
        attempts_left: u32,
    },

    // -- Round resolution --
    HpUpdated {
        hp1: i64,
        hp2: i64,
    },
    RoundResult {
        result: RoundResult,
    },
    NextRound {
        round: u32,
        message: String,
    },
    MatchEnded {
        outcome: MatchOutcome,
        rounds: u32,
    },

    // -- Errors --
    /// A validation failure, sent to the originating connection only.
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchPhase, PlayerId};

    #[test]
    fn test_lobby_created_json_shape() {
        let event = ServerEvent::LobbyCreated {
            code: LobbyCode("4217".into()),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "LobbyCreated");
        assert_eq!(json["code"], "4217");
    }

    #[test]
    fn test_match_outcome_tie_has_no_loser_field() {
        let json: serde_json::Value =
            serde_json::to_value(&MatchOutcome::Tie).unwrap();
        assert_eq!(json["type"], "Tie");
        assert!(json.get("loser").is_none());
    }

    #[test]
    fn test_match_outcome_winner_names_both_players() {
        let outcome = MatchOutcome::Winner {
            winner: "ada".into(),
            loser: "bob".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["winner"], "ada");
        assert_eq!(json["loser"], "bob");
    }

    #[test]
    fn test_your_hand_round_trip() {
        let event = ServerEvent::YourHand {
            hand: Vec::new(),
            round: 2,
            inventory: None,
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_game_updated_round_trip() {
        let event = ServerEvent::GameUpdated {
            state: MatchView {
                round: 1,
                phase: MatchPhase::Selecting,
                players: Vec::new(),
            },
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_hp_updated_json_shape() {
        let event = ServerEvent::HpUpdated { hp1: 80, hp2: 50 };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "HpUpdated");
        assert_eq!(json["hp1"], 80);
        assert_eq!(json["hp2"], 50);
    }

    #[test]
    fn test_players_updated_round_trip() {
        let event = ServerEvent::PlayersUpdated {
            players: vec![PlayerSummary {
                id: PlayerId(1),
                name: "ada".into(),
                is_host: true,
            }],
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }
}
