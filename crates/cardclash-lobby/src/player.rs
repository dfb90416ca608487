//! Per-session player state.

use cardclash_catalog::{Card, GameRules, MainCard, SupportCard};
use cardclash_protocol::{PlayerId, PlayerView};

/// One player's mutable state inside a match session.
///
/// Lives exactly as long as the session. The lobby-scope identity (name,
/// host flag) is owned by the lobby actor; this is the match-scope copy.
#[derive(Debug, Clone)]
pub struct SessionPlayer {
    pub id: PlayerId,
    pub name: String,
    pub hp: i64,
    pub hand: Vec<Card>,
    pub selected_card: Option<MainCard>,
    pub selected_support: Option<SupportCard>,
    pub ready: bool,
    pub gambles_used: u32,
    /// The single-slot inventory. Holds at most one card.
    pub inventory: Option<Card>,
}

impl SessionPlayer {
    pub(crate) fn new(
        id: PlayerId,
        name: String,
        rules: &GameRules,
        hand: Vec<Card>,
    ) -> Self {
        Self {
            id,
            name,
            hp: rules.player_start_hp,
            hand,
            selected_card: None,
            selected_support: None,
            ready: false,
            gambles_used: 0,
            inventory: None,
        }
    }

    /// Resets selection state and installs a fresh hand for a new round.
    /// A held inventory card is appended to the hand and the slot cleared.
    pub(crate) fn next_round(&mut self, mut hand: Vec<Card>) {
        self.selected_card = None;
        self.selected_support = None;
        self.ready = false;
        self.gambles_used = 0;
        if let Some(card) = self.inventory.take() {
            hand.push(card);
        }
        self.hand = hand;
    }

    /// Resets everything to match-start values for a rematch.
    pub(crate) fn rematch(&mut self, rules: &GameRules, hand: Vec<Card>) {
        self.hp = rules.player_start_hp;
        self.hand = hand;
        self.selected_card = None;
        self.selected_support = None;
        self.ready = false;
        self.gambles_used = 0;
        self.inventory = None;
    }

    /// Whether this player blocks resolution: not ready, or nothing
    /// selected in the main slot.
    pub(crate) fn blocks_resolution(&self) -> bool {
        !self.ready || self.selected_card.is_none()
    }

    /// A broadcast view of this player. The hand is included only when
    /// the view is for its owner; everyone else sees an empty sequence.
    pub(crate) fn view(&self, redact_hand: bool) -> PlayerView {
        PlayerView {
            id: self.id,
            name: self.name.clone(),
            hp: self.hp,
            ready: self.ready,
            selected_card: self.selected_card.clone(),
            selected_support: self.selected_support.clone(),
            hand: if redact_hand {
                Vec::new()
            } else {
                self.hand.clone()
            },
            gambles_used: self.gambles_used,
        }
    }
}
