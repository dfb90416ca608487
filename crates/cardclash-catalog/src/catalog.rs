//! The catalog: card pools, the counter table, and game rules.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::card::{BestSupport, Card, CardId, MainCard, SupportCard};

// ---------------------------------------------------------------------------
// GameRules
// ---------------------------------------------------------------------------

/// Numeric game constants.
///
/// These are configuration, not code: a catalog file can override any of
/// them. `Default` carries the stock tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRules {
    /// Each player's HP at match start; also the HP cap.
    pub player_start_hp: i64,

    /// Main cards dealt into each hand.
    pub main_cards_per_hand: usize,

    /// Support cards dealt into each hand.
    pub support_cards_per_hand: usize,

    /// Hand redeals a player may buy per round.
    pub gamble_attempts: u32,

    /// Flat damage bonus when the counter table matches.
    pub counter_bonus: i64,

    /// Flat damage bonus when a boost target matches.
    pub boost_bonus: i64,

    /// Healing before the support's heal multiplier.
    pub base_heal: i64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            player_start_hp: 100,
            main_cards_per_hand: 2,
            support_cards_per_hand: 2,
            gamble_attempts: 3,
            counter_bonus: 15,
            boost_bonus: 10,
            base_heal: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The immutable card catalog.
///
/// Holds the two card pools and the counter table: attacker id → list of
/// defender ids the attacker has a type advantage against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub main_cards: Vec<MainCard>,
    pub support_cards: Vec<SupportCard>,
    #[serde(default)]
    pub counters: HashMap<CardId, Vec<CardId>>,
}

impl Catalog {
    /// Looks up a main card by id.
    pub fn main(&self, id: CardId) -> Option<&MainCard> {
        self.main_cards.iter().find(|c| c.id == id)
    }

    /// Looks up a support card by id.
    pub fn support(&self, id: CardId) -> Option<&SupportCard> {
        self.support_cards.iter().find(|c| c.id == id)
    }

    /// Returns `true` if `attacker` has a counter advantage over `defender`.
    pub fn is_counter(&self, attacker: CardId, defender: CardId) -> bool {
        self.counters
            .get(&attacker)
            .is_some_and(|targets| targets.contains(&defender))
    }

    /// Finds a card of either kind by id.
    pub fn card(&self, id: CardId) -> Option<Card> {
        self.main(id)
            .cloned()
            .map(Card::Main)
            .or_else(|| self.support(id).cloned().map(Card::Support))
    }

    /// The stock deck the game ships with.
    pub fn builtin() -> Self {
        let main_cards = vec![
            MainCard {
                id: CardId(1),
                name: "Alfa".into(),
                damage: 50,
                hp: 10,
                boost: vec!["vladimir".into(), "tomas".into()],
                best_support: Some(BestSupport {
                    id: CardId(101),
                    multiplier: 2.0,
                }),
                ability: Some("Bonus damage against its boost targets.".into()),
            },
            MainCard {
                id: CardId(2),
                name: "Živý Mrtvý Chodící Děti".into(),
                damage: 30,
                hp: 15,
                boost: Vec::new(),
                best_support: Some(BestSupport {
                    id: CardId(101),
                    multiplier: 1.5,
                }),
                ability: Some("Holds all the money in the world.".into()),
            },
            MainCard {
                id: CardId(3),
                name: "František Ředitel".into(),
                damage: 30,
                hp: 15,
                boost: Vec::new(),
                best_support: None,
                ability: None,
            },
            MainCard {
                id: CardId(4),
                name: "Tomáš Garrigue Masaryk".into(),
                damage: 30,
                hp: 15,
                boost: Vec::new(),
                best_support: None,
                ability: Some("Reforms society.".into()),
            },
        ];

        let support_cards = vec![SupportCard {
            id: CardId(101),
            name: "Golden labubu".into(),
            bonus_damage: 1.5,
            bonus_heal: 2.0,
            ability: Some("Gold stops bullets.".into()),
        }];

        let counters = HashMap::from([
            (CardId(1), vec![CardId(3), CardId(7)]),
            (CardId(2), vec![CardId(4), CardId(6)]),
        ]);

        Self {
            main_cards,
            support_cards,
            counters,
        }
    }
}
