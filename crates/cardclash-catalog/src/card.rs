//! Card definitions.
//!
//! Cards are immutable catalog values. A battle only ever works on
//! per-round copies (the resolver tracks a depletable hp next to the
//! definition), so nothing here is mutated after the catalog is built.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for a card definition.
///
/// Newtype over `u32` so a card id can't be confused with a player id or
/// a lobby code. `#[serde(transparent)]` keeps it a plain number on the
/// wire: `CardId(3)` serializes as `3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// A main card's declared optimal support pairing.
///
/// When the matching support is selected alongside this main card, the
/// pairing multiplier replaces the support's generic damage multiplier.
/// Catalogs that omit the multiplier get the 1.5 fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSupport {
    pub id: CardId,
    #[serde(default = "default_pair_multiplier")]
    pub multiplier: f64,
}

fn default_pair_multiplier() -> f64 {
    1.5
}

/// A main card: the primary combatant each round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainCard {
    pub id: CardId,
    pub name: String,
    pub damage: i64,
    pub hp: i64,
    /// Name substrings this card deals bonus damage against.
    /// Matching is case-insensitive; the first hit wins.
    #[serde(default)]
    pub boost: Vec<String>,
    #[serde(default)]
    pub best_support: Option<BestSupport>,
    #[serde(default)]
    pub ability: Option<String>,
}

/// A support card: multiplies its owner's damage and healing for the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportCard {
    pub id: CardId,
    pub name: String,
    /// Generic damage multiplier, used when this support is not the main
    /// card's declared best pairing.
    #[serde(default = "default_multiplier")]
    pub bonus_damage: f64,
    /// Healing multiplier applied to the base heal.
    #[serde(default = "default_multiplier")]
    pub bonus_heal: f64,
    #[serde(default)]
    pub ability: Option<String>,
}

fn default_multiplier() -> f64 {
    1.0
}

/// Either kind of card, tagged on the wire as `"main"` / `"support"`.
///
/// Hands mix both categories, so this is the type that travels in
/// `YourHand` events and sits in inventory slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Card {
    Main(MainCard),
    Support(SupportCard),
}

impl Card {
    pub fn id(&self) -> CardId {
        match self {
            Self::Main(c) => c.id,
            Self::Support(c) => c.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Main(c) => &c.name,
            Self::Support(c) => &c.name,
        }
    }

    pub fn is_support(&self) -> bool {
        matches!(self, Self::Support(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alfa() -> MainCard {
        MainCard {
            id: CardId(1),
            name: "Alfa".into(),
            damage: 50,
            hp: 10,
            boost: vec!["vladimir".into()],
            best_support: Some(BestSupport {
                id: CardId(101),
                multiplier: 2.0,
            }),
            ability: None,
        }
    }

    #[test]
    fn test_card_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&CardId(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_main_card_wire_tag_is_main() {
        let card = Card::Main(alfa());
        let json: serde_json::Value = serde_json::to_value(&card).unwrap();
        assert_eq!(json["type"], "main");
        assert_eq!(json["name"], "Alfa");
        assert_eq!(json["damage"], 50);
    }

    #[test]
    fn test_support_card_wire_tag_is_support() {
        let card = Card::Support(SupportCard {
            id: CardId(101),
            name: "Golden labubu".into(),
            bonus_damage: 1.5,
            bonus_heal: 2.0,
            ability: None,
        });
        let json: serde_json::Value = serde_json::to_value(&card).unwrap();
        assert_eq!(json["type"], "support");
        assert_eq!(json["bonus_damage"], 1.5);
    }

    #[test]
    fn test_support_multipliers_default_to_one() {
        // A catalog entry without multipliers gets the neutral fallback.
        let json = r#"{"id": 102, "name": "Plain rock"}"#;
        let card: SupportCard = serde_json::from_str(json).unwrap();
        assert_eq!(card.bonus_damage, 1.0);
        assert_eq!(card.bonus_heal, 1.0);
    }

    #[test]
    fn test_best_support_multiplier_defaults_to_1_5() {
        let json = r#"{"id": 101}"#;
        let best: BestSupport = serde_json::from_str(json).unwrap();
        assert_eq!(best.multiplier, 1.5);
    }

    #[test]
    fn test_card_round_trip() {
        let card = Card::Main(alfa());
        let bytes = serde_json::to_vec(&card).unwrap();
        let decoded: Card = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(card, decoded);
    }

    #[test]
    fn test_card_accessors() {
        let card = Card::Main(alfa());
        assert_eq!(card.id(), CardId(1));
        assert_eq!(card.name(), "Alfa");
        assert!(!card.is_support());
    }
}
