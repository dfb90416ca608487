//! Hand dealing.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::card::Card;
use crate::catalog::{Catalog, GameRules};

/// Deals a fresh randomized hand.
///
/// Shuffles the main pool and the support pool independently, takes the
/// configured count from each front, then reshuffles the combined hand so
/// the category order is not observable. Pools smaller than the configured
/// count just contribute everything they have.
///
/// Generic over the RNG so tests can pass a seeded one; production call
/// sites use `rand::rng()`.
pub fn deal_hand<R: Rng + ?Sized>(
    catalog: &Catalog,
    rules: &GameRules,
    rng: &mut R,
) -> Vec<Card> {
    let mut mains = catalog.main_cards.clone();
    mains.shuffle(rng);

    let mut supports = catalog.support_cards.clone();
    supports.shuffle(rng);

    let mut hand: Vec<Card> = mains
        .into_iter()
        .take(rules.main_cards_per_hand)
        .map(Card::Main)
        .chain(
            supports
                .into_iter()
                .take(rules.support_cards_per_hand)
                .map(Card::Support),
        )
        .collect();

    hand.shuffle(rng);
    hand
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::card::{CardId, MainCard, SupportCard};

    /// A catalog with enough cards in both pools that the per-category
    /// take is actually a selection, not the whole pool.
    fn wide_catalog() -> Catalog {
        let main_cards = (1..=6)
            .map(|i| MainCard {
                id: CardId(i),
                name: format!("Main {i}"),
                damage: 30,
                hp: 15,
                boost: Vec::new(),
                best_support: None,
                ability: None,
            })
            .collect();
        let support_cards = (101..=104)
            .map(|i| SupportCard {
                id: CardId(i),
                name: format!("Support {i}"),
                bonus_damage: 1.0,
                bonus_heal: 1.0,
                ability: None,
            })
            .collect();
        Catalog {
            main_cards,
            support_cards,
            counters: Default::default(),
        }
    }

    #[test]
    fn test_hand_has_configured_category_counts() {
        let catalog = wide_catalog();
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let hand = deal_hand(&catalog, &rules, &mut rng);
            assert_eq!(hand.len(), 4);
            let supports = hand.iter().filter(|c| c.is_support()).count();
            assert_eq!(supports, rules.support_cards_per_hand);
            assert_eq!(
                hand.len() - supports,
                rules.main_cards_per_hand
            );
        }
    }

    #[test]
    fn test_hand_has_no_duplicate_cards() {
        let catalog = wide_catalog();
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let hand = deal_hand(&catalog, &rules, &mut rng);
            for (i, card) in hand.iter().enumerate() {
                for other in &hand[i + 1..] {
                    assert_ne!(card.id(), other.id());
                }
            }
        }
    }

    #[test]
    fn test_small_pool_contributes_everything() {
        // The builtin deck has a single support card; hands still deal.
        let catalog = Catalog::builtin();
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(3);

        let hand = deal_hand(&catalog, &rules, &mut rng);
        assert_eq!(hand.len(), 3); // 2 mains + the lone support
        assert_eq!(hand.iter().filter(|c| c.is_support()).count(), 1);
    }

    #[test]
    fn test_hands_vary_across_deals() {
        let catalog = wide_catalog();
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(5);

        let ids = |hand: &[Card]| -> Vec<CardId> {
            hand.iter().map(Card::id).collect()
        };

        let first = ids(&deal_hand(&catalog, &rules, &mut rng));
        let distinct = (0..20)
            .map(|_| ids(&deal_hand(&catalog, &rules, &mut rng)))
            .any(|h| h != first);
        assert!(distinct, "20 consecutive deals were identical");
    }
}
