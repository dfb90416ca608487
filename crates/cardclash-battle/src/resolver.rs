//! The round resolver.
//!
//! Resolution order is fixed: counter bonus, boost bonus, support
//! multiplier, damage application with overflow, player HP update, round
//! winner, game-over check. Both sides are evaluated independently — a
//! card can receive the counter and the boost bonus in the same round,
//! and both sides can trigger them symmetrically.

use cardclash_catalog::{Catalog, GameRules, MainCard, SupportCard};
use cardclash_protocol::{
    PlayerId, PlayerRoundReport, RoundResult, TriggerReport,
};

/// One side's input to a round: identity, current HP, and selections.
///
/// Callers gate on both mains being selected before resolving; the
/// resolver never sees a missing main card.
#[derive(Debug, Clone, Copy)]
pub struct Fighter<'a> {
    pub id: PlayerId,
    pub name: &'a str,
    pub hp: i64,
    pub card: &'a MainCard,
    pub support: Option<&'a SupportCard>,
}

/// One side's attack after bonuses and multipliers.
struct Offense {
    damage: i64,
    healing: i64,
    counter: TriggerReport,
    boost: TriggerReport,
}

/// Resolves one round of combat. Pure: the callers own all state.
pub fn resolve(
    p1: &Fighter<'_>,
    p2: &Fighter<'_>,
    catalog: &Catalog,
    rules: &GameRules,
) -> RoundResult {
    let o1 = offense(p1, p2, catalog, rules);
    let o2 = offense(p2, p1, catalog, rules);

    // Damage application: the defending battle card soaks what it can,
    // the excess overflows onto the defending player.
    let hit2 = apply_to_card(o1.damage, p2.card.hp);
    let hit1 = apply_to_card(o2.damage, p1.card.hp);

    let hp1 = clamp_hp(p1.hp - hit1.overflow + o1.healing, rules);
    let hp2 = clamp_hp(p2.hp - hit2.overflow + o2.healing, rules);

    // Winner accounting credits the full outgoing damage plus the
    // overflow that reached the player, so a kill shot on the card
    // outweighs an equal hit fully absorbed.
    let total1 = hit2.directed + hit2.overflow;
    let total2 = hit1.directed + hit1.overflow;
    let round_winner = if total1 > total2 {
        Some(p1.id)
    } else if total2 > total1 {
        Some(p2.id)
    } else {
        None
    };

    let game_over = hp1 <= 0 || hp2 <= 0;

    RoundResult {
        player1: report(p1, &o1, &hit1, hp1),
        player2: report(p2, &o2, &hit2, hp2),
        round_winner,
        game_over,
    }
}

/// Computes one side's outgoing damage and healing.
fn offense(
    attacker: &Fighter<'_>,
    defender: &Fighter<'_>,
    catalog: &Catalog,
    rules: &GameRules,
) -> Offense {
    let mut damage = attacker.card.damage;

    let counter = if catalog.is_counter(attacker.card.id, defender.card.id)
    {
        damage += rules.counter_bonus;
        TriggerReport::fired(format!(
            "{} has a type advantage against {}",
            attacker.card.name, defender.card.name
        ))
    } else {
        TriggerReport::none()
    };

    let boost = match first_boost_match(attacker.card, defender.card) {
        Some(target) => {
            damage += rules.boost_bonus;
            TriggerReport::fired(format!(
                "{} gains a boost against \"{target}\"",
                attacker.card.name
            ))
        }
        None => TriggerReport::none(),
    };

    let mut healing = 0;
    if let Some(support) = attacker.support {
        let multiplier = match &attacker.card.best_support {
            Some(best) if best.id == support.id => best.multiplier,
            _ => support.bonus_damage,
        };
        damage = (damage as f64 * multiplier).floor() as i64;
        healing = (rules.base_heal as f64 * support.bonus_heal).floor()
            as i64;
    }

    Offense {
        damage,
        healing,
        counter,
        boost,
    }
}

/// Finds the first boost target that is a case-insensitive substring of
/// the defending card's name. First match wins.
fn first_boost_match<'a>(
    attacker: &'a MainCard,
    defender: &MainCard,
) -> Option<&'a str> {
    let defender_name = defender.name.to_lowercase();
    attacker
        .boost
        .iter()
        .map(String::as_str)
        .find(|target| defender_name.contains(&target.to_lowercase()))
}

/// The outcome of damage landing on a battle card.
struct CardHit {
    /// Damage directed at the card, clamped to be non-negative.
    directed: i64,
    /// The portion the card actually soaked.
    absorbed: i64,
    /// The excess forwarded to the player's HP pool.
    overflow: i64,
    /// Card hp remaining after the hit.
    remaining: i64,
}

fn apply_to_card(damage: i64, card_hp: i64) -> CardHit {
    let directed = damage.max(0);
    if directed >= card_hp {
        CardHit {
            directed,
            absorbed: card_hp,
            overflow: directed - card_hp,
            remaining: 0,
        }
    } else {
        CardHit {
            directed,
            absorbed: directed,
            overflow: 0,
            remaining: card_hp - directed,
        }
    }
}

fn clamp_hp(hp: i64, rules: &GameRules) -> i64 {
    hp.clamp(0, rules.player_start_hp)
}

fn report(
    fighter: &Fighter<'_>,
    offense: &Offense,
    hit: &CardHit,
    hp: i64,
) -> PlayerRoundReport {
    PlayerRoundReport {
        id: fighter.id,
        name: fighter.name.to_string(),
        card: fighter.card.clone(),
        support: fighter.support.cloned(),
        damage_dealt: offense.damage,
        card_damage_taken: hit.absorbed,
        player_damage_taken: hit.overflow,
        healed: offense.healing,
        hp,
        card_survived: hit.remaining > 0,
        counter: offense.counter.clone(),
        boost: offense.boost.clone(),
    }
}

// =========================================================================
// Tests
// =========================================================================
