//! The match session state machine.
//!
//! A session holds exactly two players and moves through
//! `Selecting → Ended`, re-entering `Selecting` on a rematch. All methods
//! are synchronous and return the events to fan out; the lobby actor owns
//! the session and does the dispatching, so there is never concurrent
//! mutation.

use cardclash_battle::{Fighter, resolve};
use cardclash_catalog::{Card, CardId, Catalog, GameRules, deal_hand};
use cardclash_protocol::{
    MatchOutcome, MatchPhase, MatchView, PlayerId, Recipient, ServerEvent,
};
use rand::Rng;

use crate::LobbyError;
use crate::player::SessionPlayer;

/// Events to fan out after a session operation.
pub(crate) type Events = Vec<(Recipient, ServerEvent)>;

/// The outcome of a `set_ready` call.
pub enum ReadyOutcome {
    /// The ready was dropped: no selected main, already resolved this
    /// round, or the match is over.
    Ignored,
    /// Someone is still unready; the events carry the waiting list.
    Waiting(Vec<(Recipient, ServerEvent)>),
    /// Both players were ready and selected — the round resolved.
    Resolved {
        events: Vec<(Recipient, ServerEvent)>,
        /// `false` means the actor should schedule the round advance.
        game_over: bool,
        /// The round that just resolved, used to guard the timer.
        round: u32,
    },
}

/// Authoritative state for one running match.
#[derive(Debug)]
pub struct MatchSession {
    round: u32,
    phase: MatchPhase,
    /// Latched once per round so near-simultaneous ready events cannot
    /// double-resolve. Cleared on round advance and rematch.
    resolved: bool,
    players: [SessionPlayer; 2],
}

impl MatchSession {
    /// Starts a match for two lobby members: full HP, round 1, fresh
    /// hands.
    pub fn new<R: Rng + ?Sized>(
        members: [(PlayerId, String); 2],
        catalog: &Catalog,
        rules: &GameRules,
        rng: &mut R,
    ) -> Self {
        let players = members.map(|(id, name)| {
            SessionPlayer::new(id, name, rules, deal_hand(catalog, rules, rng))
        });
        Self {
            round: 1,
            phase: MatchPhase::Selecting,
            resolved: false,
            players,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn player(&self, id: PlayerId) -> Option<&SessionPlayer> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut SessionPlayer> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// The snapshot tailored for one recipient: every other hand redacted.
    pub fn view_for(&self, recipient: PlayerId) -> MatchView {
        MatchView {
            round: self.round,
            phase: self.phase,
            players: self
                .players
                .iter()
                .map(|p| p.view(p.id != recipient))
                .collect(),
        }
    }

    /// `MatchStarted` views plus private hands, used at match start and
    /// on a rematch.
    pub(crate) fn started_events(&self) -> Events {
        let mut events: Events = self
            .players
            .iter()
            .map(|p| {
                (
                    Recipient::Player(p.id),
                    ServerEvent::MatchStarted {
                        state: self.view_for(p.id),
                    },
                )
            })
            .collect();
        events.extend(self.players.iter().map(|p| self.your_hand(p)));
        events
    }

    fn your_hand(&self, player: &SessionPlayer) -> (Recipient, ServerEvent) {
        (
            Recipient::Player(player.id),
            ServerEvent::YourHand {
                hand: player.hand.clone(),
                round: self.round,
                inventory: player.inventory.clone(),
            },
        )
    }

    /// Per-recipient `GameUpdated` snapshots.
    fn game_updated(&self) -> Events {
        self.players
            .iter()
            .map(|p| {
                (
                    Recipient::Player(p.id),
                    ServerEvent::GameUpdated {
                        state: self.view_for(p.id),
                    },
                )
            })
            .collect()
    }

    /// Selects a card from the hand into the main or support slot.
    /// Clears readiness; the new selection must be re-confirmed.
    pub fn select_card(
        &mut self,
        player: PlayerId,
        card_id: CardId,
        is_support: bool,
    ) -> Result<Events, LobbyError> {
        let Some(p) = self.player_mut(player) else {
            return Ok(Vec::new());
        };

        let card = p
            .hand
            .iter()
            .find(|c| c.id() == card_id)
            .cloned()
            .ok_or(LobbyError::CardNotOwned(card_id))?;

        match (&card, is_support) {
            (Card::Support(support), true) => {
                p.selected_support = Some(support.clone())
            }
            (Card::Main(main), false) => {
                p.selected_card = Some(main.clone())
            }
            _ => return Err(LobbyError::WrongCategory(card_id)),
        }
        p.ready = false;

        let mut events = vec![(
            Recipient::Player(player),
            ServerEvent::SelectionAck { card },
        )];
        events.extend(self.game_updated());
        Ok(events)
    }

    /// Clears the main or support slot and readiness.
    pub fn unselect(&mut self, player: PlayerId, is_support: bool) -> Events {
        let Some(p) = self.player_mut(player) else {
            return Vec::new();
        };
        if is_support {
            p.selected_support = None;
        } else {
            p.selected_card = None;
        }
        p.ready = false;
        self.game_updated()
    }

    /// Moves a hand card into the inventory slot. A held slot or an
    /// unowned card makes this a silent no-op.
    pub fn save_to_inventory(
        &mut self,
        player: PlayerId,
        card_id: CardId,
    ) -> Events {
        let Some(p) = self.player_mut(player) else {
            return Vec::new();
        };
        if p.inventory.is_some() {
            return Vec::new();
        }
        let Some(pos) = p.hand.iter().position(|c| c.id() == card_id)
        else {
            return Vec::new();
        };
        p.inventory = Some(p.hand.remove(pos));
        let p = &self.players[self.index_of(player)];
        vec![self.your_hand(p)]
    }

    /// Moves the inventory card back into the hand. An empty slot is a
    /// silent no-op.
    pub fn use_from_inventory(&mut self, player: PlayerId) -> Events {
        let Some(p) = self.player_mut(player) else {
            return Vec::new();
        };
        let Some(card) = p.inventory.take() else {
            return Vec::new();
        };
        p.hand.push(card);
        let p = &self.players[self.index_of(player)];
        vec![self.your_hand(p)]
    }

    /// Redeals the hand for one bounded gamble attempt. The inventory
    /// slot is untouched — banking a card is how it survives a gamble.
    pub fn gamble<R: Rng + ?Sized>(
        &mut self,
        player: PlayerId,
        catalog: &Catalog,
        rules: &GameRules,
        rng: &mut R,
    ) -> Result<Events, LobbyError> {
        let hand = deal_hand(catalog, rules, rng);
        let Some(p) = self.player_mut(player) else {
            return Ok(Vec::new());
        };
        if p.gambles_used >= rules.gamble_attempts {
            return Err(LobbyError::NoGamblesLeft);
        }
        p.selected_card = None;
        p.selected_support = None;
        p.ready = false;
        p.gambles_used += 1;
        p.hand = hand;

        let attempts_used = p.gambles_used;
        let p = &self.players[self.index_of(player)];
        Ok(vec![
            self.your_hand(p),
            (
                Recipient::Player(player),
                ServerEvent::GambleResult {
                    attempts_used,
                    attempts_left: rules.gamble_attempts - attempts_used,
                },
            ),
        ])
    }

    /// Marks a player ready. Resolution fires exactly once per round, on
    /// the transition where the last blocker clears.
    pub fn set_ready(
        &mut self,
        player: PlayerId,
        catalog: &Catalog,
        rules: &GameRules,
    ) -> ReadyOutcome {
        if self.phase == MatchPhase::Ended || self.resolved {
            return ReadyOutcome::Ignored;
        }
        let Some(p) = self.player_mut(player) else {
            return ReadyOutcome::Ignored;
        };
        if p.selected_card.is_none() {
            return ReadyOutcome::Ignored;
        }
        p.ready = true;

        let waiting: Vec<String> = self
            .players
            .iter()
            .filter(|p| p.blocks_resolution())
            .map(|p| p.name.clone())
            .collect();
        if !waiting.is_empty() {
            return ReadyOutcome::Waiting(vec![(
                Recipient::All,
                ServerEvent::ReadinessWaiting {
                    waiting_for: waiting,
                },
            )]);
        }

        self.resolve_round(catalog, rules)
    }

    fn resolve_round(
        &mut self,
        catalog: &Catalog,
        rules: &GameRules,
    ) -> ReadyOutcome {
        // Both mains are selected here; set_ready gates on it.
        let [p1, p2] = &self.players;
        let (Some(card1), Some(card2)) =
            (&p1.selected_card, &p2.selected_card)
        else {
            return ReadyOutcome::Ignored;
        };

        self.resolved = true;

        let result = resolve(
            &Fighter {
                id: p1.id,
                name: &p1.name,
                hp: p1.hp,
                card: card1,
                support: p1.selected_support.as_ref(),
            },
            &Fighter {
                id: p2.id,
                name: &p2.name,
                hp: p2.hp,
                card: card2,
                support: p2.selected_support.as_ref(),
            },
            catalog,
            rules,
        );

        self.players[0].hp = result.player1.hp;
        self.players[1].hp = result.player2.hp;

        let mut events: Events = vec![
            (
                Recipient::All,
                ServerEvent::HpUpdated {
                    hp1: result.player1.hp,
                    hp2: result.player2.hp,
                },
            ),
            (
                Recipient::All,
                ServerEvent::RoundResult {
                    result: result.clone(),
                },
            ),
        ];

        let game_over = result.game_over;
        if game_over {
            self.phase = MatchPhase::Ended;
            let [p1, p2] = &self.players;
            let outcome = if p1.hp > 0 {
                MatchOutcome::Winner {
                    winner: p1.name.clone(),
                    loser: p2.name.clone(),
                }
            } else if p2.hp > 0 {
                MatchOutcome::Winner {
                    winner: p2.name.clone(),
                    loser: p1.name.clone(),
                }
            } else {
                MatchOutcome::Tie
            };
            events.push((
                Recipient::All,
                ServerEvent::MatchEnded {
                    outcome,
                    rounds: self.round,
                },
            ));
        }

        ReadyOutcome::Resolved {
            events,
            game_over,
            round: self.round,
        }
    }

    /// Advances to the next round: fresh hands (inventory carried over),
    /// selections and budgets reset. Honored only while the session is in
    /// the round it was scheduled for and the match has not ended.
    pub fn advance_round<R: Rng + ?Sized>(
        &mut self,
        after_round: u32,
        catalog: &Catalog,
        rules: &GameRules,
        rng: &mut R,
    ) -> Option<Events> {
        if self.phase == MatchPhase::Ended || self.round != after_round {
            return None;
        }
        self.round += 1;
        self.resolved = false;
        for p in &mut self.players {
            p.next_round(deal_hand(catalog, rules, rng));
        }

        let mut events: Events = vec![(
            Recipient::All,
            ServerEvent::NextRound {
                round: self.round,
                message: "New round! Pick a main and a support card."
                    .to_string(),
            },
        )];
        events.extend(self.players.iter().map(|p| self.your_hand(p)));
        Some(events)
    }

    /// Restarts an ended match from round 1. No-op from any other phase.
    pub fn play_again<R: Rng + ?Sized>(
        &mut self,
        catalog: &Catalog,
        rules: &GameRules,
        rng: &mut R,
    ) -> Option<Events> {
        if self.phase != MatchPhase::Ended {
            return None;
        }
        self.round = 1;
        self.phase = MatchPhase::Selecting;
        self.resolved = false;
        for p in &mut self.players {
            p.rematch(rules, deal_hand(catalog, rules, rng));
        }
        Some(self.started_events())
    }

    fn index_of(&self, player: PlayerId) -> usize {
        // Callers only use this after a successful player_mut lookup.
        self.players
            .iter()
            .position(|p| p.id == player)
            .unwrap_or(0)
    }
}

// =========================================================================
// Tests
// =========================================================================
