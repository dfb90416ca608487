//! Lobby actor: an isolated Tokio task that owns one lobby.
//!
//! Each lobby runs in its own task, communicating with the outside world
//! through an mpsc channel. Membership, the match session, and the round
//! timer all live inside the task — no shared mutable state, just message
//! passing, so client intents are applied strictly in arrival order.

use std::collections::HashMap;
use std::sync::Arc;

use cardclash_catalog::Catalog;
use cardclash_protocol::{
    ClientIntent, LobbyCode, PlayerId, PlayerSummary, Recipient,
    ServerEvent,
};
use tokio::sync::{mpsc, oneshot};

use crate::scheduler::RoundTimer;
use crate::session::{MatchSession, ReadyOutcome};
use crate::{LobbyConfig, LobbyError};

/// Channel sender for delivering events to one player's connection
/// handler. This is the broadcast gateway boundary: the core publishes
/// here, the transport side drains.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Reply to a leave request.
pub(crate) struct LeaveReply {
    /// `true` when the lobby emptied out and is shutting down.
    pub now_empty: bool,
}

/// Commands sent to a lobby actor through its channel.
pub(crate) enum LobbyCommand {
    Join {
        player: PlayerId,
        name: String,
        sender: EventSender,
        reply: oneshot::Sender<Result<(), LobbyError>>,
    },
    Leave {
        player: PlayerId,
        reply: oneshot::Sender<LeaveReply>,
    },
    Intent {
        player: PlayerId,
        intent: ClientIntent,
    },
    /// Deferred re-entry from the round timer.
    AdvanceRound { after_round: u32 },
    Shutdown,
}

/// Handle to a running lobby actor. Cheap to clone.
#[derive(Clone)]
pub struct LobbyHandle {
    code: LobbyCode,
    sender: mpsc::Sender<LobbyCommand>,
}

impl LobbyHandle {
    pub fn code(&self) -> &LobbyCode {
        &self.code
    }

    /// Sends a join request to the lobby.
    pub async fn join(
        &self,
        player: PlayerId,
        name: String,
        sender: EventSender,
    ) -> Result<(), LobbyError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let cmd = LobbyCommand::Join {
            player,
            name,
            sender,
            reply: reply_tx,
        };
        // A closed channel means the lobby died under us — to the caller
        // that is indistinguishable from a stale code.
        if self.sender.send(cmd).await.is_err() {
            return Err(LobbyError::LobbyNotFound(self.code.clone()));
        }
        reply_rx
            .await
            .unwrap_or(Err(LobbyError::LobbyNotFound(self.code.clone())))
    }

    /// Removes a player. Benign when the player is not a member or the
    /// lobby is already gone.
    pub(crate) async fn leave(&self, player: PlayerId) -> LeaveReply {
        let (reply_tx, reply_rx) = oneshot::channel();
        let cmd = LobbyCommand::Leave {
            player,
            reply: reply_tx,
        };
        if self.sender.send(cmd).await.is_err() {
            return LeaveReply { now_empty: true };
        }
        reply_rx.await.unwrap_or(LeaveReply { now_empty: true })
    }

    /// Forwards a client intent (fire-and-forget). A dead lobby drops it.
    pub async fn send_intent(&self, player: PlayerId, intent: ClientIntent) {
        let _ = self
            .sender
            .send(LobbyCommand::Intent { player, intent })
            .await;
    }

    /// Tells the lobby to shut down.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(LobbyCommand::Shutdown).await;
    }
}

/// One lobby member, lobby-scope state only.
struct Member {
    id: PlayerId,
    name: String,
    is_host: bool,
}

/// The internal lobby actor state. Runs inside a Tokio task.
struct LobbyActor {
    code: LobbyCode,
    members: Vec<Member>,
    /// Per-player outbound channels.
    senders: HashMap<PlayerId, EventSender>,
    session: Option<MatchSession>,
    timer: RoundTimer,
    catalog: Arc<Catalog>,
    config: LobbyConfig,
    receiver: mpsc::Receiver<LobbyCommand>,
    /// Clone of our own command sender, handed to the round timer.
    self_sender: mpsc::Sender<LobbyCommand>,
}

impl LobbyActor {
    async fn run(mut self) {
        tracing::info!(code = %self.code, "lobby actor started");

        // Greet the creator before processing any commands.
        if let Some(host) = self.members.first() {
            let host = host.id;
            self.send_to(
                host,
                ServerEvent::LobbyCreated {
                    code: self.code.clone(),
                },
            );
            self.send_to(host, self.players_updated());
        }

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                LobbyCommand::Join {
                    player,
                    name,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(player, name, sender);
                    let _ = reply.send(result);
                }
                LobbyCommand::Leave { player, reply } => {
                    let result = self.handle_leave(player);
                    let now_empty = result.now_empty;
                    let _ = reply.send(result);
                    if now_empty {
                        break;
                    }
                }
                LobbyCommand::Intent { player, intent } => {
                    self.handle_intent(player, intent);
                }
                LobbyCommand::AdvanceRound { after_round } => {
                    self.handle_advance(after_round);
                }
                LobbyCommand::Shutdown => break,
            }
        }

        tracing::info!(code = %self.code, "lobby actor stopped");
    }

    fn handle_join(
        &mut self,
        player: PlayerId,
        name: String,
        sender: EventSender,
    ) -> Result<(), LobbyError> {
        if self.members.len() >= 2 {
            return Err(LobbyError::LobbyFull(self.code.clone()));
        }
        if self.members.iter().any(|m| m.name == name) {
            return Err(LobbyError::DuplicateName(name));
        }

        self.members.push(Member {
            id: player,
            name: name.clone(),
            is_host: false,
        });
        self.senders.insert(player, sender);
        tracing::info!(
            code = %self.code,
            %player,
            members = self.members.len(),
            "player joined"
        );

        self.send_to(
            player,
            ServerEvent::LobbyJoined {
                code: self.code.clone(),
            },
        );
        self.dispatch(vec![
            (Recipient::All, self.players_updated()),
            (
                Recipient::AllExcept(player),
                ServerEvent::PlayerJoined { name },
            ),
        ]);
        Ok(())
    }

    fn handle_leave(&mut self, player: PlayerId) -> LeaveReply {
        let Some(pos) = self.members.iter().position(|m| m.id == player)
        else {
            return LeaveReply {
                now_empty: self.members.is_empty(),
            };
        };
        let leaver = self.members.remove(pos);
        self.senders.remove(&player);
        tracing::info!(
            code = %self.code,
            %player,
            members = self.members.len(),
            "player left"
        );

        if self.members.is_empty() {
            // The lobby and its session are torn down together.
            self.timer.cancel();
            self.session = None;
            return LeaveReply { now_empty: true };
        }

        // Host migration: first remaining member inherits the lobby.
        if leaver.is_host {
            self.members[0].is_host = true;
            tracing::debug!(
                code = %self.code,
                new_host = %self.members[0].id,
                "host migrated"
            );
        }
        self.dispatch(vec![
            (Recipient::All, self.players_updated()),
            (
                Recipient::All,
                ServerEvent::PlayerLeft { name: leaver.name },
            ),
        ]);
        LeaveReply { now_empty: false }
    }

    fn handle_intent(&mut self, player: PlayerId, intent: ClientIntent) {
        if !self.members.iter().any(|m| m.id == player) {
            tracing::debug!(
                code = %self.code,
                %player,
                "intent from non-member, ignoring"
            );
            return;
        }

        match intent {
            ClientIntent::StartMatch => self.handle_start(player),
            ClientIntent::SelectCard {
                card_id,
                is_support,
            } => {
                self.with_session(player, |session, _, _| {
                    session.select_card(player, card_id, is_support)
                });
            }
            ClientIntent::UnselectCard { is_support } => {
                self.with_session(player, |session, _, _| {
                    Ok(session.unselect(player, is_support))
                });
            }
            ClientIntent::SaveToInventory { card_id } => {
                self.with_session(player, |session, _, _| {
                    Ok(session.save_to_inventory(player, card_id))
                });
            }
            ClientIntent::UseFromInventory => {
                self.with_session(player, |session, _, _| {
                    Ok(session.use_from_inventory(player))
                });
            }
            ClientIntent::Gamble => {
                self.with_session(player, |session, catalog, config| {
                    session.gamble(
                        player,
                        catalog,
                        &config.rules,
                        &mut rand::rng(),
                    )
                });
            }
            ClientIntent::Ready => self.handle_ready(player),
            ClientIntent::PlayAgain => {
                self.with_session(player, |session, catalog, config| {
                    Ok(session
                        .play_again(
                            catalog,
                            &config.rules,
                            &mut rand::rng(),
                        )
                        .unwrap_or_default())
                });
            }
            ClientIntent::ReturnToLobby => self.handle_return_to_lobby(),
            // Registry-level intents never reach a lobby actor.
            ClientIntent::CreateLobby { .. }
            | ClientIntent::JoinLobby { .. }
            | ClientIntent::LeaveLobby => {
                tracing::debug!(
                    code = %self.code,
                    %player,
                    "registry intent routed to lobby, ignoring"
                );
            }
        }
    }

    /// Runs a session operation, dispatching its events or surfacing a
    /// validation error to the originating player only. No session means
    /// a benign no-op (teardown race).
    fn with_session<F>(&mut self, player: PlayerId, op: F)
    where
        F: FnOnce(
            &mut MatchSession,
            &Catalog,
            &LobbyConfig,
        ) -> Result<
            Vec<(Recipient, ServerEvent)>,
            LobbyError,
        >,
    {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match op(session, &self.catalog, &self.config) {
            Ok(events) => self.dispatch(events),
            Err(err) => self.send_error(player, &err),
        }
    }

    fn handle_start(&mut self, player: PlayerId) {
        let is_host = self
            .members
            .iter()
            .any(|m| m.id == player && m.is_host);
        if !is_host || self.members.len() != 2 {
            tracing::debug!(
                code = %self.code,
                %player,
                "start rejected (not host or lobby not full)"
            );
            return;
        }

        self.timer.cancel();
        let pair = [
            (self.members[0].id, self.members[0].name.clone()),
            (self.members[1].id, self.members[1].name.clone()),
        ];
        let session = MatchSession::new(
            pair,
            &self.catalog,
            &self.config.rules,
            &mut rand::rng(),
        );
        let events = session.started_events();
        self.session = Some(session);
        tracing::info!(code = %self.code, "match started");
        self.dispatch(events);
    }

    fn handle_ready(&mut self, player: PlayerId) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.set_ready(player, &self.catalog, &self.config.rules)
        {
            ReadyOutcome::Ignored => {}
            ReadyOutcome::Waiting(events) => self.dispatch(events),
            ReadyOutcome::Resolved {
                events,
                game_over,
                round,
            } => {
                tracing::info!(
                    code = %self.code,
                    round,
                    game_over,
                    "round resolved"
                );
                self.dispatch(events);
                if !game_over {
                    self.timer.schedule(
                        self.self_sender.clone(),
                        self.config.round_delay,
                        round,
                    );
                }
            }
        }
    }

    fn handle_advance(&mut self, after_round: u32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let advanced = session.advance_round(
            after_round,
            &self.catalog,
            &self.config.rules,
            &mut rand::rng(),
        );
        if let Some(events) = advanced {
            tracing::debug!(
                code = %self.code,
                round = session.round(),
                "round advanced"
            );
            self.dispatch(events);
        }
    }

    fn handle_return_to_lobby(&mut self) {
        if self.session.take().is_none() {
            return;
        }
        self.timer.cancel();
        tracing::info!(code = %self.code, "returned to lobby");
        self.dispatch(vec![(Recipient::All, self.players_updated())]);
    }

    fn players_updated(&self) -> ServerEvent {
        ServerEvent::PlayersUpdated {
            players: self
                .members
                .iter()
                .map(|m| PlayerSummary {
                    id: m.id,
                    name: m.name.clone(),
                    is_host: m.is_host,
                })
                .collect(),
        }
    }

    /// Fans events out to their recipients.
    fn dispatch(&self, events: Vec<(Recipient, ServerEvent)>) {
        for (recipient, event) in events {
            match recipient {
                Recipient::All => {
                    for m in &self.members {
                        self.send_to(m.id, event.clone());
                    }
                }
                Recipient::Player(id) => self.send_to(id, event),
                Recipient::AllExcept(excluded) => {
                    for m in &self.members {
                        if m.id != excluded {
                            self.send_to(m.id, event.clone());
                        }
                    }
                }
            }
        }
    }

    fn send_error(&self, player: PlayerId, err: &LobbyError) {
        self.send_to(
            player,
            ServerEvent::Error {
                message: err.to_string(),
            },
        );
    }

    /// Sends an event to a single player. Silently drops if the receiver
    /// is gone (player disconnected).
    fn send_to(&self, player: PlayerId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&player) {
            let _ = sender.send(event);
        }
    }
}

/// Default command channel size for lobby actors.
const CHANNEL_SIZE: usize = 64;

/// Spawns a lobby actor with its creator as host and returns the handle.
pub(crate) fn spawn_lobby(
    code: LobbyCode,
    host: PlayerId,
    host_name: String,
    host_sender: EventSender,
    catalog: Arc<Catalog>,
    config: LobbyConfig,
) -> LobbyHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);

    let actor = LobbyActor {
        code: code.clone(),
        members: vec![Member {
            id: host,
            name: host_name,
            is_host: true,
        }],
        senders: HashMap::from([(host, host_sender)]),
        session: None,
        timer: RoundTimer::idle(),
        catalog,
        config,
        receiver: rx,
        self_sender: tx.clone(),
    };

    tokio::spawn(actor.run());

    LobbyHandle { code, sender: tx }
}
