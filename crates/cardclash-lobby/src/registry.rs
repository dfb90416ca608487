//! Lobby registry: creates, tracks, and routes players to lobbies.
//!
//! This is the explicitly owned store for lobby state — no ambient
//! globals. A lobby is created on first registration and destroyed when
//! its last member leaves; the match session dies with the actor.

use std::collections::HashMap;
use std::sync::Arc;

use cardclash_catalog::Catalog;
use cardclash_protocol::{ClientIntent, LobbyCode, PlayerId};
use rand::Rng;

use crate::actor::{EventSender, LobbyHandle, spawn_lobby};
use crate::{LobbyConfig, LobbyError};

/// Owns all active lobbies and the player → lobby index.
///
/// A player is in at most one lobby at a time; creating or joining a new
/// one implicitly leaves the old one first.
pub struct LobbyRegistry {
    lobbies: HashMap<LobbyCode, LobbyHandle>,
    player_lobbies: HashMap<PlayerId, LobbyCode>,
    catalog: Arc<Catalog>,
    config: LobbyConfig,
}

impl LobbyRegistry {
    pub fn new(catalog: Arc<Catalog>, config: LobbyConfig) -> Self {
        Self {
            lobbies: HashMap::new(),
            player_lobbies: HashMap::new(),
            catalog,
            config,
        }
    }

    /// Creates a lobby with `player` as host and returns its code.
    pub async fn create(
        &mut self,
        player: PlayerId,
        name: String,
        sender: EventSender,
    ) -> LobbyCode {
        self.leave(player).await;

        let code = self.generate_code(&mut rand::rng());
        let handle = spawn_lobby(
            code.clone(),
            player,
            name,
            sender,
            Arc::clone(&self.catalog),
            self.config.clone(),
        );
        self.lobbies.insert(code.clone(), handle);
        self.player_lobbies.insert(player, code.clone());
        tracing::info!(%code, %player, "lobby created");
        code
    }

    /// Joins an existing lobby by code.
    pub async fn join(
        &mut self,
        code: LobbyCode,
        player: PlayerId,
        name: String,
        sender: EventSender,
    ) -> Result<(), LobbyError> {
        self.leave(player).await;

        let handle = self
            .lobbies
            .get(&code)
            .ok_or_else(|| LobbyError::LobbyNotFound(code.clone()))?;
        handle.join(player, name, sender).await?;
        self.player_lobbies.insert(player, code);
        Ok(())
    }

    /// Removes a player from their lobby, destroying the lobby (and its
    /// match session) when it empties. Benign no-op for players that are
    /// in no lobby.
    pub async fn leave(&mut self, player: PlayerId) {
        let Some(code) = self.player_lobbies.remove(&player) else {
            return;
        };
        let Some(handle) = self.lobbies.get(&code) else {
            return;
        };
        let reply = handle.leave(player).await;
        if reply.now_empty {
            self.lobbies.remove(&code);
            tracing::info!(%code, "lobby destroyed");
        }
    }

    /// Routes an in-lobby intent to the player's lobby actor. Intents
    /// from players without a lobby are silently dropped — the race with
    /// teardown is expected and the client reconciles on the next event.
    pub async fn route(&self, player: PlayerId, intent: ClientIntent) {
        let Some(code) = self.player_lobbies.get(&player) else {
            tracing::debug!(%player, "intent without a lobby, dropping");
            return;
        };
        if let Some(handle) = self.lobbies.get(code) {
            handle.send_intent(player, intent).await;
        }
    }

    /// The lobby a player is currently in, if any.
    pub fn player_lobby(&self, player: PlayerId) -> Option<&LobbyCode> {
        self.player_lobbies.get(&player)
    }

    /// Number of active lobbies.
    pub fn lobby_count(&self) -> usize {
        self.lobbies.len()
    }

    /// Generates an unused 4-digit code, retrying on collision.
    fn generate_code<R: Rng + ?Sized>(&self, rng: &mut R) -> LobbyCode {
        loop {
            let code =
                LobbyCode(rng.random_range(1000..10000).to_string());
            if !self.lobbies.contains_key(&code) {
                return code;
            }
        }
    }
}
