//! Lobby configuration.

use std::time::Duration;

use cardclash_catalog::GameRules;

/// Configuration shared by every lobby the registry spawns.
#[derive(Debug, Clone)]
pub struct LobbyConfig {
    /// Delay between a non-terminal round resolution and the automatic
    /// advance to the next round.
    pub round_delay: Duration,

    /// Numeric game rules, passed through to dealing and resolution.
    pub rules: GameRules,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            round_delay: Duration::from_secs(3),
            rules: GameRules::default(),
        }
    }
}
