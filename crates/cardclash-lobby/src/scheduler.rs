//! The round-advance timer.
//!
//! After a non-terminal resolution the lobby actor schedules exactly one
//! deferred re-entry into its own command channel. The timer is
//! cancellable, and the receiving side re-checks liveness (session still
//! present, phase not ended, round unchanged) before acting — a fired
//! timer for a torn-down or restarted session is a no-op.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::actor::LobbyCommand;

/// A single pending round advance. At most one is live per lobby.
#[derive(Debug, Default)]
pub(crate) struct RoundTimer {
    handle: Option<JoinHandle<()>>,
}

impl RoundTimer {
    pub(crate) fn idle() -> Self {
        Self::default()
    }

    /// Schedules the advance, replacing any pending one.
    ///
    /// If the lobby is gone by the time the delay elapses, the channel
    /// send fails and the task exits without effect.
    pub(crate) fn schedule(
        &mut self,
        sender: mpsc::Sender<LobbyCommand>,
        delay: Duration,
        after_round: u32,
    ) {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender
                .send(LobbyCommand::AdvanceRound { after_round })
                .await;
        }));
    }

    /// Aborts the pending advance, if any.
    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for RoundTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
