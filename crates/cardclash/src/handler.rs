//! Per-connection handler: intent routing and the outbound event pump.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The connection's numeric id doubles as the session-scoped [`PlayerId`]
//! — there is no further identity. The handler loop `select!`s between
//! the player's outbound event channel (filled by lobby actors) and
//! inbound frames, so one task serves both directions.

use std::sync::Arc;

use cardclash_protocol::{
    ClientIntent, Codec, PlayerId, ServerEvent,
};
use cardclash_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::CardclashError;
use crate::server::ServerState;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), CardclashError> {
    let player = PlayerId(conn.id().into_inner());
    tracing::info!(%player, "player connected");

    // This player's slice of the broadcast gateway: lobby actors publish
    // events here, the loop below drains them onto the socket.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let result = pump(&conn, &state, player, &tx, &mut rx).await;

    // Implicit leave on every disconnect path, clean or not. The lobby
    // broadcasts the departure to the remaining player.
    state.registry.lock().await.leave(player).await;
    tracing::info!(%player, "player disconnected");

    result
}

/// The send/receive loop. Split out so `handle_connection` can run the
/// leave cleanup regardless of how the loop ends.
async fn pump(
    conn: &WebSocketConnection,
    state: &Arc<ServerState>,
    player: PlayerId,
    tx: &mpsc::UnboundedSender<ServerEvent>,
    rx: &mut mpsc::UnboundedReceiver<ServerEvent>,
) -> Result<(), CardclashError> {
    loop {
        tokio::select! {
            event = rx.recv() => {
                // The handler holds a sender, so the channel never
                // closes before this function returns.
                let Some(event) = event else { return Ok(()) };
                let text = String::from_utf8(
                    state.codec.encode(&event)?,
                )
                .map_err(|_| {
                    cardclash_protocol::ProtocolError::InvalidMessage(
                        "event is not valid UTF-8".into(),
                    )
                })?;
                conn.send_text(&text).await?;
            }
            frame = conn.recv_text() => {
                match frame {
                    Ok(Some(text)) => {
                        handle_frame(state, player, &text, tx).await;
                    }
                    Ok(None) => {
                        tracing::debug!(
                            %player,
                            "connection closed cleanly"
                        );
                        return Ok(());
                    }
                    Err(e) => {
                        tracing::debug!(%player, error = %e, "recv error");
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Decodes one inbound frame and dispatches the intent.
///
/// All input is untrusted: malformed frames cost the sender an `Error`
/// event and nothing else.
async fn handle_frame(
    state: &Arc<ServerState>,
    player: PlayerId,
    text: &str,
    tx: &mpsc::UnboundedSender<ServerEvent>,
) {
    let intent: ClientIntent = match state.codec.decode(text.as_bytes()) {
        Ok(intent) => intent,
        Err(e) => {
            tracing::debug!(%player, error = %e, "bad intent frame");
            let _ = tx.send(ServerEvent::Error {
                message: "invalid message".to_string(),
            });
            return;
        }
    };

    match intent {
        ClientIntent::CreateLobby { name } => {
            let mut registry = state.registry.lock().await;
            registry.create(player, name, tx.clone()).await;
        }
        ClientIntent::JoinLobby { name, code } => {
            let result = {
                let mut registry = state.registry.lock().await;
                registry.join(code, player, name, tx.clone()).await
            };
            if let Err(e) = result {
                let _ = tx.send(ServerEvent::Error {
                    message: e.to_string(),
                });
            }
        }
        ClientIntent::LeaveLobby => {
            state.registry.lock().await.leave(player).await;
        }
        // Everything else belongs to the player's lobby actor; without
        // one the intent is dropped (benign teardown race).
        other => {
            state.registry.lock().await.route(player, other).await;
        }
    }
}
