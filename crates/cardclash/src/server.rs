//! Server builder and accept loop.
//!
//! Ties the layers together: transport → protocol → lobby. Each accepted
//! connection gets its own handler task; all lobby state lives behind the
//! shared registry.

use std::sync::Arc;

use cardclash_catalog::Catalog;
use cardclash_lobby::{LobbyConfig, LobbyRegistry};
use cardclash_protocol::JsonCodec;
use cardclash_transport::{Listener, WebSocketListener};
use tokio::sync::Mutex;

use crate::CardclashError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) registry: Mutex<LobbyRegistry>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Cardclash server.
///
/// # Example
///
/// ```rust,no_run
/// use cardclash::ServerBuilder;
///
/// # async fn run() -> Result<(), cardclash::CardclashError> {
/// let server = ServerBuilder::new().bind("0.0.0.0:3000").build().await?;
/// server.run().await
/// # }
/// ```
pub struct ServerBuilder {
    bind_addr: String,
    catalog: Catalog,
    lobby_config: LobbyConfig,
}

impl ServerBuilder {
    /// Creates a new builder with the builtin catalog and default rules.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            catalog: Catalog::builtin(),
            lobby_config: LobbyConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Replaces the card catalog.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Overrides the lobby configuration (round delay, game rules).
    pub fn lobby_config(mut self, config: LobbyConfig) -> Self {
        self.lobby_config = config;
        self
    }

    /// Binds the listener and builds the server.
    pub async fn build(self) -> Result<Server, CardclashError> {
        let listener = WebSocketListener::bind(&self.bind_addr).await?;

        let registry = LobbyRegistry::new(
            Arc::new(self.catalog),
            self.lobby_config,
        );
        let state = Arc::new(ServerState {
            registry: Mutex::new(registry),
            codec: JsonCodec,
        });

        Ok(Server { listener, state })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Cardclash server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct Server {
    listener: WebSocketListener,
    state: Arc<ServerState>,
}

impl Server {
    /// Creates a new builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop.
    ///
    /// Spawns a handler task per connection. Runs until the process is
    /// terminated.
    pub async fn run(mut self) -> Result<(), CardclashError> {
        tracing::info!("cardclash server running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
