//! Server configuration and bootstrap.

use crate::handler::handle_request;
use graft_engine::{Engine, SpecRegistry};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Server startup failure.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind: {0}")]
    Bind(std::io::Error),

    #[error("failed to accept connection: {0}")]
    Accept(std::io::Error),

    #[error("a spec registry is required")]
    NoRegistry,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Path serving the graph endpoint.
    pub path: String,
    /// Serve the static explorer page at `/ui`.
    pub ui: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 4000,
            path: "/graft".to_string(),
            ui: false,
        }
    }

    /// Sets the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the graph endpoint path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Enables or disables the `/ui` page.
    pub fn ui(mut self, ui: bool) -> Self {
        self.ui = ui;
        self
    }
}

/// Builder for [`GraftServer`].
#[derive(Debug, Default)]
pub struct ServerBuilder {
    config: ServerConfig,
    registry: Option<SpecRegistry>,
}

impl ServerBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the spec registry to serve.
    pub fn registry(mut self, registry: SpecRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Builds the server.
    pub fn build(self) -> Result<GraftServer, ServerError> {
        let registry = self.registry.ok_or(ServerError::NoRegistry)?;
        Ok(GraftServer {
            config: Arc::new(self.config),
            engine: Arc::new(Engine::new(registry)),
        })
    }
}

/// The GraftQL HTTP server.
#[derive(Debug)]
pub struct GraftServer {
    config: Arc<ServerConfig>,
    engine: Arc<Engine>,
}

impl GraftServer {
    /// Creates a new server builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// The server's engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The server's configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Starts the server and blocks until shutdown.
    ///
    /// The configured host may be a hostname (the default is `localhost`);
    /// resolution happens at bind time.
    pub async fn listen(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port))
            .await
            .map_err(ServerError::Bind)?;
        let addr = listener.local_addr().map_err(ServerError::Bind)?;

        info!("listening on http://{}{}", addr, self.config.path);
        if self.config.ui {
            info!("explorer: http://{}/ui", addr);
        }

        loop {
            let (stream, _addr) = listener.accept().await.map_err(ServerError::Accept)?;

            let io = TokioIo::new(stream);
            let engine = Arc::clone(&self.engine);
            let config = Arc::clone(&self.config);

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let engine = Arc::clone(&engine);
                    let config = Arc::clone(&config);
                    async move {
                        Ok::<_, Infallible>(handle_request(req, &engine, &config).await)
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    if !err.to_string().contains("connection closed") {
                        error!("connection error: {:?}", err);
                    }
                }
            });
        }
    }
}
