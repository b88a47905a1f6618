//! # Roster Server
//!
//! HTTP front of the capacity-limited registration service, built on `Axum` and `SurrealDB`.
//!
//! ## Example
//! ```no_run
//! use roster_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(5000)
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

mod router;

pub use router::init as build_router;

use anyhow::{Context, Result};
use axum_server::Handle;
use roster_database::{Database, SurrealRegistrantStore};
use roster_domain::config::{ApiConfig, StoreBackend};
use roster_kernel::server::ApiState;
use roster_registration::AdmissionGate;
use roster_store::{MemoryRegistrantStore, SharedStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
}

impl ServerBuilder {
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Overrides `registration.capacity`.
    pub fn capacity(mut self, capacity: u32) -> Self {
        self.cfg.registration.capacity = capacity;
        self
    }

    pub fn store(mut self, backend: StoreBackend) -> Self {
        self.cfg.registration.store = backend;
        self
    }

    async fn init_database(&self) -> Result<Database> {
        let db_cfg = &self.cfg.database;
        let mut builder =
            Database::builder().url(&db_cfg.url).session(&db_cfg.namespace, &db_cfg.database);

        if let Some(creds) = &db_cfg.credentials {
            builder = builder.auth(&creds.username, &creds.password);
        }

        builder.init().await.context("Failed to establish database connection")
    }

    async fn init_store(&self) -> Result<SharedStore> {
        let store: SharedStore = match self.cfg.registration.store {
            StoreBackend::Memory => {
                warn!("Using the in-memory registrant store; admissions are lost on restart");
                Arc::new(MemoryRegistrantStore::new())
            }
            StoreBackend::Database => {
                Arc::new(SurrealRegistrantStore::new(self.init_database().await?))
            }
        };
        Ok(store)
    }

    fn validate(&self) -> Result<()> {
        if self.cfg.server.port == 0 {
            anyhow::bail!("Server port must be non-zero");
        }

        if let Some(ssl) = &self.cfg.server.ssl {
            if !ssl.cert.exists() {
                anyhow::bail!("SSL certificate not found at: {}", ssl.cert.display());
            }
            if !ssl.key.exists() {
                anyhow::bail!("SSL key not found at: {}", ssl.key.display());
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let metadata = ssl.key.metadata()?;
                if metadata.permissions().mode() & 0o077 != 0 {
                    warn!(
                        "SECURITY: SSL private key {} is readable by others (should be 600)",
                        ssl.key.display()
                    );
                }
            }
        }
        Ok(())
    }

    /// Consumes the builder and wires the server together.
    ///
    /// # Process
    /// 1. Validates the listener and SSL settings
    /// 2. Opens the registrant store selected by `registration.store`
    /// 3. Creates the [`AdmissionGate`] with the configured capacity
    /// 4. Constructs the shared [`ApiState`]
    ///
    /// # Errors
    /// * The port is zero or SSL files are missing
    /// * The database cannot be reached, authenticated or migrated
    pub async fn build(self) -> Result<Server> {
        self.validate()?;

        let address = SocketAddr::new(self.cfg.server.address, self.cfg.server.port);
        info!(%address, capacity = self.cfg.registration.capacity, "Initializing server");

        let store = self.init_store().await?;
        let registration = &self.cfg.registration;
        let gate = AdmissionGate::with_count_cache(
            store,
            registration.capacity,
            Duration::from_millis(registration.count_cache_ttl_ms),
        );

        let state = ApiState::builder()
            .config(self.cfg)
            .gate(gate)
            .build()
            .context("Failed to finalize API state")?;
        Ok(Server { state })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Serves until Ctrl+C or SIGTERM, then drains connections for up to 30 seconds.
    ///
    /// # Errors
    /// Returns an error if binding fails or the TLS material cannot be loaded.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);

        info!(%address, ssl = cfg.server.ssl.is_some(), "Starting server");

        let app = router::init(self.state);

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });

        if let Some(ssl_config) = &cfg.server.ssl {
            info!("Starting HTTPS server on https://{address}");

            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &ssl_config.cert,
                &ssl_config.key,
            )
            .await
            .context("Failed to load SSL/TLS certificates")?;

            axum_server::bind_rustls(address, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTPS server failed")?;
        } else {
            info!("Starting HTTP server on http://{address}");

            axum_server::bind(address)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTP server failed")?;
        }

        info!("Server shutdown complete");
        Ok(())
    }

    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }
}

async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    Ok(())
}
