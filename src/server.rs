//! Server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: database, migrations, default
//! admin, services, the REST API and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::{AccountService, ProfileService};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::TokenService;
use crate::infrastructure::database::migrator::Migrator;
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::{create_api_router, init_database, SeaOrmRepositoryProvider};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the configured admin if no account exists (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running service.
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    /// Address the API listener is bound to.
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the service with the given options.
    ///
    /// This will:
    /// 1. Connect to the database and run migrations
    /// 2. Create the default admin account (if enabled)
    /// 3. Start the REST API server (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting profile directory...");

        if app_cfg.uses_default_secret() {
            warn!("Using the built-in JWT secret; set JWT_SECRET or security.jwt_secret");
        }

        // ── Database ───────────────────────────────────────────
        let db = init_database(&app_cfg.database_config()).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        // ── Repositories & Services ────────────────────────────
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        let tokens = Arc::new(TokenService::new(app_cfg.jwt_config()));
        info!(
            "JWT configured with {}h token expiration",
            app_cfg.security.jwt_expiration_hours
        );

        let accounts = Arc::new(AccountService::new(
            repos.clone(),
            tokens.clone(),
            app_cfg.security.bcrypt_cost,
        )?);
        let profiles = Arc::new(ProfileService::new(repos.clone()));

        if opts.create_default_admin {
            create_default_admin(&accounts, &app_cfg).await;
        }

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(
            db.clone(),
            tokens,
            accounts,
            profiles,
            app_cfg.security.secure_cookies,
        );

        let listener = tokio::net::TcpListener::bind(app_cfg.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, api_router.into_make_service())
            .with_graceful_shutdown(async move {
                api_shutdown.wait().await;
                info!("REST API server received shutdown signal");
            });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Wait for the server to stop after shutdown has been triggered,
    /// then close the database pool.
    pub async fn wait(self) {
        info!("Waiting for in-flight requests to complete...");

        let api_task = self.api_task;
        let finished = self
            .shutdown
            .cleanup_with_timeout(|| async move {
                if let Err(e) = api_task.await {
                    error!("REST API server task panicked: {}", e);
                }
            })
            .await;
        if finished {
            info!("REST API server stopped");
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }

        info!("Profile directory shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down...");
        self.shutdown.signal().trigger();
        self.wait().await;
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Create the configured admin account if no account exists yet.
async fn create_default_admin(accounts: &AccountService, app_cfg: &AppConfig) {
    let username = &app_cfg.admin.username;

    match accounts
        .ensure_default_admin(username, &app_cfg.admin.password)
        .await
    {
        Ok(Some(account)) => {
            info!(account_id = %account.id, "Default admin created: {}", username);
            warn!("Please change the default admin password");
        }
        Ok(None) => {}
        Err(e) => error!("Failed to create admin account: {}", e),
    }
}

/// Initialize tracing (logging) from the application config.
///
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
