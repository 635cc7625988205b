use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use portal_api::{build_router, AppState, CookieSettings, Views};
use portal_core::repositories::{SessionStore, UserRepository};
use portal_core::services::{AuthService, SessionManager, UserService};
use portal_infrastructure::{
    create_pool, run_migrations, MemorySessionStore, MemoryUserRepository, PgUserRepository,
    RedisSessionStore,
};
use portal_security::{PasswordService, SessionSigner};
use portal_shared::config::{AppConfig, StorageBackend};
use portal_shared::telemetry::init_telemetry;

const MEMORY_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (.env, config files, PORTAL__* variables)
    let config = AppConfig::load()?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_telemetry(&config.log)?;

    info!("{} starting ({})", config.app.name, config.app.env);

    let (user_repo, session_store) = build_stores(&config).await?;

    // Services
    let signer = SessionSigner::new(&config.session.secret)?;
    let sessions = Arc::new(SessionManager::new(
        session_store,
        signer,
        chrono::Duration::hours(config.session.ttl_hours),
    ));
    let auth = Arc::new(AuthService::new(
        user_repo.clone(),
        sessions.clone(),
        PasswordService::new(config.security.bcrypt_cost),
    ));
    let users = Arc::new(UserService::new(user_repo));

    // Views and static files
    let public_dir = PathBuf::from(&config.app.public_dir);
    let member_images = portal_api::views::discover_images(&public_dir);
    if member_images.is_empty() {
        warn!("No images found in {}; members page will show none", public_dir.display());
    }

    let state = AppState {
        auth,
        users,
        sessions,
        views: Arc::new(Views::new()?),
        cookie: CookieSettings::from_config(&config.session),
        public_dir,
        member_images: Arc::new(member_images),
    };
    let app = build_router(state);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn build_stores(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn UserRepository>, Arc<dyn SessionStore>)> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let pool = create_pool(&config.database).await?;
            run_migrations(&pool).await?;
            info!("Database connection established, migrations applied.");

            let sessions = RedisSessionStore::from_settings(&config.redis)?;
            info!("Session store: redis ({})", config.redis.key_prefix);

            Ok((Arc::new(PgUserRepository::new(pool)), Arc::new(sessions)))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory stores; users and sessions are lost on restart");
            let sessions = MemorySessionStore::new();
            let _sweeper = sessions.spawn_sweeper(MEMORY_SWEEP_INTERVAL);
            Ok((Arc::new(MemoryUserRepository::new()), Arc::new(sessions)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
