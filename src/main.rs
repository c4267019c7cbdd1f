use std::sync::Arc;

use tracing::{error, info};

use keyhole::{
    AppState, Config, Database, KeyholeError, MemorySessionStore, SessionBackend,
    SessionRepository, SessionStore, UserRepository, UserStore, WebServer,
};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = keyhole::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        keyhole::logging::init_console_only(&config.logging.level);
    }

    info!("Keyhole - session authentication service");

    if let Err(e) = run(config).await {
        error!(error = %e, "Keyhole stopped");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> keyhole::Result<()> {
    config.validate()?;

    let db = Database::open(&config.database.path).await?;

    let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(db.pool().clone()));
    let sessions: Arc<dyn SessionStore> = match config.auth.session_backend {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
        SessionBackend::Sqlite => Arc::new(SessionRepository::new(db.pool().clone())),
    };
    info!(backend = ?config.auth.session_backend, "Session store ready");

    let state = AppState::new(&config.auth, users, sessions)
        .map_err(|e| KeyholeError::Config(e.to_string()))?;

    let result = WebServer::new(&config, state)?.run().await;
    db.close().await;
    result
}
