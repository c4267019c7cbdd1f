//! Web server for Keyhole.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use crate::auth::SessionManager;
use crate::config::Config;
use crate::{KeyholeError, Result};

use super::router::{create_health_router, create_router};
use super::state::AppState;

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Interval between expired-session sweeps.
    cleanup_interval: Duration,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, app_state: AppState) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| KeyholeError::Config(format!("invalid server address: {e}")))?;

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            cleanup_interval: Duration::from_secs(config.auth.session_cleanup_interval_secs),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the session cleanup background task.
    ///
    /// Expired sessions are already rejected on lookup; this only reclaims
    /// the records nobody presents again.
    fn start_session_cleanup_task(sessions: SessionManager, every: Duration) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                match sessions.purge_expired().await {
                    Ok(count) => {
                        if count > 0 {
                            tracing::info!(deleted_count = count, "Cleaned up expired sessions");
                        } else {
                            tracing::debug!("No expired sessions to clean up");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to cleanup sessions");
                    }
                }
            }
        });
    }

    async fn bind(self) -> Result<(TcpListener, Router)> {
        let sessions = self.app_state.sessions.clone();
        let router = create_router(self.app_state).merge(create_health_router());

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        if !self.cleanup_interval.is_zero() {
            Self::start_session_cleanup_task(sessions, self.cleanup_interval);
            tracing::info!(
                interval_secs = self.cleanup_interval.as_secs(),
                "Session cleanup task started"
            );
        }

        tracing::info!("Web server listening on http://{}", local_addr);
        Ok((listener, router))
    }

    /// Run the web server.
    pub async fn run(self) -> Result<()> {
        let (listener, router) = self.bind().await?;
        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
