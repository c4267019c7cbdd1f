//! Web API module for Keyhole.
//!
//! JSON endpoints for registration, login and logout, with the session
//! token carried in a cookie.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
pub use state::{AppState, SessionCookie};
