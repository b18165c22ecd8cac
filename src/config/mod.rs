use thiserror::Error;

mod auth;
mod database;
mod features;
mod logging;
mod server;

pub use auth::Auth;
pub use database::{Database, DbPoolConfig};
pub use features::{Likes, Notifications};
pub use logging::{Logging, LoggingStyle};
pub use server::Server;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;
