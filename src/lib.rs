pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod schema;
pub mod services;
pub mod telemetry;
pub mod types;
pub mod util;

pub use app::App;

pub(crate) mod internal;

#[cfg(test)]
mod test_utils;
