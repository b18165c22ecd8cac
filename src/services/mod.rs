//! Every operation the server can perform, one struct per operation.
//!
//! Requests are plain structs with a `perform` method taking the
//! [`App`](crate::App) and, when the operation acts on behalf of
//! someone, the acting user.
pub mod aggregates;
pub mod follows;
pub mod likes;
pub mod notifications;
pub(crate) mod trigger;
