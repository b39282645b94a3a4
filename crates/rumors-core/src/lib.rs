//! rumors-core library.
//!
//! Turns the query string of an article list page into the `ListArticles`
//! filter and order arguments, and drives the cursor-paginated list fetch
//! that backs the page.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for glue code (config, CLI); fetch
//!   failures are the typed [`error::FetchError`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod client;
pub mod config;
pub mod datalayer;
pub mod error;
pub mod filter;
pub mod list;
pub mod model;
pub mod order;
pub mod page;
pub mod params;
pub mod query;
pub mod transport;
pub mod vars;

pub use filter::{FilterSpec, translate};
pub use params::QueryParams;
pub use vars::ListQueryVars;
