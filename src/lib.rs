/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # Robinhood Client
//!
//! A session-scoped client for the Robinhood brokerage REST API.
//!
//! The client keeps a single authentication token per instance and exposes:
//! - Login (with optional multi-factor step) and logout
//! - A uniform field accessor over the account, user, basic-info, employment,
//!   investment-profile and positions resources
//! - Instrument lookups and the instrument listing crawl
//! - Buy and sell equity orders
//!
//! ## Example
//! ```ignore
//! use robinhood_client::prelude::*;
//!
//! setup_logger();
//! let mut client = Client::new(Config::new())?;
//! client.authenticate(&EnvCredentials::new()).await?;
//! let account_number = client.get_account_data("account_number").await?;
//! ```

/// Application layer: configuration, credentials, endpoints, session and client
pub mod application;

/// Crate-wide constants
pub mod constants;

/// Error types
pub mod error;

/// Wire models and the HTTP transport
pub mod model;

/// Commonly used types and traits
pub mod prelude;

/// Logging, environment and export helpers
pub mod utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
#[must_use]
pub fn version() -> &'static str {
    VERSION
}
