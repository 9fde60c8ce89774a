/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # Robinhood Client Prelude
//!
//! The types and traits most programs need, in one import.
//!
//! ```rust
//! use robinhood_client::prelude::*;
//!
//! let config = Config::new();
//! assert!(!config.rest_api.base_url.is_empty());
//! ```

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for the client
pub use crate::application::config::{Config, RateLimiterConfig, RestApiConfig};

/// Library version information
pub use crate::{VERSION, version};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Main error type for the library
pub use crate::error::AppError;

// ============================================================================
// CLIENT, SESSION AND CREDENTIALS
// ============================================================================

/// Session-scoped API client
pub use crate::application::client::Client;

/// Session state
pub use crate::application::auth::{AuthState, Session};

/// Credential providers
pub use crate::application::credentials::{
    CredentialProvider, Credentials, EnvCredentials, FileCredentials, PromptCredentials,
    StaticCredentials,
};

/// Endpoint table and resources
pub use crate::application::endpoints::{Endpoint, Endpoints, Resource};

// ============================================================================
// MODELS
// ============================================================================

/// Field selectors and known fields
pub use crate::model::fields::{
    AccountField, BasicInfoField, EmploymentField, FieldKind, FieldSelector,
    InvestmentProfileField, PositionField, ResourceField, UserField,
};

/// Transport seam
pub use crate::model::http::{ApiRequest, HttpTransport, ReqwestTransport};

/// Position helpers
pub use crate::model::positions::{filter_active_positions, is_active_position};

/// Order models
pub use crate::model::requests::{OrderRequest, OrderType, Side, TimeInForce, Trigger};

/// Response models
pub use crate::model::responses::{LoginResponse, OrderOutcome};

// ============================================================================
// UTILITIES
// ============================================================================

/// Logging and message sinks
pub use crate::utils::logger::{MemorySink, MessageSink, TracingSink, setup_logger};

/// Instrument export
pub use crate::utils::export::export_instruments;
