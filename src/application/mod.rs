/// Session state
pub mod auth;
/// Session-scoped API client
pub mod client;
/// Application configuration module
pub mod config;
/// Credential providers
pub mod credentials;
/// Endpoint table
pub mod endpoints;
/// Rate limiter module for API request throttling
pub mod rate_limiter;
