/// Module containing environment variable helpers
pub mod config;
/// Module containing instrument export helpers
pub mod export;
/// Module containing logging utilities and message sinks
pub mod logger;

pub use export::*;
pub use logger::*;
