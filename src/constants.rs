/// Default base URL of the Robinhood REST API
pub const DEFAULT_BASE_URL: &str = "https://api.robinhood.com";
/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default number of concurrent requests for batch instrument lookups
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 4;
/// User agent string used in HTTP requests
pub const USER_AGENT: &str = "robinhood-client/0.1.0";
/// Scheme prefix of the `Authorization` header value
pub const TOKEN_SCHEME: &str = "Token";
/// Field selector that returns the whole resource mapping
pub const ALL_FIELDS: &str = "all";
/// Price sent with orders when none is given.
///
/// Only limit orders need a price, but the API rejects market orders without one.
pub const DEFAULT_ORDER_PRICE: &str = "0.01";
/// Order responses with fewer top-level fields than this are treated as rejections
pub const MIN_ORDER_RESPONSE_FIELDS: usize = 3;
/// Base delay in milliseconds between rate limiter polls
pub const RATE_LIMIT_POLL_MS: u64 = 10;
