/// Application-level constants
pub const APP_NAME: &str = "MediBot";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL of the MediBot backend when `MEDIBOT_API_URL` is unset.
/// All four collaborator endpoints live on the same origin.
const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Per-request timeout for collaborator calls, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Get the backend base URL, preferring the `MEDIBOT_API_URL` environment
/// variable over the localhost default.
pub fn api_base_url() -> String {
    std::env::var("MEDIBOT_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME").replace('-', "_"))
}
