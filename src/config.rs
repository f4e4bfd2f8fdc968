use std::net::SocketAddr;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Aftercare";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default listen address for the form server (loopback only).
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8642";

/// Default records-service GraphQL endpoint.
const DEFAULT_GATEWAY_URL: &str = "http://localhost:4000/graphql";

/// Client-side timeout for the gateway write. No retry on expiry.
pub const GATEWAY_TIMEOUT: Duration = Duration::from_secs(20);

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "info,aftercare=debug"
}

/// Resolve the listen address.
///
/// `AFTERCARE_BIND_ADDR` overrides the default; an unparseable override
/// falls back to the default rather than refusing to start.
pub fn bind_addr() -> SocketAddr {
    if let Ok(raw) = std::env::var("AFTERCARE_BIND_ADDR") {
        match raw.parse() {
            Ok(addr) => return addr,
            Err(_) => {
                tracing::warn!("Ignoring unparseable AFTERCARE_BIND_ADDR: {raw}");
            }
        }
    }
    DEFAULT_BIND_ADDR
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8642)))
}

/// Resolve the records-service GraphQL endpoint.
///
/// `AFTERCARE_GATEWAY_URL` overrides the default.
pub fn gateway_url() -> String {
    std::env::var("AFTERCARE_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string())
}
