//! Server configuration for `B2Peak`.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `B2PEAK_*` environment variables.

use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Simulated identity provider handshake latency.
    pub login_latency: Duration,
    /// Simulated verification latency.
    pub verify_latency: Duration,
    /// Client sessions idle for longer than this are evicted.
    pub session_idle_timeout: Duration,
    /// Idle session scan interval in seconds.
    pub session_scan_interval_secs: u64,
    /// Extra attempts for transient NFT source failures.
    pub fetch_retries: u32,
    /// Mark the session cookie `Secure` (serve over HTTPS only).
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_level: "info".to_owned(),
            login_latency: Duration::from_millis(1000),
            verify_latency: Duration::from_millis(2000),
            session_idle_timeout: Duration::from_secs(3600),
            session_scan_interval_secs: 60,
            fetch_retries: 3,
            secure_cookies: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on (platform convention, binds to `0.0.0.0`)
    /// - `B2PEAK_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:8080`)
    /// - `B2PEAK_LOG_LEVEL`: log filter (default: `info`)
    /// - `B2PEAK_LOGIN_LATENCY_MS`: simulated login latency (default: `1000`)
    /// - `B2PEAK_VERIFY_LATENCY_MS`: simulated verification latency (default: `2000`)
    /// - `B2PEAK_SESSION_IDLE_SECS`: idle session timeout (default: `3600`)
    /// - `B2PEAK_SESSION_SCAN_INTERVAL`: seconds between idle scans (default: `60`)
    /// - `B2PEAK_FETCH_RETRIES`: retries for transient fetch errors (default: `3`)
    /// - `B2PEAK_SECURE_COOKIES`: set `Secure` on the session cookie (default: `false`)
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        // Priority: B2PEAK_BIND_ADDR > PORT > default 127.0.0.1:8080
        let bind_addr = if let Ok(addr) = std::env::var("B2PEAK_BIND_ADDR") {
            addr.parse().unwrap_or(defaults.bind_addr)
        } else if let Ok(port_str) = std::env::var("PORT") {
            let port: u16 = port_str.parse().unwrap_or(8080);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            defaults.bind_addr
        };

        let log_level = std::env::var("B2PEAK_LOG_LEVEL").unwrap_or(defaults.log_level);

        let login_latency = env_u64("B2PEAK_LOGIN_LATENCY_MS")
            .map_or(defaults.login_latency, Duration::from_millis);

        let verify_latency = env_u64("B2PEAK_VERIFY_LATENCY_MS")
            .map_or(defaults.verify_latency, Duration::from_millis);

        let session_idle_timeout = env_u64("B2PEAK_SESSION_IDLE_SECS")
            .map_or(defaults.session_idle_timeout, Duration::from_secs);

        let session_scan_interval_secs = env_u64("B2PEAK_SESSION_SCAN_INTERVAL")
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.session_scan_interval_secs);

        let fetch_retries = std::env::var("B2PEAK_FETCH_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.fetch_retries);

        let secure_cookies = std::env::var("B2PEAK_SECURE_COOKIES")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(defaults.secure_cookies);

        Self {
            bind_addr,
            log_level,
            login_latency,
            verify_latency,
            session_idle_timeout,
            session_scan_interval_secs,
            fetch_retries,
            secure_cookies,
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
