/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables. The vendor API
/// token has no default; startup fails fast without it.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `180`). Reconcile is a
    /// synchronous operation that may legitimately take minutes while the
    /// proof verifier polls; this must comfortably exceed the proof
    /// deadline.
    pub request_timeout_secs: u64,
    /// Base URL of the device-management API.
    pub vendor_base_url: String,
    /// Bearer token for the device-management API.
    pub vendor_api_token: String,
    /// Seconds between background sweep passes (default: `300`).
    pub sweep_interval_secs: u64,
    /// Locations reconciled at once within a sweep pass (default: `4`).
    pub sweep_concurrency: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `180`                      |
    /// | `VENDOR_API_BASE_URL`  | `https://api.screenvendor.example` |
    /// | `VENDOR_API_TOKEN`     | (required)                 |
    /// | `SWEEP_INTERVAL_SECS`  | `300`                      |
    /// | `SWEEP_CONCURRENCY`    | `4`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "180".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let vendor_base_url = std::env::var("VENDOR_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.screenvendor.example".into());

        let vendor_api_token =
            std::env::var("VENDOR_API_TOKEN").expect("VENDOR_API_TOKEN must be set");

        let sweep_interval_secs: u64 = std::env::var("SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("SWEEP_INTERVAL_SECS must be a valid u64");

        let sweep_concurrency: usize = std::env::var("SWEEP_CONCURRENCY")
            .unwrap_or_else(|_| "4".into())
            .parse()
            .expect("SWEEP_CONCURRENCY must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            vendor_base_url,
            vendor_api_token,
            sweep_interval_secs,
            sweep_concurrency,
        }
    }
}
