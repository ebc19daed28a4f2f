// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Flowdash";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".flowdash";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "flowdash.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "FLOWDASH_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "FLOWDASH_HOST";

/// Environment variable for server port (platform convention, unprefixed)
pub const ENV_PORT: &str = "PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "FLOWDASH_LOG";

/// Tracing target prefix of this crate's events
pub const LOG_TARGET: &str = env!("CARGO_CRATE_NAME");

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: u16 = 3000;

/// Maximum request body size in bytes (requests are GET-only)
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Liveness text served at `/`
pub const ROOT_MESSAGE: &str = "Servidor do Dashboard está rodando!";

// =============================================================================
// Upstream (InBot admin API)
// =============================================================================

/// Environment variable for the upstream endpoint
pub const ENV_UPSTREAM_URL: &str = "FLOWDASH_UPSTREAM_URL";

/// Environment variable for the upstream access token
pub const ENV_UPSTREAM_TOKEN: &str = "FLOWDASH_UPSTREAM_TOKEN";

/// Default upstream endpoint
pub const DEFAULT_UPSTREAM_URL: &str = "https://in.bot/inbot-admin";

/// Default upstream request timeout in seconds
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Header carrying the upstream access token
pub const UPSTREAM_TOKEN_HEADER: &str = "X-InAuth-Token";

/// `action` field of the upstream request body
pub const UPSTREAM_ACTION: &str = "user_variables";

// =============================================================================
// Fallback Data
// =============================================================================

/// Environment variable for the fallback data file
pub const ENV_FALLBACK_PATH: &str = "FLOWDASH_FALLBACK_PATH";

/// Default fallback data file, relative to the working directory
pub const DEFAULT_FALLBACK_PATH: &str = "data/kpiData.json";

// =============================================================================
// Shutdown
// =============================================================================

/// Seconds to wait for in-flight requests after a shutdown signal
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
