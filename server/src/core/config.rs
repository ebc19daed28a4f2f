use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::dashboard::DEFAULT_COMPLAINTS_TOP_N;
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_FALLBACK_PATH, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_UPSTREAM_TIMEOUT_SECS, DEFAULT_UPSTREAM_URL,
};

// =============================================================================
// File Config Structs (all optional, parsed from JSON)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Upstream (InBot admin API) section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpstreamFileConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fallback data section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FallbackFileConfig {
    pub path: Option<String>,
}

/// Reference table overrides (nested under dashboard)
///
/// Friendly names merge over the built-in labels; the lists replace the
/// built-in lists entirely.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct TablesConfig {
    pub friendly_names: Option<BTreeMap<String, String>>,
    pub step_order: Option<Vec<String>>,
    pub known_categories: Option<Vec<String>>,
    pub noise: Option<Vec<String>>,
}

/// Dashboard section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DashboardFileConfig {
    pub complaints_top_n: Option<usize>,
    pub show_unavailable: Option<bool>,
    pub tables: Option<TablesConfig>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub upstream: Option<UpstreamFileConfig>,
    pub fallback: Option<FallbackFileConfig>,
    pub dashboard: Option<DashboardFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                current.host = server.host;
            }
            if server.port.is_some() {
                current.port = server.port;
            }
        }

        if let Some(upstream) = other.upstream {
            let current = self
                .upstream
                .get_or_insert_with(UpstreamFileConfig::default);
            if upstream.url.is_some() {
                tracing::trace!(url = ?upstream.url, "Merging upstream.url");
                current.url = upstream.url;
            }
            if upstream.token.is_some() {
                current.token = upstream.token;
            }
            if upstream.timeout_secs.is_some() {
                current.timeout_secs = upstream.timeout_secs;
            }
        }

        if let Some(fallback) = other.fallback
            && fallback.path.is_some()
        {
            self.fallback
                .get_or_insert_with(FallbackFileConfig::default)
                .path = fallback.path;
        }

        if let Some(dashboard) = other.dashboard {
            let current = self
                .dashboard
                .get_or_insert_with(DashboardFileConfig::default);
            if dashboard.complaints_top_n.is_some() {
                current.complaints_top_n = dashboard.complaints_top_n;
            }
            if dashboard.show_unavailable.is_some() {
                current.show_unavailable = dashboard.show_unavailable;
            }
            if let Some(tables) = dashboard.tables {
                let current_tables = current.tables.get_or_insert_with(TablesConfig::default);
                if tables.friendly_names.is_some() {
                    current_tables.friendly_names = tables.friendly_names;
                }
                if tables.step_order.is_some() {
                    current_tables.step_order = tables.step_order;
                }
                if tables.known_categories.is_some() {
                    current_tables.known_categories = tables.known_categories;
                }
                if tables.noise.is_some() {
                    current_tables.noise = tables.noise;
                }
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Upstream client configuration
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub url: String,
    /// Sent as `X-InAuth-Token`; requests go out without it when unset
    pub token: Option<String>,
    pub timeout_secs: u64,
}

/// Fallback data configuration
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    pub path: PathBuf,
}

/// Dashboard assembly configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub complaints_top_n: usize,
    pub show_unavailable: bool,
    pub tables: Option<TablesConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            complaints_top_n: DEFAULT_COMPLAINTS_TOP_N,
            show_unavailable: false,
            tables: None,
        }
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub fallback: FallbackConfig,
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.flowdash/flowdash.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::resolve(file_config, cli)
    }

    /// Layer defaults -> file config -> CLI/env overrides, then validate
    fn resolve(file_config: FileConfig, cli: &CliConfig) -> Result<Self> {
        let file_server = file_config.server.unwrap_or_default();
        let file_upstream = file_config.upstream.unwrap_or_default();
        let file_fallback = file_config.fallback.unwrap_or_default();
        let file_dashboard = file_config.dashboard.unwrap_or_default();

        let server = ServerConfig {
            host: cli
                .host
                .clone()
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT),
        };

        let upstream = UpstreamConfig {
            url: cli
                .upstream_url
                .clone()
                .or(file_upstream.url)
                .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            token: cli
                .upstream_token
                .clone()
                .or(file_upstream.token)
                .filter(|t| !t.is_empty()),
            timeout_secs: file_upstream
                .timeout_secs
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        let fallback_path = cli
            .fallback_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .or(file_fallback.path)
            .unwrap_or_else(|| DEFAULT_FALLBACK_PATH.to_string());
        let fallback = FallbackConfig {
            path: expand_path(&fallback_path),
        };

        // --show-unavailable can only switch the section on
        let dashboard = DashboardConfig {
            complaints_top_n: file_dashboard
                .complaints_top_n
                .unwrap_or(DEFAULT_COMPLAINTS_TOP_N),
            show_unavailable: cli.show_unavailable
                || file_dashboard.show_unavailable.unwrap_or(false),
            tables: file_dashboard.tables,
        };

        let config = Self {
            server,
            upstream,
            fallback,
            dashboard,
        };

        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            upstream = %config.upstream.url,
            token_set = config.upstream.token.is_some(),
            fallback = %config.fallback.path.display(),
            "Configuration loaded"
        );

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if !(self.upstream.url.starts_with("http://") || self.upstream.url.starts_with("https://"))
        {
            anyhow::bail!(
                "Configuration error: upstream.url must be an http(s) URL, got '{}'",
                self.upstream.url
            );
        }

        if self.upstream.timeout_secs == 0 {
            anyhow::bail!("Configuration error: upstream.timeout_secs must be greater than 0");
        }

        if self.dashboard.complaints_top_n == 0 {
            anyhow::bail!("Configuration error: dashboard.complaints_top_n must be greater than 0");
        }

        if let Some(order) = self
            .dashboard
            .tables
            .as_ref()
            .and_then(|t| t.step_order.as_ref())
            && order.is_empty()
        {
            anyhow::bail!("Configuration error: dashboard.tables.step_order must not be empty");
        }

        Ok(())
    }
}

/// Get the profile config path (~/.flowdash/flowdash.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub(crate) fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}
