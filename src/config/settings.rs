use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::util::paths::config_path;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Environment variable that overrides the backend URL
pub const API_URL_ENV: &str = "BRIEFLY_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend connection settings
    pub api: ApiConfig,
    /// Reconciliation settings
    pub sync: SyncConfig,
    /// Pane geometry settings
    pub layout: LayoutConfig,
    /// Chat scroll anchoring settings
    pub scroll: ScrollConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// None means requests never time out on their own
    pub request_timeout: Option<Duration>,
}

/// How a reconciliation snapshot is applied to the workspace
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcilePolicy {
    /// Snapshots older than the applied one are dropped, and optimistic
    /// messages survive until their own submission settles.
    #[default]
    Versioned,
    /// Every successful snapshot replaces all state, whichever lands last.
    LastWriteWins,
}

#[derive(Debug, Clone, Copy)]
pub struct SyncConfig {
    pub poll_interval: Duration,
    pub reconcile_policy: ReconcilePolicy,
}

/// Geometry in pixels. The terminal front end converts cells with
/// `cell_width_px`/`cell_height_px`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Viewport width at which panes sit side by side and become resizable
    pub wide_breakpoint_px: u32,
    pub container_left_inset_px: u32,
    pub container_right_inset_px: u32,
    pub cell_width_px: u32,
    pub cell_height_px: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollConfig {
    pub near_bottom_threshold_px: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                request_timeout: None,
            },
            sync: SyncConfig {
                poll_interval: Duration::from_millis(5000),
                reconcile_policy: ReconcilePolicy::Versioned,
            },
            layout: LayoutConfig::default(),
            scroll: ScrollConfig::default(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            wide_breakpoint_px: 1024,
            container_left_inset_px: 16,
            container_right_inset_px: 16,
            cell_width_px: 8,
            cell_height_px: 16,
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            near_bottom_threshold_px: 100,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlApiConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlSyncConfig {
    pub poll_interval_ms: Option<u64>,
    pub reconcile_policy: Option<ReconcilePolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlLayoutConfig {
    pub wide_breakpoint_px: Option<u32>,
    pub container_left_inset_px: Option<u32>,
    pub container_right_inset_px: Option<u32>,
    pub cell_width_px: Option<u32>,
    pub cell_height_px: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlScrollConfig {
    pub near_bottom_threshold_px: Option<u32>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub api: Option<TomlApiConfig>,
    pub sync: Option<TomlSyncConfig>,
    pub layout: Option<TomlLayoutConfig>,
    pub scroll: Option<TomlScrollConfig>,
}

impl Config {
    /// Load configuration from the default file, merging with defaults,
    /// then apply the environment override.
    pub fn load() -> Self {
        let config_file = config_path();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        let mut config = Self::load_from(&config_file);
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api.base_url = url;
            }
        }
        config
    }

    /// Load configuration from a specific file. Missing or invalid files
    /// leave the defaults in place.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Config::default();

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read config file");
                }
                return config;
            }
        };

        match toml::from_str::<TomlConfig>(&contents) {
            Ok(toml_config) => config.merge(toml_config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
            }
        }

        config
    }

    fn merge(&mut self, toml_config: TomlConfig) {
        if let Some(api) = toml_config.api {
            if let Some(base_url) = api.base_url {
                self.api.base_url = base_url;
            }
            if let Some(secs) = api.request_timeout_secs {
                self.api.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
            }
        }

        if let Some(sync) = toml_config.sync {
            if let Some(ms) = sync.poll_interval_ms {
                // A zero period would spin the poller
                self.sync.poll_interval = Duration::from_millis(ms.max(250));
            }
            if let Some(policy) = sync.reconcile_policy {
                self.sync.reconcile_policy = policy;
            }
        }

        if let Some(layout) = toml_config.layout {
            if let Some(v) = layout.wide_breakpoint_px {
                self.layout.wide_breakpoint_px = v;
            }
            if let Some(v) = layout.container_left_inset_px {
                self.layout.container_left_inset_px = v;
            }
            if let Some(v) = layout.container_right_inset_px {
                self.layout.container_right_inset_px = v;
            }
            if let Some(v) = layout.cell_width_px {
                self.layout.cell_width_px = v.max(1);
            }
            if let Some(v) = layout.cell_height_px {
                self.layout.cell_height_px = v.max(1);
            }
        }

        if let Some(scroll) = toml_config.scroll {
            if let Some(v) = scroll.near_bottom_threshold_px {
                self.scroll.near_bottom_threshold_px = v;
            }
        }
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &PathBuf) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.sync.poll_interval = interval;
        self
    }

    pub fn with_reconcile_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.sync.reconcile_policy = policy;
        self
    }
}
