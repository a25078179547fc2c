//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--server`, `--local`, `--theme`, etc.)
//! 2. `$CIDE_CONFIG` environment variable (path to config file)
//! 3. Project-local `.cide.toml` in the current working directory
//! 4. Global `~/.config/cide/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Confirm before delete operations.
    pub confirm_delete: Option<bool>,
    /// Enable mouse support.
    pub mouse: Option<bool>,
    /// Sidebar width as a percentage of the terminal.
    pub sidebar_width: Option<u16>,
}

/// Remote file server settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the IDE server.
    pub server_url: Option<String>,
    /// Bearer token for the session.
    pub token: Option<String>,
    /// Project name shown as the tree root.
    pub project: Option<String>,
}

/// Local directory mode settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LocalConfig {
    /// Serve this directory instead of a remote server.
    pub root: Option<String>,
    /// Refresh the tree on filesystem changes.
    pub watch: Option<bool>,
    /// Debounce interval in milliseconds.
    pub debounce_ms: Option<u64>,
}

/// Tree panel settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// Use nerd font icons (false = ASCII fallback).
    pub use_icons: Option<bool>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub tree_bg: Option<String>,
    pub tree_fg: Option<String>,
    pub tree_selected_bg: Option<String>,
    pub tree_selected_fg: Option<String>,
    pub tree_active_fg: Option<String>,
    pub tree_dir_fg: Option<String>,
    pub tree_file_fg: Option<String>,
    pub editor_bg: Option<String>,
    pub editor_fg: Option<String>,
    pub editor_line_nr_fg: Option<String>,
    pub header_bg: Option<String>,
    pub header_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
    pub dialog_bg: Option<String>,
    pub dialog_border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: Option<String>,
    /// Directory for the log file.
    pub dir: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub remote: RemoteConfig,
    pub local: LocalConfig,
    pub tree: TreeConfig,
    pub theme: ThemeConfig,
    pub log: LogConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default IDE server address.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
/// Default sidebar width (percent).
pub const DEFAULT_SIDEBAR_WIDTH: u16 = 30;
/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Environment variable holding the session token.
pub const TOKEN_ENV: &str = "CIDE_TOKEN";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path, which is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("CIDE_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".cide.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("cide").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return None,
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            // logging is not up yet
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                confirm_delete: other.general.confirm_delete.or(self.general.confirm_delete),
                mouse: other.general.mouse.or(self.general.mouse),
                sidebar_width: other.general.sidebar_width.or(self.general.sidebar_width),
            },
            remote: RemoteConfig {
                server_url: other
                    .remote
                    .server_url
                    .clone()
                    .or(self.remote.server_url),
                token: other.remote.token.clone().or(self.remote.token),
                project: other.remote.project.clone().or(self.remote.project),
            },
            local: LocalConfig {
                root: other.local.root.clone().or(self.local.root),
                watch: other.local.watch.or(self.local.watch),
                debounce_ms: other.local.debounce_ms.or(self.local.debounce_ms),
            },
            tree: TreeConfig {
                use_icons: other.tree.use_icons.or(self.tree.use_icons),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: match (&self.theme.custom, &other.theme.custom) {
                    (_, Some(o)) => Some(o.clone()),
                    (Some(s), None) => Some(s.clone()),
                    (None, None) => None,
                },
            },
            log: LogConfig {
                level: other.log.level.clone().or(self.log.level),
                dir: other.log.dir.clone().or(self.log.dir),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        if config.remote.token.is_none() {
            config.remote.token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Whether to confirm before delete.
    pub fn confirm_delete(&self) -> bool {
        self.general.confirm_delete.unwrap_or(true)
    }

    /// Whether mouse support is enabled.
    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(true)
    }

    /// Sidebar width in percent, clamped to a usable range.
    pub fn sidebar_width(&self) -> u16 {
        self.general
            .sidebar_width
            .unwrap_or(DEFAULT_SIDEBAR_WIDTH)
            .clamp(15, 70)
    }

    pub fn server_url(&self) -> &str {
        self.remote
            .server_url
            .as_deref()
            .unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn token(&self) -> Option<&str> {
        self.remote.token.as_deref()
    }

    /// Local directory to serve, if local mode was requested.
    pub fn local_root(&self) -> Option<&str> {
        self.local.root.as_deref()
    }

    /// Whether the local watcher is enabled.
    pub fn watch_enabled(&self) -> bool {
        self.local.watch.unwrap_or(true)
    }

    /// Watcher debounce interval in milliseconds.
    pub fn debounce_ms(&self) -> u64 {
        self.local.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)
    }

    /// Whether to use nerd font icons.
    pub fn use_icons(&self) -> bool {
        self.tree.use_icons.unwrap_or(true)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Directory the log file goes to: `log.dir`, else `<data dir>/cide/logs`.
    pub fn log_dir(&self) -> PathBuf {
        match &self.log.dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("cide")
                .join("logs"),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
