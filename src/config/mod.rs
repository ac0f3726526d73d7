use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::*;

/// Application configuration with sensible defaults.
///
/// Can be overridden via ~/.config/vitrine/config.toml
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database holding pages, products, posts and their widgets
    pub database_path: PathBuf,
    /// Address the site + admin server binds to
    pub listen_addr: String,
    /// Base URL of a remote admin API (used by `widgets --remote`)
    pub admin_url: String,
    /// Language for widget default copy (en, es)
    pub lang: String,
    /// Tracing filter used when RUST_LOG is unset
    pub log_filter: String,
    /// Instagram feed configuration
    pub instagram: InstagramConfig,
}

/// Instagram feed settings.
#[derive(Debug, Clone)]
pub struct InstagramConfig {
    /// Graph-style media endpoint. Empty disables the feed.
    pub feed_url: String,
    /// Access token (normally from VITRINE_INSTAGRAM_TOKEN).
    pub access_token: Option<String>,
    /// How many recent posts to fetch per request.
    pub limit: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl InstagramConfig {
    /// Whether the feed can be queried at all.
    pub fn is_enabled(&self) -> bool {
        !self.feed_url.is_empty()
    }
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            feed_url: String::new(),
            access_token: None,
            limit: DEFAULT_INSTAGRAM_LIMIT,
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            admin_url: DEFAULT_ADMIN_URL.to_string(),
            lang: "en".to_string(),
            log_filter: "info".to_string(),
            instagram: InstagramConfig::default(),
        }
    }
}

/// TOML-deserializable config file format.
/// All fields are optional; missing fields use defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    database_path: Option<PathBuf>,
    listen_addr: Option<String>,
    admin_url: Option<String>,
    lang: Option<String>,
    log_filter: Option<String>,
    instagram: Option<FileInstagramConfig>,
}

/// TOML-deserializable instagram config section.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileInstagramConfig {
    feed_url: Option<String>,
    limit: Option<usize>,
    timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from ~/.config/vitrine/config.toml, falling back to defaults
    /// for any missing fields. If the file doesn't exist, returns pure defaults.
    ///
    /// The Instagram token is read from the environment (after loading
    /// ~/.config/vitrine/.env), never from the TOML file.
    pub fn load() -> Self {
        let _ = dotenvy::from_path(env_file_path());
        let mut config = Self::load_from(&config_file_path());
        config.instagram.access_token = std::env::var(INSTAGRAM_TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty());
        config
    }

    /// Load and merge a specific config file over the defaults.
    pub fn load_from(path: &Path) -> Self {
        let config = Config::default();

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return config, // No config file, use defaults
        };

        match toml::from_str::<FileConfig>(&content) {
            Ok(file_config) => config.merge(file_config),
            Err(e) => {
                tracing::warn!(
                    "failed to parse {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                config
            }
        }
    }

    /// Merge file values over defaults.
    fn merge(mut self, file_config: FileConfig) -> Self {
        if let Some(v) = file_config.database_path {
            if !v.as_os_str().is_empty() {
                self.database_path = v;
            }
        }
        if let Some(v) = file_config.listen_addr {
            if !v.is_empty() {
                self.listen_addr = v;
            }
        }
        if let Some(v) = file_config.admin_url {
            if !v.is_empty() {
                self.admin_url = v.trim_end_matches('/').to_string();
            }
        }
        if let Some(v) = file_config.lang {
            if LANGUAGES.contains(&v.as_str()) {
                self.lang = v;
            }
        }
        if let Some(v) = file_config.log_filter {
            if !v.is_empty() {
                self.log_filter = v;
            }
        }

        if let Some(ig) = file_config.instagram {
            if let Some(v) = ig.feed_url {
                self.instagram.feed_url = v;
            }
            if let Some(v) = ig.limit {
                self.instagram.limit = v.clamp(1, MAX_INSTAGRAM_LIMIT);
            }
            if let Some(v) = ig.timeout_secs {
                self.instagram.timeout_secs = v.max(1);
            }
        }

        self
    }
}
