//! Application-wide constants.
//!
//! Centralizes defaults, limits, and paths so the config layer, the
//! renderer and the server agree on the same numbers.

use std::path::PathBuf;

// ── Server ────────────────────────────────────────────────────────
/// Default listen address for the site + admin HTTP server.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
/// Default remote admin API base URL used by `vitrine widgets --remote`.
pub const DEFAULT_ADMIN_URL: &str = "http://127.0.0.1:8080";
/// Rendered page output buffer initial capacity.
pub const PAGE_BUFFER_CAPACITY: usize = 16 * 1024;
/// Largest admin request body accepted (bytes).
pub const MAX_ADMIN_BODY_BYTES: usize = 2 * 1024 * 1024;
/// Slug of the page served at `/`.
pub const HOME_PAGE_SLUG: &str = "home";

// ── Instagram Feed ────────────────────────────────────────────────
/// Default number of recent posts fetched for the instagram widget.
pub const DEFAULT_INSTAGRAM_LIMIT: usize = 12;
/// Upper bound for the configured fetch limit.
pub const MAX_INSTAGRAM_LIMIT: usize = 50;
/// Default request timeout for the feed (seconds).
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;
/// Environment variable holding the feed access token.
pub const INSTAGRAM_TOKEN_ENV: &str = "VITRINE_INSTAGRAM_TOKEN";

// ── Content Queries ───────────────────────────────────────────────
/// Most recent published blog posts made available to widgets.
pub const RECENT_POSTS_LIMIT: usize = 12;
/// Most recent approved reviews per product made available to widgets.
pub const RECENT_REVIEWS_LIMIT: usize = 50;

// ── Widget Defaults ───────────────────────────────────────────────
/// Hero carousel autoplay interval (ms).
pub const DEFAULT_CAROUSEL_INTERVAL_MS: u64 = 5000;
/// Minimum carousel interval (ms) accepted from config.
pub const MIN_CAROUSEL_INTERVAL_MS: u64 = 1000;
/// Product grid column count.
pub const DEFAULT_GRID_COLUMNS: u8 = 4;
/// Product grid column bounds.
pub const MAX_GRID_COLUMNS: u8 = 6;
/// Product grid item limit.
pub const DEFAULT_GRID_LIMIT: usize = 8;
/// Testimonials item limit.
pub const DEFAULT_TESTIMONIAL_LIMIT: usize = 6;
/// Reviews item limit.
pub const DEFAULT_REVIEW_LIMIT: usize = 5;
/// Instagram tile limit.
pub const DEFAULT_INSTAGRAM_TILES: usize = 6;
/// Instagram grid columns.
pub const DEFAULT_INSTAGRAM_COLUMNS: u8 = 3;
/// Blog post teaser limit.
pub const DEFAULT_BLOG_LIMIT: usize = 3;
/// Spacer height (px).
pub const DEFAULT_SPACER_PX: u32 = 48;
/// Spacer height upper bound (px).
pub const MAX_SPACER_PX: u32 = 400;
/// Highest star rating.
pub const MAX_RATING: u8 = 5;

// ── Site Defaults ─────────────────────────────────────────────────
/// Site name used until settings are stored.
pub const DEFAULT_SITE_NAME: &str = "Vitrine";
/// Currency code used when settings carry none.
pub const DEFAULT_CURRENCY: &str = "USD";

// ── Supported Languages ───────────────────────────────────────────
/// Available languages for widget default copy.
pub const LANGUAGES: &[&str] = &["en", "es"];

// ── Paths ─────────────────────────────────────────────────────────

/// Returns the user's home directory, falling back to /tmp.
pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

/// Returns `~/.config/vitrine/`.
pub fn config_dir() -> PathBuf {
    home_dir().join(".config").join("vitrine")
}

/// Returns `~/.config/vitrine/config.toml`.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns `~/.config/vitrine/.env` (feed token, never committed).
pub fn env_file_path() -> PathBuf {
    config_dir().join(".env")
}

/// Returns `~/.local/share/vitrine/`.
pub fn data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("vitrine")
}

/// Default database path: `~/.local/share/vitrine/vitrine.db`.
pub fn default_database_path() -> PathBuf {
    data_dir().join("vitrine.db")
}
