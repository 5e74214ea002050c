//! Site configuration module.
//!
//! Handles loading, validating, and layering `config.toml`. The file lives at
//! the project root, next to the `Content/` and `Resources/` directories, and
//! is merged over the stock defaults so it only needs the keys it overrides.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! url = "https://www.oliverbinns.co.uk"
//! name = "Oliver Binns"
//! description = "Lead Mobile Developer"
//! language = "en"
//! # image_path = "/images/oliver-binns.svg"   # default social image
//!
//! [paths]
//! content = "Content"
//! resources = "Resources"
//! output = "Output"
//!
//! [theme]
//! tag_pages = true
//! theme_color = "#F9C300"
//! stylesheet = "Theme/styles.css"   # relative to resources
//! foot_scripts = true
//! analytics_id = "G-Y17266J9BZ"
//!
//! [feed]
//! path = "feed.rss"
//! sections = ["posts"]
//! max_items = 100
//! ttl = 250
//!
//! [api]
//! posts_json = "api/posts.json"
//! posts_dir = "api/posts"
//! image_prefix_from = "../../Images/"
//! image_prefix_to = "/Images/"
//!
//! [highlight]
//! class_prefix = ""
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::SectionId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// Read-only for the whole build: the pipeline receives it once at startup
/// and every step borrows it from the build context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute base URL of the published site, without trailing slash.
    pub url: String,
    /// Display name used in titles, the feed channel and social metadata.
    pub name: String,
    /// One-line site description.
    pub description: String,
    /// BCP 47 language tag written to `<html lang>` and the feed.
    pub language: String,
    /// Default social image used when an entity has none of its own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub paths: PathsConfig,
    pub theme: ThemeConfig,
    pub feed: FeedConfig,
    pub api: ApiConfig,
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "https://www.oliverbinns.co.uk".to_string(),
            name: "Oliver Binns".to_string(),
            description: "Lead Mobile Developer".to_string(),
            language: "en".to_string(),
            image_path: None,
            paths: PathsConfig::default(),
            theme: ThemeConfig::default(),
            feed: FeedConfig::default(),
            api: ApiConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "url must start with http:// or https://".into(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::Validation("name must not be empty".into()));
        }
        if self.language.trim().is_empty() {
            return Err(ConfigError::Validation("language must not be empty".into()));
        }
        if self.feed.max_items == 0 {
            return Err(ConfigError::Validation(
                "feed.max_items must be greater than 0".into(),
            ));
        }
        if self.api.image_prefix_from.is_empty() {
            return Err(ConfigError::Validation(
                "api.image_prefix_from must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Absolute URL for a site-relative path.
    ///
    /// ```text
    /// url("posts/tube-status-widget") → https://www.oliverbinns.co.uk/posts/tube-status-widget
    /// ```
    pub fn absolute_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Project directory layout, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Markdown content tree.
    pub content: String,
    /// Static resources (theme stylesheet, images).
    pub resources: String,
    /// Build output directory. Emptied at the start of every build.
    pub output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: "Content".to_string(),
            resources: "Resources".to_string(),
            output: "Output".to_string(),
        }
    }
}

/// Theme settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Emit `tags/index.html` and `tags/<tag>/index.html`.
    pub tag_pages: bool,
    /// Browser chrome color (`<meta name="theme-color">`).
    pub theme_color: String,
    /// Stylesheet copied to the output root, relative to the resources dir.
    pub stylesheet: String,
    /// Append analytics and the image-compare widget to item pages.
    pub foot_scripts: bool,
    /// Google Analytics measurement id for the foot scripts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics_id: Option<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            tag_pages: true,
            theme_color: "#F9C300".to_string(),
            stylesheet: "Theme/styles.css".to_string(),
            foot_scripts: true,
            analytics_id: Some("G-Y17266J9BZ".to_string()),
        }
    }
}

/// RSS feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Output path of the feed, relative to the output root.
    pub path: String,
    /// Sections whose items are included.
    pub sections: Vec<SectionId>,
    /// Newest items kept in the feed.
    pub max_items: usize,
    /// Channel time-to-live in minutes.
    pub ttl: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: "feed.rss".to_string(),
            sections: vec![SectionId::Posts],
            max_items: 100,
            ttl: 250,
        }
    }
}

/// JSON API export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Output path of the posts list.
    pub posts_json: String,
    /// Output directory mirroring the raw post sources.
    pub posts_dir: String,
    /// Image prefix rewritten in mirrored markdown.
    pub image_prefix_from: String,
    /// Replacement for [`image_prefix_from`](Self::image_prefix_from).
    pub image_prefix_to: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            posts_json: "api/posts.json".to_string(),
            posts_dir: "api/posts".to_string(),
            image_prefix_from: "../../Images/".to_string(),
            image_prefix_to: "/Images/".to_string(),
        }
    }
}

/// Syntax highlighting settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HighlightConfig {
    /// Prefix prepended to every token class (`keyword` → `{prefix}keyword`).
    pub class_prefix: String,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given `config.toml` path.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_config(config_path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(config_path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# oliverbinns site configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Absolute base URL of the published site.
url = "https://www.oliverbinns.co.uk"

# Site name, used in page titles and the RSS channel.
name = "Oliver Binns"

# One-line site description.
description = "Lead Mobile Developer"

# Language tag for <html lang> and the RSS channel.
language = "en"

# Default social image for pages without their own.
# image_path = "/images/oliver-binns.svg"

# ---------------------------------------------------------------------------
# Directory layout (relative to the project root)
# ---------------------------------------------------------------------------
[paths]
content = "Content"
resources = "Resources"
# Emptied at the start of every build.
output = "Output"

# ---------------------------------------------------------------------------
# Theme
# ---------------------------------------------------------------------------
[theme]
# Generate tags/index.html and tags/<tag>/index.html.
tag_pages = true

# Browser chrome color.
theme_color = "#F9C300"

# Stylesheet copied to the output root (relative to the resources directory).
stylesheet = "Theme/styles.css"

# Append analytics and the image-compare widget to item pages.
foot_scripts = true
analytics_id = "G-Y17266J9BZ"

# ---------------------------------------------------------------------------
# RSS feed
# ---------------------------------------------------------------------------
[feed]
path = "feed.rss"
sections = ["posts"]
max_items = 100
# Channel time-to-live, in minutes.
ttl = 250

# ---------------------------------------------------------------------------
# JSON API
# ---------------------------------------------------------------------------
[api]
posts_json = "api/posts.json"
posts_dir = "api/posts"
# Relative image references in mirrored markdown are rewritten so the raw
# posts resolve images outside the content tree.
image_prefix_from = "../../Images/"
image_prefix_to = "/Images/"

# ---------------------------------------------------------------------------
# Syntax highlighting
# ---------------------------------------------------------------------------
[highlight]
# Prefix for token classes, e.g. "s-" gives <span class="s-keyword">.
class_prefix = ""
"##
}
