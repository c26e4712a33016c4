use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{BlogError, Result};
use crate::media::DEFAULT_BASE_URL;

pub const DEFAULT_PAGE_SIZE: u32 = 4;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiConfig {
    /// GraphQL endpoint of the content API
    pub endpoint: Option<String>,
    /// Public site root, used when copying a post link
    pub site_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_base")]
    pub base_url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            base_url: default_media_base(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostConfig {
    /// Pass raw HTML embedded in post bodies through unescaped
    #[serde(default = "default_true")]
    pub allow_raw_html: bool,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            allow_raw_html: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub post: PostConfig,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_media_base() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("blogterm").join("config.toml"))
}

impl Config {
    /// Load the user config file, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Config::default()
            }
        }
    }

    /// Load an explicitly requested config file. Errors are not swallowed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| BlogError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Endpoint the UI will talk to, once the config is complete.
    pub fn validate(&self) -> Result<&str> {
        if self.feed.page_size == 0 {
            return Err(BlogError::Config("page_size must be at least 1".to_string()));
        }

        self.api
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| {
                BlogError::Config(
                    "no GraphQL endpoint set (use --endpoint or [api] endpoint)".to_string(),
                )
            })
    }
}
