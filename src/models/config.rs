//! Application configuration structures.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Alienware Arena pages
    #[serde(default)]
    pub alienware: AlienwareConfig,

    /// Lenovo Legion key drop community
    #[serde(default)]
    pub lenovo: LenovoConfig,

    /// Push notification target
    #[serde(default)]
    pub ntfy: NtfyConfig,

    /// Persisted snapshot location
    #[serde(default)]
    pub state: StateConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        for (name, value) in [
            ("alienware.giveaway_url", &self.alienware.giveaway_url),
            ("alienware.vault_url", &self.alienware.vault_url),
            ("lenovo.page_url", &self.lenovo.page_url),
            ("lenovo.api_url", &self.lenovo.api_url),
            ("ntfy.server", &self.ntfy.server),
        ] {
            url::Url::parse(value)
                .map_err(|e| AppError::validation(format!("{name} is not a valid URL: {e}")))?;
        }
        if self.lenovo.space_id.trim().is_empty() {
            return Err(AppError::validation("lenovo.space_id is empty"));
        }
        if self.lenovo.post_limit == 0 {
            return Err(AppError::validation("lenovo.post_limit must be > 0"));
        }
        if self.lenovo.valid_statuses.is_empty() {
            return Err(AppError::validation("No lenovo.valid_statuses defined"));
        }
        Ok(())
    }
}

/// HTTP client settings shared by every fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Extra headers sent with every request
    #[serde(default = "defaults::headers")]
    pub headers: BTreeMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            headers: defaults::headers(),
        }
    }
}

/// Alienware Arena page locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlienwareConfig {
    #[serde(default = "defaults::giveaway_url")]
    pub giveaway_url: String,

    #[serde(default = "defaults::vault_url")]
    pub vault_url: String,
}

impl Default for AlienwareConfig {
    fn default() -> Self {
        Self {
            giveaway_url: defaults::giveaway_url(),
            vault_url: defaults::vault_url(),
        }
    }
}

/// Lenovo key drop community settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LenovoConfig {
    /// Public page carrying the embedded access token
    #[serde(default = "defaults::lenovo_page_url")]
    pub page_url: String,

    /// GraphQL endpoint
    #[serde(default = "defaults::lenovo_api_url")]
    pub api_url: String,

    /// Origin header expected by the API
    #[serde(default = "defaults::lenovo_origin")]
    pub origin: String,

    /// Community space holding the drop posts
    #[serde(default = "defaults::lenovo_space_id")]
    pub space_id: String,

    /// Number of newest posts requested per run
    #[serde(default = "defaults::post_limit")]
    pub post_limit: u32,

    /// Post field carrying the status code
    #[serde(default = "defaults::status_field_key")]
    pub status_field_key: String,

    /// Post field carrying the start timestamp
    #[serde(default = "defaults::start_field_key")]
    pub start_field_key: String,

    /// Status codes that mark a drop as active
    #[serde(default = "defaults::valid_statuses")]
    pub valid_statuses: Vec<StatusCode>,
}

impl Default for LenovoConfig {
    fn default() -> Self {
        Self {
            page_url: defaults::lenovo_page_url(),
            api_url: defaults::lenovo_api_url(),
            origin: defaults::lenovo_origin(),
            space_id: defaults::lenovo_space_id(),
            post_limit: defaults::post_limit(),
            status_field_key: defaults::status_field_key(),
            start_field_key: defaults::start_field_key(),
            valid_statuses: defaults::valid_statuses(),
        }
    }
}

/// An allow-listed drop status code with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode {
    pub code: String,
    pub label: String,
}

/// ntfy push notification target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NtfyConfig {
    #[serde(default = "defaults::ntfy_server")]
    pub server: String,

    /// Topic from the config file; the environment variable wins
    #[serde(default)]
    pub topic: Option<String>,

    /// Environment variable holding the topic
    #[serde(default = "defaults::topic_env")]
    pub topic_env: String,
}

impl NtfyConfig {
    /// Resolve the effective topic, or `None` when sending is disabled.
    pub fn resolve_topic(&self) -> Option<String> {
        let from_env = std::env::var(&self.topic_env).ok();
        Self::pick_topic(from_env, self.topic.clone())
    }

    fn pick_topic(from_env: Option<String>, from_file: Option<String>) -> Option<String> {
        let usable = |t: String| {
            let t = t.trim().to_string();
            (!is_placeholder_topic(&t)).then_some(t)
        };
        from_env.and_then(usable).or_else(|| from_file.and_then(usable))
    }
}

impl Default for NtfyConfig {
    fn default() -> Self {
        Self {
            server: defaults::ntfy_server(),
            topic: None,
            topic_env: defaults::topic_env(),
        }
    }
}

fn is_placeholder_topic(topic: &str) -> bool {
    let lower = topic.to_lowercase();
    lower.is_empty()
        || lower == "your-topic-here"
        || lower == "your_topic_here"
        || lower == "changeme"
        || (lower.starts_with('<') && lower.ends_with('>'))
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "defaults::state_path")]
    pub path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: defaults::state_path(),
        }
    }
}

mod defaults {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::StatusCode;

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn headers() -> BTreeMap<String, String> {
        [
            (
                "accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
            ("accept-language", "en-US,en;q=0.6"),
            ("sec-gpc", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    // Alienware defaults
    pub fn giveaway_url() -> String {
        "https://eu.alienwarearena.com/ucf/Giveaway".into()
    }
    pub fn vault_url() -> String {
        "https://eu.alienwarearena.com/marketplace/game-vault".into()
    }

    // Lenovo defaults
    pub fn lenovo_page_url() -> String {
        "https://gaming.lenovo.com/game-key-drops".into()
    }
    pub fn lenovo_api_url() -> String {
        "https://api.bettermode.com/".into()
    }
    pub fn lenovo_origin() -> String {
        "https://gaming.lenovo.com".into()
    }
    pub fn lenovo_space_id() -> String {
        "y4nnEocBKMA2".into()
    }
    pub fn post_limit() -> u32 {
        50
    }
    pub fn status_field_key() -> String {
        "status".into()
    }
    pub fn start_field_key() -> String {
        "start_date".into()
    }
    pub fn valid_statuses() -> Vec<StatusCode> {
        vec![
            StatusCode {
                code: "AmAI_EO502mWht5Fb6OE0".to_string(),
                label: "Active".to_string(),
            },
            StatusCode {
                code: "d18QrMHpWMZMD1C4kJRZI".to_string(),
                label: "Starting Soon".to_string(),
            },
        ]
    }

    // Notification defaults
    pub fn ntfy_server() -> String {
        "https://ntfy.sh".into()
    }
    pub fn topic_env() -> String {
        "NTFY_TOPIC".into()
    }

    // State defaults
    pub fn state_path() -> PathBuf {
        PathBuf::from("state.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_url() {
        let mut config = Config::default();
        config.alienware.vault_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_allow_list() {
        let mut config = Config::default();
        config.lenovo.valid_statuses.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [lenovo]
            post_limit = 10

            [ntfy]
            topic = "my-drops"
            "#,
        )
        .unwrap();

        assert_eq!(config.lenovo.post_limit, 10);
        assert_eq!(config.lenovo.space_id, "y4nnEocBKMA2");
        assert_eq!(config.ntfy.server, "https://ntfy.sh");
        assert_eq!(config.state.path, PathBuf::from("state.json"));
        assert_eq!(config.lenovo.valid_statuses.len(), 2);
    }

    #[test]
    fn env_topic_wins_over_file() {
        let topic = NtfyConfig::pick_topic(Some("env-topic".into()), Some("file-topic".into()));
        assert_eq!(topic.as_deref(), Some("env-topic"));
    }

    #[test]
    fn placeholder_topic_disables_sending() {
        assert_eq!(NtfyConfig::pick_topic(None, None), None);
        assert_eq!(NtfyConfig::pick_topic(Some("  ".into()), None), None);
        assert_eq!(
            NtfyConfig::pick_topic(None, Some("your-topic-here".into())),
            None
        );
        assert_eq!(NtfyConfig::pick_topic(Some("<topic>".into()), None), None);
        assert_eq!(
            NtfyConfig::pick_topic(None, Some(" drops ".into())).as_deref(),
            Some("drops")
        );
    }
}
