use std::path::Path;

use common::Viewer;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// REST collaborator settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL the `/attempts/...` paths are joined to. Default: "http://localhost:8000/api".
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token sent with every request.
    #[serde(default)]
    pub token: Option<String>,
    /// Per-request timeout. Default: 10.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".into()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewerConfig {
    /// Absent for anonymous sessions.
    #[serde(default)]
    pub username: Option<String>,
    /// Locale announced with `lang-change`. Default: "en".
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    "en".into()
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            username: None,
            locale: default_locale(),
        }
    }
}

impl ViewerConfig {
    pub fn viewer(&self) -> Viewer {
        Viewer {
            username: self.username.clone(),
            locale: self.locale.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EffectsConfig {
    /// Whether verdict sounds play at all. Default: true.
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    /// Only play sounds for the viewer's own attempts. Default: false.
    #[serde(default)]
    pub owner_only_sound: bool,
}

fn default_sound_enabled() -> bool {
    true
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            sound_enabled: default_sound_enabled(),
            owner_only_sound: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SyncAppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
}

impl SyncAppConfig {
    /// Load from `$VERDICT_SYNC_CONFIG` (default "config/config"), then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("VERDICT_SYNC_CONFIG").unwrap_or_else(|_| "config/config".to_string());
        Self::load_from(&config_path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_string_lossy();

        let s = Config::builder()
            .set_default("api.base_url", default_base_url())?
            .set_default("api.timeout_secs", 10_i64)?
            .set_default("viewer.locale", default_locale())?
            .set_default("effects.sound_enabled", true)?
            .set_default("effects.owner_only_sound", false)?
            .add_source(File::with_name(&path).required(false))
            // e.g., VERDICT_SYNC__VIEWER__USERNAME=alice
            .add_source(Environment::with_prefix("VERDICT_SYNC").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
