use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default base URL of the summarization API
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";
/// Default video (source) language code
pub const DEFAULT_SOURCE_LANG: &str = "en";

/// Language codes following ISO 639-1
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lang(pub String);

impl Lang {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable name, falling back to the raw code for unknown languages.
    pub fn display_name(&self) -> &str {
        language_name(self.as_str()).unwrap_or(self.as_str())
    }
}

fn default_source_lang() -> Lang {
    Lang::new(DEFAULT_SOURCE_LANG)
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Lang {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Lang {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Connection settings for the remote summarization API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Request timeout in seconds. `None` leaves requests unbounded.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl ApiConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            timeout_secs: None,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

/// In-memory memo of translation results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of memoised translations
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,

    /// Entry TTL in seconds (0 = no expiry)
    #[serde(default)]
    pub ttl_seconds: u64,
}

const fn default_true() -> bool {
    true
}

const fn default_max_entries() -> u64 {
    256
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_max_entries(),
            ttl_seconds: 0,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Language preselected in the video language dropdown
    #[serde(default = "default_source_lang")]
    pub default_source_lang: Lang,

    /// Translation memo settings
    #[serde(default)]
    pub translate_cache: CacheConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            default_source_lang: default_source_lang(),
            translate_cache: CacheConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config: {e}")))
    }

    /// Load from default locations (~/.config/vidsum/config.toml, ./config.toml)
    pub fn load() -> Self {
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("vidsum").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Check values that cannot be expressed through serde defaults.
    pub fn validate(&self) -> Result<()> {
        let base = self.api.api_base.trim();
        if base.is_empty() {
            return Err(Error::ConfigInvalid {
                field: "api.api_base".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(Error::ConfigInvalid {
                field: "api.api_base".to_string(),
                reason: format!("'{base}' is not an http(s) URL"),
            });
        }
        if !is_source_language(self.default_source_lang.as_str()) {
            return Err(Error::ConfigInvalid {
                field: "default_source_lang".to_string(),
                reason: format!("unsupported video language '{}'", self.default_source_lang),
            });
        }
        Ok(())
    }
}

/// A language option for UI dropdowns
#[derive(Debug, Clone)]
pub struct LanguageOption {
    /// ISO language code (e.g., "en", "te")
    pub code: &'static str,
    /// Display name (e.g., "English", "Telugu")
    pub name: &'static str,
}

/// Languages a video may be spoken in.
/// The summarization service only transcribes these.
pub fn source_languages() -> Vec<LanguageOption> {
    vec![
        LanguageOption { code: "en", name: "English" },
        LanguageOption { code: "te", name: "Telugu" },
        LanguageOption { code: "hi", name: "Hindi" },
    ]
}

/// Languages a finished summary can be translated into.
pub fn target_languages() -> Vec<LanguageOption> {
    vec![
        LanguageOption { code: "en", name: "English" },
        LanguageOption { code: "te", name: "Telugu" },
        LanguageOption { code: "es", name: "Spanish" },
        LanguageOption { code: "fr", name: "French" },
        LanguageOption { code: "de", name: "German" },
        LanguageOption { code: "it", name: "Italian" },
        LanguageOption { code: "pt", name: "Portuguese" },
        LanguageOption { code: "hi", name: "Hindi" },
        LanguageOption { code: "zh", name: "Chinese" },
    ]
}

pub fn is_source_language(code: &str) -> bool {
    source_languages().iter().any(|l| l.code == code)
}

pub fn is_target_language(code: &str) -> bool {
    target_languages().iter().any(|l| l.code == code)
}

fn language_name(code: &str) -> Option<&'static str> {
    target_languages()
        .into_iter()
        .find(|l| l.code == code)
        .map(|l| l.name)
}
