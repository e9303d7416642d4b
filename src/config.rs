use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{info, warn};

/// Value shipped in the default config; treated as "no key".
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";
/// Environment variable that overrides `geocoding.api_key`.
pub const API_KEY_ENV: &str = "GEOCODING_API_KEY";
pub const DEFAULT_GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

const CONFIG_PATH: &str = "config.toml";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Ip,
    Manual,
    Disabled,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LocationConfig {
    pub source: SourceKind,
    pub ip_address: String,   // Empty means our own public address
    pub manual_lat: f64,      // Used when source = "manual"
    pub manual_lon: f64,
    pub timeout_seconds: u64, // IP lookup only
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Ip,
            ip_address: String::new(),
            manual_lat: 35.681236,
            manual_lon: 139.767125,
            timeout_seconds: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeocodingConfig {
    pub api_key: String,
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            endpoint: DEFAULT_GEOCODE_ENDPOINT.to_string(),
            timeout_seconds: 10,
        }
    }
}

impl GeocodingConfig {
    /// The usable credential, if any. A non-empty `GEOCODING_API_KEY` wins
    /// over the file value.
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(std::env::var(API_KEY_ENV).ok(), &self.api_key)
    }
}

/// Picks the credential from the environment or the file; blank and
/// placeholder values count as missing.
pub fn resolve_api_key(from_env: Option<String>, from_file: &str) -> Option<String> {
    let usable = |key: &str| {
        let key = key.trim();
        !key.is_empty() && key != API_KEY_PLACEHOLDER
    };

    match from_env {
        Some(key) if !key.trim().is_empty() => usable(&key).then(|| key.trim().to_string()),
        _ => usable(from_file).then(|| from_file.trim().to_string()),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 150 }
    }
}

impl Config {
    /// Loads config.toml from the working directory.
    /// If it doesn't exist, creates a default one.
    pub fn load() -> Self {
        if let Ok(content) = fs::read_to_string(CONFIG_PATH) {
            match Self::parse(&content) {
                Ok(config) => return config,
                Err(e) => {
                    warn!("Failed to parse {}: {}. Using defaults.", CONFIG_PATH, e);
                    return Config::default();
                }
            }
        }

        let default_config = Config::default();

        // Save default config to disk for the user to edit later
        match toml::to_string_pretty(&default_config) {
            Ok(toml_string) => {
                if fs::write(CONFIG_PATH, toml_string).is_err() {
                    warn!("Could not write default {} to disk.", CONFIG_PATH);
                }
            }
            Err(e) => warn!("Could not serialize default config: {}", e),
        }

        info!("Loaded default configuration.");
        default_config
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
