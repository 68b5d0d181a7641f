use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::location::AngleUnit;
use crate::locator::LocatorSettings;

pub const CONFIG_PATH_ENV: &str = "NEAREST_FLIGHT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub feed: FeedConfig,
    pub data: DataConfig,
    pub observer: ObserverConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub session_url: String, // Page that hands out the session cookie
    pub feed_url: String,
    pub latitude_delta: f64, // Half-height of the query box, degrees
    pub timeout_seconds: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataConfig {
    pub airlines: PathBuf,
    pub aircraft_types: PathBuf,
    pub airports: PathBuf,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ObserverConfig {
    pub angle_unit: AngleUnit,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 2107,
            },
            feed: FeedConfig {
                session_url: "https://www.flightradar24.com".to_string(),
                feed_url: "https://data-live.flightradar24.com/zones/fcgi/feed.js".to_string(),
                latitude_delta: 0.2,
                timeout_seconds: 10,
            },
            data: DataConfig {
                airlines: PathBuf::from("data/airlines.csv"),
                aircraft_types: PathBuf::from("data/planes.csv"),
                airports: PathBuf::from("data/airports.csv"),
            },
            observer: ObserverConfig {
                angle_unit: AngleUnit::Degrees,
            },
        }
    }
}

impl Config {
    /// Loads the config from `$NEAREST_FLIGHT_CONFIG`, or `config.toml` in
    /// the working directory.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(&path)
    }

    /// Loads the config at `path`.
    /// If it doesn't exist, writes a default one there for the user to edit.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match toml::from_str(&content) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    return Config::default();
                }
            }
        }

        let default_config = Config::default();
        match toml::to_string_pretty(&default_config) {
            Ok(toml_string) => {
                if fs::write(path, toml_string).is_err() {
                    warn!("Could not write default {} to disk.", path.display());
                }
            }
            Err(e) => warn!("Could not serialize default config: {}", e),
        }

        info!("Loaded default configuration.");
        default_config
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn locator_settings(&self) -> LocatorSettings {
        LocatorSettings {
            latitude_delta: self.feed.latitude_delta,
            angle_unit: self.observer.angle_unit,
        }
    }
}
