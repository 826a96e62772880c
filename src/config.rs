use std::net::SocketAddr;
use chrono::format::{Item, StrftimeItems};
use serde_derive::{Serialize, Deserialize};
use thiserror::Error;

use crate::constants;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address `{0}`")]
    InvalidAddr(String),
    #[error("Invalid zoom level `{0}`")]
    InvalidZoom(String),
    #[error("Unknown base map `{0}`")]
    UnknownBaseMap(String),
    #[error("Invalid date format `{0}`")]
    InvalidDateFormat(String),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Tiles {
    pub url: String,
    pub attribution: String
}

/// What the map widget is initialised with.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MapSettings {
    pub center: [f64; 2],
    pub zoom: u8,
    pub default_base_map: String,
    pub tiles: Tiles,
    /// chrono format used for the "Last Update" label
    #[serde(skip)]
    pub date_format: String
}

impl MapSettings {
    pub fn with_base_map(name: &str) -> Result<MapSettings, ConfigError> {
        let base_map = constants::BASE_MAPS
            .get(name)
            .ok_or_else(|| ConfigError::UnknownBaseMap(name.to_string()))?;

        Ok(MapSettings {
            center: constants::CENTER,
            zoom: constants::DEFAULT_ZOOM,
            default_base_map: name.to_string(),
            tiles: Tiles {
                url: base_map.url.to_string(),
                attribution: base_map.attribution.to_string(),
            },
            date_format: constants::DEFAULT_DATE_FORMAT.to_string(),
        })
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        MapSettings {
            center: constants::CENTER,
            zoom: constants::DEFAULT_ZOOM,
            default_base_map: constants::DEFAULT_BASE_MAP.to_string(),
            tiles: Tiles {
                url: constants::BASE_MAPS[constants::DEFAULT_BASE_MAP].url.to_string(),
                attribution: constants::BASE_MAPS[constants::DEFAULT_BASE_MAP].attribution.to_string(),
            },
            date_format: constants::DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub countries_url: String,
    pub map: MapSettings
}

impl AppConfig {
    pub fn from_env() -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>
    {
        let addr_string = lookup("COVID_MAP_ADDR").unwrap_or_else(|| constants::DEFAULT_ADDR.to_string());
        let addr = addr_string
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(addr_string.clone()))?;

        let countries_url = lookup("COVID_MAP_COUNTRIES_URL")
            .unwrap_or_else(|| constants::COUNTRIES_URL.to_string());

        let base_map = lookup("COVID_MAP_BASE_MAP")
            .unwrap_or_else(|| constants::DEFAULT_BASE_MAP.to_string());
        let mut map = MapSettings::with_base_map(&base_map)?;

        if let Some(zoom) = lookup("COVID_MAP_ZOOM") {
            map.zoom = zoom.parse().map_err(|_| ConfigError::InvalidZoom(zoom.clone()))?;
        }
        if let Some(date_format) = lookup("COVID_MAP_DATE_FORMAT") {
            // chrono panics while rendering a bad format, so reject it up front
            if StrftimeItems::new(&date_format).any(|item| matches!(item, Item::Error)) {
                return Err(ConfigError::InvalidDateFormat(date_format));
            }
            map.date_format = date_format;
        }

        Ok(AppConfig { addr, countries_url, map })
    }
}
