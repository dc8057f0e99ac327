use crate::error::{Error, Result};
use crate::node::{ConnectionStatus, LatLng};
use crate::table::{FilterField, SortField, SortOrder};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Displacement, in degrees, of breakout members from their group center.
pub const DEFAULT_BREAKOUT_RADIUS: f64 = 0.5;
/// Lowest zoom level at which an expanded group breaks out.
pub const DEFAULT_BREAKOUT_MIN_ZOOM: f64 = 6.0;
pub const DEFAULT_CORE_API_PORT: u16 = 20443;

const EXCLUDED_COUNTRIES: [&str; 2] = ["Unknown", "Private IP"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub center: LatLng,
    pub zoom: f64,
    pub breakout_radius: f64,
    pub breakout_min_zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(20.0, 12.0),
            zoom: 2.0,
            breakout_radius: DEFAULT_BREAKOUT_RADIUS,
            breakout_min_zoom: DEFAULT_BREAKOUT_MIN_ZOOM,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableConfig {
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub filter_field: FilterField,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Countries the geolocation service reports for addresses it could not place.
    pub excluded_countries: Vec<String>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            excluded_countries: EXCLUDED_COUNTRIES
                .iter()
                .map(|value| value.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    pub core_api_port: u16,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            core_api_port: DEFAULT_CORE_API_PORT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub map: MapConfig,
    pub table: TableConfig,
    pub summary: SummaryConfig,
    pub links: LinkConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct MapConfigFile {
    center: Option<[f64; 2]>,
    zoom: Option<f64>,
    breakout_radius: Option<f64>,
    breakout_min_zoom: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TableConfigFile {
    sort_field: Option<SortField>,
    sort_order: Option<SortOrder>,
    filter_field: Option<FilterField>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SummaryConfigFile {
    excluded_countries: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LinkConfigFile {
    core_api_port: Option<u16>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct StatusColors {
    api: Option<String>,
    p2p_only: Option<String>,
    offline: Option<String>,
    unknown: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    map: Option<MapConfigFile>,
    table: Option<TableConfigFile>,
    summary: Option<SummaryConfigFile>,
    links: Option<LinkConfigFile>,
    status_colors: Option<StatusColors>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    tracing::info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Merge a JSON5 config document over the defaults.
pub fn parse_config(contents: &str) -> Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(map) = parsed.map {
        if let Some([lat, lng]) = map.center {
            config.map.center = LatLng::new(lat, lng);
        }
        if let Some(v) = map.zoom {
            config.map.zoom = v;
        }
        if let Some(v) = map.breakout_radius {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::InvalidSetting {
                    key: "map.breakoutRadius",
                    value: v.to_string(),
                });
            }
            config.map.breakout_radius = v;
        }
        if let Some(v) = map.breakout_min_zoom {
            if !v.is_finite() {
                return Err(Error::InvalidSetting {
                    key: "map.breakoutMinZoom",
                    value: v.to_string(),
                });
            }
            config.map.breakout_min_zoom = v;
        }
    }

    if let Some(table) = parsed.table {
        if let Some(v) = table.sort_field {
            config.table.sort_field = v;
        }
        if let Some(v) = table.sort_order {
            config.table.sort_order = v;
        }
        if let Some(v) = table.filter_field {
            config.table.filter_field = v;
        }
    }

    if let Some(summary) = parsed.summary {
        if let Some(v) = summary.excluded_countries {
            config.summary.excluded_countries = v;
        }
    }

    if let Some(links) = parsed.links {
        if let Some(v) = links.core_api_port {
            config.links.core_api_port = v;
        }
    }

    if let Some(colors) = parsed.status_colors {
        let overrides = [
            (ConnectionStatus::Api, colors.api),
            (ConnectionStatus::P2pOnly, colors.p2p_only),
            (ConnectionStatus::Offline, colors.offline),
            (ConnectionStatus::Unknown, colors.unknown),
        ];
        for (status, color) in overrides {
            if let Some(color) = color {
                config.theme.set_status_color(status, color);
            }
        }
    }

    Ok(config)
}
