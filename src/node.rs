use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `(0, 0)` is what the geolocation lookup reports when it has nothing.
    pub fn is_origin(&self) -> bool {
        self.lat == 0.0 && self.lng == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    pub fn distance_to(&self, other: LatLng) -> f64 {
        (self.lat - other.lat).hypot(self.lng - other.lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}, {:.2}", self.lat, self.lng)
    }
}

impl FromStr for LatLng {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidCoordinate(s.to_string());
        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
        Ok(Self { lat, lng })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl Location {
    pub fn coordinates(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Api,
    P2pOnly,
    Offline,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ConnectionStatus {
    pub const ALL: [ConnectionStatus; 4] = [Self::Api, Self::P2pOnly, Self::Offline, Self::Unknown];

    /// Wire token, as found in `connection_status`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::P2pOnly => "p2p_only",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(token.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub connection_status: ConnectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn_block_height: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
}

impl Node {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            location: None,
            connection_status: ConnectionStatus::Unknown,
            server_version: None,
            burn_block_height: None,
            last_seen: None,
        }
    }

    /// Coordinate used for map placement. Nodes without a location, at the
    /// origin, or with non-finite coordinates are unmapped.
    pub fn mapped_position(&self) -> Option<LatLng> {
        let position = self.location.as_ref()?.coordinates();
        if position.is_origin() || !position.is_finite() {
            return None;
        }
        Some(position)
    }

    pub fn country(&self) -> Option<&str> {
        self.location.as_ref().map(|loc| loc.country.as_str())
    }

    pub fn city(&self) -> Option<&str> {
        self.location.as_ref().and_then(|loc| loc.city.as_deref())
    }

    /// Link to the node's core API info endpoint. Hosted endpoints (their
    /// hostname carries `stack`) are served on the default HTTP port.
    pub fn info_url(&self, core_api_port: u16) -> String {
        if self.address.contains("stack") {
            format!("http://{}/v2/info", self.address)
        } else {
            format!("http://{}:{}/v2/info", self.address, core_api_port)
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
