use serde::{Deserialize, Serialize};

use crate::node::ConnectionStatus;
use crate::status;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub api_color: String,
    pub p2p_only_color: String,
    pub offline_color: String,
    pub unknown_color: String,
}

impl Theme {
    pub fn status_color(&self, status: ConnectionStatus) -> &str {
        match status {
            ConnectionStatus::Api => &self.api_color,
            ConnectionStatus::P2pOnly => &self.p2p_only_color,
            ConnectionStatus::Offline => &self.offline_color,
            ConnectionStatus::Unknown => &self.unknown_color,
        }
    }

    pub fn set_status_color(&mut self, status: ConnectionStatus, color: String) {
        match status {
            ConnectionStatus::Api => self.api_color = color,
            ConnectionStatus::P2pOnly => self.p2p_only_color = color,
            ConnectionStatus::Offline => self.offline_color = color,
            ConnectionStatus::Unknown => self.unknown_color = color,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        let color = |s| status::entry(s).color.to_string();
        Self {
            api_color: color(ConnectionStatus::Api),
            p2p_only_color: color(ConnectionStatus::P2pOnly),
            offline_color: color(ConnectionStatus::Offline),
            unknown_color: color(ConnectionStatus::Unknown),
        }
    }
}
