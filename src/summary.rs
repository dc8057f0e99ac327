use std::collections::HashSet;

use serde::Serialize;

use crate::config::SummaryConfig;
use crate::node::{ConnectionStatus, Node};

/// Headline numbers shown above the map and the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub network: String,
    pub total: usize,
    pub geo_located: usize,
    pub geo_located_percent: f64,
    pub countries: usize,
    pub api: usize,
    pub p2p_only: usize,
    pub offline: usize,
    pub unknown: usize,
}

impl NetworkSummary {
    pub fn count(&self, status: ConnectionStatus) -> usize {
        match status {
            ConnectionStatus::Api => self.api,
            ConnectionStatus::P2pOnly => self.p2p_only,
            ConnectionStatus::Offline => self.offline,
            ConnectionStatus::Unknown => self.unknown,
        }
    }
}

pub fn summarize(network: &str, nodes: &[Node], config: &SummaryConfig) -> NetworkSummary {
    let is_placed = |country: &str| !config.excluded_countries.iter().any(|c| c == country);
    let placed: Vec<&str> = nodes
        .iter()
        .filter_map(|node| node.country())
        .filter(|country| is_placed(*country))
        .collect();
    let countries: HashSet<&str> = placed.iter().copied().collect();

    let mut summary = NetworkSummary {
        network: network.to_string(),
        total: nodes.len(),
        geo_located: placed.len(),
        geo_located_percent: 0.0,
        countries: countries.len(),
        api: 0,
        p2p_only: 0,
        offline: 0,
        unknown: 0,
    };
    if summary.total > 0 {
        summary.geo_located_percent = summary.geo_located as f64 / summary.total as f64 * 100.0;
    }
    for node in nodes {
        match node.connection_status {
            ConnectionStatus::Api => summary.api += 1,
            ConnectionStatus::P2pOnly => summary.p2p_only += 1,
            ConnectionStatus::Offline => summary.offline += 1,
            ConnectionStatus::Unknown => summary.unknown += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Location;

    fn node(country: Option<&str>, status: ConnectionStatus) -> Node {
        let mut node = Node::new("n");
        node.location = country.map(|country| Location {
            lat: 1.0,
            lng: 2.0,
            country: country.to_string(),
            city: None,
        });
        node.connection_status = status;
        node
    }

    #[test]
    fn counts_placed_nodes_and_statuses() {
        let nodes = vec![
            node(Some("France"), ConnectionStatus::Api),
            node(Some("France"), ConnectionStatus::Offline),
            node(Some("Japan"), ConnectionStatus::P2pOnly),
            node(Some("Private IP"), ConnectionStatus::Api),
            node(Some("Unknown"), ConnectionStatus::Unknown),
            node(None, ConnectionStatus::Unknown),
        ];
        let summary = summarize("mainnet", &nodes, &SummaryConfig::default());
        assert_eq!(summary.network, "mainnet");
        assert_eq!(summary.total, 6);
        assert_eq!(summary.geo_located, 3);
        assert!((summary.geo_located_percent - 50.0).abs() < 1e-9);
        assert_eq!(summary.countries, 2);
        assert_eq!(summary.count(ConnectionStatus::Api), 2);
        assert_eq!(summary.p2p_only, 1);
        assert_eq!(summary.offline, 1);
        assert_eq!(summary.unknown, 2);
    }

    #[test]
    fn empty_snapshot_has_zero_percent() {
        let summary = summarize("testnet", &[], &SummaryConfig::default());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.geo_located_percent, 0.0);
    }
}
