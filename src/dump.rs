use crate::config::Config;
use crate::map::MapView;
use crate::node::{ConnectionStatus, Node};
use crate::status::style;
use crate::table::{FilterField, SortField, SortOrder, ViewParams, filter_options, split_by_location};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct MapDump {
    pub center: [f64; 2],
    pub zoom: f64,
    pub mapped: usize,
    pub expanded: Option<[f64; 2]>,
    pub groups: Vec<GroupDump>,
    pub markers: Vec<MarkerDump>,
}

#[derive(Debug, Serialize)]
pub struct GroupDump {
    pub lat: f64,
    pub lng: f64,
    pub status: ConnectionStatus,
    pub members: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MarkerDump {
    pub lat: f64,
    pub lng: f64,
    pub group: [f64; 2],
    pub breakout: bool,
    pub status: ConnectionStatus,
    pub label: String,
    pub color: String,
    pub country: String,
    pub city: Option<String>,
    pub count_label: String,
    pub links: Vec<LinkDump>,
}

#[derive(Debug, Serialize)]
pub struct LinkDump {
    pub address: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ListDump {
    pub search_term: String,
    pub filter_field: FilterField,
    pub filter_value: Option<String>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    /// Distinct values of `filter_field` across the whole snapshot.
    pub filter_options: Vec<String>,
    pub total: usize,
    pub geo_located: Vec<RowDump>,
    pub without_location: Vec<RowDump>,
}

#[derive(Debug, Serialize)]
pub struct RowDump {
    pub address: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub coordinates: Option<String>,
    pub server_version: Option<String>,
    pub burn_block_height: Option<u64>,
    pub last_seen: Option<String>,
    pub status: ConnectionStatus,
    pub label: String,
    pub color: String,
    pub url: String,
}

impl MapDump {
    pub fn from_view(view: &MapView<'_>) -> Self {
        let groups = view
            .groups
            .iter()
            .map(|group| GroupDump {
                lat: group.key.lat,
                lng: group.key.lng,
                status: group.representative_status,
                members: group
                    .members
                    .iter()
                    .map(|node| node.address.clone())
                    .collect(),
            })
            .collect();

        let markers = view
            .markers
            .iter()
            .map(|marker| MarkerDump {
                lat: marker.position.lat,
                lng: marker.position.lng,
                group: [marker.group.lat, marker.group.lng],
                breakout: marker.breakout,
                status: marker.style.status,
                label: marker.style.label.to_string(),
                color: marker.style.color.clone(),
                country: marker.country.to_string(),
                city: marker.city.map(str::to_string),
                count_label: marker.count_label.clone(),
                links: marker
                    .links
                    .iter()
                    .map(|link| LinkDump {
                        address: link.address.to_string(),
                        url: link.url.clone(),
                    })
                    .collect(),
            })
            .collect();

        MapDump {
            center: [view.center.lat, view.center.lng],
            zoom: view.zoom,
            mapped: view.mapped,
            expanded: view.expanded.map(|key| [key.lat, key.lng]),
            groups,
            markers,
        }
    }
}

impl RowDump {
    pub fn from_node(node: &Node, config: &Config) -> Self {
        let badge = style(node.connection_status, &config.theme);
        RowDump {
            address: node.address.clone(),
            country: node.country().map(str::to_string),
            city: node.city().map(str::to_string),
            coordinates: node
                .location
                .as_ref()
                .map(|loc| loc.coordinates().to_string()),
            server_version: node.server_version.clone(),
            burn_block_height: node.burn_block_height,
            last_seen: node.last_seen.clone(),
            status: node.connection_status,
            label: badge.label.to_string(),
            color: badge.color,
            url: node.info_url(config.links.core_api_port),
        }
    }
}

impl ListDump {
    pub fn from_rows(nodes: &[Node], rows: &[&Node], params: &ViewParams, config: &Config) -> Self {
        let (with, without) = split_by_location(rows);
        let to_rows = |nodes: Vec<&Node>| {
            nodes
                .into_iter()
                .map(|node| RowDump::from_node(node, config))
                .collect::<Vec<_>>()
        };
        ListDump {
            search_term: params.search_term.clone(),
            filter_field: params.filter_field,
            filter_value: params.filter_value.clone(),
            sort_field: params.sort_field,
            sort_order: params.sort_order,
            filter_options: filter_options(nodes, params.filter_field)
                .into_iter()
                .map(str::to_string)
                .collect(),
            total: rows.len(),
            geo_located: to_rows(with),
            without_location: to_rows(without),
        }
    }
}

pub fn write_json<W: Write, T: Serialize>(writer: W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MapParams, map_view};
    use crate::node::{LatLng, Location};
    use crate::table::view;

    fn nodes() -> Vec<Node> {
        let mut a = Node::new("1.1.1.1");
        a.location = Some(Location {
            lat: 10.0,
            lng: 10.0,
            country: "Nowhere".to_string(),
            city: None,
        });
        a.connection_status = ConnectionStatus::Api;
        let mut b = a.clone();
        b.address = "2.2.2.2".to_string();
        b.connection_status = ConnectionStatus::Offline;
        vec![a, b, Node::new("3.3.3.3")]
    }

    #[test]
    fn map_dump_lists_groups_and_markers() {
        let nodes = nodes();
        let config = Config::default();
        let params = MapParams::at_zoom(10.0).expand(LatLng::new(10.0, 10.0));
        let dump = MapDump::from_view(&map_view(&nodes, &params, &config));
        assert_eq!(dump.groups.len(), 1);
        assert_eq!(dump.groups[0].members, vec!["1.1.1.1", "2.2.2.2"]);
        assert_eq!(dump.markers.len(), 2);
        assert!(dump.markers.iter().all(|marker| marker.breakout));

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["groups"][0]["status"], "api");
        assert_eq!(json["expanded"][0], 10.0);
    }

    #[test]
    fn list_dump_splits_sections() {
        let nodes = nodes();
        let config = Config::default();
        let params = ViewParams::default();
        let rows = view(&nodes, &params);
        let dump = ListDump::from_rows(&nodes, &rows, &params, &config);
        assert_eq!(dump.total, 3);
        assert_eq!(dump.geo_located.len(), 2);
        assert_eq!(dump.without_location[0].address, "3.3.3.3");
        assert_eq!(dump.geo_located[1].label, "Offline");
        assert_eq!(dump.geo_located[0].coordinates.as_deref(), Some("10.00, 10.00"));
        assert!(dump.filter_options.is_empty());
    }

    #[test]
    fn list_dump_offers_options_from_the_whole_snapshot() {
        let nodes = nodes();
        let config = Config::default();
        let params = ViewParams {
            search_term: "3.3.3.3".to_string(),
            filter_field: FilterField::Status,
            ..Default::default()
        };
        let rows = view(&nodes, &params);
        let dump = ListDump::from_rows(&nodes, &rows, &params, &config);
        assert_eq!(dump.total, 1);
        assert_eq!(dump.filter_options, vec!["api", "offline", "unknown"]);
    }
}
