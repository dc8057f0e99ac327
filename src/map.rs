use crate::breakout::breakout_positions;
use crate::config::Config;
use crate::grouping::{LocationGroup, find_group, group_by_location, mapped_count};
use crate::node::{LatLng, Node};
use crate::status::{StatusStyle, style};

/// Map inputs controlled by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapParams {
    /// Group the user opened, if any. At most one group is expanded.
    pub expanded: Option<LatLng>,
    pub zoom: f64,
}

impl MapParams {
    pub fn at_zoom(zoom: f64) -> Self {
        Self {
            expanded: None,
            zoom,
        }
    }

    pub fn expand(mut self, key: LatLng) -> Self {
        self.expanded = Some(key);
        self
    }

    pub fn collapse(mut self) -> Self {
        self.expanded = None;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLink<'a> {
    pub address: &'a str,
    pub url: String,
}

/// One marker to place on the map, with the content of its popup.
#[derive(Debug, Clone)]
pub struct MapMarker<'a> {
    pub position: LatLng,
    /// Key of the group the marker belongs to.
    pub group: LatLng,
    /// True for the individual markers of a broken-out group.
    pub breakout: bool,
    pub style: StatusStyle,
    pub country: &'a str,
    pub city: Option<&'a str>,
    pub count_label: String,
    pub nodes: Vec<&'a Node>,
    pub links: Vec<NodeLink<'a>>,
}

#[derive(Debug, Clone)]
pub struct MapView<'a> {
    pub center: LatLng,
    pub zoom: f64,
    /// Nodes that received a marker.
    pub mapped: usize,
    /// Group actually broken out after validating the requested one.
    pub expanded: Option<LatLng>,
    pub groups: Vec<LocationGroup<'a>>,
    pub markers: Vec<MapMarker<'a>>,
}

pub fn node_count_label(count: usize) -> String {
    if count == 1 {
        "1 node".to_string()
    } else {
        format!("{count} nodes")
    }
}

/// The group to break out, if the requested one still exists, has several
/// members and the map is zoomed in far enough. A stale key falls back to
/// nothing expanded.
pub fn expanded_group<'g, 'a>(
    groups: &'g [LocationGroup<'a>],
    params: &MapParams,
    config: &Config,
) -> Option<&'g LocationGroup<'a>> {
    let key = params.expanded?;
    let Some(group) = find_group(groups, key) else {
        tracing::debug!(%key, "expanded group no longer present, collapsing");
        return None;
    };
    if group.len() < 2 || params.zoom.is_nan() || params.zoom < config.map.breakout_min_zoom {
        return None;
    }
    Some(group)
}

fn links<'a>(nodes: &[&'a Node], config: &Config) -> Vec<NodeLink<'a>> {
    nodes
        .iter()
        .map(|node| NodeLink {
            address: node.address.as_str(),
            url: node.info_url(config.links.core_api_port),
        })
        .collect()
}

/// Markers for `groups`, breaking out the group at `expanded`. The key is
/// expected to come from [`expanded_group`].
pub fn map_markers<'a>(
    groups: &[LocationGroup<'a>],
    expanded: Option<LatLng>,
    config: &Config,
) -> Vec<MapMarker<'a>> {
    let mut markers = Vec::with_capacity(groups.len());

    for group in groups {
        let (country, city) = group.place();
        if expanded == Some(group.key) {
            let positions =
                breakout_positions(group.key, group.len(), config.map.breakout_radius);
            for (node, position) in group.members.iter().copied().zip(positions) {
                let nodes = vec![node];
                markers.push(MapMarker {
                    position,
                    group: group.key,
                    breakout: true,
                    style: style(node.connection_status, &config.theme),
                    country,
                    city,
                    count_label: node_count_label(1),
                    links: links(&nodes, config),
                    nodes,
                });
            }
            continue;
        }
        markers.push(MapMarker {
            position: group.key,
            group: group.key,
            breakout: false,
            style: style(group.representative_status, &config.theme),
            country,
            city,
            count_label: node_count_label(group.len()),
            links: links(&group.members, config),
            nodes: group.members.clone(),
        });
    }
    markers
}

/// Everything the map renderer needs for one snapshot and parameter set.
pub fn map_view<'a, I>(nodes: I, params: &MapParams, config: &Config) -> MapView<'a>
where
    I: IntoIterator<Item = &'a Node>,
{
    let nodes: Vec<&'a Node> = nodes.into_iter().collect();
    let groups = group_by_location(nodes.iter().copied());
    let expanded = expanded_group(&groups, params, config).map(|group| group.key);
    let markers = map_markers(&groups, expanded, config);
    MapView {
        center: config.map.center,
        zoom: params.zoom,
        mapped: mapped_count(nodes.iter().copied()),
        expanded,
        groups,
        markers,
    }
}
