use std::collections::HashMap;

use serde::Serialize;

use crate::node::{ConnectionStatus, LatLng, Node};
use crate::status;

/// Nodes sharing one exact coordinate, in order of appearance.
#[derive(Debug, Clone, Serialize)]
pub struct LocationGroup<'a> {
    pub key: LatLng,
    pub members: Vec<&'a Node>,
    pub representative_status: ConnectionStatus,
}

impl<'a> LocationGroup<'a> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Country and city shown in the marker popup, taken from the first member.
    pub fn place(&self) -> (&'a str, Option<&'a str>) {
        match self.members.first().copied() {
            Some(node) => (node.country().unwrap_or_default(), node.city()),
            None => ("", None),
        }
    }
}

/// Join key with `-0.0` folded into `0.0` so that bit equality matches
/// numeric equality. Callers only pass finite coordinates.
fn coordinate_key(position: LatLng) -> (u64, u64) {
    ((position.lat + 0.0).to_bits(), (position.lng + 0.0).to_bits())
}

/// Partition the mapped nodes by exact coordinate. Groups come out in the
/// order their coordinate is first seen.
pub fn group_by_location<'a, I>(nodes: I) -> Vec<LocationGroup<'a>>
where
    I: IntoIterator<Item = &'a Node>,
{
    let mut index: HashMap<(u64, u64), usize> = HashMap::new();
    let mut groups: Vec<LocationGroup<'a>> = Vec::new();
    let mut skipped = 0usize;

    for node in nodes {
        let Some(position) = node.mapped_position() else {
            skipped += 1;
            continue;
        };
        let slot = *index.entry(coordinate_key(position)).or_insert_with(|| {
            groups.push(LocationGroup {
                key: position,
                members: Vec::new(),
                representative_status: ConnectionStatus::Unknown,
            });
            groups.len() - 1
        });
        groups[slot].members.push(node);
    }

    for group in &mut groups {
        group.representative_status = status::resolve_nodes(group.members.iter().copied());
    }

    tracing::debug!(groups = groups.len(), unmapped = skipped, "grouped nodes by location");
    groups
}

/// Group at exactly `key`, if the current grouping still has one.
pub fn find_group<'g, 'a>(groups: &'g [LocationGroup<'a>], key: LatLng) -> Option<&'g LocationGroup<'a>> {
    if !key.is_finite() {
        return None;
    }
    let wanted = coordinate_key(key);
    groups.iter().find(|group| coordinate_key(group.key) == wanted)
}

/// Number of nodes that would receive a marker.
pub fn mapped_count<'a, I>(nodes: I) -> usize
where
    I: IntoIterator<Item = &'a Node>,
{
    nodes
        .into_iter()
        .filter(|node| node.mapped_position().is_some())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Location;

    fn node(address: &str, at: Option<(f64, f64)>, status: ConnectionStatus) -> Node {
        let mut node = Node::new(address);
        node.location = at.map(|(lat, lng)| Location {
            lat,
            lng,
            country: "Somewhere".to_string(),
            city: None,
        });
        node.connection_status = status;
        node
    }

    #[test]
    fn groups_shared_coordinates_and_resolves_status() {
        let nodes = vec![
            node("1.1.1.1", Some((10.0, 10.0)), ConnectionStatus::Api),
            node("2.2.2.2", Some((10.0, 10.0)), ConnectionStatus::Offline),
            node("3.3.3.3", None, ConnectionStatus::Api),
        ];
        let groups = group_by_location(&nodes);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, LatLng::new(10.0, 10.0));
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0].representative_status, ConnectionStatus::Api);
    }

    #[test]
    fn keeps_first_seen_order_and_member_order() {
        let nodes = vec![
            node("a", Some((1.0, 1.0)), ConnectionStatus::Offline),
            node("b", Some((2.0, 2.0)), ConnectionStatus::Offline),
            node("c", Some((1.0, 1.0)), ConnectionStatus::P2pOnly),
            node("d", Some((3.0, 3.0)), ConnectionStatus::Unknown),
        ];
        let groups = group_by_location(&nodes);
        let keys: Vec<f64> = groups.iter().map(|g| g.key.lat).collect();
        assert_eq!(keys, vec![1.0, 2.0, 3.0]);
        let first: Vec<&str> = groups[0].members.iter().map(|n| n.address.as_str()).collect();
        assert_eq!(first, vec!["a", "c"]);
        assert_eq!(groups[0].representative_status, ConnectionStatus::P2pOnly);
        assert_eq!(groups[2].representative_status, ConnectionStatus::Unknown);
    }

    #[test]
    fn nearly_equal_coordinates_stay_apart() {
        let nodes = vec![
            node("a", Some((48.8566, 2.3522)), ConnectionStatus::Api),
            node("b", Some((48.8566 + 1e-9, 2.3522)), ConnectionStatus::Api),
        ];
        assert_eq!(group_by_location(&nodes).len(), 2);
    }

    #[test]
    fn negative_zero_joins_positive_zero() {
        let nodes = vec![
            node("a", Some((0.0, 5.0)), ConnectionStatus::Api),
            node("b", Some((-0.0, 5.0)), ConnectionStatus::Api),
        ];
        let groups = group_by_location(&nodes);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn duplicates_are_kept_and_origin_is_excluded() {
        let nodes = vec![
            node("a", Some((5.0, 5.0)), ConnectionStatus::Api),
            node("a", Some((5.0, 5.0)), ConnectionStatus::Api),
            node("z", Some((0.0, 0.0)), ConnectionStatus::Api),
        ];
        let groups = group_by_location(&nodes);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(mapped_count(&nodes), 2);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_by_location(&Vec::<Node>::new()).is_empty());
    }

    #[test]
    fn find_group_matches_exact_key_only() {
        let nodes = vec![node("a", Some((5.0, 5.0)), ConnectionStatus::Api)];
        let groups = group_by_location(&nodes);
        assert!(find_group(&groups, LatLng::new(5.0, 5.0)).is_some());
        assert!(find_group(&groups, LatLng::new(5.0, 5.000001)).is_none());
        assert!(find_group(&groups, LatLng::new(f64::NAN, 5.0)).is_none());
    }
}
