use std::path::Path;

use stx_node_map::dump::{ListDump, MapDump};
use stx_node_map::{
    Config, ConnectionStatus, LatLng, MapParams, Node, Snapshot, SortField, SortOrder, ViewParams,
    group_by_location, map_view, summarize, view,
};

fn load_fixture(name: &str) -> Snapshot {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    Snapshot::load(Some(&path)).expect("fixture load failed")
}

fn addresses(rows: &[&Node]) -> Vec<String> {
    rows.iter().map(|node| node.address.clone()).collect()
}

#[test]
fn groups_partition_the_mapped_nodes() {
    let snapshot = load_fixture("mainnet.json");
    let groups = group_by_location(&snapshot.nodes);

    let mut grouped: Vec<&str> = groups
        .iter()
        .flat_map(|group| group.members.iter().map(|node| node.address.as_str()))
        .collect();
    grouped.sort();
    let mut mapped: Vec<&str> = snapshot
        .nodes
        .iter()
        .filter(|node| node.mapped_position().is_some())
        .map(|node| node.address.as_str())
        .collect();
    mapped.sort();
    assert_eq!(grouped, mapped);

    assert!(!grouped.contains(&"3.3.3.3"));
    assert!(!grouped.contains(&"5.5.5.5"));

    let keys: Vec<LatLng> = groups.iter().map(|group| group.key).collect();
    assert_eq!(
        keys,
        vec![
            LatLng::new(10.0, 10.0),
            LatLng::new(48.8566, 2.3522),
            LatLng::new(39.0438, -77.4874),
        ]
    );
    assert_eq!(groups[0].len(), 2);
    assert_eq!(groups[0].representative_status, ConnectionStatus::Api);
    assert_eq!(groups[1].representative_status, ConnectionStatus::P2pOnly);
    assert_eq!(groups[2].representative_status, ConnectionStatus::Api);
}

#[test]
fn unlocated_node_stays_in_the_table() {
    let snapshot = load_fixture("mainnet.json");
    let rows = view(&snapshot.nodes, &ViewParams::default());
    assert_eq!(rows.len(), snapshot.nodes.len());
    assert!(addresses(&rows).contains(&"3.3.3.3".to_string()));
}

#[test]
fn derivations_are_idempotent() {
    let snapshot = load_fixture("mainnet.json");
    let config = Config::default();
    let params = MapParams::at_zoom(9.0).expand(LatLng::new(39.0438, -77.4874));

    let first = serde_json::to_string(&MapDump::from_view(&map_view(&snapshot.nodes, &params, &config)))
        .unwrap();
    let second = serde_json::to_string(&MapDump::from_view(&map_view(&snapshot.nodes, &params, &config)))
        .unwrap();
    assert_eq!(first, second);

    let list = ViewParams {
        search_term: "united".to_string(),
        sort_field: SortField::BurnBlockHeight,
        sort_order: SortOrder::Desc,
        ..Default::default()
    };
    let once = view(&snapshot.nodes, &list);
    let again = view(once.iter().copied(), &list);
    assert_eq!(addresses(&once), addresses(&again));
    assert_eq!(addresses(&once), vec!["seed.stacks.co", "6.6.6.6", "7.7.7.7"]);
}

#[test]
fn expanding_a_group_spreads_its_members() {
    let snapshot = load_fixture("mainnet.json");
    let config = Config::default();
    let key = LatLng::new(39.0438, -77.4874);
    let map = map_view(
        &snapshot.nodes,
        &MapParams::at_zoom(config.map.breakout_min_zoom).expand(key),
        &config,
    );
    let members: Vec<_> = map.markers.iter().filter(|marker| marker.group == key).collect();
    assert_eq!(members.len(), 3);
    assert!(members.iter().all(|marker| marker.breakout));
    assert_eq!(members[0].links[0].url, "http://seed.stacks.co/v2/info");
    assert_eq!(members[1].links[0].url, "http://6.6.6.6:20443/v2/info");
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            assert_ne!(a.position, b.position);
        }
    }

    let collapsed = map_view(&snapshot.nodes, &MapParams::at_zoom(2.0).expand(key), &config);
    assert_eq!(collapsed.markers.len(), 3);
    assert_eq!(collapsed.expanded, None);
}

#[test]
fn search_finds_city_regardless_of_case() {
    let snapshot = load_fixture("mainnet.json");
    for term in ["paris", "PARIS", "Par"] {
        let rows = view(&snapshot.nodes, &ViewParams::search(term));
        assert_eq!(addresses(&rows), vec!["4.4.4.4"], "term {term}");
    }
}

#[test]
fn version_sorts_numerically_with_missing_as_zero() {
    let snapshot = load_fixture("mainnet.json");
    let params = ViewParams {
        sort_field: SortField::VersionNumber,
        sort_order: SortOrder::Desc,
        ..Default::default()
    };
    let rows = view(&snapshot.nodes, &params);
    let order = addresses(&rows);
    assert_eq!(order[0], "4.4.4.4");
    assert_eq!(&order[order.len() - 3..], ["5.5.5.5", "6.6.6.6", "7.7.7.7"]);
}

#[test]
fn summary_matches_info_card_counts() {
    let snapshot = load_fixture("mainnet.json");
    let summary = summarize(&snapshot.network, &snapshot.nodes, &Config::default().summary);
    assert_eq!(summary.network, "mainnet");
    assert_eq!(summary.total, 8);
    assert_eq!(summary.geo_located, 6);
    assert_eq!(summary.countries, 3);
    assert_eq!(summary.api, 2);
    assert_eq!(summary.p2p_only, 2);
    assert_eq!(summary.offline, 3);
    assert_eq!(summary.unknown, 1);
}

#[test]
fn bare_discoverer_output_loads() {
    let snapshot = load_fixture("discoverer.json");
    assert_eq!(snapshot.network, "");
    let config = Config::default();
    let params = ViewParams::default();
    let rows = view(&snapshot.nodes, &params);
    let dump = ListDump::from_rows(&snapshot.nodes, &rows, &params, &config);
    assert_eq!(dump.geo_located.len(), 1);
    assert_eq!(dump.without_location.len(), 1);
    assert_eq!(dump.geo_located[0].status, ConnectionStatus::Unknown);
}
