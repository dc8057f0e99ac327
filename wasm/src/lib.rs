use serde::Deserialize;
use stx_node_map::dump::{ListDump, MapDump};
use stx_node_map::{
    Config, FilterField, LatLng, MapParams, Snapshot, SortField, SortOrder, ViewParams, map_view,
    summarize, view,
};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeMapOptions {
    search_term: Option<String>,
    filter_field: Option<FilterField>,
    filter_value: Option<String>,
    sort_field: Option<SortField>,
    sort_order: Option<SortOrder>,
    expanded: Option<[f64; 2]>,
    zoom: Option<f64>,
    config: Option<String>,
}

fn parse_options(options_json: Option<String>) -> Result<NodeMapOptions, JsValue> {
    match options_json {
        Some(raw) => serde_json::from_str::<NodeMapOptions>(&raw).map_err(to_js),
        None => Ok(NodeMapOptions::default()),
    }
}

fn build_config(options: &NodeMapOptions) -> Result<Config, JsValue> {
    match options.config.as_deref() {
        Some(raw) => stx_node_map::config::parse_config(raw).map_err(to_js),
        None => Ok(Config::default()),
    }
}

fn build_view_params(options: &NodeMapOptions, config: &Config) -> ViewParams {
    ViewParams {
        search_term: options.search_term.clone().unwrap_or_default(),
        filter_field: options.filter_field.unwrap_or(config.table.filter_field),
        filter_value: options.filter_value.clone(),
        sort_field: options.sort_field.unwrap_or(config.table.sort_field),
        sort_order: options.sort_order.unwrap_or(config.table.sort_order),
    }
}

fn build_map_params(options: &NodeMapOptions, config: &Config) -> MapParams {
    let params = MapParams::at_zoom(options.zoom.unwrap_or(config.map.zoom));
    match options.expanded {
        Some([lat, lng]) => params.expand(LatLng::new(lat, lng)),
        None => params,
    }
}

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Markers for the map view. The search term narrows the nodes before grouping.
#[wasm_bindgen]
pub fn map_view_json(snapshot_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let snapshot = Snapshot::from_json(snapshot_json).map_err(to_js)?;
    let options = parse_options(options_json)?;
    let config = build_config(&options)?;
    let term = options.search_term.clone().unwrap_or_default();
    let visible = snapshot
        .nodes
        .iter()
        .filter(|node| stx_node_map::table::matches_search(node, &term));
    let map = map_view(visible, &build_map_params(&options, &config), &config);
    serde_json::to_string(&MapDump::from_view(&map)).map_err(to_js)
}

#[wasm_bindgen]
pub fn list_view_json(snapshot_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let snapshot = Snapshot::from_json(snapshot_json).map_err(to_js)?;
    let options = parse_options(options_json)?;
    let config = build_config(&options)?;
    let params = build_view_params(&options, &config);
    let rows = view(&snapshot.nodes, &params);
    serde_json::to_string(&ListDump::from_rows(&snapshot.nodes, &rows, &params, &config)).map_err(to_js)
}

#[wasm_bindgen]
pub fn summary_json(snapshot_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let snapshot = Snapshot::from_json(snapshot_json).map_err(to_js)?;
    let options = parse_options(options_json)?;
    let config = build_config(&options)?;
    let summary = summarize(&snapshot.network, &snapshot.nodes, &config.summary);
    serde_json::to_string(&summary).map_err(to_js)
}
