use crate::config::{Config, load_config};
use crate::dump::{ListDump, MapDump, RowDump, write_json};
use crate::map::{MapParams, MapView, map_view};
use crate::node::{ConnectionStatus, LatLng, Node};
use crate::snapshot::Snapshot;
use crate::summary::{NetworkSummary, summarize};
use crate::table::{FilterField, SortField, SortOrder, ViewParams, matches_search, view};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nodemap", version, about = "Group, filter and sort a Stacks node snapshot")]
pub struct Args {
    /// Snapshot JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config file (JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Which view to derive
    #[arg(short = 'v', long = "view", value_enum, default_value = "list")]
    pub view: ViewKind,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Free-text search over address, city and country
    #[arg(short = 's', long = "search", default_value = "")]
    pub search: String,

    /// Field compared by --filter (server_version, country, city, status)
    #[arg(long = "filterField")]
    pub filter_field: Option<FilterField>,

    /// Keep only rows whose filter field equals this value
    #[arg(short = 'f', long = "filter")]
    pub filter: Option<String>,

    /// Sort field
    #[arg(long = "sort")]
    pub sort: Option<SortField>,

    /// Sort order (asc or desc)
    #[arg(long = "order")]
    pub order: Option<SortOrder>,

    /// Expanded group as LAT,LNG
    #[arg(long = "expand", allow_hyphen_values = true)]
    pub expand: Option<LatLng>,

    /// Map zoom level
    #[arg(short = 'z', long = "zoom")]
    pub zoom: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ViewKind {
    Map,
    List,
    Summary,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let snapshot = Snapshot::load(args.input.as_deref())?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(io::BufWriter::new(std::fs::File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    match args.view {
        ViewKind::Map => {
            let mut params = MapParams::at_zoom(args.zoom.unwrap_or(config.map.zoom));
            if let Some(key) = args.expand {
                params = params.expand(key);
            }
            let visible = snapshot
                .nodes
                .iter()
                .filter(|node| matches_search(node, &args.search));
            let map = map_view(visible, &params, &config);
            match args.format {
                OutputFormat::Json => write_json(&mut out, &MapDump::from_view(&map))?,
                OutputFormat::Text => out.write_all(render_map_text(&map).as_bytes())?,
            }
        }
        ViewKind::List => {
            let params = view_params(&args, &config);
            let rows = view(&snapshot.nodes, &params);
            match args.format {
                OutputFormat::Json => {
                    write_json(&mut out, &ListDump::from_rows(&snapshot.nodes, &rows, &params, &config))?
                }
                OutputFormat::Text => {
                    out.write_all(render_list_text(&rows, &config).as_bytes())?
                }
            }
        }
        ViewKind::Summary => {
            let summary = summarize(&snapshot.network, &snapshot.nodes, &config.summary);
            match args.format {
                OutputFormat::Json => write_json(&mut out, &summary)?,
                OutputFormat::Text => out.write_all(render_summary_text(&summary).as_bytes())?,
            }
        }
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("NODEMAP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn view_params(args: &Args, config: &Config) -> ViewParams {
    ViewParams {
        search_term: args.search.clone(),
        filter_field: args.filter_field.unwrap_or(config.table.filter_field),
        filter_value: args.filter.clone(),
        sort_field: args.sort.unwrap_or(config.table.sort_field),
        sort_order: args.order.unwrap_or(config.table.sort_order),
    }
}

fn render_map_text(map: &MapView<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} geo-located nodes, {} markers", map.mapped, map.markers.len());
    for marker in &map.markers {
        let place = match marker.city {
            Some(city) => format!("{}, {}", city, marker.country),
            None => marker.country.to_string(),
        };
        let prefix = if marker.breakout { "  *" } else { "-" };
        let _ = writeln!(
            out,
            "{prefix} ({}) {place} [{}] {}",
            marker.position, marker.style.label, marker.count_label
        );
        for link in &marker.links {
            let _ = writeln!(out, "      {} {}", link.address, link.url);
        }
    }
    out
}

fn render_list_text(rows: &[&Node], config: &Config) -> String {
    let mut out = String::new();
    let (with, without) = crate::table::split_by_location(rows);
    let _ = writeln!(out, "{} nodes", rows.len());
    if !with.is_empty() {
        let _ = writeln!(out, "\nGeo-located nodes ({})", with.len());
        for node in with {
            let row = RowDump::from_node(node, config);
            let _ = writeln!(
                out,
                "{:<22} {:<20} {:<20} {:<18} {:<9} {}",
                row.address,
                row.country.unwrap_or_default(),
                row.city.unwrap_or_else(|| "-".to_string()),
                row.coordinates.unwrap_or_default(),
                row.label,
                row.server_version.unwrap_or_default(),
            );
        }
    }
    if !without.is_empty() {
        let _ = writeln!(out, "\nNodes without location data ({})", without.len());
        for node in without {
            let _ = writeln!(out, "{:<22} {}", node.address, node.info_url(config.links.core_api_port));
        }
    }
    out
}

fn render_summary_text(summary: &NetworkSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Network:     {}", summary.network);
    let _ = writeln!(out, "Total nodes: {}", summary.total);
    let _ = writeln!(
        out,
        "Geo-located: {} ({:.1}%)",
        summary.geo_located, summary.geo_located_percent
    );
    let _ = writeln!(out, "Countries:   {}", summary.countries);
    for status in ConnectionStatus::ALL {
        let _ = writeln!(out, "{:<12} {}", format!("{}:", status.label()), summary.count(status));
    }
    out
}
