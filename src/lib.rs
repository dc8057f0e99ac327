pub mod breakout;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dump;
pub mod error;
pub mod grouping;
pub mod map;
pub mod node;
pub mod snapshot;
pub mod status;
pub mod summary;
pub mod table;
pub mod theme;
pub mod version;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, load_config};
pub use error::{Error, Result};
pub use grouping::{LocationGroup, group_by_location};
pub use map::{MapParams, MapView, map_view};
pub use node::{ConnectionStatus, LatLng, Location, Node};
pub use snapshot::Snapshot;
pub use status::resolve;
pub use summary::{NetworkSummary, summarize};
pub use table::{FilterField, SortField, SortOrder, ViewParams, view};
pub use theme::Theme;
