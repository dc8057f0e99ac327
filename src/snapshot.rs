use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::node::Node;

/// One complete, immutable fetch of the node inventory. Derivations only ever
/// see a whole snapshot, never a partially merged one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub network: String,
    pub nodes: Vec<Node>,
}

/// The backend's `{"network": ..., "nodes": [...]}` response.
#[derive(Deserialize)]
struct SnapshotResponse {
    #[serde(default)]
    network: String,
    nodes: Vec<Node>,
}

impl Snapshot {
    /// Parse either the backend response or the discoverer's bare node array.
    pub fn from_json(input: &str) -> Result<Self> {
        let snapshot = match input.trim_start().as_bytes().first() {
            Some(b'[') => Self {
                network: String::new(),
                nodes: serde_json::from_str(input)?,
            },
            _ => {
                let SnapshotResponse { network, nodes } = serde_json::from_str(input)?;
                Self { network, nodes }
            }
        };
        tracing::info!(
            network = %snapshot.network,
            nodes = snapshot.nodes.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Read a snapshot from `path`, or from stdin when the path is absent or `-`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let input = match path {
            Some(path) if path != Path::new("-") => std::fs::read_to_string(path)?,
            _ => {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };
        Self::from_json(&input)
    }
}
