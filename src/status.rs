use serde::Serialize;

use crate::node::{ConnectionStatus, Node};
use crate::theme::Theme;

/// One row of the status presentation table.
#[derive(Debug, Clone, Copy)]
pub struct StatusEntry {
    pub status: ConnectionStatus,
    pub label: &'static str,
    pub color: &'static str,
    /// Higher wins when several nodes share a marker.
    pub precedence: u8,
}

/// Single source of truth for status labels, default colors and precedence.
/// Map markers, table badges and the legend all read from here.
pub static STATUS_TABLE: [StatusEntry; 4] = [
    StatusEntry {
        status: ConnectionStatus::Api,
        label: "API",
        color: "#28a745",
        precedence: 3,
    },
    StatusEntry {
        status: ConnectionStatus::P2pOnly,
        label: "P2P Only",
        color: "#ffc107",
        precedence: 2,
    },
    StatusEntry {
        status: ConnectionStatus::Offline,
        label: "Offline",
        color: "#dc3545",
        precedence: 1,
    },
    StatusEntry {
        status: ConnectionStatus::Unknown,
        label: "Unknown",
        color: "#6c757d",
        precedence: 0,
    },
];

pub fn entry(status: ConnectionStatus) -> &'static StatusEntry {
    match status {
        ConnectionStatus::Api => &STATUS_TABLE[0],
        ConnectionStatus::P2pOnly => &STATUS_TABLE[1],
        ConnectionStatus::Offline => &STATUS_TABLE[2],
        ConnectionStatus::Unknown => &STATUS_TABLE[3],
    }
}

impl ConnectionStatus {
    pub fn precedence(&self) -> u8 {
        entry(*self).precedence
    }

    pub fn label(&self) -> &'static str {
        entry(*self).label
    }
}

/// Label and color handed to map markers and table badges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusStyle {
    pub status: ConnectionStatus,
    pub label: &'static str,
    pub color: String,
}

pub fn style(status: ConnectionStatus, theme: &Theme) -> StatusStyle {
    StatusStyle {
        status,
        label: status.label(),
        color: theme.status_color(status).to_string(),
    }
}

/// Representative status for a set of nodes: `Api > P2pOnly > Offline`,
/// `Unknown` when nothing better is present (including the empty set).
pub fn resolve<I>(statuses: I) -> ConnectionStatus
where
    I: IntoIterator<Item = ConnectionStatus>,
{
    let mut best = ConnectionStatus::Unknown;
    for status in statuses {
        if status.precedence() > best.precedence() {
            best = status;
            if best == ConnectionStatus::Api {
                break;
            }
        }
    }
    best
}

pub fn resolve_nodes<'a, I>(nodes: I) -> ConnectionStatus
where
    I: IntoIterator<Item = &'a Node>,
{
    resolve(nodes.into_iter().map(|node| node.connection_status))
}
