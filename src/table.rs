use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::node::Node;
use crate::version::compare_versions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Address,
    Country,
    City,
    ServerVersion,
    VersionNumber,
    BurnBlockHeight,
    LastSeen,
    Status,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        Self::Address,
        Self::Country,
        Self::City,
        Self::ServerVersion,
        Self::VersionNumber,
        Self::BurnBlockHeight,
        Self::LastSeen,
        Self::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Country => "country",
            Self::City => "city",
            Self::ServerVersion => "server_version",
            Self::VersionNumber => "version_number",
            Self::BurnBlockHeight => "burn_block_height",
            Self::LastSeen => "last_seen",
            Self::Status => "status",
        }
    }

    fn compare(&self, a: &Node, b: &Node) -> Ordering {
        match self {
            Self::Address => a.address.cmp(&b.address),
            Self::Country => text(a.country()).cmp(text(b.country())),
            Self::City => text(a.city()).cmp(text(b.city())),
            Self::ServerVersion => {
                text(a.server_version.as_deref()).cmp(text(b.server_version.as_deref()))
            }
            Self::VersionNumber => {
                compare_versions(a.server_version.as_deref(), b.server_version.as_deref())
            }
            Self::BurnBlockHeight => a
                .burn_block_height
                .unwrap_or(0)
                .cmp(&b.burn_block_height.unwrap_or(0)),
            Self::LastSeen => text(a.last_seen.as_deref()).cmp(text(b.last_seen.as_deref())),
            Self::Status => a
                .connection_status
                .precedence()
                .cmp(&b.connection_status.precedence()),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().replace('-', "_").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == token)
            .ok_or_else(|| Error::UnknownField {
                kind: "sort field",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(Error::UnknownField {
                kind: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

/// Field the categorical filter compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    #[default]
    ServerVersion,
    Country,
    City,
    Status,
}

impl FilterField {
    fn value<'n>(&self, node: &'n Node) -> &'n str {
        match self {
            Self::ServerVersion => text(node.server_version.as_deref()),
            Self::Country => text(node.country()),
            Self::City => text(node.city()),
            Self::Status => node.connection_status.as_str(),
        }
    }
}

impl FromStr for FilterField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").to_ascii_lowercase().as_str() {
            "server_version" | "version" => Ok(Self::ServerVersion),
            "country" => Ok(Self::Country),
            "city" => Ok(Self::City),
            "status" | "connection_status" => Ok(Self::Status),
            _ => Err(Error::UnknownField {
                kind: "filter field",
                value: s.to_string(),
            }),
        }
    }
}

/// Every user-controlled input of the list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    pub search_term: String,
    pub filter_field: FilterField,
    pub filter_value: Option<String>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl ViewParams {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            ..Default::default()
        }
    }
}

fn text(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

/// Case-insensitive substring match on address, city and country.
pub fn matches_search(node: &Node, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    let hit = |haystack: &str| haystack.to_lowercase().contains(&needle);
    hit(node.address.as_str()) || node.city().is_some_and(hit) || node.country().is_some_and(hit)
}

fn matches_filter(node: &Node, field: FilterField, value: Option<&str>) -> bool {
    match value {
        None | Some("") => true,
        Some(wanted) => field.value(node) == wanted,
    }
}

/// Rows of the list view: search, then categorical filter, then a stable
/// sort on the selected field. Recomputed from scratch on every call.
pub fn view<'a, I>(nodes: I, params: &ViewParams) -> Vec<&'a Node>
where
    I: IntoIterator<Item = &'a Node>,
{
    let filter_value = params.filter_value.as_deref();
    let mut rows: Vec<&'a Node> = nodes
        .into_iter()
        .filter(|node| matches_search(node, &params.search_term))
        .filter(|node| matches_filter(node, params.filter_field, filter_value))
        .collect();

    let field = params.sort_field;
    rows.sort_by(|a, b| {
        let ord = field.compare(a, b);
        match params.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    tracing::debug!(rows = rows.len(), sort = %field, "computed list view");
    rows
}

/// Split rows into the "geo-located" and "without location" sections,
/// keeping their order.
pub fn split_by_location<'a>(rows: &[&'a Node]) -> (Vec<&'a Node>, Vec<&'a Node>) {
    rows.iter().copied().partition(|node| node.location.is_some())
}

/// Distinct values of `field` in first-seen order, for populating the filter
/// dropdown. Empty values are left out.
pub fn filter_options<'a, I>(nodes: I, field: FilterField) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a Node>,
{
    let mut options: Vec<&'a str> = Vec::new();
    for node in nodes {
        let value = field.value(node);
        if !value.is_empty() && !options.contains(&value) {
            options.push(value);
        }
    }
    options
}
