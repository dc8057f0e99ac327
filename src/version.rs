use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

static VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)*").unwrap());

/// Numeric components of the first dotted number in a server version string,
/// e.g. `stacks-node 2.05.0.1.0 (master:…)` → `[2, 5, 0, 1, 0]`.
pub fn version_components(version: &str) -> Vec<u64> {
    let Some(found) = VERSION_RE.find(version) else {
        return Vec::new();
    };
    found
        .as_str()
        .split('.')
        .map(|part| part.parse::<u64>().unwrap_or(u64::MAX))
        .collect()
}

/// Compare component lists, treating missing trailing components as 0.
pub fn compare_components(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for idx in 0..len {
        let left = a.get(idx).copied().unwrap_or(0);
        let right = b.get(idx).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

pub fn compare_versions(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.map(version_components).unwrap_or_default();
    let b = b.map(version_components).unwrap_or_default();
    compare_components(&a, &b)
}
