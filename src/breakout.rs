use std::f64::consts::TAU;

use crate::node::LatLng;

/// Spread `count` points evenly on a circle of `radius` degrees around
/// `center`, starting due north and going clockwise (`lat + r·cos θ`,
/// `lng + r·sin θ`). A single member stays on the center.
pub fn breakout_positions(center: LatLng, count: usize, radius: f64) -> Vec<LatLng> {
    match count {
        0 => Vec::new(),
        1 => vec![center],
        _ => {
            let step = TAU / count as f64;
            (0..count)
                .map(|i| {
                    let angle = step * i as f64;
                    LatLng::new(
                        center.lat + radius * angle.cos(),
                        center.lng + radius * angle.sin(),
                    )
                })
                .collect()
        }
    }
}
