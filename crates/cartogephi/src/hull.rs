//! Convex hull over `(y, x)` point lists, backed by `geo`.

use geo::{ConvexHull, Coord, MultiPoint, Point};

/// Convex hull of `points`, counter-clockwise, without the closing vertex.
///
/// Returns `None` when the points do not span a 2-D region: fewer than three distinct points,
/// all points on one line, or any non-finite coordinate.
pub fn convex_hull(points: &[[f64; 2]]) -> Option<Vec<[f64; 2]>> {
    if !spans_plane(points) {
        return None;
    }

    let cloud: MultiPoint<f64> = points
        .iter()
        .map(|&[a, b]| Point::new(a, b))
        .collect::<Vec<_>>()
        .into();
    let polygon = cloud.convex_hull();

    let mut ring: Vec<Coord<f64>> = polygon.exterior().coords().copied().collect();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return None;
    }
    Some(ring.into_iter().map(|c| [c.x, c.y]).collect())
}

fn spans_plane(points: &[[f64; 2]]) -> bool {
    if points.iter().flatten().any(|v| !v.is_finite()) {
        return false;
    }
    let Some(&origin) = points.first() else {
        return false;
    };
    let Some(&other) = points.iter().find(|p| **p != origin) else {
        return false;
    };
    let (dx, dy) = (other[0] - origin[0], other[1] - origin[1]);
    points
        .iter()
        .any(|p| dx * (p[1] - origin[1]) - dy * (p[0] - origin[0]) != 0.0)
}
