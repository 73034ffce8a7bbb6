//! Builds the Leaflet map descriptor from extracted state.

use crate::bounds::PlaneBounds;
use crate::error::{Error, Result};
use crate::extract::{AggregateState, IndexEntry, Rgb};
use crate::hull;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Clusters with fewer points than this get no hull.
pub const MIN_HULL_POINTS: usize = 5;

pub const DEFAULT_OUTPUT_FILE: &str = "cartogephi.json";

/// Object key used for nodes with no cluster or no search key.
pub const UNSET_KEY: &str = "null";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modularity {
    /// `(y, x)` hull vertices, counter-clockwise.
    pub hull: Vec<[f64; 2]>,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDescriptor {
    pub index: IndexMap<String, IndexEntry>,
    pub img_file: String,
    pub modularities: IndexMap<String, Modularity>,
    /// `[[y_min, x_min], [y_max, x_max]]`
    pub leaflet_config: [[f64; 2]; 2],
}

impl MapDescriptor {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Writes the descriptor next to `path` first and renames it into place, so readers never
    /// observe a half-written file.
    pub fn write_to(&self, path: &Path, pretty: bool) -> Result<()> {
        let text = self.to_json(pretty)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp);
        std::fs::write(&tmp, text)?;
        if let Err(err) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(err.into());
        }
        Ok(())
    }
}

fn key_name(key: &Option<String>) -> String {
    key.clone().unwrap_or_else(|| UNSET_KEY.to_string())
}

/// Pads the shorter axis of `bounds` so both axes span the same extent, keeping the content
/// centered.
pub fn square_frame(bounds: &PlaneBounds) -> PlaneBounds {
    let zero = bounds.rebase();
    let max_side = zero.y.max.max(zero.x.max);
    PlaneBounds {
        x: bounds.x.pad((zero.x.max - max_side).abs() / 2.0),
        y: bounds.y.pad((zero.y.max - max_side).abs() / 2.0),
    }
}

/// Hull and color for every cluster with at least [`MIN_HULL_POINTS`] points.
pub fn cluster_hulls(state: &AggregateState) -> Result<IndexMap<String, Modularity>> {
    let mut out = IndexMap::new();
    for (cluster, points) in &state.cluster_points {
        if points.len() < MIN_HULL_POINTS {
            tracing::debug!(
                cluster = %key_name(cluster),
                points = points.len(),
                "too few points for a hull"
            );
            continue;
        }
        let Some(hull) = hull::convex_hull(points) else {
            return Err(Error::DegenerateGeometry {
                cluster: key_name(cluster),
                points: points.len(),
            });
        };
        let Some(&color) = state.cluster_colors.get(cluster) else {
            return Err(Error::MissingColor {
                cluster: key_name(cluster),
            });
        };
        out.insert(key_name(cluster), Modularity { hull, color });
    }
    Ok(out)
}

pub fn build(state: &AggregateState, img_file: &str) -> Result<MapDescriptor> {
    // Non-finite values would serialize as JSON `null`.
    if let Some((key, _)) = state
        .index
        .iter()
        .find(|(_, e)| !(e.x.is_finite() && e.y.is_finite()))
    {
        return Err(Error::NonFiniteCoordinate {
            location: format!("index entry {:?}", key_name(key)),
        });
    }
    if state.bounds.is_empty() {
        if state.index.is_empty() {
            return Err(Error::EmptyGraph);
        }
        // A NaN position that was later overwritten in the index still poisons the bounds.
        return Err(Error::NonFiniteCoordinate {
            location: "node bounds".to_string(),
        });
    }
    let frame = square_frame(&state.bounds);
    if !frame.is_finite() {
        return Err(Error::NonFiniteCoordinate {
            location: "viewer frame".to_string(),
        });
    }
    let modularities = cluster_hulls(state)?;
    tracing::info!(
        hulls = modularities.len(),
        skipped = state.cluster_points.len() - modularities.len(),
        "built cluster hulls"
    );

    let index = state
        .index
        .iter()
        .map(|(k, v)| (key_name(k), v.clone()))
        .collect();

    Ok(MapDescriptor {
        index,
        img_file: img_file.to_string(),
        modularities,
        leaflet_config: [
            [frame.y.min, frame.x.min],
            [frame.y.max, frame.x.max],
        ],
    })
}
