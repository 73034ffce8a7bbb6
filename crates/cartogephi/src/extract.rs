//! Single-pass node extraction.
//!
//! [`NodeExtractor`] folds [`GexfEvent`]s into an [`AggregateState`]: the search index, the
//! coordinate bounds, and per-cluster point lists and colors. A node is committed when its
//! position arrives. Open records form a stack so that hierarchical GEXF (`<node>` nested in
//! `<node><nodes>`) keeps the outer node alive until its own end tag; nested elements always
//! apply to the innermost open node.

use crate::bounds::PlaneBounds;
use crate::error::Result;
use crate::events::{GexfEvent, GexfEvents};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::str::FromStr;

pub const DEFAULT_MODULARITY_ATTRIBUTE: &str = "modularityclasses";

/// Cluster label of a node; `None` when the node carried no modularity attvalue.
pub type ClusterId = Option<String>;

pub type Rgb = [f64; 3];

/// Which node field feeds the search index key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchKey {
    #[default]
    Id,
    Label,
    /// An attvalue slot, matched against the attvalue `for` designator.
    Attribute(String),
}

impl FromStr for SearchKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "id" => Self::Id,
            "label" => Self::Label,
            other => Self::Attribute(other.to_string()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// The attvalue `for` designator carrying the cluster label.
    pub modularity_attribute: String,
    pub search_key: SearchKey,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            modularity_attribute: DEFAULT_MODULARITY_ATTRIBUTE.to_string(),
            search_key: SearchKey::Id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// A node that has been opened but not yet closed.
#[derive(Debug, Clone, Default)]
pub struct NodeRecord {
    pub id: String,
    pub label: String,
    pub search_key: Option<String>,
    pub cluster: ClusterId,
    pub position: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Default)]
pub struct AggregateState {
    /// Search key to position/label. Later nodes overwrite earlier ones with the same key.
    pub index: IndexMap<Option<String>, IndexEntry>,
    pub bounds: PlaneBounds,
    /// `(y, x)` points per cluster, in document order.
    pub cluster_points: IndexMap<ClusterId, Vec<[f64; 2]>>,
    /// First color seen per cluster.
    pub cluster_colors: FxHashMap<ClusterId, Rgb>,
    /// Nodes that closed without ever receiving a position.
    pub dropped_nodes: usize,
}

#[derive(Debug)]
pub struct NodeExtractor<'a> {
    options: &'a ExtractOptions,
    open: Vec<NodeRecord>,
    state: AggregateState,
}

impl<'a> NodeExtractor<'a> {
    pub fn new(options: &'a ExtractOptions) -> Self {
        Self {
            options,
            open: Vec::new(),
            state: AggregateState::default(),
        }
    }

    pub fn handle(&mut self, event: GexfEvent) {
        match event {
            GexfEvent::NodeStart { id, label } => {
                let search_key = match &self.options.search_key {
                    SearchKey::Id => Some(id.clone()),
                    SearchKey::Label => Some(label.clone()),
                    SearchKey::Attribute(_) => None,
                };
                self.open.push(NodeRecord {
                    id,
                    label,
                    search_key,
                    ..Default::default()
                });
            }
            GexfEvent::AttValue { key, value } => {
                let Some(node) = self.open.last_mut() else {
                    return;
                };
                let is_search = matches!(&self.options.search_key, SearchKey::Attribute(a) if *a == key);
                if key == self.options.modularity_attribute {
                    node.cluster = Some(value.clone());
                }
                if is_search {
                    node.search_key = Some(value);
                }
            }
            GexfEvent::Position { x, y } => {
                let Some(node) = self.open.last_mut() else {
                    return;
                };
                node.position = Some((x, y));
                self.state.bounds.update(x, y);
                self.state.index.insert(
                    node.search_key.clone(),
                    IndexEntry {
                        x,
                        y,
                        label: node.label.clone(),
                    },
                );
                self.state
                    .cluster_points
                    .entry(node.cluster.clone())
                    .or_default()
                    .push([y, x]);
            }
            GexfEvent::Color { r, g, b } => {
                let Some(node) = self.open.last_mut() else {
                    return;
                };
                if !self.state.cluster_colors.contains_key(&node.cluster) {
                    self.state
                        .cluster_colors
                        .insert(node.cluster.clone(), [r, g, b]);
                }
            }
            GexfEvent::NodeEnd => {
                if let Some(node) = self.open.pop() {
                    self.close(node);
                }
            }
        }
    }

    fn close(&mut self, node: NodeRecord) {
        if node.position.is_none() {
            tracing::debug!(id = %node.id, "node has no position; dropped");
            self.state.dropped_nodes += 1;
        }
    }

    pub fn finish(mut self) -> AggregateState {
        while let Some(node) = self.open.pop() {
            self.close(node);
        }
        self.state
    }
}

/// Reads a whole GEXF document and returns the accumulated state.
pub fn process<R: BufRead>(input: R, options: &ExtractOptions) -> Result<AggregateState> {
    let mut extractor = NodeExtractor::new(options);
    for event in GexfEvents::new(input) {
        extractor.handle(event?);
    }
    let state = extractor.finish();
    tracing::info!(
        indexed = state.index.len(),
        clusters = state.cluster_points.len(),
        dropped = state.dropped_nodes,
        "extracted nodes"
    );
    Ok(state)
}
