#![forbid(unsafe_code)]

//! Gephi GEXF export to Leaflet map descriptor.
//!
//! The pipeline is a single forward pass over the document ([`extract::process`]) followed by
//! a post-processing step ([`descriptor::build`]) that squares the viewer frame and computes a
//! convex hull per populated cluster. [`generate`] runs both.

pub mod bounds;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod extract;
pub mod hull;

pub use bounds::{PlaneBounds, ScalarRange};
pub use descriptor::{
    DEFAULT_OUTPUT_FILE, MIN_HULL_POINTS, MapDescriptor, Modularity, UNSET_KEY, build,
};
pub use error::{Error, Result};
pub use events::{GexfEvent, GexfEvents};
pub use extract::{
    AggregateState, DEFAULT_MODULARITY_ATTRIBUTE, ExtractOptions, IndexEntry, NodeExtractor,
    SearchKey, process,
};

use std::io::BufRead;

/// Reads a GEXF document and builds the descriptor for `img_file`.
pub fn generate<R: BufRead>(
    input: R,
    img_file: &str,
    options: &ExtractOptions,
) -> Result<MapDescriptor> {
    let state = extract::process(input, options)?;
    descriptor::build(&state, img_file)
}
