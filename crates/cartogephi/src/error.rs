pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed GEXF document (byte {position}): {message}")]
    MalformedDocument { position: u64, message: String },

    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("<{element}> attribute `{attribute}` is not a number: {value:?}")]
    InvalidNumber {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("cluster {cluster:?} has {points} points but they do not span a 2-D hull")]
    DegenerateGeometry { cluster: String, points: usize },

    #[error("document contains no positioned nodes")]
    EmptyGraph,

    #[error("non-finite coordinate in {location}")]
    NonFiniteCoordinate { location: String },

    #[error("cluster {cluster:?} has a hull but no viz:color")]
    MissingColor { cluster: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
