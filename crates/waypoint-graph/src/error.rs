use thiserror::Error;

pub type Result<T, E = GraphError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("edge {from} -> {to} references unknown node: {node}")]
    UnknownNode {
        from: String,
        to: String,
        node: String,
    },
    #[error("edge {from} -> {to} has negative weight {weight}")]
    NegativeWeight {
        from: String,
        to: String,
        weight: f64,
    },
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),
    #[error("no route from {source} to {destination}")]
    NoRoute { source: String, destination: String },
}
