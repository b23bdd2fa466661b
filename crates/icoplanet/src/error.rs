use thiserror::Error;

/// Mesh adjacency that failed to resolve. Always fatal for the level being built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("face {face} has no edge connecting two of its points")]
    FaceEdgeMismatch { face: usize },
    #[error("edge {edge} was not split before its faces")]
    MissingMidpoint { edge: usize },
    #[error("face {face} was never subdivided")]
    FaceNotSplit { face: usize },
    #[error("edge {edge} has no sub-edge touching point {point}")]
    MissingSubEdge { edge: usize, point: usize },
    #[error("edge {edge} already borders two faces")]
    EdgeOverfull { edge: usize },
    #[error("edge {edge} borders fewer than two faces")]
    OpenEdge { edge: usize },
    #[error("faces {a} and {b} do not share an edge")]
    NoSharedEdge { a: usize, b: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanetError {
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("node density must lie in (0, 1), got {0}")]
    InvalidNodeDensity(f32),
    #[error("depth {requested} exceeds the maximum of {max}")]
    DepthOutOfRange { requested: usize, max: usize },
    #[error("corrupted mesh: {0}")]
    Topology(#[from] TopologyError),
    #[error("fault link {link} on face {face} ended with {connections} connections")]
    FaultInvariant {
        link: usize,
        face: usize,
        connections: usize,
    },
    #[error("level build cancelled")]
    Cancelled,
    #[error("config: {0}")]
    Config(String),
}
