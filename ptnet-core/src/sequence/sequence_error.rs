use crate::graph::GraphError;

#[derive(thiserror::Error, Debug)]
pub enum SequenceError {
    #[error("route shape has fewer than two distinct points")]
    DegenerateShape,
    #[error("stops {0} and {1} could not be bracketed against the route shape")]
    UnbracketedStopPair(String, String),
    #[error("bracketed shape window contains no sampled points")]
    EmptyGapWindow,
    #[error(transparent)]
    GraphError(#[from] GraphError),
}
