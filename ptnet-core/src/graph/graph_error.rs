#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    #[error("no path from {source_node} to {target_node}")]
    NoPath { source_node: i64, target_node: i64 },
    #[error("node {0} is not in the graph")]
    MissingNode(i64),
}
