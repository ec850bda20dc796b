#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    #[error("link ({0}, {1}) references node {2} which is not in the node table")]
    MissingLinkEndpoint(i64, i64, i64),
    #[error("node id {0} already present with different coordinates")]
    ConflictingNodeId(i64),
}
