use ptnet_core::model::NetworkError;

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error("failure reading '{path}': {message}")]
    ReadError { path: String, message: String },
    #[error("failure writing '{path}': {message}")]
    WriteError { path: String, message: String },
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("expected {expected} geometry, found {found}")]
    GeometryType { expected: String, found: String },
    #[error("route {0} not found in the mode lookup table")]
    UnknownRouteMode(String),
    #[error(transparent)]
    Network(#[from] NetworkError),
}
