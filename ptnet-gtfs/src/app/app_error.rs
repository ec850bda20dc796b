use crate::io::IoError;
use crate::schedule::ScheduleError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    ConfigurationError(String),
    #[error(transparent)]
    IoError(#[from] IoError),
    #[error("failed to read GTFS bundle: {0}")]
    GtfsReadError(#[from] gtfs_structures::Error),
    #[error(transparent)]
    ScheduleError(#[from] ScheduleError),
    #[error("{0}")]
    OtherError(String),
}
