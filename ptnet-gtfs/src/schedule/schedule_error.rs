#[derive(thiserror::Error, Debug)]
pub enum ScheduleError {
    #[error("malformed schedule time '{0}': expected HH:MM:SS")]
    MalformedScheduleTime(String),
    #[error("shape {0} has no points in GTFS 'shapes.txt'")]
    MissingShape(String),
    #[error("missing lon,lat data and parent location for stop: {0}")]
    MissingStopLocation(String),
    #[error("expected stop index {0} not found in trip {1}")]
    MalformedTrip(usize, String),
}
