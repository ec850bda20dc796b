mod gap_ops;
mod params;
mod sequence_error;
mod sequencer;
mod shape_points;

pub use params::SequenceParams;
pub use sequence_error::SequenceError;
pub use sequencer::sequence_route;
pub use shape_points::{GapWindow, ShapePoints};
