mod geometry;
mod sequencer;

pub use geometry::{clamp, coordinate_label_origin, next_target_position, priming_origin};
pub use sequencer::{CalibrationSequencer, CalibrationStep, TargetMotion};
