use embedded_graphics::prelude::{Point, Size};
use statig::blocking::IntoStateMachineExt as _;

use super::geometry::priming_origin;
use crate::types::{CalibrationPoint, CalibrationPoints, CalibrationState, Corner};

mod hsm;

use hsm::SequencerHsm;

/// How the target marker should get to its next position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetMotion {
    Animate { from: Point, to: Point },
    /// The target would not move; hide it instead of animating in place.
    Hide,
}

/// What the presentation layer should do after one sequencer input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationStep {
    Continue {
        instructions: &'static str,
        motion: TargetMotion,
        /// Corner the user is asked to tap next.
        corner: Corner,
    },
    /// All four corners are in; one more tap closes the session.
    AwaitFinalTap { instructions: &'static str },
    Finished { points: [CalibrationPoint; 4] },
}

#[derive(Clone, Copy, Debug)]
enum SequencerEvent {
    Prime,
    Tap { raw: CalibrationPoint },
}

/// Per-input working set handed to the HSM. The sequencer owns the session
/// data; handlers edit this copy and the sequencer stores it back.
#[derive(Clone, Copy, Debug)]
struct StepContext {
    target: Point,
    points: CalibrationPoints,
    step: Option<CalibrationStep>,
    entered: Option<CalibrationState>,
    captured: Option<(Corner, CalibrationPoint)>,
}

impl StepContext {
    fn new(target: Point, points: CalibrationPoints) -> Self {
        Self {
            target,
            points,
            step: None,
            entered: None,
            captured: None,
        }
    }
}

/// Drives one calibration session from `Start` to `Finished`.
///
/// Every accepted input both records its result and produces the next
/// prompt, so callers never observe a half-advanced session.
pub struct CalibrationSequencer {
    machine: statig::blocking::StateMachine<SequencerHsm>,
    state: CalibrationState,
    target: Point,
    points: CalibrationPoints,
}

impl CalibrationSequencer {
    pub fn new(display: Size, target_size: u32) -> Self {
        Self {
            machine: SequencerHsm::new(display, target_size).state_machine(),
            state: CalibrationState::Start,
            target: priming_origin(display),
            points: CalibrationPoints::new(),
        }
    }

    /// Places the first target. Has no effect once the session is primed.
    pub fn prime(&mut self) -> Option<CalibrationStep> {
        self.dispatch(SequencerEvent::Prime)
    }

    /// Feeds the raw coordinate of one tap. Taps before priming or after the
    /// session finished are ignored.
    pub fn tap(&mut self, raw: CalibrationPoint) -> Option<CalibrationStep> {
        self.dispatch(SequencerEvent::Tap { raw })
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// Position the target was last sent to, in display space.
    pub fn target(&self) -> Point {
        self.target
    }

    pub fn points(&self) -> &CalibrationPoints {
        &self.points
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, CalibrationState::Finished)
    }

    fn dispatch(&mut self, event: SequencerEvent) -> Option<CalibrationStep> {
        let mut context = StepContext::new(self.target, self.points);
        self.machine.handle_with_context(&event, &mut context);

        if let Some((corner, point)) = context.captured {
            log::debug!(
                "calibration: {} captured at {}, {}",
                corner.label(),
                point.x,
                point.y
            );
        }
        if let Some(state) = context.entered {
            log::debug!("calibration: {:?} -> {:?}", self.state, state);
            self.state = state;
        }
        self.target = context.target;
        self.points = context.points;
        context.step
    }
}
