use embedded_graphics::prelude::Size;
use statig::prelude::*;

use super::{CalibrationStep, SequencerEvent, StepContext, TargetMotion};
use crate::{
    calibration::geometry::{next_target_position, priming_origin},
    config::{
        INSTRUCTIONS_BOTTOM_LEFT, INSTRUCTIONS_BOTTOM_RIGHT, INSTRUCTIONS_LEAVE,
        INSTRUCTIONS_TOP_LEFT, INSTRUCTIONS_TOP_RIGHT,
    },
    types::{CalibrationPoint, CalibrationState, Corner},
};

/// Session geometry only; target and points travel in `StepContext`.
pub(super) struct SequencerHsm {
    display: Size,
    target_size: u32,
}

impl SequencerHsm {
    pub(super) fn new(display: Size, target_size: u32) -> Self {
        Self {
            display,
            target_size,
        }
    }
}

#[state_machine(initial = "State::start()")]
impl SequencerHsm {
    #[state]
    fn start(&mut self, context: &mut StepContext, event: &SequencerEvent) -> Outcome<State> {
        match event {
            SequencerEvent::Prime => {
                context.target = priming_origin(self.display);
                self.prompt(
                    context,
                    CalibrationState::Start,
                    CalibrationState::AwaitTopLeft,
                    Corner::TopLeft,
                    INSTRUCTIONS_TOP_LEFT,
                );
                Transition(State::await_top_left())
            }
            SequencerEvent::Tap { .. } => Handled,
        }
    }

    #[state]
    fn await_top_left(
        &mut self,
        context: &mut StepContext,
        event: &SequencerEvent,
    ) -> Outcome<State> {
        match event {
            SequencerEvent::Tap { raw } => {
                self.capture(context, *raw);
                self.prompt(
                    context,
                    CalibrationState::AwaitTopLeft,
                    CalibrationState::AwaitTopRight,
                    Corner::TopRight,
                    INSTRUCTIONS_TOP_RIGHT,
                );
                Transition(State::await_top_right())
            }
            SequencerEvent::Prime => Handled,
        }
    }

    #[state]
    fn await_top_right(
        &mut self,
        context: &mut StepContext,
        event: &SequencerEvent,
    ) -> Outcome<State> {
        match event {
            SequencerEvent::Tap { raw } => {
                self.capture(context, *raw);
                self.prompt(
                    context,
                    CalibrationState::AwaitTopRight,
                    CalibrationState::AwaitBottomRight,
                    Corner::BottomRight,
                    INSTRUCTIONS_BOTTOM_RIGHT,
                );
                Transition(State::await_bottom_right())
            }
            SequencerEvent::Prime => Handled,
        }
    }

    #[state]
    fn await_bottom_right(
        &mut self,
        context: &mut StepContext,
        event: &SequencerEvent,
    ) -> Outcome<State> {
        match event {
            SequencerEvent::Tap { raw } => {
                self.capture(context, *raw);
                self.prompt(
                    context,
                    CalibrationState::AwaitBottomRight,
                    CalibrationState::AwaitBottomLeft,
                    Corner::BottomLeft,
                    INSTRUCTIONS_BOTTOM_LEFT,
                );
                Transition(State::await_bottom_left())
            }
            SequencerEvent::Prime => Handled,
        }
    }

    #[state]
    fn await_bottom_left(
        &mut self,
        context: &mut StepContext,
        event: &SequencerEvent,
    ) -> Outcome<State> {
        match event {
            SequencerEvent::Tap { raw } => {
                self.capture(context, *raw);
                context.step = Some(CalibrationStep::AwaitFinalTap {
                    instructions: INSTRUCTIONS_LEAVE,
                });
                context.entered = Some(CalibrationState::AwaitLeave);
                Transition(State::await_leave())
            }
            SequencerEvent::Prime => Handled,
        }
    }

    #[state]
    fn await_leave(&mut self, context: &mut StepContext, event: &SequencerEvent) -> Outcome<State> {
        match event {
            SequencerEvent::Tap { .. } => {
                let Some(points) = context.points.complete() else {
                    return Handled;
                };
                context.step = Some(CalibrationStep::Finished { points });
                context.entered = Some(CalibrationState::Finished);
                Transition(State::finished())
            }
            SequencerEvent::Prime => Handled,
        }
    }

    #[state]
    fn finished(&mut self, context: &mut StepContext, event: &SequencerEvent) -> Outcome<State> {
        let _ = (context, event);
        Handled
    }
}

impl SequencerHsm {
    fn capture(&self, context: &mut StepContext, raw: CalibrationPoint) {
        if let Some(corner) = context.points.push(raw) {
            context.captured = Some((corner, raw));
        }
    }

    fn prompt(
        &self,
        context: &mut StepContext,
        leaving: CalibrationState,
        entering: CalibrationState,
        corner: Corner,
        instructions: &'static str,
    ) {
        let from = context.target;
        let to = next_target_position(leaving, from, self.display, self.target_size);
        let motion = if from != to {
            context.target = to;
            TargetMotion::Animate { from, to }
        } else {
            TargetMotion::Hide
        };
        context.step = Some(CalibrationStep::Continue {
            instructions,
            motion,
            corner,
        });
        context.entered = Some(entering);
    }
}
