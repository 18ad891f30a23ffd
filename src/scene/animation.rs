use embassy_time::{Duration, Instant};
use heapless::Vec;

use super::ObjectId;
use crate::{config::SCENE_MAX_ANIMATIONS, host::AxisAnimation};

#[derive(Clone, Copy, Debug)]
struct Running {
    animation: AxisAnimation<ObjectId>,
    started: Instant,
}

/// Axis animations in flight, stepped from the scene clock.
pub(super) struct AnimationScheduler {
    running: Vec<Running, SCENE_MAX_ANIMATIONS>,
}

impl AnimationScheduler {
    pub(super) const fn new() -> Self {
        Self {
            running: Vec::new(),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.running.len()
    }

    /// Starting an animation replaces any running one on the same object
    /// and axis. Hands the animation back when every slot is taken.
    pub(super) fn start(
        &mut self,
        animation: AxisAnimation<ObjectId>,
        now: Instant,
    ) -> Result<(), AxisAnimation<ObjectId>> {
        self.running.retain(|running| {
            running.animation.object != animation.object
                || running.animation.axis != animation.axis
        });
        self.running
            .push(Running {
                animation,
                started: now,
            })
            .map_err(|running| running.animation)
    }

    pub(super) fn cancel(&mut self, object: ObjectId) {
        self.running
            .retain(|running| running.animation.object != object);
    }

    /// Values due at `now`; finished animations are dropped after their
    /// final value is reported.
    pub(super) fn step(
        &mut self,
        now: Instant,
    ) -> Vec<(AxisAnimation<ObjectId>, i32), SCENE_MAX_ANIMATIONS> {
        let mut due = Vec::new();
        for running in &self.running {
            let elapsed = elapsed_since(running.started, now);
            if let Some(value) = running.animation.value_at(elapsed) {
                let _ = due.push((running.animation, value));
            }
        }
        self.running
            .retain(|running| !running.animation.is_done(elapsed_since(running.started, now)));
        due
    }
}

fn elapsed_since(started: Instant, now: Instant) -> Duration {
    now.checked_duration_since(started)
        .unwrap_or(Duration::from_ticks(0))
}
