//! Services the wizard borrows from the surrounding UI toolkit.

use core::fmt::Debug;

use embassy_time::Duration;
use embedded_graphics::prelude::{Point, Size};

use crate::types::CalibrationPoint;

/// How a label places itself on its screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelAlign {
    /// Centred on the screen, outside any layout.
    Center,
    /// Positioned explicitly with [`CalibrationHost::set_position`].
    Manual,
}

/// Object and screen management the wizard needs from its host toolkit.
///
/// Creation calls are the only fallible ones; the wizard propagates
/// `Self::Error` and leaves recovery to the host.
pub trait CalibrationHost {
    type Screen: Copy + PartialEq + Debug;
    type Object: Copy + PartialEq + Debug;
    type Error: Debug;

    fn display_size(&self) -> Size;

    fn active_screen(&self) -> Self::Screen;
    /// A bare full-display screen: no styles, no layout of children.
    fn create_screen(&mut self) -> Result<Self::Screen, Self::Error>;
    fn load_screen(&mut self, screen: Self::Screen);
    /// Deletes `screen` along with every object created on it.
    fn delete_screen(&mut self, screen: Self::Screen);

    /// A transparent full-display surface whose clicks reach the wizard.
    fn create_hit_surface(&mut self, screen: Self::Screen) -> Result<Self::Object, Self::Error>;
    fn create_label(
        &mut self,
        screen: Self::Screen,
        align: LabelAlign,
    ) -> Result<Self::Object, Self::Error>;
    /// A non-clickable circle of the given diameter.
    fn create_target(
        &mut self,
        screen: Self::Screen,
        diameter: u32,
    ) -> Result<Self::Object, Self::Error>;

    fn set_label_text(&mut self, label: Self::Object, text: &str);
    /// Laid-out size of `object`, including freshly set label text.
    fn object_size(&mut self, object: Self::Object) -> Size;
    fn position(&self, object: Self::Object) -> Point;
    fn set_position(&mut self, object: Self::Object, position: Point);
    fn set_hidden(&mut self, object: Self::Object, hidden: bool);
    fn move_foreground(&mut self, object: Self::Object);

    /// Starts a fire-and-forget animation driven by the host's scheduler.
    fn animate(&mut self, animation: AxisAnimation<Self::Object>);
}

/// The input subsystem, queried for the most recent touch.
pub trait RawTouchSource {
    /// Hardware-space coordinate of the last event, before any calibration
    /// transform. `None` when no input device is active.
    fn raw_point(&mut self) -> Option<CalibrationPoint>;
}

impl<F> RawTouchSource for F
where
    F: FnMut() -> Option<CalibrationPoint>,
{
    fn raw_point(&mut self) -> Option<CalibrationPoint> {
        self()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Moves one coordinate of one object between two values over time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisAnimation<O> {
    pub object: O,
    pub axis: Axis,
    pub from: i32,
    pub to: i32,
    pub delay: Duration,
    pub duration: Duration,
}

impl<O: Copy> AxisAnimation<O> {
    /// The pair of animations that carries `object` from `from` to `to`.
    pub fn pair(
        object: O,
        from: Point,
        to: Point,
        delay: Duration,
        duration: Duration,
    ) -> [AxisAnimation<O>; 2] {
        [
            AxisAnimation {
                object,
                axis: Axis::X,
                from: from.x,
                to: to.x,
                delay,
                duration,
            },
            AxisAnimation {
                object,
                axis: Axis::Y,
                from: from.y,
                to: to.y,
                delay,
                duration,
            },
        ]
    }

    /// Linear value `elapsed` after the animation was started; `None` while
    /// still in the delay.
    pub fn value_at(&self, elapsed: Duration) -> Option<i32> {
        let running = elapsed.checked_sub(self.delay)?;
        let total = self.duration.as_micros();
        let done = running.as_micros();
        if total == 0 || done >= total {
            return Some(self.to);
        }
        let span = i64::from(self.to) - i64::from(self.from);
        let offset = span * done as i64 / total as i64;
        Some((i64::from(self.from) + offset) as i32)
    }

    pub fn is_done(&self, elapsed: Duration) -> bool {
        elapsed >= self.delay + self.duration
    }

    /// Writes `value` into the animated axis, keeping the other one.
    pub fn apply<H>(&self, host: &mut H, value: i32)
    where
        H: CalibrationHost<Object = O> + ?Sized,
    {
        let current = host.position(self.object);
        let next = match self.axis {
            Axis::X => Point::new(value, current.y),
            Axis::Y => Point::new(current.x, value),
        };
        host.set_position(self.object, next);
    }
}
