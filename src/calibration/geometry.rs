use embedded_graphics::prelude::{Point, Size};

use crate::types::CalibrationState;

/// Bounds `value` to `[min, max]`.
///
/// On an empty range (`min > max`) values below `min` give `min` and values
/// above `max` give `max`.
#[inline]
pub fn clamp(value: i32, min: i32, max: i32) -> i32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Where the target sits before the first animation: the display centre.
pub fn priming_origin(display: Size) -> Point {
    Point::new(display.width as i32 / 2, display.height as i32 / 2)
}

/// Destination of the target once `state` has consumed its input.
///
/// Destinations walk the corners clockwise from the top-left, independent of
/// `current`; only the last capture leaves the target where it is.
pub fn next_target_position(
    state: CalibrationState,
    current: Point,
    display: Size,
    target_size: u32,
) -> Point {
    let far_x = display.width as i32 - target_size as i32;
    let far_y = display.height as i32 - target_size as i32;
    match state {
        CalibrationState::Start => Point::zero(),
        CalibrationState::AwaitTopLeft => Point::new(far_x, 0),
        CalibrationState::AwaitTopRight => Point::new(far_x, far_y),
        CalibrationState::AwaitBottomRight => Point::new(0, far_y),
        CalibrationState::AwaitBottomLeft
        | CalibrationState::AwaitLeave
        | CalibrationState::Finished => current,
    }
}

/// Top-left of a coordinate readout shown next to `anchor`, kept fully on
/// screen with `margin` pixels to spare.
pub fn coordinate_label_origin(anchor: Point, label: Size, display: Size, margin: i32) -> Point {
    let max_x = display.width as i32 - label.width as i32 - margin;
    let max_y = display.height as i32 - label.height as i32 - margin;
    Point::new(
        clamp(anchor.x, margin, max_x),
        clamp(anchor.y, margin, max_y),
    )
}
