/// A touch location in raw (untransformed) touch-controller space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CalibrationPoint {
    pub x: i32,
    pub y: i32,
}

impl CalibrationPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Display corners in capture order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    pub const fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomRight => 2,
            Corner::BottomLeft => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomRight => "bottom-right",
            Corner::BottomLeft => "bottom-left",
        }
    }
}

/// The four raw points of one session, indexed by [`Corner::index`].
///
/// Slots are written once each, in corner order; `len` counts how many are
/// filled so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CalibrationPoints {
    points: [CalibrationPoint; 4],
    len: u8,
}

impl CalibrationPoints {
    pub const fn new() -> Self {
        Self {
            points: [CalibrationPoint::new(0, 0); 4],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_complete(&self) -> bool {
        self.len as usize == Corner::ALL.len()
    }

    pub fn get(&self, corner: Corner) -> Option<CalibrationPoint> {
        if corner.index() < self.len() {
            Some(self.points[corner.index()])
        } else {
            None
        }
    }

    /// All four points, only once every corner has been captured.
    pub fn complete(&self) -> Option<[CalibrationPoint; 4]> {
        self.is_complete().then_some(self.points)
    }

    /// Next corner waiting for a point, if any.
    pub fn next_corner(&self) -> Option<Corner> {
        Corner::ALL.get(self.len()).copied()
    }

    /// Stores `point` in the next free corner slot and returns that corner.
    pub(crate) fn push(&mut self, point: CalibrationPoint) -> Option<Corner> {
        let corner = self.next_corner()?;
        self.points[corner.index()] = point;
        self.len += 1;
        Some(corner)
    }
}

/// Where the calibration session currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationState {
    Start,
    AwaitTopLeft,
    AwaitTopRight,
    AwaitBottomRight,
    AwaitBottomLeft,
    AwaitLeave,
    Finished,
}

impl CalibrationState {
    /// Corner captured by the tap that leaves this state.
    pub const fn awaited_corner(self) -> Option<Corner> {
        match self {
            CalibrationState::AwaitTopLeft => Some(Corner::TopLeft),
            CalibrationState::AwaitTopRight => Some(Corner::TopRight),
            CalibrationState::AwaitBottomRight => Some(Corner::BottomRight),
            CalibrationState::AwaitBottomLeft => Some(Corner::BottomLeft),
            _ => None,
        }
    }
}

/// Notifications published by the wizard while a session runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardEvent {
    Started,
    PointCaptured {
        corner: Corner,
        point: CalibrationPoint,
    },
    AwaitingExit,
    /// Hand-off for whatever applies the calibration transform.
    Finished { points: [CalibrationPoint; 4] },
}
