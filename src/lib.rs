//! Four-point touchscreen calibration wizard.
//!
//! [`calibration`] holds the sequencing core; [`wizard`] renders it through a
//! [`host::CalibrationHost`]. With the `graphics` feature, [`scene`] provides
//! a ready host for `embedded-graphics` displays.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod calibration;
pub mod config;
pub mod events;
pub mod host;
#[cfg(feature = "graphics")]
pub mod scene;
pub mod types;
pub mod wizard;

pub use calibration::{CalibrationSequencer, CalibrationStep, TargetMotion};
pub use config::WizardConfig;
pub use events::WizardObserver;
pub use host::{AxisAnimation, CalibrationHost, RawTouchSource};
pub use types::{CalibrationPoint, CalibrationPoints, CalibrationState, Corner, WizardEvent};
pub use wizard::{CalibrationWizard, WizardDispatch};
