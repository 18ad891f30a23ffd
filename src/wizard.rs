//! Presentation side of a calibration session.
//!
//! The wizard owns everything it puts on screen and renders whatever the
//! [`CalibrationSequencer`] asks for. Hosts call [`CalibrationWizard::start`]
//! once and [`CalibrationWizard::on_tap`] for every click on the hit surface.

use core::fmt::Write;

use embedded_graphics::prelude::{Point, Size};
use heapless::String;

use crate::{
    calibration::{coordinate_label_origin, CalibrationSequencer, CalibrationStep, TargetMotion},
    config::{WizardConfig, COORD_LABEL_TEXT_MAX},
    events::WizardObserver,
    host::{AxisAnimation, CalibrationHost, LabelAlign, RawTouchSource},
    types::{CalibrationPoint, CalibrationPoints, CalibrationState, WizardEvent},
};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardDispatch {
    /// The session already ended; nothing happened.
    Inactive,
    Consumed,
    /// This tap ended the session and restored the previous screen.
    Finished,
}

struct SessionObjects<H: CalibrationHost> {
    screen: H::Screen,
    hit_surface: H::Object,
    instructions: H::Object,
    target: H::Object,
}

impl<H: CalibrationHost> Clone for SessionObjects<H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: CalibrationHost> Copy for SessionObjects<H> {}

/// One calibration session: the sequencer plus the screen it runs on.
pub struct CalibrationWizard<H: CalibrationHost, O: WizardObserver> {
    config: WizardConfig,
    display: Size,
    sequencer: CalibrationSequencer,
    previous_screen: H::Screen,
    objects: Option<SessionObjects<H>>,
    observer: O,
}

impl<H: CalibrationHost, O: WizardObserver> CalibrationWizard<H, O> {
    /// Takes over the display and shows the first target.
    pub fn start(host: &mut H, config: WizardConfig, mut observer: O) -> Result<Self, H::Error> {
        let previous_screen = host.active_screen();
        let display = host.display_size();

        let screen = host.create_screen()?;
        host.load_screen(screen);
        let objects = match build_objects(host, screen, &config) {
            Ok(objects) => objects,
            Err(err) => {
                host.load_screen(previous_screen);
                host.delete_screen(screen);
                return Err(err);
            }
        };

        log::info!(
            "calibration: started on {}x{} display",
            display.width,
            display.height
        );
        observer.notify(WizardEvent::Started);

        let mut wizard = Self {
            config,
            display,
            sequencer: CalibrationSequencer::new(display, config.target_size),
            previous_screen,
            objects: Some(objects),
            observer,
        };
        if let Some(step) = wizard.sequencer.prime() {
            wizard.render(host, objects, step);
        }
        Ok(wizard)
    }

    /// Handles one click on the hit surface.
    pub fn on_tap<I>(&mut self, host: &mut H, input: &mut I) -> Result<WizardDispatch, H::Error>
    where
        I: RawTouchSource + ?Sized,
    {
        let Some(objects) = self.objects else {
            return Ok(WizardDispatch::Inactive);
        };

        let anchor = self.sequencer.target();
        let awaited = self.sequencer.state().awaited_corner();
        let raw = if awaited.is_some() {
            log::debug!("calibration: target location is at {}, {}", anchor.x, anchor.y);
            let Some(raw) = input.raw_point() else {
                log::warn!("calibration: tap without an active input device ignored");
                return Ok(WizardDispatch::Consumed);
            };
            log::debug!("calibration: touch at {}, {}", raw.x, raw.y);
            self.show_readout(host, objects.screen, anchor, raw)?;
            raw
        } else {
            // The leave tap records nothing; no device is needed to end.
            CalibrationPoint::default()
        };

        let Some(step) = self.sequencer.tap(raw) else {
            return Ok(WizardDispatch::Consumed);
        };
        if let Some(corner) = awaited {
            self.observer.notify(WizardEvent::PointCaptured { corner, point: raw });
        }

        match step {
            CalibrationStep::Finished { points } => {
                self.finish(host, objects, points);
                Ok(WizardDispatch::Finished)
            }
            step => {
                self.render(host, objects, step);
                Ok(WizardDispatch::Consumed)
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.objects.is_some()
    }

    pub fn state(&self) -> CalibrationState {
        self.sequencer.state()
    }

    pub fn points(&self) -> &CalibrationPoints {
        self.sequencer.points()
    }

    /// The click-capturing surface hosts route taps from.
    pub fn hit_surface(&self) -> Option<H::Object> {
        self.objects.map(|objects| objects.hit_surface)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    fn show_readout(
        &mut self,
        host: &mut H,
        screen: H::Screen,
        anchor: Point,
        raw: CalibrationPoint,
    ) -> Result<(), H::Error> {
        let mut text: String<COORD_LABEL_TEXT_MAX> = String::new();
        let _ = write!(&mut text, "x: {}\ny: {}", raw.x, raw.y);

        let label = host.create_label(screen, LabelAlign::Manual)?;
        host.set_label_text(label, &text);
        let size = host.object_size(label);
        host.set_position(
            label,
            coordinate_label_origin(anchor, size, self.display, self.config.label_margin),
        );
        Ok(())
    }

    fn render(&mut self, host: &mut H, objects: SessionObjects<H>, step: CalibrationStep) {
        match step {
            CalibrationStep::Continue {
                instructions,
                motion,
                ..
            } => {
                host.set_label_text(objects.instructions, instructions);
                match motion {
                    TargetMotion::Animate { from, to } => {
                        log::debug!(
                            "calibration: animating from {}, {} to {}, {}",
                            from.x,
                            from.y,
                            to.x,
                            to.y
                        );
                        host.set_position(objects.target, from);
                        for animation in AxisAnimation::pair(
                            objects.target,
                            from,
                            to,
                            self.config.anim_delay,
                            self.config.anim_duration,
                        ) {
                            host.animate(animation);
                        }
                        host.move_foreground(objects.target);
                    }
                    TargetMotion::Hide => host.set_hidden(objects.target, true),
                }
            }
            CalibrationStep::AwaitFinalTap { instructions } => {
                host.set_label_text(objects.instructions, instructions);
                host.set_hidden(objects.target, true);
                log::info!("calibration: ready to leave calibration");
                self.observer.notify(WizardEvent::AwaitingExit);
            }
            CalibrationStep::Finished { points } => self.finish(host, objects, points),
        }
    }

    fn finish(&mut self, host: &mut H, objects: SessionObjects<H>, points: [CalibrationPoint; 4]) {
        log::info!("calibration: leaving calibration");
        host.load_screen(self.previous_screen);
        host.delete_screen(objects.screen);
        self.objects = None;
        self.observer.notify(WizardEvent::Finished { points });
    }
}

fn build_objects<H: CalibrationHost>(
    host: &mut H,
    screen: H::Screen,
    config: &WizardConfig,
) -> Result<SessionObjects<H>, H::Error> {
    let hit_surface = host.create_hit_surface(screen)?;
    let instructions = host.create_label(screen, LabelAlign::Center)?;
    let target = host.create_target(screen, config.target_size)?;
    Ok(SessionObjects {
        screen,
        hit_surface,
        instructions,
        target,
    })
}
