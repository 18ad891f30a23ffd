use embassy_time::Duration;
#[cfg(feature = "graphics")]
use u8g2_fonts::{fonts, FontRenderer};

pub const TARGET_SIZE_PX: u32 = 20;
pub const COORD_LABEL_MARGIN_PX: i32 = 5;
pub const COORD_LABEL_TEXT_MAX: usize = 64;
pub const TARGET_ANIM_DELAY: Duration = Duration::from_millis(500);
pub const TARGET_ANIM_DURATION: Duration = Duration::from_millis(200);

pub const INSTRUCTIONS_TOP_LEFT: &str = "Click the circle in\nupper left-hand corner";
pub const INSTRUCTIONS_TOP_RIGHT: &str = "Click the circle in\nupper right-hand corner";
pub const INSTRUCTIONS_BOTTOM_RIGHT: &str = "Click the circle in\nlower right-hand corner";
pub const INSTRUCTIONS_BOTTOM_LEFT: &str = "Click the circle in\nlower left-hand corner";
pub const INSTRUCTIONS_LEAVE: &str = "Click the screen\nto leave calibration";

// Screens, hit surface, instruction label, target and one readout per corner
// fit with room for the host's own screen content.
pub const SCENE_MAX_OBJECTS: usize = 16;
pub const SCENE_MAX_ANIMATIONS: usize = 4;
pub const SCENE_LABEL_TEXT_MAX: usize = 64;

#[cfg(feature = "graphics")]
pub const LABEL_FONT: FontRenderer = FontRenderer::new::<fonts::u8g2_font_helvB12_tf>();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WizardConfig {
    pub target_size: u32,
    pub label_margin: i32,
    pub anim_delay: Duration,
    pub anim_duration: Duration,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            target_size: TARGET_SIZE_PX,
            label_margin: COORD_LABEL_MARGIN_PX,
            anim_delay: TARGET_ANIM_DELAY,
            anim_duration: TARGET_ANIM_DURATION,
        }
    }
}
