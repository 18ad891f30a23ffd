use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle},
};
use u8g2_fonts::types::{FontColor, VerticalPosition};

use super::{ObjectKind, Scene};
use crate::config::LABEL_FONT;

/// Laid-out size of `text` in the label font, one row per line.
pub(super) fn text_size(text: &str) -> Size {
    if text.is_empty() {
        return Size::zero();
    }
    let line_height = LABEL_FONT.get_default_line_height();
    let mut width = 0u32;
    let mut lines = 0u32;
    for line in text.split('\n') {
        lines += 1;
        if let Ok(dimensions) =
            LABEL_FONT.get_rendered_dimensions(line, Point::zero(), VerticalPosition::Top)
        {
            width = width.max(dimensions.advance.x.max(0) as u32);
        }
    }
    Size::new(width, lines * line_height)
}

impl Scene {
    /// Paints the active screen, back to front.
    pub fn draw<D>(&self, display: &mut D)
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let _ = display.clear(BinaryColor::Off);
        for id in self.children(self.active) {
            let Some(object) = self.get(id) else {
                continue;
            };
            if object.hidden {
                continue;
            }
            let origin = self.origin(object);
            match &object.kind {
                ObjectKind::Screen | ObjectKind::HitSurface => {}
                ObjectKind::Label { text, .. } => draw_label(display, text, origin),
                ObjectKind::Target { diameter } => draw_target(display, origin, *diameter),
            }
        }
    }
}

fn draw_label<D>(display: &mut D, text: &str, origin: Point)
where
    D: DrawTarget<Color = BinaryColor>,
{
    let line_height = LABEL_FONT.get_default_line_height() as i32;
    for (row, line) in text.split('\n').enumerate() {
        let _ = LABEL_FONT.render(
            line,
            Point::new(origin.x, origin.y + row as i32 * line_height),
            VerticalPosition::Top,
            FontColor::Transparent(BinaryColor::On),
            display,
        );
    }
}

fn draw_target<D>(display: &mut D, origin: Point, diameter: u32)
where
    D: DrawTarget<Color = BinaryColor>,
{
    let diameter = diameter.max(1);
    let _ = Circle::new(origin, diameter)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 2))
        .draw(display);

    let radius = diameter as i32 / 2;
    let center = origin + Point::new(radius, radius);
    let arm = (radius / 2).max(1);
    let _ = Line::new(center - Point::new(arm, 0), center + Point::new(arm, 0))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display);
    let _ = Line::new(center - Point::new(0, arm), center + Point::new(0, arm))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display);
}
