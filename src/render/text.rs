use anyhow::{anyhow, Context, Result};
use embedded_graphics::{geometry::Point, pixelcolor::Rgb888};
use gauge_canvas::Canvas;
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::{fs, path::Path};

/// A parsed TrueType face.
pub struct Face {
    font: Font<'static>,
}

impl Face {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read font `{}`", path.display()))?;
        Self::from_bytes(bytes).with_context(|| format!("Failed to load font `{}`", path.display()))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = Font::try_from_vec(bytes).ok_or_else(|| anyhow!("Not a TrueType font"))?;
        Ok(Self { font })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// `position` is the top left corner of the line box.
    TopLeft,
    /// `position` is the center of the inked glyphs.
    Center,
}

#[derive(Debug, Clone)]
pub struct LabelBuilder {
    text: String,
    position: Point,
    size: f32,
    color: Rgb888,
    anchor: Anchor,
    bold: bool,
}

impl Default for LabelBuilder {
    fn default() -> Self {
        Self {
            text: String::new(),
            position: Point::zero(),
            size: 24.0,
            color: Rgb888::new(0, 0, 0),
            anchor: Anchor::TopLeft,
            bold: false,
        }
    }
}

impl LabelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Rgb888) -> Self {
        self.color = color;
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Overstrikes every glyph one pixel to the right. Used when no bold face
    /// is available.
    pub fn emboldened(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn build<'f>(&self, face: &'f Face) -> Label<'f> {
        let scale = Scale::uniform(self.size);
        let ascent = face.font.v_metrics(scale).ascent;
        let glyphs: Vec<PositionedGlyph<'f>> =
            face.font.layout(&self.text, scale, point(0.0, ascent)).collect();

        let offset = match self.anchor {
            Anchor::TopLeft => self.position,
            Anchor::Center => match ink_bounds(&glyphs) {
                Some((min, max)) => self.position - (min + max) / 2,
                None => self.position,
            },
        };

        Label {
            glyphs,
            offset,
            color: self.color,
            bold: self.bold,
        }
    }
}

/// Top left and bottom right corner of all inked pixels.
fn ink_bounds(glyphs: &[PositionedGlyph<'_>]) -> Option<(Point, Point)> {
    glyphs
        .iter()
        .filter_map(PositionedGlyph::pixel_bounding_box)
        .map(|bb| (Point::new(bb.min.x, bb.min.y), Point::new(bb.max.x, bb.max.y)))
        .reduce(|(min, max), (lo, hi)| {
            (
                Point::new(min.x.min(lo.x), min.y.min(lo.y)),
                Point::new(max.x.max(hi.x), max.y.max(hi.y)),
            )
        })
}

/// Laid out text, ready to be blended onto a canvas.
pub struct Label<'f> {
    glyphs: Vec<PositionedGlyph<'f>>,
    offset: Point,
    color: Rgb888,
    bold: bool,
}

impl Label<'_> {
    pub fn draw(&self, canvas: &mut Canvas) {
        self.draw_pass(canvas, self.offset);
        if self.bold {
            self.draw_pass(canvas, self.offset + Point::new(1, 0));
        }
    }

    fn draw_pass(&self, canvas: &mut Canvas, offset: Point) {
        for glyph in &self.glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|x, y, coverage| {
                    let at = Point::new(bb.min.x + x as i32, bb.min.y + y as i32);
                    canvas.blend(offset + at, self.color, coverage);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::RgbColor;

    const DEJAVU_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
    const INK: Rgb888 = Rgb888::new(0x02, 0x77, 0xBD);

    fn dejavu() -> Face {
        match Face::from_bytes(DEJAVU_SANS.to_vec()) {
            Ok(face) => face,
            Err(err) => panic!("{err:#}"),
        }
    }

    /// Corners (inclusive) and count of every pixel that is no longer white.
    fn ink(canvas: &Canvas) -> Option<(Point, Point, usize)> {
        let mut found: Option<(Point, Point, usize)> = None;
        for y in 0..canvas.height() as i32 {
            for x in 0..canvas.width() as i32 {
                let at = Point::new(x, y);
                if canvas.pixel(at) == Some(Rgb888::WHITE) {
                    continue;
                }
                found = Some(match found {
                    None => (at, at, 1),
                    Some((min, max, count)) => (
                        Point::new(min.x.min(x), min.y.min(y)),
                        Point::new(max.x.max(x), max.y.max(y)),
                        count + 1,
                    ),
                });
            }
        }
        found
    }

    fn percentage(bold: bool) -> Canvas {
        let face = dejavu();
        let mut canvas = Canvas::filled(320, 450, Rgb888::WHITE);
        LabelBuilder::new()
            .with_text("50%")
            .with_position(Point::new(160, 225))
            .with_size(70.0)
            .with_color(INK)
            .with_anchor(Anchor::Center)
            .emboldened(bold)
            .build(&face)
            .draw(&mut canvas);
        canvas
    }

    #[test]
    fn centered_label_is_centered_on_its_position() {
        for bold in [false, true] {
            let (min, max, _) = ink(&percentage(bold)).unwrap();
            let center = (min + max) / 2;

            assert!((center.x - 160).abs() <= 2, "{:?} bold={}", center, bold);
            assert!((center.y - 225).abs() <= 2, "{:?} bold={}", center, bold);
            assert!(max.x - min.x > 60, "{:?}..{:?}", min, max);
            assert!(max.y - min.y > 30, "{:?}..{:?}", min, max);
        }
    }

    #[test]
    fn emboldening_adds_ink() {
        let (_, _, plain) = ink(&percentage(false)).unwrap();
        let (_, _, bold) = ink(&percentage(true)).unwrap();

        assert!(bold > plain, "bold {} plain {}", bold, plain);
    }

    #[test]
    fn top_left_label_hangs_below_its_position() {
        let face = dejavu();
        let mut canvas = Canvas::filled(800, 450, Rgb888::WHITE);
        LabelBuilder::new()
            .with_text("168 days left")
            .with_position(Point::new(320, 200))
            .with_size(24.0)
            .with_color(INK)
            .build(&face)
            .draw(&mut canvas);

        let (min, max, _) = ink(&canvas).unwrap();
        assert!((320..=326).contains(&min.x), "{:?}", min);
        assert!(min.y >= 200 && max.y < 230, "{:?}..{:?}", min, max);
        assert!(canvas.pixel(Point::new(319, 210)) == Some(Rgb888::WHITE));
    }

    #[test]
    fn empty_text_draws_nothing() {
        let face = dejavu();
        let mut canvas = Canvas::filled(50, 50, Rgb888::WHITE);
        LabelBuilder::new()
            .with_position(Point::new(25, 25))
            .with_anchor(Anchor::Center)
            .build(&face)
            .draw(&mut canvas);

        assert!(ink(&canvas).is_none());
    }

    #[test]
    fn missing_font_names_the_path() {
        let err = match Face::load(Path::new("definitely-missing-font.ttf")) {
            Ok(_) => panic!("font should not load"),
            Err(err) => err,
        };

        assert!(format!("{err:#}").contains("definitely-missing-font.ttf"));
    }

    #[test]
    fn garbage_is_not_a_font() {
        assert!(Face::from_bytes(b"not a font at all".to_vec()).is_err());
    }

    #[test]
    fn builder_keeps_settings() {
        let builder = LabelBuilder::new()
            .with_text("50%")
            .with_position(Point::new(160, 225))
            .with_size(70.0)
            .with_anchor(Anchor::Center)
            .emboldened(true);

        assert_eq!(builder.text, "50%");
        assert_eq!(builder.position, Point::new(160, 225));
        assert_eq!(builder.anchor, Anchor::Center);
        assert!(builder.bold);
    }
}
