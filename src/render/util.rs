use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::{Angle, AngleUnit, DrawTarget, Point, Primitive, Size},
    primitives::{Arc, Circle, PrimitiveStyle, Rectangle},
    Drawable,
};

/// Ring with a clockwise arc starting at twelve o'clock.
pub struct RadialGauge {
    center: Point,
    diameter: u32,
    track: PrimitiveStyle<Rgb888>,
    arc: PrimitiveStyle<Rgb888>,
}

impl RadialGauge {
    const START: f32 = -90.0;

    pub fn new(center: Point, radius: u32, thickness: u32, track: Rgb888, accent: Rgb888) -> Self {
        Self {
            center,
            diameter: radius * 2,
            track: PrimitiveStyle::with_stroke(track, thickness),
            arc: PrimitiveStyle::with_stroke(accent, thickness),
        }
    }

    fn calculate_sweep(ratio: f64) -> Angle {
        ((ratio.clamp(0.0, 1.0) * 360.0) as f32).deg()
    }

    pub fn draw_at<T: DrawTarget<Color = Rgb888>>(
        &self,
        ratio: f64,
        target: &mut T,
    ) -> Result<(), <T as DrawTarget>::Error> {
        Circle::with_center(self.center, self.diameter)
            .into_styled(self.track)
            .draw(target)?;

        let sweep = Self::calculate_sweep(ratio);
        if sweep.to_degrees() > 0.0 {
            Arc::with_center(self.center, self.diameter, Self::START.deg(), sweep)
                .into_styled(self.arc)
                .draw(target)?;
        }
        Ok(())
    }
}

/// Horizontal bar filling left to right.
pub struct LinearGauge {
    area: Rectangle,
    track: Rgb888,
    fill: Rgb888,
}

impl LinearGauge {
    pub fn new(area: Rectangle, track: Rgb888, fill: Rgb888) -> Self {
        Self { area, track, fill }
    }

    pub fn fill_width(&self, ratio: f64) -> u32 {
        (f64::from(self.area.size.width) * ratio.clamp(0.0, 1.0)).floor() as u32
    }

    pub fn draw_at<T: DrawTarget<Color = Rgb888>>(
        &self,
        ratio: f64,
        target: &mut T,
    ) -> Result<(), <T as DrawTarget>::Error> {
        self.area
            .into_styled(PrimitiveStyle::with_fill(self.track))
            .draw(target)?;

        let width = self.fill_width(ratio);
        if width > 0 {
            Rectangle::new(self.area.top_left, Size::new(width, self.area.size.height))
                .into_styled(PrimitiveStyle::with_fill(self.fill))
                .draw(target)?;
        }
        Ok(())
    }
}
