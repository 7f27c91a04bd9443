use anyhow::Result;
use embedded_graphics::{
    pixelcolor::{Rgb888, RgbColor},
    prelude::*,
};
use num_traits::AsPrimitive;

const CHANNELS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    /// Packed RGB triplets, row major, without padding between rows. This is
    /// the exact layout the PNG encoder expects so presenting a canvas never
    /// has to repack it.
    pixels: Vec<u8>,
}

impl Canvas {
    /// Initializes a new `Canvas` with all pixels set to `Rgb888::BLACK`.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgb888::BLACK)
    }

    /// Initializes a new `Canvas` with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Rgb888) -> Self {
        let pixels = [color.r(), color.g(), color.b()]
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the color at `point` or `None` if the point lies outside the
    /// canvas.
    pub fn pixel(&self, point: Point) -> Option<Rgb888> {
        let index = self.index(point)?;
        let rgb = &self.pixels[index..index + CHANNELS];
        Some(Rgb888::new(rgb[0], rgb[1], rgb[2]))
    }

    /// Mixes `color` into the pixel at `point`. `coverage` is the opacity of
    /// `color` in `0.0..=1.0`, as produced by anti-aliased glyph rasterizers.
    /// Points outside the canvas are ignored.
    pub fn blend(&mut self, point: Point, color: Rgb888, coverage: f32) {
        let Some(index) = self.index(point) else {
            return;
        };
        let alpha = coverage.clamp(0.0, 1.0);
        for (channel, source) in self.pixels[index..index + CHANNELS]
            .iter_mut()
            .zip([color.r(), color.g(), color.b()])
        {
            let mixed = f32::from(*channel) * (1.0 - alpha) + f32::from(source) * alpha;
            *channel = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (point.x, point.y);
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let offset: usize = (x + y * self.width as i32).as_();
        Some(offset * CHANNELS)
    }
}

/// Something a finished canvas can be handed to, e.g. an image file.
pub trait Output {
    /// Presents the canvas. Implementations either fully succeed or leave no
    /// partial result behind that they created themselves.
    fn present(&mut self, canvas: &Canvas) -> Result<()>;
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = anyhow::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Some(index) = self.index(coord) {
                self.pixels[index..index + CHANNELS].copy_from_slice(&[color.r(), color.g(), color.b()]);
            }
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        *self = Self::filled(self.width, self.height, color);
        Ok(())
    }
}
