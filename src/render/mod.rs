pub(crate) mod text;
pub(crate) mod util;

use crate::{
    progress::{percent_label, Progress},
    settings::Settings,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use embedded_graphics::{
    geometry::{Point, Size},
    primitives::Rectangle,
};
use gauge_canvas::{Canvas, Output, PngFile};
use log::{debug, info};
use std::path::PathBuf;
use text::{Anchor, Face, LabelBuilder};
use util::{LinearGauge, RadialGauge};

pub const SHORT_DATE: &str = "%d %b, %Y";

/// Everything a renderer needs to know about the current progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub ratio: f64,
    pub days_left: u64,
    /// Target date formatted for captions.
    pub target_label: String,
    /// The day the frame was produced, used to name the output.
    pub stamp: NaiveDate,
}

impl Frame {
    pub fn new(progress: &Progress) -> Self {
        Self {
            ratio: progress.ratio,
            days_left: progress.days_left(),
            target_label: progress.target.format(SHORT_DATE).to_string(),
            stamp: progress.today,
        }
    }

    /// Percentage without decimals, e.g. `50%`.
    pub fn percent_label(&self) -> String {
        percent_label(self.ratio, 0)
    }
}

/// Consumes a frame and publishes it somewhere, returning where it went.
pub trait Sink {
    fn publish(&mut self, frame: &Frame) -> Result<PathBuf>;
}

/// Draws the gauge image and writes it as a PNG into the output directory.
pub struct GaugeRenderer {
    settings: Settings,
}

impl GaugeRenderer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    /// `<output_dir>/<prefix><YYYYMMDD>.png`
    pub fn output_path(&self, frame: &Frame) -> PathBuf {
        let image = &self.settings.image;
        image.output_dir.join(format!(
            "{}{}.png",
            image.file_prefix,
            frame.stamp.format("%Y%m%d")
        ))
    }

    fn bar_area(&self) -> Rectangle {
        let bar = &self.settings.bar;
        let width = (self.settings.image.width as i32 - bar.x - bar.right_margin as i32).max(0);
        Rectangle::new(Point::new(bar.x, bar.y), Size::new(width as u32, bar.height))
    }

    fn gauge_center(&self) -> Point {
        Point::new(
            self.settings.gauge.center_x,
            self.settings.image.height as i32 / 2,
        )
    }

    /// Background, ring and bar. Needs no font.
    pub fn draw_shapes(&self, frame: &Frame) -> Result<Canvas> {
        let Settings {
            image,
            colors,
            gauge,
            ..
        } = &self.settings;
        let mut canvas = Canvas::filled(image.width, image.height, colors.background);

        RadialGauge::new(
            self.gauge_center(),
            gauge.radius,
            gauge.thickness,
            colors.track,
            colors.accent,
        )
        .draw_at(frame.ratio, &mut canvas)?;

        LinearGauge::new(self.bar_area(), colors.track, colors.accent)
            .draw_at(frame.ratio, &mut canvas)?;

        Ok(canvas)
    }

    pub fn draw(&self, frame: &Frame) -> Result<Canvas> {
        let font = &self.settings.font;
        let regular = Face::load(&font.path)?;
        let bold = font.bold_path.as_deref().map(Face::load).transpose()?;

        let mut canvas = self.draw_shapes(frame)?;
        let color = self.settings.colors.text;

        LabelBuilder::new()
            .with_text(frame.percent_label())
            .with_position(self.gauge_center())
            .with_size(font.large_size)
            .with_color(color)
            .with_anchor(Anchor::Center)
            .emboldened(bold.is_none())
            .build(bold.as_ref().unwrap_or(&regular))
            .draw(&mut canvas);

        let area = self.bar_area();
        let bottom = area.top_left.y + area.size.height as i32;
        let captions = [
            (
                self.settings.captions.days_left(frame.days_left),
                bottom + 40,
            ),
            (self.settings.captions.target(&frame.target_label), bottom + 80),
        ];
        for (caption, y) in captions {
            debug!("Caption at y={}: {}", y, caption);
            LabelBuilder::new()
                .with_text(caption)
                .with_position(Point::new(area.top_left.x, y))
                .with_size(font.medium_size)
                .with_color(color)
                .build(&regular)
                .draw(&mut canvas);
        }

        Ok(canvas)
    }
}

impl Sink for GaugeRenderer {
    fn publish(&mut self, frame: &Frame) -> Result<PathBuf> {
        let canvas = self.draw(frame)?;
        let path = self.output_path(frame);
        PngFile::new(&path).present(&canvas)?;
        info!("Progress image saved to {}", path.display());
        let absolute = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve `{}`", path.display()))?;
        Ok(absolute)
    }
}
