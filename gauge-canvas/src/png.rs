use crate::{Canvas, Output};
use anyhow::{anyhow, Context, Result};
use image::{ImageFormat, RgbImage};
use log::info;
use std::path::PathBuf;

/// Writes presented canvases to a PNG file, replacing whatever was there.
#[derive(Debug, Clone)]
pub struct PngFile {
    path: PathBuf,
}

impl PngFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Output for PngFile {
    fn present(&mut self, canvas: &Canvas) -> Result<()> {
        let image = RgbImage::from_raw(canvas.width(), canvas.height(), canvas.as_raw().to_vec())
            .ok_or_else(|| anyhow!("Canvas buffer does not match its dimensions"))?;
        image
            .save_with_format(&self.path, ImageFormat::Png)
            .with_context(|| format!("Failed to write `{}`", self.path.display()))?;
        info!(
            "Wrote {}x{} image to {}",
            canvas.width(),
            canvas.height(),
            self.path.display()
        );
        Ok(())
    }
}
