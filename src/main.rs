#![warn(clippy::pedantic)]
// Pixel coordinates and day counts hop between integer and float types all
// the time, these lints would fire on nearly every line of the renderer.
#![allow(
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::module_name_repetitions
)]
#![deny(
    missing_debug_implementations,
    nonstandard_style,
    unused_qualifications
)]

use anyhow::Result;
use chrono::Local;
use log::info;
use simplelog::{Config as LoggerConfig, SimpleLogger};

mod pipeline;
mod progress;
mod render;
mod report;
mod settings;

use crate::{
    pipeline::Outcome, render::GaugeRenderer, report::Reporter, settings::Settings,
};

#[allow(clippy::missing_errors_doc)]
pub fn main() -> Result<()> {
    let config = settings::load()?;
    let settings = Settings::from_config(&config)?;

    SimpleLogger::init(settings.log_level, LoggerConfig::default())?;
    info!("Measuring progress towards {}", settings.target);

    let today = Local::now().date_naive();
    let mut reporter = Reporter::stdout(&settings.console);
    let mut renderer = GaugeRenderer::new(&settings);

    // A failed render has already been reported and does not change the exit
    // status.
    match pipeline::run(&settings, today, &mut reporter, &mut renderer)? {
        Outcome::Complete => info!("Target reached, nothing rendered"),
        Outcome::Rendered(path) => info!("Done, image at {}", path.display()),
        Outcome::RenderFailed(err) => info!("Done without an image: {:#}", err),
    }

    Ok(())
}
