use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use config::{Config, ConfigError};
use embedded_graphics::pixelcolor::Rgb888;
use log::LevelFilter;
use std::{path::PathBuf, str::FromStr};

/// The date progress is measured against.
pub const DEFAULT_TARGET: &str = "2025-11-30";
// pub const DEFAULT_TARGET: &str = "2026-01-01";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Loads `./settings.toml` (if present) and `DEADLINE_GAUGE_*` environment
/// variables. Nested keys use a double underscore in the environment, e.g.
/// `DEADLINE_GAUGE_IMAGE__OUTPUT_DIR`.
pub fn load() -> Result<Config> {
    let mut config = Config::default();
    config
        .merge(config::File::with_name("settings").required(false))?
        .merge(config::Environment::with_prefix("DEADLINE_GAUGE").separator("__"))?;
    Ok(config)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Calendar date progress is measured against.
    pub target: NaiveDate,
    pub console: ConsoleSettings,
    pub image: ImageSettings,
    pub colors: Palette,
    pub gauge: GaugeSettings,
    pub bar: BarSettings,
    pub font: FontSettings,
    pub captions: Captions,
    pub log_level: LevelFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleSettings {
    /// Number of cells in the textual bar.
    pub bar_width: usize,
    /// Line printed above the bar, `{days}` is replaced by the days left.
    pub bar_heading: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSettings {
    pub width: u32,
    pub height: u32,
    /// Directory the PNG is written to.
    pub output_dir: PathBuf,
    /// The file name is `<file_prefix><YYYYMMDD>.png`.
    pub file_prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb888,
    /// Progress arc and bar fill.
    pub accent: Rgb888,
    /// Percentage and captions.
    pub text: Rgb888,
    /// Unfilled part of the gauge and bar.
    pub track: Rgb888,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeSettings {
    /// Horizontal center, the gauge is always vertically centered.
    pub center_x: i32,
    pub radius: u32,
    /// Stroke width of both track and arc.
    pub thickness: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarSettings {
    pub x: i32,
    pub y: i32,
    pub height: u32,
    /// Gap between the bar's right edge and the image's right edge.
    pub right_margin: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontSettings {
    /// TrueType face used for all text.
    pub path: PathBuf,
    /// Optional bold face for the percentage. The regular face is emboldened
    /// when this is unset.
    pub bold_path: Option<PathBuf>,
    pub large_size: f32,
    pub medium_size: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captions {
    /// First caption line, `{days}` is replaced by the days left.
    pub days_left: String,
    /// Second caption line, `{date}` is replaced by the target date.
    pub target: String,
}

impl Captions {
    pub fn days_left(&self, days: u64) -> String {
        fill(&self.days_left, days, "")
    }

    pub fn target(&self, date: &str) -> String {
        fill(&self.target, 0, date)
    }
}

impl ConsoleSettings {
    pub fn bar_heading(&self, days: u64) -> String {
        fill(&self.bar_heading, days, "")
    }
}

fn fill(template: &str, days: u64, date: &str) -> String {
    template
        .replace("{days}", &days.to_string())
        .replace("{date}", date)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: NaiveDate::parse_from_str(DEFAULT_TARGET, DATE_FORMAT).unwrap_or_default(),
            console: ConsoleSettings {
                bar_width: 50,
                bar_heading: String::from("{days} days to go:"),
            },
            image: ImageSettings {
                width: 800,
                height: 450,
                output_dir: PathBuf::from("."),
                file_prefix: String::from("progress_"),
            },
            colors: Palette {
                background: Rgb888::new(0xE1, 0xF5, 0xFE),
                accent: Rgb888::new(0x03, 0xA9, 0xF4),
                text: Rgb888::new(0x02, 0x77, 0xBD),
                track: Rgb888::new(0xFF, 0xFF, 0xFF),
            },
            gauge: GaugeSettings {
                center_x: 160,
                radius: 110,
                thickness: 25,
            },
            bar: BarSettings {
                x: 320,
                y: 120,
                height: 40,
                right_margin: 60,
            },
            font: FontSettings {
                path: PathBuf::from("Roboto-Regular.ttf"),
                bold_path: None,
                large_size: 70.0,
                medium_size: 24.0,
            },
            captions: Captions {
                days_left: String::from("{days} days left"),
                target: String::from("Target: {date}"),
            },
            log_level: LevelFilter::Warn,
        }
    }
}

/// Missing keys fall back to `default`, malformed ones are reported.
fn or_default<T>(value: Result<T, ConfigError>, default: T) -> Result<T> {
    match value {
        Ok(value) => Ok(value),
        Err(ConfigError::NotFound(_)) => Ok(default),
        Err(err) => Err(err.into()),
    }
}

fn optional<T>(value: Result<T, ConfigError>) -> Result<Option<T>> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn positive(config: &Config, key: &str, default: u32) -> Result<u32> {
    let value = or_default(config.get_int(key), i64::from(default))?;
    match u32::try_from(value) {
        Ok(value) if value > 0 => Ok(value),
        _ => bail!("`{}` must be a positive integer, got {}", key, value),
    }
}

fn coordinate(config: &Config, key: &str, default: i32) -> Result<i32> {
    let value = or_default(config.get_int(key), i64::from(default))?;
    i32::try_from(value).with_context(|| format!("`{}` is out of range", key))
}

fn size(config: &Config, key: &str, default: f32) -> Result<f32> {
    let value = or_default(config.get_float(key), f64::from(default))? as f32;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        bail!("`{}` must be a positive number, got {}", key, value)
    }
}

fn color(config: &Config, key: &str, default: Rgb888) -> Result<Rgb888> {
    match optional(config.get_str(key))? {
        Some(hex) => parse_color(&hex).with_context(|| format!("Invalid color for `{}`", key)),
        None => Ok(default),
    }
}

/// Parses `#RRGGBB` (the leading `#` is optional).
pub fn parse_color(hex: &str) -> Result<Rgb888> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        bail!("expected `#RRGGBB`, got `{}`", hex);
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| anyhow!("expected `#RRGGBB`, got `{}`", hex))
    };
    Ok(Rgb888::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

impl Settings {
    /// Overlays everything set in `config` on top of the defaults.
    pub fn from_config(config: &Config) -> Result<Self> {
        let defaults = Self::default();

        let target = match optional(config.get_str("target"))? {
            Some(date) => NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
                .with_context(|| format!("`target` must be formatted YYYY-MM-DD, got `{}`", date))?,
            None => defaults.target,
        };

        let bar_width = positive(config, "console.bar_width", defaults.console.bar_width as u32)?;

        let log_level = match optional(config.get_str("log.level"))? {
            Some(level) => LevelFilter::from_str(&level)
                .map_err(|_| anyhow!("Unknown log level `{}`", level))?,
            None => defaults.log_level,
        };

        Ok(Self {
            target,
            console: ConsoleSettings {
                bar_width: bar_width as usize,
                bar_heading: or_default(
                    config.get_str("console.bar_heading"),
                    defaults.console.bar_heading,
                )?,
            },
            image: ImageSettings {
                width: positive(config, "image.width", defaults.image.width)?,
                height: positive(config, "image.height", defaults.image.height)?,
                output_dir: optional(config.get_str("image.output_dir"))?
                    .map_or(defaults.image.output_dir, PathBuf::from),
                file_prefix: or_default(
                    config.get_str("image.file_prefix"),
                    defaults.image.file_prefix,
                )?,
            },
            colors: Palette {
                background: color(config, "colors.background", defaults.colors.background)?,
                accent: color(config, "colors.accent", defaults.colors.accent)?,
                text: color(config, "colors.text", defaults.colors.text)?,
                track: color(config, "colors.track", defaults.colors.track)?,
            },
            gauge: GaugeSettings {
                center_x: coordinate(config, "gauge.center_x", defaults.gauge.center_x)?,
                radius: positive(config, "gauge.radius", defaults.gauge.radius)?,
                thickness: positive(config, "gauge.thickness", defaults.gauge.thickness)?,
            },
            bar: BarSettings {
                x: coordinate(config, "bar.x", defaults.bar.x)?,
                y: coordinate(config, "bar.y", defaults.bar.y)?,
                height: positive(config, "bar.height", defaults.bar.height)?,
                right_margin: or_default(
                    config.get_int("bar.right_margin"),
                    i64::from(defaults.bar.right_margin),
                )
                .and_then(|margin| {
                    u32::try_from(margin).context("`bar.right_margin` is out of range")
                })?,
            },
            font: FontSettings {
                path: optional(config.get_str("font.path"))?.map_or(defaults.font.path, PathBuf::from),
                bold_path: optional(config.get_str("font.bold_path"))?.map(PathBuf::from),
                large_size: size(config, "font.large_size", defaults.font.large_size)?,
                medium_size: size(config, "font.medium_size", defaults.font.medium_size)?,
            },
            captions: Captions {
                days_left: or_default(
                    config.get_str("captions.days_left"),
                    defaults.captions.days_left,
                )?,
                target: or_default(config.get_str("captions.target"), defaults.captions.target)?,
            },
            log_level,
        })
    }
}
