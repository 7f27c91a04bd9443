use crate::{
    progress::{Status, Timeline},
    render::{Frame, Sink},
    report::Reporter,
    settings::Settings,
};
use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, error, warn};
use std::{io::Write, path::PathBuf};

#[derive(Debug)]
pub enum Outcome {
    /// The target was reached, nothing was rendered.
    Complete,
    Rendered(PathBuf),
    /// Rendering failed and the error was reported.
    RenderFailed(anyhow::Error),
}

/// Computes the progress for `today`, reports it and hands it to `sink`.
///
/// Only console write failures are returned as errors. A failing sink is
/// reported to the console and surfaces as [`Outcome::RenderFailed`].
pub fn run<W: Write, S: Sink>(
    settings: &Settings,
    today: NaiveDate,
    reporter: &mut Reporter<W>,
    sink: &mut S,
) -> Result<Outcome> {
    let timeline = Timeline::for_today(settings.target, today);
    let progress = match timeline.status_at(today) {
        Status::Complete => {
            reporter.complete()?;
            return Ok(Outcome::Complete);
        }
        Status::InProgress(progress) => progress,
    };
    debug!(
        "{} of {} days elapsed, {} remaining, ratio {:.4}",
        progress.elapsed_days, progress.total_days, progress.remaining_days, progress.ratio
    );

    if progress.start_clamped {
        warn!(
            "Start {} lies after today, measuring from {}",
            timeline.start, progress.start
        );
        reporter.clamped_start()?;
    }

    reporter.summary(&progress)?;
    reporter.bar(&progress)?;

    match sink.publish(&Frame::new(&progress)) {
        Ok(path) => {
            reporter.image_written(&path)?;
            Ok(Outcome::Rendered(path))
        }
        Err(err) => {
            error!("Failed to generate the progress image: {:#}", err);
            reporter.image_failed(&err)?;
            Ok(Outcome::RenderFailed(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::GaugeRenderer;
    use anyhow::anyhow;
    use gauge_canvas::{Output, PngFile};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Frame>,
        fail: bool,
    }

    impl Sink for Recorder {
        fn publish(&mut self, frame: &Frame) -> Result<PathBuf> {
            self.frames.push(frame.clone());
            if self.fail {
                return Err(anyhow!("Failed to read font `Roboto-Regular.ttf`"));
            }
            Ok(PathBuf::from("/tmp/progress.png"))
        }
    }

    /// Draws only the shapes so no font is needed.
    struct ShapesOnly(GaugeRenderer);

    impl Sink for ShapesOnly {
        fn publish(&mut self, frame: &Frame) -> Result<PathBuf> {
            let canvas = self.0.draw_shapes(frame)?;
            let path = self.0.output_path(frame);
            PngFile::new(&path).present(&canvas)?;
            Ok(path)
        }
    }

    fn reporter() -> Reporter<Vec<u8>> {
        owo_colors::set_override(false);
        Reporter::new(Vec::new(), &Settings::default().console)
    }

    #[test]
    fn completion_skips_rendering() {
        let settings = Settings::default();
        for today in [settings.target, date(2026, 2, 1)] {
            let mut reporter = reporter();
            let mut sink = Recorder::default();

            let outcome = run(&settings, today, &mut reporter, &mut sink).unwrap();

            assert!(matches!(outcome, Outcome::Complete));
            assert!(sink.frames.is_empty());
            let text = String::from_utf8(reporter.into_inner()).unwrap();
            assert_eq!(text, "The target date has already passed! Project complete.\n");
        }
    }

    #[test]
    fn progress_is_reported_then_published() {
        let settings = Settings::default();
        let mut reporter = reporter();
        let mut sink = Recorder::default();

        let outcome = run(&settings, date(2025, 6, 15), &mut reporter, &mut sink).unwrap();

        assert!(matches!(outcome, Outcome::Rendered(ref path) if path == &PathBuf::from("/tmp/progress.png")));
        assert_eq!(sink.frames.len(), 1);
        assert_eq!(sink.frames[0].days_left, 168);
        assert_eq!(sink.frames[0].target_label, "30 Nov, 2025");
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("Days Left: 168"));
        assert!(text.contains("Image successfully generated at: /tmp/progress.png"));
        assert!(!text.contains("start date is in the future"));
    }

    #[test]
    fn render_failure_is_reported_not_returned() {
        let settings = Settings::default();
        let mut reporter = reporter();
        let mut sink = Recorder {
            fail: true,
            ..Recorder::default()
        };

        let outcome = run(&settings, date(2025, 6, 15), &mut reporter, &mut sink).unwrap();

        assert!(matches!(outcome, Outcome::RenderFailed(_)));
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("Progress Complete: 49.5%"));
        assert!(text.contains("Error generating image: Failed to read font"));
    }

    #[test]
    fn writes_a_dated_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.image.output_dir = dir.path().to_path_buf();
        let mut sink = ShapesOnly(GaugeRenderer::new(&settings));

        let outcome = run(&settings, date(2025, 6, 15), &mut reporter(), &mut sink).unwrap();

        let expected = dir.path().join("progress_20250615.png");
        assert!(matches!(outcome, Outcome::Rendered(ref path) if path == &expected));
        assert!(expected.is_file());
    }
}
