use crate::{progress::Progress, settings::ConsoleSettings};
use owo_colors::{OwoColorize, Stream};
use std::{
    io::{self, Write},
    path::Path,
};

const FILLED: &str = "█";
const EMPTY: &str = "-";

pub const LONG_DATE: &str = "%B %d, %Y";

/// Prints the human readable report. Colors are only emitted when stdout
/// supports them.
#[derive(Debug)]
pub struct Reporter<W> {
    out: W,
    console: ConsoleSettings,
}

impl Reporter<io::Stdout> {
    pub fn stdout(console: &ConsoleSettings) -> Self {
        Self::new(io::stdout(), console)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, console: &ConsoleSettings) -> Self {
        Self {
            out,
            console: console.clone(),
        }
    }

    pub fn complete(&mut self) -> io::Result<()> {
        writeln!(self.out, "The target date has already passed! Project complete.")
    }

    pub fn clamped_start(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "The project start date is in the future. Progress is 0%."
        )
    }

    pub fn summary(&mut self, progress: &Progress) -> io::Result<()> {
        writeln!(self.out, "--- Progress Towards Target Date ---")?;
        writeln!(
            self.out,
            "      Target Date: {}",
            progress.target.format(LONG_DATE)
        )?;
        writeln!(self.out, "        Days Left: {}", progress.days_left())?;
        writeln!(self.out, "Progress Complete: {}", progress.percent_label(1))?;
        writeln!(self.out)
    }

    pub fn bar(&mut self, progress: &Progress) -> io::Result<()> {
        writeln!(
            self.out,
            "{}",
            self.console.bar_heading(progress.days_left())
        )?;

        let width = self.console.bar_width;
        let filled = progress.filled_cells(width);
        let done = FILLED.repeat(filled);
        let rest = EMPTY.repeat(width - filled);
        writeln!(
            self.out,
            "[{}{}] {}",
            done.if_supports_color(Stream::Stdout, |text| text.cyan()),
            rest.if_supports_color(Stream::Stdout, |text| text.white()),
            progress.percent_label(1)
        )
    }

    pub fn image_written(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "✅ Image successfully generated at: {}",
            path.display()
        )
    }

    pub fn image_failed(&mut self, err: &anyhow::Error) -> io::Result<()> {
        let message = format!("❌ Error generating image: {:#}", err);
        let hint = "Please ensure a font file (e.g., 'arial.ttf' or 'Roboto-Regular.ttf') is in the output directory.";
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}",
            message.if_supports_color(Stream::Stdout, |text| text.red())
        )?;
        writeln!(
            self.out,
            "{}",
            hint.if_supports_color(Stream::Stdout, |text| text.red())
        )
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
