use chrono::{Datelike, NaiveDate};

/// The span progress is measured over.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Timeline {
    pub start: NaiveDate,
    pub target: NaiveDate,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Status {
    /// `today` reached or passed the target.
    Complete,
    InProgress(Progress),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Progress {
    /// Effective start, possibly moved forward to `today`.
    pub start: NaiveDate,
    pub target: NaiveDate,
    pub today: NaiveDate,
    pub total_days: f64,
    pub elapsed_days: f64,
    pub remaining_days: f64,
    /// `elapsed_days / total_days`
    pub ratio: f64,
    /// Set when `today` preceded the start and the start was moved to `today`.
    pub start_clamped: bool,
}

/// `ratio` as a percentage with `decimals` places, e.g. `49.5%`. Ties round
/// away from zero.
pub fn percent_label(ratio: f64, decimals: usize) -> String {
    let scale = 10_f64.powi(decimals as i32);
    let rounded = (ratio * 100.0 * scale).round() / scale;
    format!("{:.*}%", decimals, rounded)
}

fn days_between(from: NaiveDate, to: NaiveDate) -> f64 {
    to.signed_duration_since(from).num_days() as f64
}

impl Timeline {
    pub fn new(start: NaiveDate, target: NaiveDate) -> Self {
        Self { start, target }
    }

    /// A timeline starting on January 1st of `today`'s year.
    pub fn for_today(target: NaiveDate, today: NaiveDate) -> Self {
        let start = today.with_ordinal(1).unwrap_or(today);
        Self::new(start, target)
    }

    pub fn status_at(&self, today: NaiveDate) -> Status {
        if today >= self.target {
            return Status::Complete;
        }

        let start_clamped = today < self.start;
        let start = if start_clamped { today } else { self.start };

        // `target > today >= start` from here on, so `total_days` is positive.
        let total_days = days_between(start, self.target);
        let elapsed_days = days_between(start, today);
        let remaining_days = days_between(today, self.target);

        Status::InProgress(Progress {
            start,
            target: self.target,
            today,
            total_days,
            elapsed_days,
            remaining_days,
            ratio: elapsed_days / total_days,
            start_clamped,
        })
    }
}

impl Progress {
    /// Remaining days rounded up.
    pub fn days_left(&self) -> u64 {
        self.remaining_days.ceil().max(0.0) as u64
    }

    pub fn percent_label(&self, decimals: usize) -> String {
        percent_label(self.ratio, decimals)
    }

    /// Number of filled cells in a bar `width` cells wide.
    pub fn filled_cells(&self, width: usize) -> usize {
        let filled = (self.ratio * width as f64).floor().max(0.0) as usize;
        filled.min(width)
    }
}
