//! Time-of-day bins used by the timeline and time-slider widgets. All times are seconds from
//! midnight.

use linkboard_model::{CellLookup, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TimeBinError {
    #[error("bin label is required")]
    EmptyLabel,
    #[error("invalid time {0:?}: expected HH:MM")]
    InvalidTime(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeBin {
    pub start: f64,
    pub end: f64,
}

impl TimeBin {
    /// Whether `[start, end]` touches this bin. Both ends are inclusive.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        start <= self.end && end >= self.start
    }
}

fn parse_time(text: &str) -> Result<f64, TimeBinError> {
    let invalid = || TimeBinError::InvalidTime(text.to_string());
    let (hours, minutes) = text.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hours.trim().parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.trim().parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }
    Ok(f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0)
}

/// Parses `"08:00-08:15"`, or a single `"08:00"` that spans `bin_size_minutes`.
pub fn parse_time_bin(label: &str, bin_size_minutes: u32) -> Result<TimeBin, TimeBinError> {
    if label.trim().is_empty() {
        return Err(TimeBinError::EmptyLabel);
    }
    match label.split_once('-') {
        Some((start, end)) => Ok(TimeBin {
            start: parse_time(start)?,
            end: parse_time(end)?,
        }),
        None => {
            let start = parse_time(label)?;
            Ok(TimeBin {
                start,
                end: start + f64::from(bin_size_minutes) * 60.0,
            })
        }
    }
}

/// Upper bound on the number of bins [`create_time_bins`] will produce. One-second bins over
/// a full day stay under it.
pub const MAX_TIME_BINS: usize = 100_000;

/// Bin start times from the earliest to the latest time, inclusive, `bin_size` seconds apart.
/// Non-finite times are ignored.
///
/// Returns no bins, with a warning, when the range would need more than [`MAX_TIME_BINS`] or
/// when `bin_size` is too small to move a time at that magnitude.
pub fn create_time_bins(times: impl IntoIterator<Item = f64>, bin_size: f64) -> Vec<f64> {
    if bin_size.is_nan() || bin_size <= 0.0 {
        return Vec::new();
    }
    let mut bounds: Option<(f64, f64)> = None;
    for t in times.into_iter().filter(|t| t.is_finite()) {
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(t), hi.max(t)),
            None => (t, t),
        });
    }
    let Some((min, max)) = bounds else {
        return Vec::new();
    };

    if min + bin_size == min || max - bin_size == max {
        log::warn!("bin size {bin_size} is below the resolution of times near {max}");
        return Vec::new();
    }
    let count = ((max - min) / bin_size).floor();
    if !count.is_finite() || count >= MAX_TIME_BINS as f64 {
        log::warn!("{min}..={max} in steps of {bin_size} exceeds {MAX_TIME_BINS} bins");
        return Vec::new();
    }
    (0..=count as usize)
        .map(|i| min + i as f64 * bin_size)
        .collect()
}

fn split_clock(seconds: f64) -> (u64, u64, u64) {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    (total / 3600, (total % 3600) / 60, total % 60)
}

/// `HH:MM:SS`.
pub fn format_time_seconds(seconds: f64) -> String {
    let (h, m, s) = split_clock(seconds);
    format!("{h:02}:{m:02}:{s:02}")
}

/// `HH:MM`.
pub fn format_time_minutes(seconds: f64) -> String {
    let (h, m, _) = split_clock(seconds);
    format!("{h:02}:{m:02}")
}

/// `"HH:MM - HH:MM"` for the bin starting at `start`.
pub fn time_bin_label(start: f64, bin_size: f64) -> String {
    format!(
        "{} - {}",
        format_time_minutes(start),
        format_time_minutes(start + bin_size)
    )
}

/// Rows whose numeric `column` lies in `[min, max]`.
pub fn filter_by_time_range<'a, R: CellLookup>(
    rows: &'a [R],
    column: &str,
    min: f64,
    max: f64,
) -> Vec<&'a R> {
    rows.iter()
        .filter(|row| {
            row.cell(column)
                .and_then(Value::to_number)
                .is_some_and(|t| t >= min && t <= max)
        })
        .collect()
}
