//! Statistical text formatter
//!
//! Turns small categorical and numeric aggregates into English clauses.
//! The wording is fixed: reports are compared literally, so every function
//! here must produce byte-identical text for the same input.

use crate::types::{Handedness, Sex};
use serde::Serialize;
use std::fmt;

/// A number rounded to two decimals
///
/// Displays as the shortest representation that round-trips, always with at
/// least one fractional digit (`20.0`, `300.31`, `2.5`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Rounded(f64);

impl Rounded {
    pub fn new(value: f64) -> Self {
        // Exact ties go to the even neighbour: 0.125 -> 0.12
        let rounded = (value * 100.0).round_ties_even() / 100.0;
        // Avoid rendering "-0.0"
        Self(if rounded == 0.0 { 0.0 } else { rounded })
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Rounded {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Rounded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() && self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Minimum, maximum, mean and standard deviation of a set of values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeStats<T> {
    pub min: T,
    pub max: T,
    pub mean: T,
    pub std: T,
}

impl<T> RangeStats<T> {
    pub fn new(min: T, max: T, mean: T, std: T) -> Self {
        Self { min, max, mean, std }
    }
}

impl RangeStats<Rounded> {
    /// Compute rounded statistics over `values`.
    ///
    /// The standard deviation is the population one (divides by N).
    /// Returns `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self::new(
            Rounded::new(min),
            Rounded::new(max),
            Rounded::new(mean),
            Rounded::new(variance.sqrt()),
        ))
    }
}

/// A range over values of which some may be unknown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericRange {
    /// `None` when no value is known
    pub stats: Option<RangeStats<Rounded>>,
    /// How many values were unknown
    pub n_unknown: usize,
}

impl NumericRange {
    pub fn from_values(values: &[Option<f64>]) -> Self {
        let known: Vec<f64> = values.iter().flatten().copied().collect();
        Self {
            stats: RangeStats::from_values(&known),
            n_unknown: values.len() - known.len(),
        }
    }

    /// Render this range with [`range_str`]
    pub fn describe(&self, unit: &str) -> String {
        range_str(self.stats.as_ref(), self.n_unknown, unit)
    }
}

/// Summarize participant sex counts.
///
/// Values that are neither male nor female are left out of both counts.
pub fn summarize_sex(values: &[Option<Sex>]) -> String {
    if values.iter().all(Option::is_none) {
        return "sex were all unknown".to_string();
    }

    let n_male = count(values, Sex::Male);
    let n_female = count(values, Sex::Female);
    format!("comprised of {n_male} male and {n_female} female participants")
}

/// Summarize participant handedness counts.
pub fn summarize_handedness(values: &[Option<Handedness>]) -> String {
    if values.iter().all(Option::is_none) {
        return "handedness were all unknown".to_string();
    }

    let n_right = count(values, Handedness::Right);
    let n_left = count(values, Handedness::Left);
    let n_ambidextrous = count(values, Handedness::Ambidextrous);
    format!(
        "comprised of {n_right} right hand, {n_left} left hand and {n_ambidextrous} ambidextrous"
    )
}

/// Describe a numeric range, e.g. `ages ranged from 10 to 20 (mean = 15, std = 2)`.
///
/// `stats` is `None` when the minimum is unknown, in which case the whole
/// range is reported as unknown. Values are rendered as given; callers round.
pub fn range_str<T: fmt::Display>(
    stats: Option<&RangeStats<T>>,
    n_unknown: usize,
    unit: &str,
) -> String {
    let category = range_category(unit);
    let Some(stats) = stats else {
        return format!("{category} all unknown");
    };

    let unknown = if n_unknown > 0 {
        format!("; {n_unknown} with unknown {unit}")
    } else {
        String::new()
    };

    format!(
        "{category} ranged from {} to {} (mean = {}, std = {}{unknown})",
        stats.min, stats.max, stats.mean, stats.std
    )
}

/// Join items as an English list: `a`, `a and b`, `a, b, and c`
pub fn pretty_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

/// `was 1 scan` / `were 3 scans`
pub fn scan_count_str(n_scans: usize) -> String {
    if n_scans == 1 {
        "was 1 scan".to_string()
    } else {
        format!("were {n_scans} scans")
    }
}

/// Word describing what a unit measures
fn range_category(unit: &str) -> &str {
    match unit {
        "years" | "year" | "age" | "ages" => "ages",
        "seconds" | "second" => "durations",
        "channels" => "channel counts",
        other => other,
    }
}

fn count<T: PartialEq + Copy>(values: &[Option<T>], wanted: T) -> usize {
    values.iter().filter(|v| **v == Some(wanted)).count()
}
