//! Presentation-side state for a refreshable rate board.
//!
//! The pipeline knows nothing about this: the board owns the busy flag that
//! keeps refreshes from overlapping, and it keeps the last good rates on
//! screen when a refresh fails.

use std::cmp::Ordering;

use crate::domain::currency::display_rank;
use crate::domain::{CalculatedRate, UtcDateTime};
use crate::pipeline::FetchOutcome;

#[derive(Debug, Clone, Default)]
pub struct RateBoard {
    loading: bool,
    error: Option<String>,
    data: Vec<CalculatedRate>,
    last_updated: Option<UtcDateTime>,
    warnings: Vec<String>,
    show_spot: bool,
}

impl RateBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a refresh as started. Returns `false` if one is already running.
    pub fn begin_refresh(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.error = None;
        true
    }

    /// Applies a finished refresh. Failures keep the previous rates.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        self.loading = false;
        match outcome.result {
            Ok(snapshot) => {
                self.data = sorted_for_display(snapshot.rates);
                self.warnings = snapshot.warnings;
                self.last_updated = Some(outcome.completed_at);
                self.error = None;
            }
            Err(error) => {
                self.error = Some(error.to_string());
            }
        }
    }

    pub fn toggle_spot(&mut self) -> bool {
        self.show_spot = !self.show_spot;
        self.show_spot
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn rates(&self) -> &[CalculatedRate] {
        self.data.as_slice()
    }

    pub fn warnings(&self) -> &[String] {
        self.warnings.as_slice()
    }

    pub const fn last_updated(&self) -> Option<UtcDateTime> {
        self.last_updated
    }

    pub const fn show_spot(&self) -> bool {
        self.show_spot
    }
}

/// Pinned currencies first in pin order, the rest alphabetically.
pub fn sorted_for_display(mut rates: Vec<CalculatedRate>) -> Vec<CalculatedRate> {
    rates.sort_by(|a, b| display_order(a.currency(), b.currency()));
    rates
}

fn display_order(a: &str, b: &str) -> Ordering {
    match (display_rank(a), display_rank(b)) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Four-decimal rendering used by the board; absent values show as `-`.
pub fn format_rate(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("-"), |number| format!("{number:.4}"))
}
