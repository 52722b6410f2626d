use super::range::DateRange;
use crate::config::LayoutConfig;
use crate::core::TimeLabel;
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Maps dates onto the vertical axis
pub struct DateAxis<'a> {
    range: DateRange,
    config: &'a LayoutConfig,
}

impl<'a> DateAxis<'a> {
    pub fn new(range: DateRange, config: &'a LayoutConfig) -> Self {
        Self { range, config }
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    /// `top_padding + days since start * pixels_per_day`
    pub fn date_to_y(&self, date: DateTime<Utc>) -> f64 {
        self.config.top_padding + self.range.days_from_start(date) * self.config.pixels_per_day
    }

    /// One label per day of the range, both ends included
    pub fn labels(&self) -> Vec<TimeLabel> {
        self.range
            .days()
            .map(|day| TimeLabel {
                y: self.date_to_y(day),
                text: self.label_text(day),
            })
            .collect()
    }

    /// Canvas height, never below the configured minimum
    pub fn height(&self) -> f64 {
        let drawn = self.range.span_days().ceil() * self.config.pixels_per_day + self.config.height_padding;
        drawn.max(self.config.min_height)
    }

    fn label_text(&self, day: DateTime<Utc>) -> String {
        let mut text = String::new();
        if write!(text, "{}", day.format(&self.config.label_format)).is_err() {
            // unvalidated pattern
            text = day.date_naive().to_string();
        }
        text
    }
}
