//! Display formatting for catalog dates.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calendar layout used for display dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStyle {
    /// `Jan 1, 2024`
    #[default]
    MonthDayYear,
    /// `1 Jan 2024`
    DayMonthYear,
    /// `2024-01-01`
    Iso,
}

impl DateStyle {
    fn pattern(self) -> &'static str {
        match self {
            Self::MonthDayYear => "%b %-d, %Y",
            Self::DayMonthYear => "%-d %b %Y",
            Self::Iso => "%Y-%m-%d",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MonthDayYear => "month_day_year",
            Self::DayMonthYear => "day_month_year",
            Self::Iso => "iso",
        }
    }
}

impl fmt::Display for DateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown date style '{0}' (expected month_day_year, day_month_year or iso)")]
pub struct UnknownDateStyle(pub String);

impl FromStr for DateStyle {
    type Err = UnknownDateStyle;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "month_day_year" | "en_us" | "us" => Ok(Self::MonthDayYear),
            "day_month_year" | "en_gb" | "gb" => Ok(Self::DayMonthYear),
            "iso" => Ok(Self::Iso),
            _ => Err(UnknownDateStyle(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFormatter {
    style: DateStyle,
}

impl DateFormatter {
    pub fn new(style: DateStyle) -> Self {
        Self { style }
    }

    /// Formats `date_like` for display, returning it unchanged when it does not parse.
    pub fn format(&self, date_like: &str) -> String {
        match parse_date(date_like) {
            Some(date) => date.format(self.style.pattern()).to_string(),
            None => date_like.to_string(),
        }
    }
}

pub fn format_date(date_like: &str) -> String {
    DateFormatter::default().format(date_like)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|stamp| stamp.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|stamp| stamp.date())
        })
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
