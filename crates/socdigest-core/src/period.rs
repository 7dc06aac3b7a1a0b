//! Reporting periods and the filename convention they are derived from.
//!
//! Export files are named `"<Organization> ∙ <TableKind> ∙ <D Mon YYYY> - <D Mon YYYY>.csv"`.
//! Only the start date of the trailing range matters: it fixes the calendar
//! month the report covers.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Separator between the segments of an export filename (U+2219 BULLET OPERATOR).
pub const FILENAME_DELIMITER: char = '\u{2219}';

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month, displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Build a period from a year in `0..=9999` and a month in `1..=12`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Format`] when either component is out of range.
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(0..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(CoreError::Format {
                input: format!("{year}-{month}"),
                reason: "year must be 0..=9999 and month 1..=12".to_string(),
            });
        }
        Ok(Self { year, month })
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.month
    }

    /// The calendar month immediately before this one.
    ///
    /// January rolls back to December of the previous year. Returns `None`
    /// only for `0000-01`, which has no four-digit predecessor.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        if self.month == 1 {
            if self.year == 0 {
                return None;
            }
            Some(Self {
                year: self.year - 1,
                month: 12,
            })
        } else {
            Some(Self {
                year: self.year,
                month: self.month - 1,
            })
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::Format {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| invalid("expected YYYY-MM"))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid("expected YYYY-MM"));
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected YYYY-MM"));
        }
        let year = year.parse::<i32>().map_err(|e| invalid(&e.to_string()))?;
        let month = month.parse::<u32>().map_err(|e| invalid(&e.to_string()))?;
        Self::new(year, month).map_err(|_| invalid("month must be 01..=12"))
    }
}

impl TryFrom<String> for Period {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

/// Identifies one reporting cycle for one organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    pub organization: String,
    pub period: Period,
}

impl PeriodKey {
    #[must_use]
    pub fn new(organization: impl Into<String>, period: Period) -> Self {
        Self {
            organization: organization.into(),
            period,
        }
    }

    /// Same organization, previous calendar month.
    #[must_use]
    pub fn previous(&self) -> Option<Self> {
        self.period.previous().map(|period| Self {
            organization: self.organization.clone(),
            period,
        })
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.organization, self.period)
    }
}

/// Everything derived from an export filename's date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodInfo {
    pub period: Period,
    /// e.g. `"July 2025"`.
    pub month_label: String,
    /// The raw range, e.g. `"1 Jul 2025 - 31 Jul 2025"`.
    pub period_label: String,
}

/// Derive the reporting period from an export filename.
///
/// `file_name` is the bare filename (no directory). The last
/// [`FILENAME_DELIMITER`]-separated segment must be a date range whose start
/// date reads `D Mon YYYY`.
///
/// # Errors
///
/// Returns [`CoreError::Format`] when the name has fewer than three segments,
/// the date range has no `-`, the start date does not have three parts, the
/// month abbreviation is unknown, or the day/month/year do not form a date.
pub fn extract_period_info(file_name: &str) -> Result<PeriodInfo, CoreError> {
    let fail = |reason: String| CoreError::Format {
        input: file_name.to_string(),
        reason,
    };

    let segments: Vec<&str> = file_name.split(FILENAME_DELIMITER).collect();
    if segments.len() < 3 {
        return Err(fail(format!(
            "expected at least 3 '{FILENAME_DELIMITER}'-separated segments, found {}",
            segments.len()
        )));
    }

    let last = segments[segments.len() - 1].trim();
    let period_label = last.strip_suffix(".csv").unwrap_or(last).trim();

    let (start, _end) = period_label
        .split_once('-')
        .ok_or_else(|| fail(format!("date range {period_label:?} has no '-' separator")))?;

    let parts: Vec<&str> = start.split_whitespace().collect();
    let [day, month, year, ..] = &parts[..] else {
        return Err(fail(format!(
            "start date {:?} is not in 'D Mon YYYY' form",
            start.trim()
        )));
    };

    let month_number = month_from_abbreviation(month)
        .ok_or_else(|| fail(format!("unrecognized month abbreviation {month:?}")))?;
    let day = day
        .parse::<u32>()
        .map_err(|_| fail(format!("invalid day {day:?}")))?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(fail(format!("invalid year {year:?}")));
    }
    let year = year
        .parse::<i32>()
        .map_err(|_| fail(format!("invalid year {year:?}")))?;

    let start_date = NaiveDate::from_ymd_opt(year, month_number, day)
        .ok_or_else(|| fail(format!("{day} {month} {year} is not a calendar date")))?;

    let period =
        Period::new(start_date.year(), start_date.month()).map_err(|e| fail(e.to_string()))?;

    Ok(PeriodInfo {
        period,
        month_label: start_date.format("%B %Y").to_string(),
        period_label: period_label.to_string(),
    })
}

fn month_from_abbreviation(abbr: &str) -> Option<u32> {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| *m == abbr)
        .and_then(|idx| u32::try_from(idx + 1).ok())
}
