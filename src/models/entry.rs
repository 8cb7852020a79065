//! Time entry model
//!
//! A time entry records a single workday. Pay fields are derived from the
//! times and flags through [`TimeEntry::recalculate`] and stored with the
//! entry so exports and snapshots show exactly what was computed.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::money::Money;
use super::pay::PaySettings;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Validation errors for time entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    /// Only one of start and end time was given
    IncompleteShift,
    /// The break is longer than the shift itself
    BreakExceedsShift { shift_minutes: u32, break_minutes: u32 },
}

impl std::fmt::Display for EntryValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncompleteShift => write!(f, "Both start and end time must be given"),
            Self::BreakExceedsShift {
                shift_minutes,
                break_minutes,
            } => write!(
                f,
                "Break of {} minutes is longer than the {} minute shift",
                break_minutes, shift_minutes
            ),
        }
    }
}

impl std::error::Error for EntryValidationError {}

/// A single workday record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub date: NaiveDate,

    #[serde(default)]
    pub start_time: Option<NaiveTime>,

    #[serde(default)]
    pub end_time: Option<NaiveTime>,

    #[serde(default)]
    pub break_minutes: u32,

    /// Minutes worked after subtracting the break
    #[serde(default)]
    pub worked_minutes: u32,

    #[serde(default)]
    pub gross_pay: Money,

    #[serde(default)]
    pub tax: Money,

    #[serde(default)]
    pub net_pay: Money,

    /// Public holiday ("röd dag")
    #[serde(default)]
    pub red_day: bool,

    #[serde(default)]
    pub sick_day: bool,
}

impl TimeEntry {
    /// Create an empty entry for a date
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            start_time: None,
            end_time: None,
            break_minutes: 0,
            worked_minutes: 0,
            gross_pay: Money::zero(),
            tax: Money::zero(),
            net_pay: Money::zero(),
            red_day: false,
            sick_day: false,
        }
    }

    /// Create an entry with a shift and break
    pub fn with_shift(date: NaiveDate, start: NaiveTime, end: NaiveTime, break_minutes: u32) -> Self {
        Self {
            start_time: Some(start),
            end_time: Some(end),
            break_minutes,
            ..Self::new(date)
        }
    }

    /// Length of the shift in minutes, before the break is subtracted
    ///
    /// An end time earlier than the start time is a shift past midnight.
    pub fn shift_minutes(&self) -> u32 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                let mut minutes = (end - start).num_minutes();
                if minutes < 0 {
                    minutes += MINUTES_PER_DAY;
                }
                minutes as u32
            }
            _ => 0,
        }
    }

    /// Recompute worked minutes and pay from the given rules
    pub fn recalculate(&mut self, pay: &PaySettings) {
        self.worked_minutes = self.shift_minutes().saturating_sub(self.break_minutes);

        let mut factor = self.worked_minutes as f64 / 60.0;
        if self.red_day {
            factor *= pay.red_day_multiplier;
        }
        if self.sick_day {
            factor *= pay.sick_pay_percent / 100.0;
        }

        self.gross_pay = pay.hourly_rate.scale(factor);
        self.tax = self.gross_pay.percent(pay.tax_rate_percent);
        self.net_pay = self.gross_pay - self.tax;
    }

    /// Worked time in decimal hours
    pub fn worked_hours(&self) -> f64 {
        self.worked_minutes as f64 / 60.0
    }

    pub fn weekday_name(&self) -> &'static str {
        swedish_weekday(self.date.weekday())
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.start_time.is_some() != self.end_time.is_some() {
            return Err(EntryValidationError::IncompleteShift);
        }
        let shift_minutes = self.shift_minutes();
        if self.start_time.is_some() && self.break_minutes > shift_minutes {
            return Err(EntryValidationError::BreakExceedsShift {
                shift_minutes,
                break_minutes: self.break_minutes,
            });
        }
        Ok(())
    }
}

/// Swedish weekday name, capitalized as used in report headers
pub fn swedish_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Måndag",
        Weekday::Tue => "Tisdag",
        Weekday::Wed => "Onsdag",
        Weekday::Thu => "Torsdag",
        Weekday::Fri => "Fredag",
        Weekday::Sat => "Lördag",
        Weekday::Sun => "Söndag",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_recalculate_regular_day() {
        let mut entry = TimeEntry::with_shift(date(2025, 3, 3), time(8, 0), time(17, 0), 60);
        entry.recalculate(&PaySettings::default());

        assert_eq!(entry.worked_minutes, 480);
        assert_eq!(entry.gross_pay.ore(), 120_000);
        assert_eq!(entry.tax.ore(), 36_000);
        assert_eq!(entry.net_pay.ore(), 84_000);
    }

    #[test]
    fn test_red_day_and_sick_day_factors() {
        let pay = PaySettings::default();

        let mut red = TimeEntry::with_shift(date(2025, 12, 25), time(10, 0), time(14, 0), 0);
        red.red_day = true;
        red.recalculate(&pay);
        assert_eq!(red.gross_pay.ore(), 4 * 15000 * 2);

        let mut sick = TimeEntry::with_shift(date(2025, 3, 4), time(8, 0), time(12, 0), 0);
        sick.sick_day = true;
        sick.recalculate(&pay);
        assert_eq!(sick.gross_pay.ore(), 48_000);
    }

    #[test]
    fn test_overnight_shift() {
        let entry = TimeEntry::with_shift(date(2025, 3, 7), time(22, 0), time(6, 0), 30);
        assert_eq!(entry.shift_minutes(), 480);
    }

    #[test]
    fn test_day_without_times_earns_nothing() {
        let mut entry = TimeEntry::new(date(2025, 3, 8));
        entry.recalculate(&PaySettings::default());
        assert_eq!(entry.worked_minutes, 0);
        assert!(entry.gross_pay.is_zero());
    }

    #[test]
    fn test_validate() {
        let mut entry = TimeEntry::new(date(2025, 3, 3));
        entry.start_time = Some(time(8, 0));
        assert_eq!(entry.validate(), Err(EntryValidationError::IncompleteShift));

        let entry = TimeEntry::with_shift(date(2025, 3, 3), time(8, 0), time(9, 0), 90);
        assert!(matches!(
            entry.validate(),
            Err(EntryValidationError::BreakExceedsShift { .. })
        ));
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(TimeEntry::new(date(2025, 3, 3)).weekday_name(), "Måndag");
        assert_eq!(TimeEntry::new(date(2025, 3, 9)).weekday_name(), "Söndag");
    }
}
