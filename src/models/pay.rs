//! Pay rules applied to time entries
//!
//! These values travel inside every snapshot so a restored backup carries
//! the exact rules its entries were computed with.

use serde::{Deserialize, Serialize};

use super::money::Money;

/// Validation errors for pay settings
#[derive(Debug, Clone, PartialEq)]
pub enum PaySettingsError {
    NegativeHourlyRate,
    TaxRateOutOfRange(f64),
    NegativeMultiplier(f64),
    SickPayOutOfRange(f64),
}

impl std::fmt::Display for PaySettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeHourlyRate => write!(f, "Hourly rate cannot be negative"),
            Self::TaxRateOutOfRange(rate) => {
                write!(f, "Tax rate must be between 0 and 100, got {}", rate)
            }
            Self::NegativeMultiplier(m) => {
                write!(f, "Red day multiplier cannot be negative, got {}", m)
            }
            Self::SickPayOutOfRange(p) => {
                write!(f, "Sick pay must be between 0 and 100 percent, got {}", p)
            }
        }
    }
}

impl std::error::Error for PaySettingsError {}

/// Tax rate and pay rules used to compute entry pay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaySettings {
    /// Gross pay per worked hour
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate: Money,

    /// Preliminary tax withheld, in percent of gross pay
    #[serde(default = "default_tax_rate")]
    pub tax_rate_percent: f64,

    /// Pay multiplier for hours worked on a red day (public holiday)
    #[serde(default = "default_red_day_multiplier")]
    pub red_day_multiplier: f64,

    /// Share of normal pay received on a sick day, in percent
    #[serde(default = "default_sick_pay_percent")]
    pub sick_pay_percent: f64,
}

fn default_hourly_rate() -> Money {
    Money::from_kronor_ore(150, 0)
}

fn default_tax_rate() -> f64 {
    30.0
}

fn default_red_day_multiplier() -> f64 {
    2.0
}

fn default_sick_pay_percent() -> f64 {
    80.0
}

impl Default for PaySettings {
    fn default() -> Self {
        Self {
            hourly_rate: default_hourly_rate(),
            tax_rate_percent: default_tax_rate(),
            red_day_multiplier: default_red_day_multiplier(),
            sick_pay_percent: default_sick_pay_percent(),
        }
    }
}

impl PaySettings {
    pub fn validate(&self) -> Result<(), PaySettingsError> {
        if self.hourly_rate.is_negative() {
            return Err(PaySettingsError::NegativeHourlyRate);
        }
        if !(0.0..=100.0).contains(&self.tax_rate_percent) {
            return Err(PaySettingsError::TaxRateOutOfRange(self.tax_rate_percent));
        }
        if self.red_day_multiplier < 0.0 {
            return Err(PaySettingsError::NegativeMultiplier(self.red_day_multiplier));
        }
        if !(0.0..=100.0).contains(&self.sick_pay_percent) {
            return Err(PaySettingsError::SickPayOutOfRange(self.sick_pay_percent));
        }
        Ok(())
    }
}
