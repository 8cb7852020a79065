//! Core data models for Tidrapport
//!
//! Time entries, the pay rules that price them, and the money type used
//! for all pay amounts.

pub mod entry;
pub mod money;
pub mod pay;

pub use entry::{swedish_weekday, EntryValidationError, TimeEntry};
pub use money::{Money, MoneyParseError};
pub use pay::{PaySettings, PaySettingsError};
