//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type that bounds every record
//! lookup and aggregation in a payroll run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CalculationError, CalculationResult};

/// An inclusive calendar date range for one payroll run.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
/// )
/// .unwrap();
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()));
/// assert_eq!(period.num_days(), 15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a pay period, rejecting an end date before the start date.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> CalculationResult<Self> {
        if end_date < start_date {
            return Err(CalculationError::invalid_input(
                "period_end",
                format!("{} is before period start {}", end_date, start_date),
            ));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Checks if a given date falls within this pay period, both ends included.
    ///
    /// ```
    /// use payroll_engine::models::PayPeriod;
    /// use chrono::NaiveDate;
    ///
    /// let period = PayPeriod::new(
    ///     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
    /// )
    /// .unwrap();
    ///
    /// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())); // start date
    /// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap())); // before
    /// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2024, 6, 16).unwrap())); // after
    /// ```
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns the number of calendar days in the period.
    pub fn num_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}
