//! Overtime record model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Hours above which a single overtime record is flagged for review.
pub const OVERTIME_REVIEW_THRESHOLD: Decimal = dec!(12);

/// Hard ceiling on overtime hours for one record.
pub const OVERTIME_MAX_HOURS: Decimal = dec!(24);

/// Overtime hours logged by an employee on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeRecord {
    /// The employee the overtime belongs to.
    pub employee_id: i64,
    /// The date the overtime was worked.
    pub date: NaiveDate,
    /// Hours of overtime worked.
    pub hours: Decimal,
    /// Optional justification entered by the employee.
    #[serde(default)]
    pub reason: Option<String>,
}

impl OvertimeRecord {
    /// Returns true when the hours are positive and no more than twelve.
    pub fn is_within_daily_limit(&self) -> bool {
        self.hours > Decimal::ZERO && self.hours <= OVERTIME_REVIEW_THRESHOLD
    }

    pub(crate) fn check_hours(&self) -> Result<(), String> {
        if self.hours < Decimal::ZERO {
            return Err(format!("overtime hours {} are negative", self.hours));
        }
        if self.hours > OVERTIME_MAX_HOURS {
            return Err(format!(
                "overtime hours {} exceed {} hours in a day",
                self.hours, OVERTIME_MAX_HOURS
            ));
        }
        Ok(())
    }
}
