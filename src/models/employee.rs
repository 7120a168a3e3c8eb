//! Employee and position models.
//!
//! Both are owned by the HR domain and are read-only snapshots for the
//! duration of a payroll run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents an employee subject to payroll calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: i64,
    /// The employee's given name.
    pub first_name: String,
    /// The employee's family name.
    pub last_name: String,
    /// The position the employee currently holds.
    pub position_id: i64,
}

impl Employee {
    /// Returns the display name used in logs and payslips.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Employee;
    ///
    /// let employee = Employee {
    ///     id: 1,
    ///     first_name: "Maria".to_string(),
    ///     last_name: "Santos".to_string(),
    ///     position_id: 10,
    /// };
    /// assert_eq!(employee.full_name(), "Maria Santos");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A position in the organisation, carrying the monthly base rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Unique identifier for the position.
    pub id: i64,
    /// The position title (e.g. "Payroll Clerk").
    pub title: String,
    /// Monthly base salary. Must not be negative.
    pub monthly_salary: Decimal,
}
