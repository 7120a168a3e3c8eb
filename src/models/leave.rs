//! Leave record model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The leave type that triggers a pay deduction.
pub const UNPAID_LEAVE_TYPE: &str = "Unpaid";

/// Workflow status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Submitted but not yet decided.
    Pending,
    /// Approved by a supervisor. Only approved leave affects pay.
    Approved,
    /// Rejected by a supervisor.
    Rejected,
}

/// A leave request covering an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// The employee the leave belongs to.
    pub employee_id: i64,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Free-form leave type (e.g. "Vacation", "Sick", "Unpaid").
    pub leave_type: String,
    /// Workflow status.
    pub status: LeaveStatus,
}

impl LeaveRecord {
    /// Returns true if this is approved leave.
    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }

    /// Returns true if the leave type is "Unpaid", ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{LeaveRecord, LeaveStatus};
    /// use chrono::NaiveDate;
    ///
    /// let leave = LeaveRecord {
    ///     employee_id: 1,
    ///     start_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
    ///     leave_type: "UNPAID".to_string(),
    ///     status: LeaveStatus::Approved,
    /// };
    /// assert!(leave.is_unpaid());
    /// assert_eq!(leave.leave_days(), 5);
    /// ```
    pub fn is_unpaid(&self) -> bool {
        self.leave_type.eq_ignore_ascii_case(UNPAID_LEAVE_TYPE)
    }

    /// Returns the number of calendar days covered, both ends included.
    pub fn leave_days(&self) -> i64 {
        if self.end_date < self.start_date {
            return 0;
        }
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Returns true if any day of the leave falls inside `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }
}
