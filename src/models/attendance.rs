//! Attendance record model.

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// A single day's login/logout record for an employee.
///
/// Either time may be missing. A record without a login does not count as a
/// day worked. Undertime needs both a login and a logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee the record belongs to.
    pub employee_id: i64,
    /// The calendar date of the record.
    pub date: NaiveDate,
    /// Time the employee logged in, if recorded.
    #[serde(default)]
    pub login_time: Option<NaiveTime>,
    /// Time the employee logged out, if recorded.
    #[serde(default)]
    pub logout_time: Option<NaiveTime>,
}

impl AttendanceRecord {
    /// Returns true if the record counts towards days worked.
    pub fn is_present(&self) -> bool {
        self.login_time.is_some()
    }

    /// Returns the time between login and logout, or zero when either is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::AttendanceRecord;
    /// use chrono::{NaiveDate, NaiveTime, TimeDelta};
    ///
    /// let record = AttendanceRecord {
    ///     employee_id: 1,
    ///     date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
    ///     login_time: NaiveTime::from_hms_opt(8, 0, 0),
    ///     logout_time: NaiveTime::from_hms_opt(17, 0, 0),
    /// };
    /// assert_eq!(record.work_duration(), TimeDelta::hours(9));
    /// assert!(record.is_full_day());
    /// ```
    pub fn work_duration(&self) -> TimeDelta {
        match (self.login_time, self.logout_time) {
            (Some(login), Some(logout)) if logout >= login => logout - login,
            _ => TimeDelta::zero(),
        }
    }

    /// Returns true if at least eight hours lie between login and logout.
    pub fn is_full_day(&self) -> bool {
        self.work_duration() >= TimeDelta::hours(8)
    }

    /// Checks that logout does not precede login.
    pub(crate) fn check_times(&self) -> Result<(), String> {
        match (self.login_time, self.logout_time) {
            (Some(login), Some(logout)) if logout < login => Err(format!(
                "logout {} is before login {}",
                logout, login
            )),
            _ => Ok(()),
        }
    }
}
