//! Read interfaces to the record stores the engine consumes.
//!
//! The engine never creates, edits or persists records. Each provider is a
//! blocking, read-only lookup. Absence is expressed as `Ok(None)` or an empty
//! vector; `Err` is reserved for transport or storage failures, which the
//! engine propagates without retrying.

mod in_memory;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    AttendanceRecord, CompensationProfile, ContributionProfile, Employee, LeaveRecord,
    OvertimeRecord, Position,
};

pub use in_memory::{CallCounts, InMemoryRecords};

/// Failure of a record provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The backing store could not be reached.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Description from the transport layer.
        message: String,
    },

    /// The provider gave up waiting for the backing store.
    #[error("provider timed out after {elapsed_ms}ms")]
    Timeout {
        /// How long the provider waited.
        elapsed_ms: u64,
    },

    /// The backing store returned data that could not be read.
    #[error("storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },
}

/// A type alias for Results returned by providers.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Employee lookup.
pub trait EmployeeProvider {
    /// Returns the employee, or `None` if no such employee exists.
    fn get_employee(&self, employee_id: i64) -> ProviderResult<Option<Employee>>;
}

/// Position lookup.
pub trait PositionProvider {
    /// Returns the position, or `None` if no such position exists.
    fn get_position(&self, position_id: i64) -> ProviderResult<Option<Position>>;
}

/// Attendance records for a date range.
pub trait AttendanceProvider {
    /// Returns attendance records dated within `[start, end]`.
    fn get_attendance(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<Vec<AttendanceRecord>>;
}

/// Approved leave for a date range.
pub trait LeaveProvider {
    /// Returns approved leave records overlapping `[start, end]`.
    fn get_approved_leave(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<Vec<LeaveRecord>>;
}

/// Overtime records for a date range.
pub trait OvertimeProvider {
    /// Returns overtime records dated within `[start, end]`.
    fn get_overtime(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<Vec<OvertimeRecord>>;
}

/// Fixed allowances lookup.
pub trait CompensationProvider {
    /// Returns the employee's compensation profile, if one exists.
    fn get_compensation_profile(
        &self,
        employee_id: i64,
    ) -> ProviderResult<Option<CompensationProfile>>;
}

/// Pre-recorded statutory contributions lookup.
pub trait ContributionProvider {
    /// Returns the employee's contribution profile, if one exists.
    fn get_contribution_profile(
        &self,
        employee_id: i64,
    ) -> ProviderResult<Option<ContributionProfile>>;
}

/// A single store that serves every record kind.
///
/// Implemented automatically for any type implementing all provider traits.
pub trait RecordStore:
    EmployeeProvider
    + PositionProvider
    + AttendanceProvider
    + LeaveProvider
    + OvertimeProvider
    + CompensationProvider
    + ContributionProvider
{
}

impl<T> RecordStore for T where
    T: EmployeeProvider
        + PositionProvider
        + AttendanceProvider
        + LeaveProvider
        + OvertimeProvider
        + CompensationProvider
        + ContributionProvider
{
}

/// The set of providers one calculation reads from.
///
/// Each field may point at a different backend. Use
/// [`RecordSources::from_store`] when one store serves all of them.
#[derive(Clone, Copy)]
pub struct RecordSources<'a> {
    /// Employee lookup.
    pub employees: &'a dyn EmployeeProvider,
    /// Position lookup.
    pub positions: &'a dyn PositionProvider,
    /// Attendance records.
    pub attendance: &'a dyn AttendanceProvider,
    /// Approved leave.
    pub leave: &'a dyn LeaveProvider,
    /// Overtime records.
    pub overtime: &'a dyn OvertimeProvider,
    /// Compensation profiles.
    pub compensation: &'a dyn CompensationProvider,
    /// Contribution profiles.
    pub contributions: &'a dyn ContributionProvider,
}

impl<'a> RecordSources<'a> {
    /// Uses one store for every provider.
    pub fn from_store<S: RecordStore>(store: &'a S) -> Self {
        Self {
            employees: store,
            positions: store,
            attendance: store,
            leave: store,
            overtime: store,
            compensation: store,
            contributions: store,
        }
    }
}
