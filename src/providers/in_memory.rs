//! In-memory record store.
//!
//! Serves every provider trait from plain collections. Each call is counted,
//! and any provider can be made to fail, so tests can assert exactly which
//! reads a calculation performed.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;

use super::{
    AttendanceProvider, CompensationProvider, ContributionProvider, EmployeeProvider,
    LeaveProvider, OvertimeProvider, PositionProvider, ProviderError, ProviderResult,
};
use crate::models::{
    AttendanceRecord, CompensationProfile, ContributionProfile, Employee, LeaveRecord,
    OvertimeRecord, Position,
};

/// Snapshot of how many times each provider was called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `get_employee` calls.
    pub employee: usize,
    /// `get_position` calls.
    pub position: usize,
    /// `get_attendance` calls.
    pub attendance: usize,
    /// `get_approved_leave` calls.
    pub leave: usize,
    /// `get_overtime` calls.
    pub overtime: usize,
    /// `get_compensation_profile` calls.
    pub compensation: usize,
    /// `get_contribution_profile` calls.
    pub contribution: usize,
}

impl CallCounts {
    /// Total calls across all providers.
    pub fn total(&self) -> usize {
        self.employee
            + self.position
            + self.attendance
            + self.leave
            + self.overtime
            + self.compensation
            + self.contribution
    }
}

#[derive(Debug, Default)]
struct Counters {
    employee: AtomicUsize,
    position: AtomicUsize,
    attendance: AtomicUsize,
    leave: AtomicUsize,
    overtime: AtomicUsize,
    compensation: AtomicUsize,
    contribution: AtomicUsize,
}

/// A record store backed by in-memory collections.
///
/// Clones share the records but not the counters; every clone starts from
/// zero calls.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Employee, Position};
/// use payroll_engine::providers::{EmployeeProvider, InMemoryRecords};
/// use rust_decimal::Decimal;
///
/// let store = InMemoryRecords::new()
///     .with_employee(Employee {
///         id: 1,
///         first_name: "Ana".to_string(),
///         last_name: "Reyes".to_string(),
///         position_id: 10,
///     })
///     .with_position(Position {
///         id: 10,
///         title: "Clerk".to_string(),
///         monthly_salary: Decimal::new(11000, 0),
///     });
///
/// assert!(store.get_employee(1).unwrap().is_some());
/// assert_eq!(store.calls().employee, 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRecords {
    records: Arc<Records>,
    failing: Option<&'static str>,
    counters: Counters,
}

#[derive(Debug, Default, Clone)]
struct Records {
    employees: HashMap<i64, Employee>,
    positions: HashMap<i64, Position>,
    attendance: Vec<AttendanceRecord>,
    leave: Vec<LeaveRecord>,
    overtime: Vec<OvertimeRecord>,
    compensation: HashMap<i64, CompensationProfile>,
    contributions: HashMap<i64, ContributionProfile>,
}

impl Clone for InMemoryRecords {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            failing: self.failing,
            counters: Counters::default(),
        }
    }
}

impl InMemoryRecords {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an employee.
    pub fn with_employee(mut self, employee: Employee) -> Self {
        self.records_mut().employees.insert(employee.id, employee);
        self
    }

    /// Adds a position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.records_mut().positions.insert(position.id, position);
        self
    }

    /// Adds attendance records.
    pub fn with_attendance(mut self, records: impl IntoIterator<Item = AttendanceRecord>) -> Self {
        self.records_mut().attendance.extend(records);
        self
    }

    /// Adds leave records of any status.
    pub fn with_leave(mut self, records: impl IntoIterator<Item = LeaveRecord>) -> Self {
        self.records_mut().leave.extend(records);
        self
    }

    /// Adds overtime records.
    pub fn with_overtime(mut self, records: impl IntoIterator<Item = OvertimeRecord>) -> Self {
        self.records_mut().overtime.extend(records);
        self
    }

    /// Sets an employee's compensation profile, replacing any existing one.
    pub fn with_compensation(mut self, profile: CompensationProfile) -> Self {
        self.records_mut().compensation.insert(profile.employee_id, profile);
        self
    }

    /// Sets an employee's contribution profile, replacing any existing one.
    pub fn with_contributions(mut self, profile: ContributionProfile) -> Self {
        self.records_mut().contributions.insert(profile.employee_id, profile);
        self
    }

    /// Makes the named provider fail with [`ProviderError::Unavailable`].
    ///
    /// Names match the `provider` field of
    /// [`CalculationError::ProviderFailure`](crate::error::CalculationError::ProviderFailure):
    /// "employee", "position", "attendance", "leave", "overtime",
    /// "compensation" or "contribution".
    pub fn failing(mut self, provider: &'static str) -> Self {
        self.failing = Some(provider);
        self
    }

    /// Returns how many times each provider has been called.
    pub fn calls(&self) -> CallCounts {
        let c = &self.counters;
        CallCounts {
            employee: c.employee.load(Ordering::Relaxed),
            position: c.position.load(Ordering::Relaxed),
            attendance: c.attendance.load(Ordering::Relaxed),
            leave: c.leave.load(Ordering::Relaxed),
            overtime: c.overtime.load(Ordering::Relaxed),
            compensation: c.compensation.load(Ordering::Relaxed),
            contribution: c.contribution.load(Ordering::Relaxed),
        }
    }

    fn records_mut(&mut self) -> &mut Records {
        Arc::make_mut(&mut self.records)
    }

    fn enter(&self, counter: &AtomicUsize, provider: &'static str) -> ProviderResult<()> {
        counter.fetch_add(1, Ordering::Relaxed);
        if self.failing == Some(provider) {
            return Err(ProviderError::Unavailable {
                message: format!("{} store offline", provider),
            });
        }
        Ok(())
    }
}

impl EmployeeProvider for InMemoryRecords {
    fn get_employee(&self, employee_id: i64) -> ProviderResult<Option<Employee>> {
        self.enter(&self.counters.employee, "employee")?;
        Ok(self.records.employees.get(&employee_id).cloned())
    }
}

impl PositionProvider for InMemoryRecords {
    fn get_position(&self, position_id: i64) -> ProviderResult<Option<Position>> {
        self.enter(&self.counters.position, "position")?;
        Ok(self.records.positions.get(&position_id).cloned())
    }
}

impl AttendanceProvider for InMemoryRecords {
    fn get_attendance(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<Vec<AttendanceRecord>> {
        self.enter(&self.counters.attendance, "attendance")?;
        Ok(self
            .records
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id && r.date >= start && r.date <= end)
            .cloned()
            .collect())
    }
}

impl LeaveProvider for InMemoryRecords {
    fn get_approved_leave(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<Vec<LeaveRecord>> {
        self.enter(&self.counters.leave, "leave")?;
        Ok(self
            .records
            .leave
            .iter()
            .filter(|r| r.employee_id == employee_id && r.is_approved() && r.overlaps(start, end))
            .cloned()
            .collect())
    }
}

impl OvertimeProvider for InMemoryRecords {
    fn get_overtime(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<Vec<OvertimeRecord>> {
        self.enter(&self.counters.overtime, "overtime")?;
        Ok(self
            .records
            .overtime
            .iter()
            .filter(|r| r.employee_id == employee_id && r.date >= start && r.date <= end)
            .cloned()
            .collect())
    }
}

impl CompensationProvider for InMemoryRecords {
    fn get_compensation_profile(
        &self,
        employee_id: i64,
    ) -> ProviderResult<Option<CompensationProfile>> {
        self.enter(&self.counters.compensation, "compensation")?;
        Ok(self.records.compensation.get(&employee_id).cloned())
    }
}

impl ContributionProvider for InMemoryRecords {
    fn get_contribution_profile(
        &self,
        employee_id: i64,
    ) -> ProviderResult<Option<ContributionProfile>> {
        self.enter(&self.counters.contribution, "contribution")?;
        Ok(self.records.contributions.get(&employee_id).cloned())
    }
}
