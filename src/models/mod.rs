//! Core data models for the payroll engine.
//!
//! This module contains the read-only input records supplied by the record
//! providers and the [`PayrollResult`] produced by a calculation.

mod attendance;
mod employee;
mod leave;
mod overtime;
mod pay_period;
mod payroll_result;
mod profiles;

pub use attendance::AttendanceRecord;
pub use employee::{Employee, Position};
pub use leave::{LeaveRecord, LeaveStatus, UNPAID_LEAVE_TYPE};
pub use overtime::{OVERTIME_MAX_HOURS, OVERTIME_REVIEW_THRESHOLD, OvertimeRecord};
pub use pay_period::PayPeriod;
pub use payroll_result::{
    AuditStep, AuditTrace, AuditWarning, ContributionSource, DeductionLine, DeductionType,
    Deductions, Earnings, PayrollResult, PayrollTotals, PayslipSummary, StatutoryContributions,
};
pub use profiles::{CompensationProfile, ContributionProfile};
