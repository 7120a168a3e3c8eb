//! Calculation logic for the payroll engine.
//!
//! This module contains the pure calculation stages (rate resolution,
//! earnings aggregation, attendance and leave deductions, statutory tables)
//! and the [`PayrollCalculator`] that runs them in order against the record
//! providers. [`calculate_batch`] runs many calculations in parallel.

mod assembler;
mod batch;
mod deductions;
mod earnings;
mod rate_resolver;
mod statutory;

pub use assembler::{
    NEGATIVE_NET_PAY_WARNING, PayrollCalculator, PipelineStage, assemble_totals, validate_totals,
};
pub use batch::{BatchRequest, calculate_batch};
pub use deductions::{
    DeductionsResult, calculate_deductions, calculate_late_deduction,
    calculate_undertime_deduction, count_unpaid_leave, late_hours, undertime_hours,
};
pub use earnings::{
    EarningsResult, LONG_OVERTIME_WARNING, MISSING_COMPENSATION_WARNING, OVERTIME_PREMIUM,
    calculate_earnings,
};
pub use rate_resolver::{
    HOURS_PER_DAY, MAX_MONTHLY_SALARY, RateResolution, WORKING_DAYS_PER_MONTH, resolve_rates,
};
pub use statutory::{
    ContributionsResult, MISSING_CONTRIBUTION_WARNING, annual_income_tax, monthly_income_tax,
    pagibig_contribution, philhealth_contribution, resolve_contributions, sss_contribution,
};
