//! Payroll result models.
//!
//! This module contains the [`PayrollResult`] type and its associated structures
//! that capture every output of a payroll calculation: rates, earnings,
//! deductions, statutory contributions, totals, and an audit trace.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayPeriod;

/// The kind of a time- or leave-based deduction line.
///
/// Parsing ignores case, so "late", "LATE" and "Late" are equivalent.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DeductionType;
///
/// let kind: DeductionType = "unpaidleave".parse().unwrap();
/// assert_eq!(kind, DeductionType::UnpaidLeave);
/// assert!("Bonus".parse::<DeductionType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionType {
    /// Login after the grace threshold.
    Late,
    /// Logout before the nominal end of day.
    Undertime,
    /// Approved unpaid leave.
    UnpaidLeave,
}

impl fmt::Display for DeductionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeductionType::Late => "Late",
            DeductionType::Undertime => "Undertime",
            DeductionType::UnpaidLeave => "UnpaidLeave",
        };
        f.write_str(name)
    }
}

impl FromStr for DeductionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [
            DeductionType::Late,
            DeductionType::Undertime,
            DeductionType::UnpaidLeave,
        ]
        .into_iter()
        .find(|kind| kind.to_string().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("Invalid deduction type: {}", s))
    }
}

/// A single itemised deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionLine {
    /// The date the deduction originated from.
    pub date: chrono::NaiveDate,
    /// The deduction kind.
    pub deduction_type: DeductionType,
    /// Hours for time-based deductions, or 1 per unpaid leave record.
    pub units: Decimal,
    /// The rate applied per unit.
    pub rate: Decimal,
    /// The deducted amount (units * rate).
    pub amount: Decimal,
}

/// Earnings components for the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earnings {
    /// Attendance records with a login time.
    pub days_worked: u32,
    /// days_worked * daily rate.
    pub basic_pay: Decimal,
    /// Sum of overtime hours in the period.
    pub total_overtime_hours: Decimal,
    /// Overtime hours at the premium hourly rate.
    pub overtime_pay: Decimal,
    /// Rice subsidy from the compensation profile.
    pub rice_subsidy: Decimal,
    /// Phone allowance from the compensation profile.
    pub phone_allowance: Decimal,
    /// Clothing allowance from the compensation profile.
    pub clothing_allowance: Decimal,
}

impl Earnings {
    /// Sum of the three fixed allowances.
    pub fn allowances_total(&self) -> Decimal {
        self.rice_subsidy + self.phone_allowance + self.clothing_allowance
    }
}

/// Attendance- and leave-based deductions for the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    /// Total tardiness deduction.
    pub late_deduction: Decimal,
    /// Total undertime deduction.
    pub undertime_deduction: Decimal,
    /// Approved unpaid leave records (not days).
    pub unpaid_leave_count: u32,
    /// unpaid_leave_count * daily rate.
    pub unpaid_leave_deduction: Decimal,
    /// The individual lines behind the three totals.
    pub lines: Vec<DeductionLine>,
}

impl Deductions {
    /// Sum of late, undertime and unpaid leave deductions.
    pub fn total(&self) -> Decimal {
        self.late_deduction + self.undertime_deduction + self.unpaid_leave_deduction
    }
}

/// Where the SSS/PhilHealth/Pag-IBIG amounts came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionSource {
    /// Taken from the employee's contribution profile.
    Profile,
    /// Computed from the statutory tables.
    Computed,
}

/// Statutory contributions and withholding tax for the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryContributions {
    /// Social Security System contribution.
    pub sss: Decimal,
    /// PhilHealth contribution (employee share).
    pub philhealth: Decimal,
    /// Pag-IBIG contribution.
    pub pagibig: Decimal,
    /// Monthly withholding tax.
    pub tax: Decimal,
    /// Origin of sss, philhealth and pagibig.
    pub source: ContributionSource,
}

impl StatutoryContributions {
    /// Sum of all three contributions and tax.
    pub fn total(&self) -> Decimal {
        self.sss + self.philhealth + self.pagibig + self.tax
    }
}

/// Final figures of a payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTotals {
    /// Basic pay only.
    pub gross_earnings: Decimal,
    /// gross_earnings + overtime pay + allowances.
    pub gross_pay: Decimal,
    /// All deductions, contributions and tax.
    pub total_deductions: Decimal,
    /// gross_pay - total_deductions. May be negative.
    pub net_pay: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate degraded input or unusual results that don't prevent
/// calculation but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    pub(crate) fn new(code: &str, message: impl Into<String>, severity: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: severity.to_string(),
        }
    }
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Returns true if a warning with the given code was raised.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

/// The complete result of a payroll calculation.
///
/// Created fresh per call and never mutated afterwards. Recomputing the same
/// employee and period over unchanged records yields an equal value,
/// including `calculation_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Identifier derived from the employee and period.
    pub calculation_id: Uuid,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The employee the payroll is for.
    pub employee_id: i64,
    /// The pay period.
    pub pay_period: PayPeriod,
    /// Monthly salary of the employee's position.
    pub monthly_rate: Decimal,
    /// monthly_rate / 22.
    pub daily_rate: Decimal,
    /// daily_rate / 8.
    pub hourly_rate: Decimal,
    /// Earnings components.
    pub earnings: Earnings,
    /// Attendance and leave deductions.
    pub deductions: Deductions,
    /// Statutory contributions and tax.
    pub contributions: StatutoryContributions,
    /// Final figures.
    pub totals: PayrollTotals,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

/// Rounded headline figures for display on a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipSummary {
    /// The employee the payroll is for.
    pub employee_id: i64,
    /// The pay period.
    pub pay_period: PayPeriod,
    /// Gross pay to two decimals.
    pub gross_pay: Decimal,
    /// Total deductions to two decimals.
    pub total_deductions: Decimal,
    /// Net pay to two decimals.
    pub net_pay: Decimal,
}

impl PayrollResult {
    /// Returns the headline figures rounded half away from zero to centavos.
    ///
    /// Net pay is rounded from the exact figure rather than recomputed from
    /// the rounded gross and deductions.
    pub fn summary(&self) -> PayslipSummary {
        let round = |d: Decimal| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        PayslipSummary {
            employee_id: self.employee_id,
            pay_period: self.pay_period,
            gross_pay: round(self.totals.gross_pay),
            total_deductions: round(self.totals.total_deductions),
            net_pay: round(self.totals.net_pay),
        }
    }
}
