//! Payroll assembly.
//!
//! [`PayrollCalculator`] drives one calculation through a fixed sequence of
//! stages, reading records from the injected providers and combining the
//! rate, earnings, deduction and contribution stages into a validated
//! [`PayrollResult`].

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PayrollConfig;
use crate::error::{CalculationError, CalculationResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, Deductions, Earnings, PayPeriod, PayrollResult,
    PayrollTotals, StatutoryContributions,
};
use crate::providers::RecordSources;

use super::deductions::calculate_deductions;
use super::earnings::calculate_earnings;
use super::rate_resolver::resolve_rates;
use super::statutory::resolve_contributions;

/// Warning code raised when deductions exceed gross pay.
pub const NEGATIVE_NET_PAY_WARNING: &str = "NEGATIVE_NET_PAY";

/// The stages a payroll calculation passes through, in order.
///
/// A failure leaves the pipeline at the last stage it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    /// Request accepted; nothing computed yet.
    Initialized,
    /// Daily and hourly rates derived.
    RatesResolved,
    /// Basic pay, overtime and allowances computed.
    EarningsComputed,
    /// Tardiness, undertime and unpaid leave computed.
    DeductionsComputed,
    /// Statutory contributions and tax resolved.
    ContributionsResolved,
    /// Totals combined into a result.
    Assembled,
    /// Result passed its final checks.
    Validated,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Initialized => "initialized",
            PipelineStage::RatesResolved => "rates_resolved",
            PipelineStage::EarningsComputed => "earnings_computed",
            PipelineStage::DeductionsComputed => "deductions_computed",
            PipelineStage::ContributionsResolved => "contributions_resolved",
            PipelineStage::Assembled => "assembled",
            PipelineStage::Validated => "validated",
        };
        f.write_str(name)
    }
}

/// Computes payrolls from injected record providers.
///
/// The calculator holds only shared references and no mutable state, so a
/// single instance may serve any number of sequential calculations.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::PayrollCalculator;
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::{Employee, Position};
/// use payroll_engine::providers::{InMemoryRecords, RecordSources};
/// use chrono::NaiveDate;
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
/// let config = PayrollConfig::default();
/// let calculator = PayrollCalculator::new(RecordSources::from_store(&store), &config);
///
/// let result = calculator
///     .calculate_payroll(
///         1,
///         NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
///     )
///     .unwrap();
///
/// assert_eq!(result.daily_rate, Decimal::new(500, 0));
/// assert_eq!(result.totals.net_pay, result.totals.gross_pay - result.totals.total_deductions);
/// ```
#[derive(Clone, Copy)]
pub struct PayrollCalculator<'a> {
    sources: RecordSources<'a>,
    config: &'a PayrollConfig,
}

impl<'a> PayrollCalculator<'a> {
    /// Creates a calculator over the given providers and configuration.
    pub fn new(sources: RecordSources<'a>, config: &'a PayrollConfig) -> Self {
        Self { sources, config }
    }

    /// Calculates the payroll of one employee for an inclusive period.
    ///
    /// # Returns
    ///
    /// Returns the validated `PayrollResult`, or an error if:
    /// - `employee_id` is not positive or the period is reversed (`InvalidInput`,
    ///   raised before any provider is called)
    /// - The employee or its position does not exist (`EmployeeNotFound`, `PositionNotFound`)
    /// - A provider call fails (`ProviderFailure`)
    /// - A provider returns a malformed record (`InvalidRecord`, `InvalidPosition`)
    /// - The assembled totals fail their checks (`ValidationFailure`)
    pub fn calculate_payroll(
        &self,
        employee_id: i64,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> CalculationResult<PayrollResult> {
        let mut stage = PipelineStage::Initialized;
        match self.run(employee_id, period_start, period_end, &mut stage) {
            Ok(result) => {
                info!(
                    employee_id,
                    calculation_id = %result.calculation_id,
                    days_worked = result.earnings.days_worked,
                    gross_pay = %result.totals.gross_pay,
                    net_pay = %result.totals.net_pay,
                    warnings = result.audit_trace.warnings.len(),
                    "Payroll calculated"
                );
                Ok(result)
            }
            Err(err) => {
                warn!(
                    employee_id,
                    stage = %stage,
                    error = %err,
                    "Payroll calculation halted"
                );
                Err(err)
            }
        }
    }

    fn run(
        &self,
        employee_id: i64,
        period_start: NaiveDate,
        period_end: NaiveDate,
        stage: &mut PipelineStage,
    ) -> CalculationResult<PayrollResult> {
        if employee_id <= 0 {
            return Err(CalculationError::invalid_input(
                "employee_id",
                format!("must be positive, got {}", employee_id),
            ));
        }
        let period = PayPeriod::new(period_start, period_end)?;
        let sources = &self.sources;
        let mut steps: Vec<AuditStep> = Vec::new();
        let mut warnings: Vec<AuditWarning> = Vec::new();

        let employee = sources
            .employees
            .get_employee(employee_id)
            .map_err(CalculationError::provider("employee"))?
            .ok_or(CalculationError::EmployeeNotFound { employee_id })?;
        let position = sources
            .positions
            .get_position(employee.position_id)
            .map_err(CalculationError::provider("position"))?
            .ok_or(CalculationError::PositionNotFound {
                position_id: employee.position_id,
                employee_id,
            })?;
        debug!(
            employee_id,
            employee = %employee.full_name(),
            position = %position.title,
            "Resolved employee position"
        );

        let rates = resolve_rates(&position, next_step(&steps))?;
        steps.push(rates.audit_step);
        *stage = PipelineStage::RatesResolved;

        let attendance = sources
            .attendance
            .get_attendance(employee_id, period.start_date, period.end_date)
            .map_err(CalculationError::provider("attendance"))?;
        let overtime = sources
            .overtime
            .get_overtime(employee_id, period.start_date, period.end_date)
            .map_err(CalculationError::provider("overtime"))?;
        let compensation = sources
            .compensation
            .get_compensation_profile(employee_id)
            .map_err(CalculationError::provider("compensation"))?;

        let earnings = calculate_earnings(
            &period,
            &attendance,
            &overtime,
            compensation.as_ref(),
            rates.daily_rate,
            rates.hourly_rate,
            next_step(&steps),
        )?;
        steps.push(earnings.audit_step);
        record_warnings(employee_id, earnings.warnings, &mut warnings);
        *stage = PipelineStage::EarningsComputed;

        let leave = sources
            .leave
            .get_approved_leave(employee_id, period.start_date, period.end_date)
            .map_err(CalculationError::provider("leave"))?;

        let deductions = calculate_deductions(
            &period,
            &attendance,
            &leave,
            self.config.schedule(),
            rates.daily_rate,
            rates.hourly_rate,
            next_step(&steps),
        )?;
        steps.extend(deductions.audit_steps);
        *stage = PipelineStage::DeductionsComputed;

        let profile = sources
            .contributions
            .get_contribution_profile(employee_id)
            .map_err(CalculationError::provider("contribution"))?;

        let contributions = resolve_contributions(
            rates.monthly_rate,
            profile.as_ref(),
            self.config.statutory(),
            next_step(&steps),
        );
        steps.push(contributions.audit_step);
        record_warnings(employee_id, contributions.warnings, &mut warnings);
        *stage = PipelineStage::ContributionsResolved;

        let totals = assemble_totals(
            &earnings.earnings,
            &deductions.deductions,
            &contributions.contributions,
        );
        steps.push(totals_step(&totals, next_step(&steps)));
        *stage = PipelineStage::Assembled;

        validate_totals(&totals, *stage)?;
        if totals.net_pay < Decimal::ZERO {
            warn!(
                employee_id,
                net_pay = %totals.net_pay,
                "Deductions exceed gross pay"
            );
            warnings.push(AuditWarning::new(
                NEGATIVE_NET_PAY_WARNING,
                format!(
                    "Net pay is negative: gross ${} less deductions ${}",
                    totals.gross_pay.round_dp(2),
                    totals.total_deductions.round_dp(2)
                ),
                "high",
            ));
        }
        *stage = PipelineStage::Validated;

        Ok(PayrollResult {
            calculation_id: calculation_id(employee_id, &period),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            employee_id,
            pay_period: period,
            monthly_rate: rates.monthly_rate,
            daily_rate: rates.daily_rate,
            hourly_rate: rates.hourly_rate,
            earnings: earnings.earnings,
            deductions: deductions.deductions,
            contributions: contributions.contributions,
            totals,
            audit_trace: AuditTrace { steps, warnings },
        })
    }
}

fn next_step(steps: &[AuditStep]) -> u32 {
    steps.len() as u32 + 1
}

fn record_warnings(employee_id: i64, raised: Vec<AuditWarning>, into: &mut Vec<AuditWarning>) {
    for warning in raised {
        warn!(
            employee_id,
            code = %warning.code,
            message = %warning.message,
            "Degraded payroll input"
        );
        into.push(warning);
    }
}

/// Name-based identifier, stable across recomputation of the same payroll.
fn calculation_id(employee_id: i64, period: &PayPeriod) -> Uuid {
    let name = format!(
        "payroll:{}:{}:{}",
        employee_id, period.start_date, period.end_date
    );
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

/// Combines the stage outputs into gross, deduction and net figures.
///
/// Gross earnings are basic pay alone. Gross pay adds overtime and the
/// three allowances. Total deductions cover attendance, leave, the three
/// contributions and tax.
pub fn assemble_totals(
    earnings: &Earnings,
    deductions: &Deductions,
    contributions: &StatutoryContributions,
) -> PayrollTotals {
    let gross_earnings = earnings.basic_pay;
    let gross_pay = gross_earnings + earnings.overtime_pay + earnings.allowances_total();
    let total_deductions = deductions.total() + contributions.total();
    PayrollTotals {
        gross_earnings,
        gross_pay,
        total_deductions,
        net_pay: gross_pay - total_deductions,
    }
}

/// Checks assembled totals; negative net pay is allowed.
pub fn validate_totals(totals: &PayrollTotals, stage: PipelineStage) -> CalculationResult<()> {
    let failure = |message: String| CalculationError::ValidationFailure { stage, message };
    if totals.gross_pay < Decimal::ZERO {
        return Err(failure(format!("gross pay {} is negative", totals.gross_pay)));
    }
    if totals.total_deductions < Decimal::ZERO {
        return Err(failure(format!(
            "total deductions {} are negative",
            totals.total_deductions
        )));
    }
    if totals.net_pay != totals.gross_pay - totals.total_deductions {
        return Err(failure("net pay does not equal gross less deductions".to_string()));
    }
    debug!(stage = %stage, "Payroll totals validated");
    Ok(())
}

fn totals_step(totals: &PayrollTotals, step_number: u32) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "payroll_totals".to_string(),
        rule_name: "Payroll Totals".to_string(),
        input: serde_json::json!({
            "gross_earnings": totals.gross_earnings.normalize().to_string()
        }),
        output: serde_json::json!({
            "gross_pay": totals.gross_pay.normalize().to_string(),
            "total_deductions": totals.total_deductions.normalize().to_string(),
            "net_pay": totals.net_pay.normalize().to_string()
        }),
        reasoning: format!(
            "Gross pay ${} less deductions ${} = net pay ${}",
            totals.gross_pay.round_dp(2),
            totals.total_deductions.round_dp(2),
            totals.net_pay.round_dp(2)
        ),
    }
}
