//! Daily and hourly rate derivation.
//!
//! This module derives an employee's daily and hourly pay rates from the
//! monthly salary of their position.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{CalculationError, CalculationResult};
use crate::models::{AuditStep, Position};

/// Working days in a month used to derive the daily rate.
pub const WORKING_DAYS_PER_MONTH: Decimal = dec!(22);

/// Working hours in a day used to derive the hourly rate.
pub const HOURS_PER_DAY: Decimal = dec!(8);

/// Largest monthly salary accepted. Annualised tax and contribution products
/// stay well inside `Decimal` range below it.
pub const MAX_MONTHLY_SALARY: Decimal = dec!(1000000000000);

/// The result of rate resolution, including the rates and audit step.
#[derive(Debug, Clone)]
pub struct RateResolution {
    /// The position's monthly salary.
    pub monthly_rate: Decimal,
    /// monthly_rate / 22.
    pub daily_rate: Decimal,
    /// daily_rate / 8.
    pub hourly_rate: Decimal,
    /// The audit step recording this derivation.
    pub audit_step: AuditStep,
}

/// Derives daily and hourly rates from a position's monthly salary.
///
/// # Arguments
///
/// * `position` - The position whose monthly salary is the base rate
/// * `step_number` - The step number to assign to the audit step
///
/// # Returns
///
/// Returns a `RateResolution`, or `InvalidPosition` if the salary is negative
/// or above [`MAX_MONTHLY_SALARY`].
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::resolve_rates;
/// use payroll_engine::models::Position;
/// use rust_decimal::Decimal;
///
/// let position = Position {
///     id: 10,
///     title: "Clerk".to_string(),
///     monthly_salary: Decimal::new(11000, 0),
/// };
///
/// let rates = resolve_rates(&position, 1).unwrap();
/// assert_eq!(rates.daily_rate, Decimal::new(500, 0));
/// assert_eq!(rates.hourly_rate, Decimal::new(625, 1));
/// ```
pub fn resolve_rates(position: &Position, step_number: u32) -> CalculationResult<RateResolution> {
    let monthly_rate = position.monthly_salary;
    if monthly_rate < Decimal::ZERO {
        return Err(CalculationError::InvalidPosition {
            position_id: position.id,
            message: format!("monthly salary {} is negative", monthly_rate),
        });
    }
    if monthly_rate > MAX_MONTHLY_SALARY {
        return Err(CalculationError::InvalidPosition {
            position_id: position.id,
            message: format!(
                "monthly salary {} exceeds the maximum of {}",
                monthly_rate, MAX_MONTHLY_SALARY
            ),
        });
    }

    let daily_rate = monthly_rate / WORKING_DAYS_PER_MONTH;
    let hourly_rate = daily_rate / HOURS_PER_DAY;

    let audit_step = AuditStep {
        step_number,
        rule_id: "rate_resolution".to_string(),
        rule_name: "Rate Resolution".to_string(),
        input: serde_json::json!({
            "position_id": position.id,
            "monthly_salary": monthly_rate.to_string(),
            "working_days_per_month": WORKING_DAYS_PER_MONTH.to_string(),
            "hours_per_day": HOURS_PER_DAY.to_string()
        }),
        output: serde_json::json!({
            "daily_rate": daily_rate.normalize().to_string(),
            "hourly_rate": hourly_rate.normalize().to_string()
        }),
        reasoning: format!(
            "${} / {} days = ${} per day; / {} hours = ${} per hour",
            monthly_rate.normalize(),
            WORKING_DAYS_PER_MONTH,
            daily_rate.round_dp(4).normalize(),
            HOURS_PER_DAY,
            hourly_rate.round_dp(4).normalize()
        ),
    };

    Ok(RateResolution {
        monthly_rate,
        daily_rate,
        hourly_rate,
        audit_step,
    })
}
