//! Earnings aggregation.
//!
//! This module turns attendance, overtime and the fixed allowances of a
//! compensation profile into the earnings components of a payroll.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{CalculationError, CalculationResult};
use crate::models::{
    AttendanceRecord, AuditStep, AuditWarning, CompensationProfile, Earnings, OvertimeRecord,
    PayPeriod,
};

/// Multiplier applied to the hourly rate for overtime hours.
pub const OVERTIME_PREMIUM: Decimal = dec!(1.25);

/// Warning code raised when an employee has no compensation profile.
pub const MISSING_COMPENSATION_WARNING: &str = "MISSING_COMPENSATION_PROFILE";

/// Warning code raised for an overtime record above twelve hours.
pub const LONG_OVERTIME_WARNING: &str = "OVERTIME_EXCEEDS_DAILY_LIMIT";

/// The result of earnings aggregation.
#[derive(Debug, Clone)]
pub struct EarningsResult {
    /// The computed earnings components.
    pub earnings: Earnings,
    /// The audit step recording this aggregation.
    pub audit_step: AuditStep,
    /// Degraded-data warnings raised while aggregating.
    pub warnings: Vec<AuditWarning>,
}

/// Aggregates attendance, overtime and allowances into earnings.
///
/// Only records dated inside `period` are counted. Each attendance record
/// with a login time is one day worked, however short the day was.
///
/// # Arguments
///
/// * `period` - The pay period; attendance outside it is not paid
/// * `attendance` - Attendance records returned for the period
/// * `overtime` - Overtime records returned for the period
/// * `compensation` - The employee's allowances, if a profile exists
/// * `daily_rate` - Rate paid per day worked
/// * `hourly_rate` - Base rate for overtime hours before the premium
/// * `step_number` - The step number to assign to the audit step
///
/// # Returns
///
/// Returns an `EarningsResult`, or `InvalidRecord` if an attendance record
/// has its logout before its login or an overtime record lies outside 0 to 24 hours.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_earnings;
/// use payroll_engine::models::{AttendanceRecord, PayPeriod};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let day = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
/// let period = PayPeriod::new(day, day).unwrap();
/// let attendance = vec![AttendanceRecord {
///     employee_id: 1,
///     date: day,
///     login_time: NaiveTime::from_hms_opt(8, 0, 0),
///     logout_time: NaiveTime::from_hms_opt(17, 0, 0),
/// }];
///
/// let result = calculate_earnings(
///     &period,
///     &attendance,
///     &[],
///     None,
///     Decimal::new(500, 0),
///     Decimal::new(625, 1),
///     2,
/// )
/// .unwrap();
///
/// assert_eq!(result.earnings.days_worked, 1);
/// assert_eq!(result.earnings.basic_pay, Decimal::new(500, 0));
/// assert_eq!(result.warnings.len(), 1); // no compensation profile
/// ```
pub fn calculate_earnings(
    period: &PayPeriod,
    attendance: &[AttendanceRecord],
    overtime: &[OvertimeRecord],
    compensation: Option<&CompensationProfile>,
    daily_rate: Decimal,
    hourly_rate: Decimal,
    step_number: u32,
) -> CalculationResult<EarningsResult> {
    let mut warnings = Vec::new();

    for record in attendance {
        record
            .check_times()
            .map_err(|message| CalculationError::InvalidRecord {
                record: "attendance",
                date: record.date,
                message,
            })?;
    }

    let days_worked = attendance
        .iter()
        .filter(|r| period.contains_date(r.date) && r.is_present())
        .count() as u32;
    let basic_pay = Decimal::from(days_worked) * daily_rate;

    let mut total_overtime_hours = Decimal::ZERO;
    for record in overtime.iter().filter(|r| period.contains_date(r.date)) {
        record
            .check_hours()
            .map_err(|message| CalculationError::InvalidRecord {
                record: "overtime",
                date: record.date,
                message,
            })?;
        if !record.is_within_daily_limit() && record.hours > Decimal::ZERO {
            warnings.push(AuditWarning::new(
                LONG_OVERTIME_WARNING,
                format!(
                    "{} hours of overtime recorded on {}",
                    record.hours.normalize(),
                    record.date
                ),
                "medium",
            ));
        }
        total_overtime_hours += record.hours;
    }
    let overtime_pay = total_overtime_hours * hourly_rate * OVERTIME_PREMIUM;

    let allowances = match compensation {
        Some(profile) => profile.clone(),
        None => {
            warnings.push(AuditWarning::new(
                MISSING_COMPENSATION_WARNING,
                "No compensation profile; allowances default to zero",
                "low",
            ));
            CompensationProfile::default()
        }
    };

    let earnings = Earnings {
        days_worked,
        basic_pay,
        total_overtime_hours,
        overtime_pay,
        rice_subsidy: allowances.rice_subsidy,
        phone_allowance: allowances.phone_allowance,
        clothing_allowance: allowances.clothing_allowance,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "earnings_aggregation".to_string(),
        rule_name: "Earnings Aggregation".to_string(),
        input: serde_json::json!({
            "attendance_records": attendance.len(),
            "overtime_records": overtime.len(),
            "has_compensation_profile": compensation.is_some(),
            "daily_rate": daily_rate.normalize().to_string(),
            "hourly_rate": hourly_rate.normalize().to_string(),
            "overtime_premium": OVERTIME_PREMIUM.to_string()
        }),
        output: serde_json::json!({
            "days_worked": days_worked,
            "basic_pay": basic_pay.normalize().to_string(),
            "total_overtime_hours": total_overtime_hours.normalize().to_string(),
            "overtime_pay": overtime_pay.normalize().to_string(),
            "allowances_total": earnings.allowances_total().normalize().to_string()
        }),
        reasoning: format!(
            "{} days × daily rate = ${}; {} overtime hours × hourly rate × {} = ${}; allowances ${}",
            days_worked,
            basic_pay.round_dp(2),
            total_overtime_hours.normalize(),
            OVERTIME_PREMIUM,
            overtime_pay.round_dp(2),
            earnings.allowances_total().round_dp(2)
        ),
    };

    Ok(EarningsResult {
        earnings,
        audit_step,
        warnings,
    })
}
