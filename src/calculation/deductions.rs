//! Attendance and leave deductions.
//!
//! Tardiness and undertime are measured in hours against the configured
//! shift schedule and charged at the hourly rate. Approved unpaid leave is
//! charged at the daily rate, one unit per leave record.

use chrono::{NaiveTime, TimeDelta};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::ShiftSchedule;
use crate::error::{CalculationError, CalculationResult};
use crate::models::{
    AttendanceRecord, AuditStep, DeductionLine, DeductionType, Deductions, LeaveRecord, PayPeriod,
};

const SECONDS_PER_HOUR: Decimal = dec!(3600);

/// The result of deduction aggregation.
#[derive(Debug, Clone)]
pub struct DeductionsResult {
    /// The computed deductions with their line items.
    pub deductions: Deductions,
    /// Audit steps for tardiness/undertime and unpaid leave.
    pub audit_steps: Vec<AuditStep>,
}

fn hours_between(from: NaiveTime, to: NaiveTime) -> Decimal {
    let delta: TimeDelta = to - from;
    Decimal::from(delta.num_seconds()) / SECONDS_PER_HOUR
}

/// Returns the hours charged as late for a login time.
///
/// A login at or before `grace_until` is not late. A later login is charged
/// from `nominal_start`, so the grace minutes are included.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::late_hours;
/// use payroll_engine::config::ShiftSchedule;
/// use chrono::NaiveTime;
/// use rust_decimal::Decimal;
///
/// let schedule = ShiftSchedule::default();
/// let on_time = NaiveTime::from_hms_opt(8, 15, 0).unwrap();
/// let late = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
///
/// assert_eq!(late_hours(on_time, &schedule), Decimal::ZERO);
/// assert_eq!(late_hours(late, &schedule), Decimal::new(5, 1));
/// ```
pub fn late_hours(login: NaiveTime, schedule: &ShiftSchedule) -> Decimal {
    if login <= schedule.grace_until {
        return Decimal::ZERO;
    }
    hours_between(schedule.nominal_start, login)
}

/// Returns the hours charged as undertime for a logout time.
pub fn undertime_hours(logout: NaiveTime, schedule: &ShiftSchedule) -> Decimal {
    if logout >= schedule.nominal_end {
        return Decimal::ZERO;
    }
    hours_between(logout, schedule.nominal_end)
}

/// Late deduction for a single attendance record.
pub fn calculate_late_deduction(
    record: &AttendanceRecord,
    schedule: &ShiftSchedule,
    hourly_rate: Decimal,
) -> Decimal {
    record
        .login_time
        .map(|login| late_hours(login, schedule) * hourly_rate)
        .unwrap_or(Decimal::ZERO)
}

/// Undertime deduction for a single attendance record.
///
/// A record without a login is not a day worked and carries no undertime.
pub fn calculate_undertime_deduction(
    record: &AttendanceRecord,
    schedule: &ShiftSchedule,
    hourly_rate: Decimal,
) -> Decimal {
    record
        .logout_time
        .filter(|_| record.is_present())
        .map(|logout| undertime_hours(logout, schedule) * hourly_rate)
        .unwrap_or(Decimal::ZERO)
}

/// Counts approved unpaid leave records overlapping the period.
///
/// Each record counts once however many days it spans.
pub fn count_unpaid_leave(period: &PayPeriod, leave: &[LeaveRecord]) -> u32 {
    unpaid_leave(period, leave).count() as u32
}

fn unpaid_leave<'r>(
    period: &'r PayPeriod,
    leave: &'r [LeaveRecord],
) -> impl Iterator<Item = &'r LeaveRecord> + 'r {
    leave.iter().filter(move |l| {
        l.is_approved() && l.is_unpaid() && l.overlaps(period.start_date, period.end_date)
    })
}

/// Aggregates tardiness, undertime and unpaid leave into deductions.
///
/// # Arguments
///
/// * `period` - The pay period; records outside it are ignored
/// * `attendance` - Attendance records returned for the period
/// * `leave` - Leave records returned for the period
/// * `schedule` - The shift schedule that defines lateness and undertime
/// * `daily_rate` - Rate charged per unpaid leave record
/// * `hourly_rate` - Rate charged per late or undertime hour
/// * `step_number` - The step number of the first audit step; the leave step follows it
///
/// # Returns
///
/// Returns a `DeductionsResult`, or `InvalidRecord` if an attendance record
/// logs out before it logs in or a leave record ends before it starts.
pub fn calculate_deductions(
    period: &PayPeriod,
    attendance: &[AttendanceRecord],
    leave: &[LeaveRecord],
    schedule: &ShiftSchedule,
    daily_rate: Decimal,
    hourly_rate: Decimal,
    step_number: u32,
) -> CalculationResult<DeductionsResult> {
    for record in attendance {
        record
            .check_times()
            .map_err(|message| CalculationError::InvalidRecord {
                record: "attendance",
                date: record.date,
                message,
            })?;
    }
    if let Some(record) = leave.iter().find(|l| l.end_date < l.start_date) {
        return Err(CalculationError::InvalidRecord {
            record: "leave",
            date: record.start_date,
            message: format!(
                "end date {} is before start date {}",
                record.end_date, record.start_date
            ),
        });
    }

    let mut lines = Vec::new();
    let mut late_deduction = Decimal::ZERO;
    let mut undertime_deduction = Decimal::ZERO;
    let mut late_hours_total = Decimal::ZERO;
    let mut undertime_hours_total = Decimal::ZERO;

    for record in attendance.iter().filter(|r| period.contains_date(r.date)) {
        if let Some(login) = record.login_time {
            let hours = late_hours(login, schedule);
            if hours > Decimal::ZERO {
                let amount = hours * hourly_rate;
                late_hours_total += hours;
                late_deduction += amount;
                lines.push(DeductionLine {
                    date: record.date,
                    deduction_type: DeductionType::Late,
                    units: hours,
                    rate: hourly_rate,
                    amount,
                });
            }
        }
        if let Some(logout) = record.logout_time.filter(|_| record.is_present()) {
            let hours = undertime_hours(logout, schedule);
            if hours > Decimal::ZERO {
                let amount = hours * hourly_rate;
                undertime_hours_total += hours;
                undertime_deduction += amount;
                lines.push(DeductionLine {
                    date: record.date,
                    deduction_type: DeductionType::Undertime,
                    units: hours,
                    rate: hourly_rate,
                    amount,
                });
            }
        }
    }

    let time_step = AuditStep {
        step_number,
        rule_id: "time_deductions".to_string(),
        rule_name: "Tardiness and Undertime".to_string(),
        input: serde_json::json!({
            "attendance_records": attendance.len(),
            "nominal_start": schedule.nominal_start.to_string(),
            "grace_until": schedule.grace_until.to_string(),
            "nominal_end": schedule.nominal_end.to_string(),
            "hourly_rate": hourly_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "late_hours": late_hours_total.normalize().to_string(),
            "late_deduction": late_deduction.normalize().to_string(),
            "undertime_hours": undertime_hours_total.normalize().to_string(),
            "undertime_deduction": undertime_deduction.normalize().to_string()
        }),
        reasoning: format!(
            "{} late hours and {} undertime hours × hourly rate = ${} + ${}",
            late_hours_total.round_dp(4).normalize(),
            undertime_hours_total.round_dp(4).normalize(),
            late_deduction.round_dp(2),
            undertime_deduction.round_dp(2)
        ),
    };

    let mut leave_days = 0;
    let mut unpaid_leave_count = 0u32;
    for record in unpaid_leave(period, leave) {
        unpaid_leave_count += 1;
        leave_days += record.leave_days();
        lines.push(DeductionLine {
            date: record.start_date.max(period.start_date),
            deduction_type: DeductionType::UnpaidLeave,
            units: Decimal::ONE,
            rate: daily_rate,
            amount: daily_rate,
        });
    }
    let unpaid_leave_deduction = Decimal::from(unpaid_leave_count) * daily_rate;

    let leave_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "unpaid_leave".to_string(),
        rule_name: "Unpaid Leave".to_string(),
        input: serde_json::json!({
            "leave_records": leave.len(),
            "daily_rate": daily_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "unpaid_leave_count": unpaid_leave_count,
            "calendar_days_covered": leave_days,
            "unpaid_leave_deduction": unpaid_leave_deduction.normalize().to_string()
        }),
        reasoning: format!(
            "{} approved unpaid leave records × daily rate = ${} (records are counted, not the {} days they cover)",
            unpaid_leave_count,
            unpaid_leave_deduction.round_dp(2),
            leave_days
        ),
    };

    Ok(DeductionsResult {
        deductions: Deductions {
            late_deduction,
            undertime_deduction,
            unpaid_leave_count,
            unpaid_leave_deduction,
            lines,
        },
        audit_steps: vec![time_step, leave_step],
    })
}
