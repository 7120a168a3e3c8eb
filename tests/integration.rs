//! End-to-end tests for the payroll engine.
//!
//! These tests drive `PayrollCalculator` against `InMemoryRecords` and cover:
//! - Earnings (days worked, overtime, allowances)
//! - Tardiness, undertime and unpaid leave deductions
//! - Statutory contributions and income tax
//! - Degraded data (missing profiles)
//! - Error cases and provider call ordering
//! - Idempotent recomputation and batch runs

use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use payroll_engine::calculation::{
    BatchRequest, MISSING_COMPENSATION_WARNING, MISSING_CONTRIBUTION_WARNING,
    NEGATIVE_NET_PAY_WARNING, PayrollCalculator, calculate_batch,
};
use payroll_engine::config::{ConfigLoader, PayrollConfig};
use payroll_engine::error::{CalculationError, CalculationResult, ErrorKind};
use payroll_engine::models::{
    AttendanceRecord, CompensationProfile, ContributionProfile, ContributionSource, DeductionType,
    Employee, LeaveRecord, LeaveStatus, OvertimeRecord, PayrollResult, Position,
};
use payroll_engine::providers::{InMemoryRecords, RecordSources};

// =============================================================================
// Test Helpers
// =============================================================================

const EMPLOYEE_ID: i64 = 1001;
const POSITION_ID: i64 = 20;

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn time(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

/// Employee 1001 on a position paying `salary` a month, with no other records.
fn base_store(salary: &str) -> InMemoryRecords {
    InMemoryRecords::new()
        .with_employee(Employee {
            id: EMPLOYEE_ID,
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            position_id: POSITION_ID,
        })
        .with_position(Position {
            id: POSITION_ID,
            title: "Payroll Clerk".to_string(),
            monthly_salary: decimal(salary),
        })
}

fn attendance(d: u32, login: (u32, u32), logout: (u32, u32)) -> AttendanceRecord {
    AttendanceRecord {
        employee_id: EMPLOYEE_ID,
        date: date(d),
        login_time: time(login.0, login.1),
        logout_time: time(logout.0, logout.1),
    }
}

fn full_day(d: u32) -> AttendanceRecord {
    attendance(d, (8, 0), (17, 0))
}

fn overtime(d: u32, hours: &str) -> OvertimeRecord {
    OvertimeRecord {
        employee_id: EMPLOYEE_ID,
        date: date(d),
        hours: decimal(hours),
        reason: Some("Month-end close".to_string()),
    }
}

fn leave(leave_type: &str, start: u32, end: u32, status: LeaveStatus) -> LeaveRecord {
    LeaveRecord {
        employee_id: EMPLOYEE_ID,
        start_date: date(start),
        end_date: date(end),
        leave_type: leave_type.to_string(),
        status,
    }
}

fn allowances(rice: &str, phone: &str, clothing: &str) -> CompensationProfile {
    CompensationProfile {
        employee_id: EMPLOYEE_ID,
        rice_subsidy: decimal(rice),
        phone_allowance: decimal(phone),
        clothing_allowance: decimal(clothing),
    }
}

fn calculate_for(
    store: &InMemoryRecords,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> CalculationResult<PayrollResult> {
    let config = PayrollConfig::default();
    PayrollCalculator::new(RecordSources::from_store(store), &config)
        .calculate_payroll(employee_id, start, end)
}

/// Calculates employee 1001 for 1-15 June 2024.
fn calculate(store: &InMemoryRecords) -> PayrollResult {
    calculate_for(store, EMPLOYEE_ID, date(1), date(15)).expect("calculation failed")
}

fn assert_net_identity(result: &PayrollResult) {
    assert_eq!(
        result.totals.net_pay,
        result.totals.gross_pay - result.totals.total_deductions,
        "net pay must equal gross pay less deductions"
    );
}

// =============================================================================
// SECTION 1: Rates and Earnings
// =============================================================================

#[test]
fn test_rates_derived_from_position() {
    // 11000 / 22 = 500 per day; 500 / 8 = 62.5 per hour
    let result = calculate(&base_store("11000"));

    assert_eq!(result.monthly_rate, decimal("11000"));
    assert_eq!(result.daily_rate, decimal("500"));
    assert_eq!(result.hourly_rate, decimal("62.5"));
}

#[test]
fn test_days_worked_counts_records_with_login() {
    // Three days with a login, one with only a logout
    let store = base_store("11000").with_attendance(vec![
        full_day(3),
        full_day(4),
        full_day(5),
        AttendanceRecord {
            employee_id: EMPLOYEE_ID,
            date: date(6),
            login_time: None,
            logout_time: time(17, 0),
        },
    ]);
    let result = calculate(&store);

    assert_eq!(result.earnings.days_worked, 3);
    assert_eq!(result.earnings.basic_pay, decimal("1500"));
    assert_eq!(result.totals.gross_earnings, decimal("1500"));
}

#[test]
fn test_zero_attendance_gives_zero_basic_pay() {
    let result = calculate(&base_store("11000"));

    assert_eq!(result.earnings.days_worked, 0);
    assert_eq!(result.earnings.basic_pay, Decimal::ZERO);
}

#[test]
fn test_attendance_outside_period_is_not_paid() {
    let store = base_store("11000").with_attendance(vec![full_day(14), full_day(16)]);
    let result = calculate(&store);

    assert_eq!(result.earnings.days_worked, 1);
}

#[test]
fn test_overtime_paid_at_125_percent() {
    // (2 + 3) hours × 62.5 × 1.25 = 390.625
    let store = base_store("11000")
        .with_overtime(vec![overtime(3, "2"), overtime(10, "3")])
        .with_compensation(allowances("0", "0", "0"));
    let result = calculate(&store);

    assert_eq!(result.earnings.total_overtime_hours, decimal("5"));
    assert_eq!(result.earnings.overtime_pay, decimal("390.625"));
    assert_eq!(result.totals.gross_pay, decimal("390.625"));
}

#[test]
fn test_gross_pay_adds_overtime_and_allowances_to_basic_pay() {
    // Basic 2 × 500 = 1000; overtime 1 × 62.5 × 1.25 = 78.125; allowances 3000
    let store = base_store("11000")
        .with_attendance(vec![full_day(3), full_day(4)])
        .with_overtime(vec![overtime(4, "1")])
        .with_compensation(allowances("1500", "500", "1000"));
    let result = calculate(&store);

    assert_eq!(result.totals.gross_earnings, decimal("1000"));
    assert_eq!(result.totals.gross_pay, decimal("4078.125"));
    assert_net_identity(&result);
}

#[test]
fn test_long_overtime_is_flagged() {
    let store = base_store("11000").with_overtime(vec![overtime(3, "14")]);
    let result = calculate(&store);

    assert_eq!(result.earnings.total_overtime_hours, decimal("14"));
    assert!(result
        .audit_trace
        .has_warning("OVERTIME_EXCEEDS_DAILY_LIMIT"));
}

// =============================================================================
// SECTION 2: Deductions
// =============================================================================

#[test]
fn test_late_login_at_0830() {
    // 30 minutes from 08:00 at 62.5/h = 31.25
    let store = base_store("11000").with_attendance(vec![attendance(3, (8, 30), (17, 0))]);
    let result = calculate(&store);

    assert_eq!(result.deductions.late_deduction, decimal("31.25"));
    assert_eq!(result.deductions.lines.len(), 1);
    assert_eq!(result.deductions.lines[0].deduction_type, DeductionType::Late);
}

#[test]
fn test_login_at_grace_boundary_is_not_late() {
    let store = base_store("11000").with_attendance(vec![
        attendance(3, (8, 15), (17, 0)),
        attendance(4, (7, 45), (17, 0)),
    ]);
    let result = calculate(&store);

    assert_eq!(result.deductions.late_deduction, Decimal::ZERO);
}

#[test]
fn test_undertime_before_1700() {
    // Leaves at 15:30: 1.5h × 62.5 = 93.75
    let store = base_store("11000").with_attendance(vec![attendance(3, (8, 0), (15, 30))]);
    let result = calculate(&store);

    assert_eq!(result.deductions.undertime_deduction, decimal("93.75"));
    assert_eq!(result.earnings.days_worked, 1);
}

#[test]
fn test_logout_without_login_is_neither_paid_nor_charged_undertime() {
    let store = base_store("11000").with_attendance(vec![AttendanceRecord {
        employee_id: EMPLOYEE_ID,
        date: date(3),
        login_time: None,
        logout_time: time(12, 0),
    }]);
    let result = calculate(&store);

    assert_eq!(result.earnings.days_worked, 0);
    assert_eq!(result.deductions.undertime_deduction, Decimal::ZERO);
    assert!(result.deductions.lines.is_empty());
}

#[test]
fn test_unpaid_leave_counts_records_not_days() {
    // One approved unpaid leave spanning five days is a single unit
    let store = base_store("11000").with_leave(vec![leave("Unpaid", 10, 14, LeaveStatus::Approved)]);
    let result = calculate(&store);

    assert_eq!(result.deductions.unpaid_leave_count, 1);
    assert_eq!(result.deductions.unpaid_leave_deduction, decimal("500"));
}

#[test]
fn test_unpaid_leave_type_is_case_insensitive_and_requires_approval() {
    let store = base_store("11000").with_leave(vec![
        leave("UNPAID", 3, 3, LeaveStatus::Approved),
        leave("unpaid", 5, 5, LeaveStatus::Approved),
        leave("Unpaid", 7, 7, LeaveStatus::Rejected),
        leave("Sick", 10, 11, LeaveStatus::Approved),
    ]);
    let result = calculate(&store);

    assert_eq!(result.deductions.unpaid_leave_count, 2);
    assert_eq!(result.deductions.unpaid_leave_deduction, decimal("1000"));
}

#[test]
fn test_unpaid_leave_type_with_padding_does_not_match() {
    let store = base_store("11000").with_leave(vec![leave(" Unpaid ", 3, 3, LeaveStatus::Approved)]);
    let result = calculate(&store);

    assert_eq!(result.deductions.unpaid_leave_count, 0);
}

#[test]
fn test_unpaid_leave_line_is_dated_inside_the_period() {
    // Leave from 28 May to 3 June overlaps the period from its first day
    let mut record = leave("Unpaid", 1, 3, LeaveStatus::Approved);
    record.start_date = NaiveDate::from_ymd_opt(2024, 5, 28).unwrap();
    let store = base_store("11000").with_leave(vec![record]);
    let result = calculate(&store);

    assert_eq!(result.deductions.unpaid_leave_count, 1);
    assert_eq!(result.deductions.lines[0].deduction_type, DeductionType::UnpaidLeave);
    assert_eq!(result.deductions.lines[0].date, date(1));
}

// =============================================================================
// SECTION 3: Statutory Contributions
// =============================================================================

#[test]
fn test_salary_5000_without_profile_uses_tables() {
    let result = calculate(&base_store("5000"));
    let c = &result.contributions;

    assert_eq!(c.sss, decimal("225.00"));
    assert_eq!(c.philhealth, decimal("112.5"));
    assert_eq!(c.pagibig, decimal("100"));
    assert_eq!(c.source, ContributionSource::Computed);
    assert!(result.audit_trace.has_warning(MISSING_CONTRIBUTION_WARNING));
}

#[test]
fn test_salary_10000_has_no_tax() {
    let result = calculate(&base_store("10000"));
    assert_eq!(result.contributions.tax, Decimal::ZERO);
}

#[test]
fn test_contribution_profile_overrides_tables() {
    let store = base_store("30000").with_contributions(ContributionProfile {
        employee_id: EMPLOYEE_ID,
        sss: decimal("1350"),
        philhealth: decimal("450"),
        pagibig: decimal("200"),
    });
    let result = calculate(&store);

    assert_eq!(result.contributions.sss, decimal("1350"));
    assert_eq!(result.contributions.source, ContributionSource::Profile);
    // 360,000 annual: 110,000 × 15% = 16,500 a year
    assert_eq!(result.contributions.tax, decimal("1375"));
    assert!(!result.audit_trace.has_warning(MISSING_CONTRIBUTION_WARNING));
}

// =============================================================================
// SECTION 4: Totals and Degraded Data
// =============================================================================

#[test]
fn test_complete_payroll() {
    // Salary 11000: daily 500, hourly 62.5
    // Earnings: 10 days × 500 = 5000; overtime 4h × 78.125 = 312.5; allowances 3000
    // Deductions: late 31.25; undertime 62.5; unpaid leave 500
    // Contributions: SSS 1125, PhilHealth 247.5, Pag-IBIG 220, tax 0
    let mut days: Vec<AttendanceRecord> = [3, 4, 5, 6, 7, 10, 11, 12, 13].map(full_day).to_vec();
    days.push(attendance(14, (8, 30), (16, 0)));

    let store = base_store("11000")
        .with_attendance(days)
        .with_overtime(vec![overtime(5, "4")])
        .with_leave(vec![leave("Unpaid", 1, 1, LeaveStatus::Approved)])
        .with_compensation(allowances("1500", "500", "1000"));
    let result = calculate(&store);

    assert_eq!(result.earnings.days_worked, 10);
    assert_eq!(result.totals.gross_pay, decimal("8312.5"));
    assert_eq!(result.deductions.total(), decimal("593.75"));
    assert_eq!(result.contributions.total(), decimal("1592.5"));
    assert_eq!(result.totals.total_deductions, decimal("2186.25"));
    assert_eq!(result.totals.net_pay, decimal("6126.25"));
    assert_net_identity(&result);

    let summary = result.summary();
    assert_eq!(summary.net_pay, decimal("6126.25"));
}

#[test]
fn test_missing_compensation_profile_is_degraded_not_error() {
    let store = base_store("11000").with_attendance(vec![full_day(3)]);
    let result = calculate(&store);

    assert_eq!(result.earnings.allowances_total(), Decimal::ZERO);
    assert!(result.audit_trace.has_warning(MISSING_COMPENSATION_WARNING));
}

#[test]
fn test_negative_net_pay_is_permitted_with_warning() {
    let store = base_store("11000").with_attendance(vec![full_day(3)]);
    let result = calculate(&store);

    assert!(result.totals.net_pay < Decimal::ZERO);
    assert_net_identity(&result);
    let warning = result
        .audit_trace
        .warnings
        .iter()
        .find(|w| w.code == NEGATIVE_NET_PAY_WARNING)
        .expect("negative net pay warning");
    assert_eq!(warning.severity, "high");
}

#[test]
fn test_recomputation_is_byte_identical() {
    let store = base_store("11000")
        .with_attendance(vec![full_day(3), attendance(4, (9, 0), (16, 0))])
        .with_overtime(vec![overtime(3, "2.5")])
        .with_leave(vec![leave("Unpaid", 6, 7, LeaveStatus::Approved)])
        .with_compensation(allowances("1500", "500", "1000"));

    let first = serde_json::to_vec(&calculate(&store)).unwrap();
    let second = serde_json::to_vec(&calculate(&store)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_result_uses_loaded_configuration() {
    let config = ConfigLoader::load("./config/default").unwrap().into_config();
    let store = base_store("11000").with_attendance(vec![attendance(3, (8, 30), (17, 0))]);
    let result = PayrollCalculator::new(RecordSources::from_store(&store), &config)
        .calculate_payroll(EMPLOYEE_ID, date(1), date(15))
        .unwrap();

    assert_eq!(result.deductions.late_deduction, decimal("31.25"));
}

// =============================================================================
// SECTION 5: Error Cases
// =============================================================================

#[test]
fn test_non_positive_employee_id_rejected_before_any_provider_call() {
    let store = base_store("11000");

    for employee_id in [0, -5] {
        let err = calculate_for(&store, employee_id, date(1), date(15)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
    assert_eq!(store.calls().total(), 0);
}

#[test]
fn test_reversed_period_rejected_before_any_provider_call() {
    let store = base_store("11000");

    let err = calculate_for(&store, EMPLOYEE_ID, date(15), date(1)).unwrap_err();
    match err {
        CalculationError::InvalidInput { field, .. } => assert_eq!(field, "period_end"),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
    assert_eq!(store.calls().total(), 0);
}

#[test]
fn test_single_day_period_is_valid() {
    let store = base_store("11000").with_attendance(vec![full_day(3)]);
    let result = calculate_for(&store, EMPLOYEE_ID, date(3), date(3)).unwrap();
    assert_eq!(result.earnings.days_worked, 1);
}

#[test]
fn test_unknown_employee_is_not_found() {
    let store = base_store("11000");
    let err = calculate_for(&store, 42, date(1), date(15)).unwrap_err();

    assert!(matches!(
        err,
        CalculationError::EmployeeNotFound { employee_id: 42 }
    ));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(store.calls().position, 0);
}

#[test]
fn test_missing_position_is_not_found() {
    let store = InMemoryRecords::new().with_employee(Employee {
        id: EMPLOYEE_ID,
        first_name: "Maria".to_string(),
        last_name: "Santos".to_string(),
        position_id: 99,
    });
    let err = calculate_for(&store, EMPLOYEE_ID, date(1), date(15)).unwrap_err();

    assert!(matches!(
        err,
        CalculationError::PositionNotFound {
            position_id: 99,
            employee_id: EMPLOYEE_ID
        }
    ));
    assert_eq!(store.calls().attendance, 0);
}

#[test]
fn test_negative_salary_is_invalid_position() {
    let err = calculate_for(&base_store("-1"), EMPLOYEE_ID, date(1), date(15)).unwrap_err();
    assert!(matches!(err, CalculationError::InvalidPosition { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidRecord);
}

#[test]
fn test_salary_beyond_decimal_range_is_invalid_position_not_overflow() {
    let store = base_store(&Decimal::MAX.to_string()).with_attendance(vec![full_day(3)]);
    let err = calculate_for(&store, EMPLOYEE_ID, date(1), date(15)).unwrap_err();

    match &err {
        CalculationError::InvalidPosition { position_id, .. } => {
            assert_eq!(*position_id, POSITION_ID)
        }
        other => panic!("Expected InvalidPosition, got {:?}", other),
    }
    // Rejected before any attendance is read
    assert_eq!(store.calls().attendance, 0);
}

#[test]
fn test_provider_failure_surfaces_immediately() {
    let store = base_store("11000").failing("attendance");
    let err = calculate_for(&store, EMPLOYEE_ID, date(1), date(15)).unwrap_err();

    match &err {
        CalculationError::ProviderFailure { provider, .. } => assert_eq!(*provider, "attendance"),
        other => panic!("Expected ProviderFailure, got {:?}", other),
    }
    assert_eq!(err.kind(), ErrorKind::ProviderFailure);

    // No retry, and nothing after the failed read
    let calls = store.calls();
    assert_eq!(calls.attendance, 1);
    assert_eq!(calls.overtime, 0);
    assert_eq!(calls.leave, 0);
    assert_eq!(calls.contribution, 0);
}

#[test]
fn test_contribution_provider_failure_is_fatal() {
    let store = base_store("11000").failing("contribution");
    let err = calculate_for(&store, EMPLOYEE_ID, date(1), date(15)).unwrap_err();
    assert!(err.to_string().starts_with("contribution provider failed"));
}

#[test]
fn test_logout_before_login_is_invalid_record() {
    let store = base_store("11000").with_attendance(vec![attendance(3, (13, 0), (9, 0))]);
    let err = calculate_for(&store, EMPLOYEE_ID, date(1), date(15)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidRecord);
    assert!(err.to_string().contains("2024-06-03"));
}

#[test]
fn test_reversed_leave_is_invalid_record() {
    let store =
        base_store("11000").with_leave(vec![leave("Unpaid", 9, 4, LeaveStatus::Approved)]);
    let err = calculate_for(&store, EMPLOYEE_ID, date(1), date(15)).unwrap_err();

    assert!(matches!(
        err,
        CalculationError::InvalidRecord { record: "leave", .. }
    ));
}

#[test]
fn test_successful_run_reads_each_provider_once() {
    let store = base_store("11000");
    calculate(&store);

    let calls = store.calls();
    assert_eq!(calls.employee, 1);
    assert_eq!(calls.position, 1);
    assert_eq!(calls.attendance, 1);
    assert_eq!(calls.leave, 1);
    assert_eq!(calls.overtime, 1);
    assert_eq!(calls.compensation, 1);
    assert_eq!(calls.contribution, 1);
}

// =============================================================================
// SECTION 6: Batch
// =============================================================================

#[tokio::test]
async fn test_batch_isolates_failures() {
    let requests = vec![
        BatchRequest {
            employee_id: EMPLOYEE_ID,
            period_start: date(1),
            period_end: date(15),
        },
        BatchRequest {
            employee_id: -1,
            period_start: date(1),
            period_end: date(15),
        },
        BatchRequest {
            employee_id: EMPLOYEE_ID,
            period_start: date(16),
            period_end: date(30),
        },
    ];

    let results = calculate_batch(
        || base_store("11000").with_attendance(vec![full_day(3), full_day(17)]),
        Arc::new(PayrollConfig::default()),
        requests,
    )
    .await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().earnings.days_worked, 1);
    assert_eq!(
        results[1].as_ref().unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
    let second_half = results[2].as_ref().unwrap();
    assert_eq!(second_half.pay_period.start_date, date(16));
    assert_ne!(
        second_half.calculation_id,
        results[0].as_ref().unwrap().calculation_id
    );
}

#[tokio::test]
async fn test_batch_matches_sequential_calculation() {
    let make_store = || base_store("25000").with_attendance(vec![full_day(3), full_day(4)]);
    let sequential = calculate(&make_store());

    let results = calculate_batch(
        make_store,
        Arc::new(PayrollConfig::default()),
        vec![BatchRequest {
            employee_id: EMPLOYEE_ID,
            period_start: date(1),
            period_end: date(15),
        }],
    )
    .await;

    assert_eq!(results[0].as_ref().unwrap(), &sequential);
}
