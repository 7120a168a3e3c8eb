//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every type defaults to
//! the built-in schedule, so a calculation never needs a file on disk.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The working-day timetable that tardiness and undertime are measured against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSchedule {
    /// Nominal start of the working day; lateness is measured from here.
    pub nominal_start: NaiveTime,
    /// Logins up to and including this time are not late.
    pub grace_until: NaiveTime,
    /// Nominal end of the working day; undertime is measured to here.
    pub nominal_end: NaiveTime,
}

impl Default for ShiftSchedule {
    fn default() -> Self {
        Self {
            nominal_start: time_of_day(8, 0),
            grace_until: time_of_day(8, 15),
            nominal_end: time_of_day(17, 0),
        }
    }
}

fn time_of_day(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// One step of the SSS contribution table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SssBand {
    /// Upper bound of the band (inclusive) on monthly salary.
    pub up_to: Decimal,
    /// Employee contribution for salaries in this band.
    pub contribution: Decimal,
}

/// SSS contribution step table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SssSchedule {
    /// Bands in ascending `up_to` order.
    pub bands: Vec<SssBand>,
    /// Contribution for salaries above the highest band.
    pub maximum: Decimal,
}

impl Default for SssSchedule {
    fn default() -> Self {
        let band = |up_to, contribution| SssBand {
            up_to,
            contribution,
        };
        Self {
            bands: vec![
                band(dec!(4000.00), dec!(180.00)),
                band(dec!(5500.00), dec!(225.00)),
                band(dec!(7000.00), dec!(270.00)),
                band(dec!(8500.00), dec!(315.00)),
                band(dec!(10000.00), dec!(360.00)),
            ],
            maximum: dec!(1125.00),
        }
    }
}

/// PhilHealth premium parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhilHealthSchedule {
    /// Total premium rate on monthly salary.
    pub rate: Decimal,
    /// Fraction of the premium paid by the employee.
    pub employee_share: Decimal,
    /// Ceiling on the employee's share.
    pub cap: Decimal,
}

impl Default for PhilHealthSchedule {
    fn default() -> Self {
        Self {
            rate: dec!(0.045),
            employee_share: dec!(0.5),
            cap: dec!(5000.00),
        }
    }
}

/// Pag-IBIG contribution parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagIbigSchedule {
    /// Salaries at or below this use `lower_rate`.
    pub threshold: Decimal,
    /// Rate at or below the threshold.
    pub lower_rate: Decimal,
    /// Rate above the threshold.
    pub upper_rate: Decimal,
}

impl Default for PagIbigSchedule {
    fn default() -> Self {
        Self {
            threshold: dec!(1500.00),
            lower_rate: dec!(0.01),
            upper_rate: dec!(0.02),
        }
    }
}

/// A marginal income tax bracket on annual income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Annual income above which `rate` applies.
    pub over: Decimal,
    /// Marginal rate on the income above `over`, up to the next bracket.
    pub rate: Decimal,
}

/// Progressive annual income tax schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxSchedule {
    /// Brackets in ascending `over` order; the first starts at zero.
    pub brackets: Vec<TaxBracket>,
}

impl Default for IncomeTaxSchedule {
    fn default() -> Self {
        let bracket = |over, rate| TaxBracket { over, rate };
        Self {
            brackets: vec![
                bracket(dec!(0), dec!(0)),
                bracket(dec!(250000), dec!(0.15)),
                bracket(dec!(400000), dec!(0.20)),
                bracket(dec!(800000), dec!(0.25)),
                bracket(dec!(2000000), dec!(0.30)),
                bracket(dec!(8000000), dec!(0.35)),
            ],
        }
    }
}

/// All statutory tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutorySchedule {
    /// SSS step table.
    #[serde(default)]
    pub sss: SssSchedule,
    /// PhilHealth parameters.
    #[serde(default)]
    pub philhealth: PhilHealthSchedule,
    /// Pag-IBIG parameters.
    #[serde(default)]
    pub pagibig: PagIbigSchedule,
    /// Income tax brackets.
    #[serde(default)]
    pub income_tax: IncomeTaxSchedule,
}

/// The complete payroll configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayrollConfig {
    /// Working-day timetable.
    schedule: ShiftSchedule,
    /// Statutory tables.
    statutory: StatutorySchedule,
}

impl PayrollConfig {
    /// Creates a PayrollConfig from its component parts.
    ///
    /// SSS bands and tax brackets are sorted ascending, so files may list
    /// them in any order.
    pub fn new(schedule: ShiftSchedule, statutory: StatutorySchedule) -> Self {
        let mut statutory = statutory;
        statutory.sss.bands.sort_by(|a, b| a.up_to.cmp(&b.up_to));
        statutory
            .income_tax
            .brackets
            .sort_by(|a, b| a.over.cmp(&b.over));
        Self {
            schedule,
            statutory,
        }
    }

    /// Returns the working-day timetable.
    pub fn schedule(&self) -> &ShiftSchedule {
        &self.schedule
    }

    /// Returns the statutory tables.
    pub fn statutory(&self) -> &StatutorySchedule {
        &self.statutory
    }

    /// Checks internal consistency, returning a description of the first problem.
    pub fn validate(&self) -> Result<(), String> {
        let s = &self.schedule;
        if s.grace_until < s.nominal_start {
            return Err(format!(
                "grace_until {} is before nominal_start {}",
                s.grace_until, s.nominal_start
            ));
        }
        if s.nominal_end <= s.nominal_start {
            return Err(format!(
                "nominal_end {} is not after nominal_start {}",
                s.nominal_end, s.nominal_start
            ));
        }

        let sss = &self.statutory.sss;
        if sss.bands.is_empty() {
            return Err("sss.bands must not be empty".to_string());
        }
        if sss.bands.windows(2).any(|w| w[0].up_to == w[1].up_to) {
            return Err("sss.bands contains duplicate up_to values".to_string());
        }
        if sss
            .bands
            .iter()
            .any(|b| b.contribution < Decimal::ZERO || b.up_to < Decimal::ZERO)
            || sss.maximum < Decimal::ZERO
        {
            return Err("sss amounts must not be negative".to_string());
        }

        let tax = &self.statutory.income_tax;
        match tax.brackets.first() {
            Some(first) if first.over == Decimal::ZERO => {}
            _ => return Err("income_tax.brackets must start at 0".to_string()),
        }
        let unit = Decimal::ONE;
        let rates = tax
            .brackets
            .iter()
            .map(|b| b.rate)
            .chain([
                self.statutory.philhealth.rate,
                self.statutory.philhealth.employee_share,
                self.statutory.pagibig.lower_rate,
                self.statutory.pagibig.upper_rate,
            ]);
        for rate in rates {
            if rate < Decimal::ZERO || rate > unit {
                return Err(format!("rate {} is outside 0..=1", rate));
            }
        }
        Ok(())
    }
}
