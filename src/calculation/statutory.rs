//! Statutory contribution and income tax tables.
//!
//! Pure functions from monthly salary to SSS, PhilHealth and Pag-IBIG
//! contributions and to the monthly share of progressive annual income tax.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::{
    IncomeTaxSchedule, PagIbigSchedule, PhilHealthSchedule, SssSchedule, StatutorySchedule,
};
use crate::models::{
    AuditStep, AuditWarning, ContributionProfile, ContributionSource, StatutoryContributions,
};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Warning code raised when contributions fall back to the statutory tables.
pub const MISSING_CONTRIBUTION_WARNING: &str = "MISSING_CONTRIBUTION_PROFILE";

/// The result of contribution resolution.
#[derive(Debug, Clone)]
pub struct ContributionsResult {
    /// Contributions and tax for the period.
    pub contributions: StatutoryContributions,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
    /// Degraded-data warnings.
    pub warnings: Vec<AuditWarning>,
}

/// Looks up the SSS contribution for a monthly salary.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::sss_contribution;
/// use payroll_engine::config::SssSchedule;
/// use rust_decimal::Decimal;
///
/// let table = SssSchedule::default();
/// assert_eq!(sss_contribution(Decimal::new(4000, 0), &table), Decimal::new(180, 0));
/// assert_eq!(sss_contribution(Decimal::new(4001, 0), &table), Decimal::new(225, 0));
/// assert_eq!(sss_contribution(Decimal::new(25000, 0), &table), Decimal::new(1125, 0));
/// ```
pub fn sss_contribution(salary: Decimal, table: &SssSchedule) -> Decimal {
    table
        .bands
        .iter()
        .find(|band| salary <= band.up_to)
        .map(|band| band.contribution)
        .unwrap_or(table.maximum)
}

/// Employee share of the PhilHealth premium, capped.
pub fn philhealth_contribution(salary: Decimal, table: &PhilHealthSchedule) -> Decimal {
    (salary * table.rate * table.employee_share).min(table.cap)
}

/// Pag-IBIG contribution.
pub fn pagibig_contribution(salary: Decimal, table: &PagIbigSchedule) -> Decimal {
    let rate = if salary <= table.threshold {
        table.lower_rate
    } else {
        table.upper_rate
    };
    salary * rate
}

/// Progressive tax on an annual income.
///
/// Each bracket taxes the slice of income between its `over` and the next
/// bracket's `over` at its own rate.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::annual_income_tax;
/// use payroll_engine::config::IncomeTaxSchedule;
/// use rust_decimal::Decimal;
///
/// let table = IncomeTaxSchedule::default();
/// // 150,000 at 15% + 100,000 at 20%
/// assert_eq!(annual_income_tax(Decimal::new(500_000, 0), &table), Decimal::new(42_500, 0));
/// ```
pub fn annual_income_tax(annual_income: Decimal, table: &IncomeTaxSchedule) -> Decimal {
    let mut tax = Decimal::ZERO;
    for (i, bracket) in table.brackets.iter().enumerate() {
        if annual_income <= bracket.over {
            break;
        }
        let upper = table
            .brackets
            .get(i + 1)
            .map(|next| next.over.min(annual_income))
            .unwrap_or(annual_income);
        tax += (upper - bracket.over) * bracket.rate;
    }
    tax
}

/// Monthly withholding: the annual tax on `salary * 12`, divided by 12.
pub fn monthly_income_tax(salary: Decimal, table: &IncomeTaxSchedule) -> Decimal {
    annual_income_tax(salary * MONTHS_PER_YEAR, table) / MONTHS_PER_YEAR
}

/// Resolves SSS, PhilHealth, Pag-IBIG and tax for a monthly salary.
///
/// A contribution profile replaces the three contributions. Tax is always
/// computed from the tables.
///
/// # Arguments
///
/// * `monthly_salary` - The position's monthly salary
/// * `profile` - Stored contributions that replace the computed ones, if any
/// * `schedule` - The statutory tables
/// * `step_number` - The step number to assign to the audit step
pub fn resolve_contributions(
    monthly_salary: Decimal,
    profile: Option<&ContributionProfile>,
    schedule: &StatutorySchedule,
    step_number: u32,
) -> ContributionsResult {
    let mut warnings = Vec::new();
    let tax = monthly_income_tax(monthly_salary, &schedule.income_tax);

    let contributions = match profile {
        Some(p) => StatutoryContributions {
            sss: p.sss,
            philhealth: p.philhealth,
            pagibig: p.pagibig,
            tax,
            source: ContributionSource::Profile,
        },
        None => {
            warnings.push(AuditWarning::new(
                MISSING_CONTRIBUTION_WARNING,
                "No contribution profile; SSS, PhilHealth and Pag-IBIG computed from tables",
                "low",
            ));
            StatutoryContributions {
                sss: sss_contribution(monthly_salary, &schedule.sss),
                philhealth: philhealth_contribution(monthly_salary, &schedule.philhealth),
                pagibig: pagibig_contribution(monthly_salary, &schedule.pagibig),
                tax,
                source: ContributionSource::Computed,
            }
        }
    };

    let source = match contributions.source {
        ContributionSource::Profile => "contribution profile",
        ContributionSource::Computed => "statutory tables",
    };
    let audit_step = AuditStep {
        step_number,
        rule_id: "statutory_contributions".to_string(),
        rule_name: "Statutory Contributions".to_string(),
        input: serde_json::json!({
            "monthly_salary": monthly_salary.normalize().to_string(),
            "annual_income": (monthly_salary * MONTHS_PER_YEAR).normalize().to_string(),
            "has_contribution_profile": profile.is_some()
        }),
        output: serde_json::json!({
            "sss": contributions.sss.normalize().to_string(),
            "philhealth": contributions.philhealth.normalize().to_string(),
            "pagibig": contributions.pagibig.normalize().to_string(),
            "tax": contributions.tax.normalize().to_string(),
            "source": contributions.source
        }),
        reasoning: format!(
            "SSS ${}, PhilHealth ${}, Pag-IBIG ${} from {}; withholding tax ${}",
            contributions.sss.round_dp(2),
            contributions.philhealth.round_dp(2),
            contributions.pagibig.round_dp(2),
            source,
            contributions.tax.round_dp(2)
        ),
    };

    ContributionsResult {
        contributions,
        audit_step,
        warnings,
    }
}
