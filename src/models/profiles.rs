//! Per-employee compensation and contribution profiles.
//!
//! Both profiles are optional. When a profile is absent the engine falls
//! back to zero allowances or to the statutory tables respectively.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed monthly allowances paid on top of basic pay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationProfile {
    /// The employee the profile belongs to.
    pub employee_id: i64,
    /// Rice subsidy.
    pub rice_subsidy: Decimal,
    /// Phone allowance.
    pub phone_allowance: Decimal,
    /// Clothing allowance.
    pub clothing_allowance: Decimal,
}

impl CompensationProfile {
    /// Returns the sum of all allowances.
    pub fn total(&self) -> Decimal {
        self.rice_subsidy + self.phone_allowance + self.clothing_allowance
    }
}

/// Pre-recorded statutory contribution amounts.
///
/// When present these replace the amounts computed from the bracket tables.
/// Income tax is never taken from here.
///
/// # Example
///
/// ```
/// use payroll_engine::models::ContributionProfile;
/// use rust_decimal::Decimal;
///
/// let profile = ContributionProfile {
///     employee_id: 1,
///     sss: Decimal::new(58150, 2),
///     philhealth: Decimal::new(37500, 2),
///     pagibig: Decimal::new(10000, 2),
/// };
/// assert_eq!(profile.total(), Decimal::new(105650, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionProfile {
    /// The employee the profile belongs to.
    pub employee_id: i64,
    /// Social Security System contribution.
    pub sss: Decimal,
    /// PhilHealth contribution.
    pub philhealth: Decimal,
    /// Pag-IBIG contribution.
    pub pagibig: Decimal,
}

impl ContributionProfile {
    /// Returns the sum of the three contributions.
    pub fn total(&self) -> Decimal {
        self.sss + self.philhealth + self.pagibig
    }
}
