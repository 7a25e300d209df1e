//! Paid warranty extensions

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{temporal, Currency, ExtensionId, Money, RegistrationId};

use crate::error::WarrantyError;
use crate::registration::ProductRegistration;

/// Extension plan offered to customers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionPlan {
    Basic,
    Premium,
    Ultimate,
}

impl ExtensionPlan {
    pub const ALL: [ExtensionPlan; 3] = [
        ExtensionPlan::Basic,
        ExtensionPlan::Premium,
        ExtensionPlan::Ultimate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExtensionPlan::Basic => "Basic Extension",
            ExtensionPlan::Premium => "Premium Extension",
            ExtensionPlan::Ultimate => "Ultimate Extension",
        }
    }

    /// Months added to the current expiry date
    pub fn months(&self) -> u32 {
        match self {
            ExtensionPlan::Basic => 12,
            ExtensionPlan::Premium => 24,
            ExtensionPlan::Ultimate => 36,
        }
    }

    pub fn price(&self) -> Money {
        let amount = match self {
            ExtensionPlan::Basic => dec!(79.00),
            ExtensionPlan::Premium => dec!(149.00),
            ExtensionPlan::Ultimate => dec!(199.00),
        };
        Money::new(amount, Currency::USD)
    }

    pub fn coverage(&self) -> &'static [&'static str] {
        match self {
            ExtensionPlan::Basic => &[
                "Hardware failures",
                "Manufacturing defects",
                "Power-related issues",
            ],
            ExtensionPlan::Premium => &[
                "Everything in Basic",
                "Accidental damage",
                "Liquid damage",
                "Priority support",
            ],
            ExtensionPlan::Ultimate => &[
                "Everything in Premium",
                "Theft protection",
                "Lost item coverage",
                "24/7 support hotline",
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensionPlan::Basic => "basic",
            ExtensionPlan::Premium => "premium",
            ExtensionPlan::Ultimate => "ultimate",
        }
    }
}

impl fmt::Display for ExtensionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtensionPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(ExtensionPlan::Basic),
            "premium" => Ok(ExtensionPlan::Premium),
            "ultimate" => Ok(ExtensionPlan::Ultimate),
            _ => Err(format!("Unknown extension plan: {}", s)),
        }
    }
}

/// A purchased extension, recorded alongside the updated registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyExtension {
    pub id: ExtensionId,
    pub registration_id: RegistrationId,
    pub plan: ExtensionPlan,
    pub months: u32,
    pub price: Money,
    pub previous_expiry: NaiveDate,
    pub new_expiry: NaiveDate,
    pub purchased_at: DateTime<Utc>,
}

impl WarrantyExtension {
    /// Extends `registration` in place and returns the purchase record.
    ///
    /// Only a running warranty can be extended; the new expiry is the current
    /// expiry plus the plan's months.
    pub fn apply(
        registration: &mut ProductRegistration,
        plan: ExtensionPlan,
        now: DateTime<Utc>,
    ) -> Result<Self, WarrantyError> {
        if !registration.is_covered_at(now) {
            return Err(WarrantyError::WarrantyExpired);
        }

        let previous_expiry = registration.expiry_date;
        let new_expiry = temporal::add_months(previous_expiry, plan.months())?;
        registration.expiry_date = new_expiry;

        Ok(Self {
            id: ExtensionId::new_v7(),
            registration_id: registration.id,
            plan,
            months: plan.months(),
            price: plan.price(),
            previous_expiry,
            new_expiry,
            purchased_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_catalog() {
        assert_eq!(ExtensionPlan::Basic.months(), 12);
        assert_eq!(ExtensionPlan::Premium.price().amount(), dec!(149.00));
        assert_eq!(ExtensionPlan::Ultimate.price().to_string(), "$199.00");
        assert_eq!("premium".parse::<ExtensionPlan>().unwrap(), ExtensionPlan::Premium);
    }
}
