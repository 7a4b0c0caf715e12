//! Payment method classification
//!
//! The ledger records which channel paid for each expense. Bank transactions
//! are classified into the same closed set so both sides can share an index key.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Payment channel attached to a ledger transaction
///
/// Equality is exact tag equality. There is no hierarchy between methods:
/// a `DebitCard` transaction never matches a `Nets` ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    /// Bank transfers (FAST, PayNow, interbank GIRO transfers initiated by the user)
    ElectronicTransfer,
    /// NETS point-of-sale payments
    Nets,
    /// Recurring GIRO deductions and bill payments
    Giro,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::ElectronicTransfer,
        PaymentMethod::Nets,
        PaymentMethod::Giro,
    ];

    /// The label used by the Expense Manager ledger
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::ElectronicTransfer => "Electronic Transfer",
            PaymentMethod::Nets => "NETS",
            PaymentMethod::Giro => "GIRO",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    /// Parse a ledger label
    ///
    /// Matching ignores case, whitespace, `_` and `-`, so `"Credit Card"`,
    /// `"credit_card"` and `"CREDIT-CARD"` all parse to `CreditCard`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "creditcard" => Ok(PaymentMethod::CreditCard),
            "debitcard" => Ok(PaymentMethod::DebitCard),
            "electronictransfer" | "banktransfer" => Ok(PaymentMethod::ElectronicTransfer),
            "nets" => Ok(PaymentMethod::Nets),
            "giro" => Ok(PaymentMethod::Giro),
            _ => Err(format!("Unknown payment method '{}'", s)),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
