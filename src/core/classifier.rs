//! Default payment method classification
//!
//! DBS statements identify the payment channel through the transaction code in
//! the `Reference` column. Card statements only ever contain card charges.

use crate::core::traits::PaymentMethodClassifier;
use crate::types::{BankTransaction, PaymentMethod};

/// Classifier for the supported statement formats
///
/// | Format | Reference code                         | Payment method        |
/// |--------|----------------------------------------|-----------------------|
/// | DBS    | `MST`                                  | `DebitCard`           |
/// | DBS    | `POS`, `NETS`                          | `Nets`                |
/// | DBS    | `ICT`, `ITR`, `IBG`, `FAST`, `PAYNOW`  | `ElectronicTransfer`  |
/// | DBS    | `GIRO`, `BILL`                         | `Giro`                |
/// | DBS    | anything else (`AWL`, `INT`, ...)      | unclassified          |
/// | Card   | -                                      | `CreditCard`          |
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementClassifier;

impl StatementClassifier {
    /// Map a DBS transaction code to a payment method
    pub fn classify_dbs_reference(reference: &str) -> Option<PaymentMethod> {
        match reference.trim().to_uppercase().as_str() {
            "MST" => Some(PaymentMethod::DebitCard),
            "POS" | "NETS" => Some(PaymentMethod::Nets),
            "ICT" | "ITR" | "IBG" | "FAST" | "PAYNOW" => Some(PaymentMethod::ElectronicTransfer),
            "GIRO" | "BILL" => Some(PaymentMethod::Giro),
            _ => None,
        }
    }
}

impl PaymentMethodClassifier for StatementClassifier {
    fn classify(&self, transaction: &BankTransaction) -> Option<PaymentMethod> {
        match transaction {
            BankTransaction::Dbs(tx) => Self::classify_dbs_reference(&tx.reference),
            BankTransaction::Card(_) => Some(PaymentMethod::CreditCard),
        }
    }
}
