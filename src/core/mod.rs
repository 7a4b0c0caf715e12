//! Core reconciliation module
//!
//! This module contains the reconciliation engine components:
//! - `traits` - Trait abstractions for interchangeable implementations
//! - `classifier` - Payment method classification of bank transactions
//! - `normalizer` - Ledger row mapping into canonical transactions
//! - `index` - Ledger lookup by amount and payment method
//! - `matcher` - Consumption of bank transactions against the index
//!
//! Nothing in this module performs I/O. Inputs arrive fully materialized and
//! every business outcome is returned to the caller.

pub mod classifier;
pub mod index;
pub mod matcher;
pub mod normalizer;
pub mod traits;

pub use classifier::StatementClassifier;
pub use index::{IndexKey, ReconciliationIndex};
pub use matcher::{reconcile, reconcile_with, MatchOutcome, Matcher};
pub use normalizer::{normalize, normalize_row, MappingPolicy};
pub use traits::PaymentMethodClassifier;
