//! Core types shared across the ledger submitter crates.
//!
//! Covers the transaction data model (accounts, fees, operations, ledger
//! values, transactions and their envelopes), the node's answers (submission
//! receipts, transaction statuses, confirmation results) and the TOML schema
//! validation used by provider factories.

pub mod account;
pub mod delivery;
pub mod envelope;
pub mod fee;
pub mod network;
pub mod operation;
pub mod serde_helpers;
pub mod transaction;
pub mod validation;
pub mod value;

pub use account::*;
pub use delivery::*;
pub use envelope::*;
pub use fee::*;
pub use network::*;
pub use operation::*;
pub use transaction::*;
pub use validation::*;
pub use value::*;
