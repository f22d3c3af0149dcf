//! Transaction delivery types.
//!
//! This module defines what the ledger node answers at each step of a
//! transaction's life: simulation, submission, status lookups, and the
//! terminal confirmation result derived from polling.

use crate::serde_helpers::hex_bytes;
use crate::transaction::ResourceData;
use crate::value::LedgerValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Blockchain transaction hash representation.
///
/// Stores transaction hashes as raw bytes; displayed and serialized as hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionHash(#[serde(with = "hex_bytes")] pub Vec<u8>);

impl TransactionHash {
	/// Shortened hex form for log lines.
	pub fn short(&self) -> String {
		let hash_str = hex::encode(&self.0);
		if hash_str.len() <= 8 {
			hash_str
		} else {
			format!("{}..", &hash_str[..8])
		}
	}
}

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&hex::encode(&self.0))
	}
}

impl FromStr for TransactionHash {
	type Err = hex::FromHexError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		hex::decode(s.strip_prefix("0x").unwrap_or(s)).map(TransactionHash)
	}
}

/// Outcome of asking the node to dry-run a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationResponse {
	/// The dry run succeeded.
	Success {
		/// Resource fee and footprint to merge into the transaction.
		resources: Option<ResourceData>,
		/// Value returned by the invoked contract function, if any.
		return_value: Option<LedgerValue>,
		/// Latest ledger the simulation ran against.
		latest_ledger: u64,
	},
	/// The dry run reported an error.
	Error {
		/// Error text reported by the node.
		message: String,
	},
}

/// Initial status the node attaches to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
	/// Accepted for processing.
	Pending,
	/// Already known to the node; it will resolve under the same hash.
	Duplicate,
	/// Node is overloaded and dropped the submission.
	TryAgainLater,
	/// Rejected outright (malformed, insufficient fee, bad sequence).
	Error,
}

impl SubmissionStatus {
	pub fn is_accepted(&self) -> bool {
		matches!(self, SubmissionStatus::Pending | SubmissionStatus::Duplicate)
	}
}

/// Receipt returned by the node immediately after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
	/// Hash used to poll for the transaction's outcome.
	pub hash: TransactionHash,
	/// Initial status.
	pub status: SubmissionStatus,
	/// Raw rejection result when the status is an error.
	pub error_result: Option<String>,
	/// Latest ledger known to the node at submission time.
	pub latest_ledger: u64,
}

/// Raw failure payload of an executed-and-rejected transaction.
///
/// Kept structured so callers can decode contract error codes rather than
/// parse error strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailurePayload {
	/// Encoded transaction result as reported by the node.
	pub result_xdr: String,
	/// Diagnostic event text, when the node provides it.
	pub diagnostic: Option<String>,
}

impl fmt::Display for FailurePayload {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.diagnostic {
			Some(diagnostic) => write!(f, "{} ({})", self.result_xdr, diagnostic),
			None => f.write_str(&self.result_xdr),
		}
	}
}

/// Answer to a get-transaction lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
	/// Not yet known to the ledger.
	NotFound,
	/// Applied successfully.
	Success {
		ledger: u64,
		return_value: Option<LedgerValue>,
	},
	/// Applied and rejected.
	Failed { ledger: u64, payload: FailurePayload },
}

/// A transaction confirmed as successful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedTransaction {
	pub hash: TransactionHash,
	/// Ledger the transaction was applied in.
	pub ledger: u64,
	/// Decoded contract return value.
	pub payload: Option<LedgerValue>,
}

/// Terminal outcome of confirmation polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationResult {
	Success(ConfirmedTransaction),
	Failed {
		hash: TransactionHash,
		payload: FailurePayload,
	},
	/// Polling budget exhausted while the node still reported "not found".
	/// The transaction may still land; re-poll with the same hash.
	TimedOut { hash: TransactionHash, attempts: u32 },
}

/// Non-successful confirmation outcomes as errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
	#[error("Transaction {hash} failed: {payload}")]
	Failed {
		hash: TransactionHash,
		payload: FailurePayload,
	},
	#[error("Transaction {hash} not confirmed after {attempts} attempts")]
	TimedOut { hash: TransactionHash, attempts: u32 },
}

impl ConfirmationResult {
	pub fn hash(&self) -> &TransactionHash {
		match self {
			ConfirmationResult::Success(confirmed) => &confirmed.hash,
			ConfirmationResult::Failed { hash, .. } | ConfirmationResult::TimedOut { hash, .. } => {
				hash
			}
		}
	}

	pub fn into_result(self) -> Result<ConfirmedTransaction, ConfirmationError> {
		match self {
			ConfirmationResult::Success(confirmed) => Ok(confirmed),
			ConfirmationResult::Failed { hash, payload } => {
				Err(ConfirmationError::Failed { hash, payload })
			}
			ConfirmationResult::TimedOut { hash, attempts } => {
				Err(ConfirmationError::TimedOut { hash, attempts })
			}
		}
	}
}
