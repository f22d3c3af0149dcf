use crate::contract_error::ContractError;
use submitter_ledger::LedgerError;
use submitter_signer::SignerError;
use submitter_types::{
	AccountId, BuildError, ConfirmationError, DecodeError, EnvelopeError, FailurePayload, FeeError,
	SubmissionStatus, TransactionHash,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitterError {
	/// The signer account could not be loaded; nothing was built or signed.
	#[error("Failed to fetch account {account}: {source}")]
	AccountFetch {
		account: AccountId,
		#[source]
		source: LedgerError,
	},

	/// Simulation reported an error or returned nothing usable.
	#[error("Query failed: {message}")]
	QueryFailed { message: String },

	#[error("Signing rejected: {0}")]
	SigningRejected(String),

	#[error("Signer error: {0}")]
	Signer(SignerError),

	/// The node refused the submission outright.
	#[error("Submission of {hash} rejected with status {status:?}")]
	Submission {
		hash: TransactionHash,
		status: SubmissionStatus,
		error_result: Option<String>,
	},

	#[error("Transaction {hash} failed: {payload}")]
	TransactionFailed {
		hash: TransactionHash,
		payload: FailurePayload,
	},

	/// Polling gave up. The transaction may still land under `hash`.
	#[error("Transaction {hash} not confirmed after {attempts} attempts")]
	TransactionTimeout { hash: TransactionHash, attempts: u32 },

	#[error("Ledger error: {0}")]
	Ledger(#[from] LedgerError),

	#[error("Build error: {0}")]
	Build(#[from] BuildError),

	#[error("Envelope error: {0}")]
	Envelope(#[from] EnvelopeError),

	#[error("Fee error: {0}")]
	Fee(#[from] FeeError),

	#[error("Decode error: {0}")]
	Decode(#[from] DecodeError),

	/// The caller cancelled. `hash` is set once the transaction has been
	/// broadcast and can still be polled.
	#[error(
		"Operation cancelled{}",
		hash.as_ref().map(|h| format!(" while awaiting transaction {}", h)).unwrap_or_default()
	)]
	Cancelled { hash: Option<TransactionHash> },

	#[error("Configuration error: {0}")]
	Config(String),
}

impl From<SignerError> for SubmitterError {
	fn from(err: SignerError) -> Self {
		match err {
			SignerError::Rejected(reason) | SignerError::SessionInvalid(reason) => {
				SubmitterError::SigningRejected(reason)
			}
			other => SubmitterError::Signer(other),
		}
	}
}

impl From<ConfirmationError> for SubmitterError {
	fn from(err: ConfirmationError) -> Self {
		match err {
			ConfirmationError::Failed { hash, payload } => {
				SubmitterError::TransactionFailed { hash, payload }
			}
			ConfirmationError::TimedOut { hash, attempts } => {
				SubmitterError::TransactionTimeout { hash, attempts }
			}
		}
	}
}

impl SubmitterError {
	/// Contract error code carried by the error text, if any.
	pub fn contract_error(&self) -> Option<ContractError> {
		match self {
			SubmitterError::QueryFailed { message } => ContractError::from_message(message),
			SubmitterError::TransactionFailed { payload, .. } => payload
				.diagnostic
				.as_deref()
				.and_then(ContractError::from_message)
				.or_else(|| ContractError::from_message(&payload.result_xdr)),
			SubmitterError::Submission {
				error_result: Some(result),
				..
			} => ContractError::from_message(result),
			_ => None,
		}
	}
}
