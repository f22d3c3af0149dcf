//! Ledger node access for the submitter.
//!
//! This module defines the boundary to the ledger node: account lookups,
//! transaction simulation, submission and status queries. Implementations
//! speak a concrete transport; [`LedgerService`] wraps one with per-request
//! timeouts and logging.

use async_trait::async_trait;
use std::time::Duration;
use submitter_types::{
	Account, AccountId, ConfigSchema, SimulationResponse, SubmissionReceipt, TransactionEnvelope,
	TransactionHash, TransactionStatus,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Re-export implementations
pub mod implementations {
	pub mod rpc;
}

/// Errors that can occur while talking to the ledger node.
#[derive(Debug, Error)]
pub enum LedgerError {
	/// The account does not exist on the ledger.
	#[error("Account not found: {0}")]
	AccountNotFound(AccountId),
	/// The request could not be delivered or the connection failed.
	#[error("Network error: {0}")]
	Network(String),
	/// The node answered with a JSON-RPC error object.
	#[error("RPC error {code}: {message}")]
	Rpc { code: i64, message: String },
	/// The node answered with something that could not be decoded.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
	/// The request did not complete within the configured timeout.
	#[error("Request timed out after {0:?}")]
	Timeout(Duration),
	/// Provider settings were rejected.
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Trait defining the interface to a ledger node.
///
/// Every method is a single request; none of them retries. Retrying on
/// "not found" is the poller's job, not the transport's.
#[async_trait]
pub trait LedgerInterface: Send + Sync {
	/// Returns the configuration schema for this implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Fetches the account and its current sequence number.
	async fn get_account(&self, id: &AccountId) -> Result<Account, LedgerError>;

	/// Dry-runs a transaction without broadcasting it.
	async fn simulate_transaction(
		&self,
		envelope: &TransactionEnvelope,
	) -> Result<SimulationResponse, LedgerError>;

	/// Broadcasts a signed transaction.
	async fn send_transaction(
		&self,
		envelope: &TransactionEnvelope,
	) -> Result<SubmissionReceipt, LedgerError>;

	/// Looks up the current status of a submitted transaction.
	async fn get_transaction(&self, hash: &TransactionHash)
		-> Result<TransactionStatus, LedgerError>;
}

/// Service wrapping a ledger implementation with request timeouts.
pub struct LedgerService {
	/// The underlying ledger implementation.
	provider: Box<dyn LedgerInterface>,
	/// Upper bound for each request, if any.
	request_timeout: Option<Duration>,
}

impl LedgerService {
	/// Creates a new LedgerService without request timeouts.
	pub fn new(provider: Box<dyn LedgerInterface>) -> Self {
		Self {
			provider,
			request_timeout: None,
		}
	}

	pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
		self.request_timeout = timeout;
		self
	}

	pub async fn get_account(&self, id: &AccountId) -> Result<Account, LedgerError> {
		debug!(account = %id, "Fetching account");
		self.bounded(self.provider.get_account(id)).await
	}

	pub async fn simulate(
		&self,
		envelope: &TransactionEnvelope,
	) -> Result<SimulationResponse, LedgerError> {
		self.bounded(self.provider.simulate_transaction(envelope))
			.await
	}

	pub async fn send(
		&self,
		envelope: &TransactionEnvelope,
	) -> Result<SubmissionReceipt, LedgerError> {
		self.bounded(self.provider.send_transaction(envelope)).await
	}

	pub async fn get_transaction(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionStatus, LedgerError> {
		self.bounded(self.provider.get_transaction(hash)).await
	}

	async fn bounded<T>(
		&self,
		request: impl std::future::Future<Output = Result<T, LedgerError>>,
	) -> Result<T, LedgerError> {
		match self.request_timeout {
			Some(limit) => match tokio::time::timeout(limit, request).await {
				Ok(result) => result,
				Err(_) => {
					warn!(timeout_ms = limit.as_millis() as u64, "Ledger request timed out");
					Err(LedgerError::Timeout(limit))
				}
			},
			None => request.await,
		}
	}
}
