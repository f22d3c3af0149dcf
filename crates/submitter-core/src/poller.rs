//! Confirmation polling.
//!
//! A submitted transaction is looked up by hash until the node reports a
//! terminal status or the attempt budget runs out. Only "not found" is
//! retried; a transport failure ends polling with an error.

use crate::SubmitterError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use submitter_config::PollingConfig;
use submitter_ledger::LedgerService;
use submitter_types::{ConfirmationResult, ConfirmedTransaction, TransactionHash, TransactionStatus};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Polling budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
	/// Maximum number of status queries.
	pub max_attempts: u32,
	/// Fixed delay between two queries.
	pub interval: Duration,
}

impl Default for PollConfig {
	fn default() -> Self {
		Self {
			max_attempts: 20,
			interval: Duration::from_secs(1),
		}
	}
}

impl From<&PollingConfig> for PollConfig {
	fn from(config: &PollingConfig) -> Self {
		Self {
			max_attempts: config.max_attempts,
			interval: config.interval(),
		}
	}
}

/// Source of delays between polls.
#[async_trait]
pub trait Sleeper: Send + Sync {
	async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
	async fn sleep(&self, duration: Duration) {
		tokio::time::sleep(duration).await
	}
}

/// Polls the ledger for the terminal status of a transaction.
#[derive(Clone)]
pub struct ConfirmationPoller {
	config: PollConfig,
	sleeper: Arc<dyn Sleeper>,
}

impl ConfirmationPoller {
	/// A budget of zero attempts is raised to one: a submitted transaction
	/// is always looked up at least once.
	pub fn new(config: PollConfig) -> Self {
		Self {
			config: PollConfig {
				max_attempts: config.max_attempts.max(1),
				..config
			},
			sleeper: Arc::new(TokioSleeper),
		}
	}

	pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
		self.sleeper = sleeper;
		self
	}

	pub fn config(&self) -> PollConfig {
		self.config
	}

	/// Queries the status of `hash` at most `max_attempts` times.
	///
	/// There is no delay after the last query. Cancellation interrupts both
	/// an in-flight query and a pending delay, and reports `hash` so the
	/// caller can poll again later.
	pub async fn poll(
		&self,
		ledger: &LedgerService,
		hash: &TransactionHash,
		cancel: &CancellationToken,
	) -> Result<ConfirmationResult, SubmitterError> {
		let started = tokio::time::Instant::now();
		let max_attempts = self.config.max_attempts;

		for attempt in 1..=max_attempts {
			let status = tokio::select! {
				biased;
				_ = cancel.cancelled() => return Err(cancelled(hash)),
				status = ledger.get_transaction(hash) => status?,
			};

			match status {
				TransactionStatus::Success {
					ledger,
					return_value,
				} => {
					info!(
						tx_hash = %hash.short(),
						ledger,
						attempt,
						elapsed_ms = started.elapsed().as_millis() as u64,
						"Transaction confirmed"
					);
					return Ok(ConfirmationResult::Success(ConfirmedTransaction {
						hash: hash.clone(),
						ledger,
						payload: return_value,
					}));
				}
				TransactionStatus::Failed { ledger, payload } => {
					warn!(tx_hash = %hash.short(), ledger, attempt, "Transaction failed");
					return Ok(ConfirmationResult::Failed {
						hash: hash.clone(),
						payload,
					});
				}
				TransactionStatus::NotFound => {
					debug!(tx_hash = %hash.short(), attempt, max_attempts, "Transaction not found yet");
				}
			}

			if attempt < max_attempts {
				tokio::select! {
					biased;
					_ = cancel.cancelled() => return Err(cancelled(hash)),
					_ = self.sleeper.sleep(self.config.interval) => {}
				}
			}
		}

		warn!(
			tx_hash = %hash.short(),
			attempts = max_attempts,
			"Transaction not confirmed within polling budget"
		);
		Ok(ConfirmationResult::TimedOut {
			hash: hash.clone(),
			attempts: max_attempts,
		})
	}
}

fn cancelled(hash: &TransactionHash) -> SubmitterError {
	info!(tx_hash = %hash.short(), "Confirmation polling cancelled");
	SubmitterError::Cancelled {
		hash: Some(hash.clone()),
	}
}
