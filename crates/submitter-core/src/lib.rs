//! Transaction submission for contract calls on a ledger node.
//!
//! [`TransactionSubmitter`] carries a call from operation to confirmed
//! transaction, or simulates it read-only. [`SubmitterBuilder`] wires one up
//! from configuration using named ledger and signer factories.

use std::collections::HashMap;
use std::sync::Arc;
use submitter_config::Config;
use submitter_ledger::{LedgerError, LedgerInterface, LedgerService};
use submitter_signer::{SignerError, SignerInterface, SignerService};
use tracing::info;

pub mod contract_error;
pub mod error;
pub mod poller;
pub mod submitter;

#[cfg(test)]
mod test_utils;

pub use contract_error::{ContractError, ContractKind};
pub use error::SubmitterError;
pub use poller::{ConfirmationPoller, PollConfig, Sleeper, TokioSleeper};
pub use submitter::TransactionSubmitter;

// Type aliases for factory functions
type LedgerFactory =
	Box<dyn Fn(&toml::Value) -> Result<Box<dyn LedgerInterface>, LedgerError> + Send>;
type SignerFactory =
	Box<dyn Fn(&toml::Value) -> Result<Box<dyn SignerInterface>, SignerError> + Send>;

/// Builds a [`TransactionSubmitter`] from configuration.
pub struct SubmitterBuilder {
	config: Config,
	ledger_factories: HashMap<String, LedgerFactory>,
	signer_factories: HashMap<String, SignerFactory>,
	sleeper: Option<Arc<dyn Sleeper>>,
}

impl SubmitterBuilder {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			ledger_factories: HashMap::new(),
			signer_factories: HashMap::new(),
			sleeper: None,
		}
	}

	/// Registers the JSON-RPC ledger as `rpc` and the wallet agent as `agent`.
	pub fn with_default_factories(self) -> Self {
		self.with_ledger_factory("rpc", submitter_ledger::implementations::rpc::create_rpc_ledger)
			.with_signer_factory(
				"agent",
				submitter_signer::implementations::agent::create_agent_signer,
			)
	}

	pub fn with_ledger_factory<F>(mut self, name: &str, factory: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<Box<dyn LedgerInterface>, LedgerError> + Send + 'static,
	{
		self.ledger_factories
			.insert(name.to_string(), Box::new(factory));
		self
	}

	pub fn with_signer_factory<F>(mut self, name: &str, factory: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<Box<dyn SignerInterface>, SignerError> + Send + 'static,
	{
		self.signer_factories
			.insert(name.to_string(), Box::new(factory));
		self
	}

	pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
		self.sleeper = Some(sleeper);
		self
	}

	pub fn build(self) -> Result<TransactionSubmitter, SubmitterError> {
		let network = self
			.config
			.network
			.resolve()
			.map_err(|e| SubmitterError::Config(e.to_string()))?;

		// Create ledger provider
		let ledger_config = &self.config.ledger;
		let ledger_factory = self
			.ledger_factories
			.get(&ledger_config.implementation)
			.ok_or_else(|| {
				SubmitterError::Config(format!(
					"Unknown ledger implementation: {}",
					ledger_config.implementation
				))
			})?;
		let ledger = LedgerService::new(ledger_factory(&ledger_config.config)?)
			.with_request_timeout(self.config.timeouts.request_timeout());

		let mut submitter =
			TransactionSubmitter::new(ledger, network.id.clone(), network.read_only_account)
				.with_fee(self.config.transaction.fee)
				.with_poll_config(PollConfig::from(&self.config.polling));

		// Create signer provider, if any
		if let Some(signer_config) = &self.config.signer {
			let signer_factory = self
				.signer_factories
				.get(&signer_config.implementation)
				.ok_or_else(|| {
					SubmitterError::Config(format!(
						"Unknown signer implementation: {}",
						signer_config.implementation
					))
				})?;
			submitter =
				submitter.with_signer(SignerService::new(signer_factory(&signer_config.config)?));
		}

		if let Some(sleeper) = self.sleeper {
			submitter = submitter.with_sleeper(sleeper);
		}

		info!(
			network = %network.id,
			ledger = %ledger_config.implementation,
			signer = self
				.config
				.signer
				.as_ref()
				.map(|s| s.implementation.as_str())
				.unwrap_or("none"),
			fee = %self.config.transaction.fee,
			max_attempts = self.config.polling.max_attempts,
			"Submitter initialized"
		);

		Ok(submitter)
	}
}
