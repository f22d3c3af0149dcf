//! Command handlers.

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use submitter_config::Config;
use submitter_core::{SubmitterError, TransactionSubmitter};
use submitter_types::{
	AccountId, ConfirmationResult, ContractAddress, LedgerValue, Operation, TransactionHash,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// A contract invocation given on the command line.
#[derive(Debug, Args)]
pub struct CallArgs {
	/// Contract address (32 bytes, hex)
	#[arg(long)]
	pub contract: String,

	/// Contract function to invoke
	#[arg(long)]
	pub function: String,

	/// Arguments as a JSON array of ledger values, e.g. '[{"u32": 5}]'
	#[arg(long, default_value = "[]")]
	pub args: String,
}

impl CallArgs {
	pub fn operation(&self) -> Result<Operation> {
		let contract: ContractAddress = self
			.contract
			.parse()
			.with_context(|| format!("Invalid contract address: {}", self.contract))?;
		let args: Vec<LedgerValue> =
			serde_json::from_str(&self.args).context("Invalid --args, expected a JSON array")?;
		Ok(Operation::invoke(contract, self.function.clone(), args))
	}
}

pub fn validate(config: &Config) -> Result<()> {
	let network = config.network.resolve()?;

	info!("Configuration is valid");
	info!("Network: {} ({})", network.id, network.id.passphrase);
	info!("RPC endpoint: {}", network.rpc_url);
	info!("Fee: {}", config.transaction.fee);
	info!(
		"Polling: {} attempts every {} ms",
		config.polling.max_attempts, config.polling.interval_ms
	);
	info!("Ledger: {}", config.ledger.implementation);
	match &config.signer {
		Some(signer) => info!("Signer: {}", signer.implementation),
		None => info!("Signer: none (queries only)"),
	}

	Ok(())
}

pub async fn account(submitter: &TransactionSubmitter, id: &str) -> Result<()> {
	let id: AccountId = id.parse().context("Invalid account id")?;
	let account = submitter
		.ledger()
		.get_account(&id)
		.await
		.context("Failed to fetch account")?;
	print_json(&account)
}

pub async fn query(submitter: &TransactionSubmitter, call: &CallArgs) -> Result<()> {
	let value = submitter
		.query(call.operation()?)
		.await
		.map_err(explain)?;
	print_json(&value)
}

pub async fn submit(
	submitter: &TransactionSubmitter,
	call: &CallArgs,
	account: Option<&str>,
	cancel: &CancellationToken,
) -> Result<()> {
	let operation = call.operation()?;
	let account: AccountId = match account {
		Some(id) => id.parse().context("Invalid --account")?,
		None => submitter
			.signer_account()
			.await
			.context("Failed to read the wallet's account")?,
	};

	let confirmed = submitter
		.submit(operation, &account, cancel)
		.await
		.map_err(explain)?;
	print_json(&confirmed)
}

pub async fn status(
	submitter: &TransactionSubmitter,
	hash: &str,
	cancel: &CancellationToken,
) -> Result<()> {
	let hash: TransactionHash = hash.parse().context("Invalid transaction hash")?;
	let result = submitter.confirm(&hash, cancel).await.map_err(explain)?;
	print_json(&result)?;

	match result {
		ConfirmationResult::Success(_) => Ok(()),
		ConfirmationResult::Failed { hash, payload } => {
			Err(explain(SubmitterError::TransactionFailed { hash, payload }))
		}
		ConfirmationResult::TimedOut { hash, attempts } => {
			bail!("Transaction {} still pending after {} attempts", hash, attempts)
		}
	}
}

/// Adds the contract's own description when the error carries a code.
fn explain(err: SubmitterError) -> anyhow::Error {
	match err.contract_error() {
		Some(contract_error) => anyhow::Error::new(err).context(contract_error.to_string()),
		None => err.into(),
	}
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}
