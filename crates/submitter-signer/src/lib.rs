//! External signing for the submitter.
//!
//! Private keys never live in this process. A [`SignerInterface`]
//! implementation hands an unsigned envelope to an out-of-process wallet and
//! gets back the same transaction with signatures attached.

use async_trait::async_trait;
use submitter_types::{AccountId, ConfigSchema, NetworkId, TransactionEnvelope};
use thiserror::Error;
use tracing::{info, warn};

/// Re-export implementations
pub mod implementations {
	pub mod agent;
}

#[derive(Debug, Error)]
pub enum SignerError {
	/// The wallet's user declined to sign.
	#[error("Signing rejected: {0}")]
	Rejected(String),
	/// The wallet session expired or the wallet is locked.
	#[error("Wallet session invalid: {0}")]
	SessionInvalid(String),
	#[error("Transport error: {0}")]
	Transport(String),
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Scope of a signature request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOptions {
	/// Network the signature is bound to.
	pub network: NetworkId,
	/// Account whose key must sign.
	pub account_to_sign: AccountId,
}

#[async_trait]
pub trait SignerInterface: Send + Sync {
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Account currently unlocked in the wallet.
	async fn public_key(&self) -> Result<AccountId, SignerError>;

	/// Signs an envelope and returns the signed envelope.
	///
	/// May block for as long as the wallet's user takes to respond.
	async fn sign_transaction(
		&self,
		envelope: &TransactionEnvelope,
		options: &SignOptions,
	) -> Result<TransactionEnvelope, SignerError>;
}

pub struct SignerService {
	provider: Box<dyn SignerInterface>,
}

impl SignerService {
	pub fn new(provider: Box<dyn SignerInterface>) -> Self {
		Self { provider }
	}

	pub async fn public_key(&self) -> Result<AccountId, SignerError> {
		self.provider.public_key().await
	}

	pub async fn sign(
		&self,
		envelope: &TransactionEnvelope,
		options: &SignOptions,
	) -> Result<TransactionEnvelope, SignerError> {
		info!(
			account = %options.account_to_sign,
			network = %options.network,
			"Requesting signature"
		);
		let result = self.provider.sign_transaction(envelope, options).await;
		if let Err(e) = &result {
			warn!(account = %options.account_to_sign, error = %e, "Signature not obtained");
		}
		result
	}
}
