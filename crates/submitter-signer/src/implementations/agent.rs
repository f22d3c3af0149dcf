//! Wallet agent signer.
//!
//! Delegates signing to a wallet agent process over HTTP. The agent owns the
//! keys and prompts its user; this client only forwards envelopes.
//!
//! - `GET  {agent_url}/account` returns `{ "public_key": "G..." }`
//! - `POST {agent_url}/sign` takes the envelope, network and account and
//!   returns `{ "signed_transaction": "<base64>" }`
//!
//! A 403 means the user declined and a 401 means the wallet session is no
//! longer valid.

use crate::{SignOptions, SignerError, SignerInterface};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use submitter_types::{
	AccountId, ConfigSchema, Field, FieldType, Schema, TransactionEnvelope, ValidationError,
};
use tracing::debug;

/// Signer backed by an out-of-process wallet agent.
pub struct WalletAgentSigner {
	/// Client without a request timeout; a human may take a while to approve.
	client: reqwest::Client,
	agent_url: String,
}

impl WalletAgentSigner {
	pub fn new(agent_url: impl Into<String>) -> Result<Self, SignerError> {
		let client = reqwest::Client::builder()
			.build()
			.map_err(|e| SignerError::Config(e.to_string()))?;
		Ok(Self {
			client,
			agent_url: agent_url.into().trim_end_matches('/').to_string(),
		})
	}

	fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.agent_url, path)
	}
}

#[derive(Debug, Serialize)]
struct SignRequest<'a> {
	transaction: &'a TransactionEnvelope,
	network: &'a str,
	network_passphrase: &'a str,
	account_to_sign: &'a AccountId,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
	signed_transaction: TransactionEnvelope,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
	public_key: AccountId,
}

#[derive(Debug, Default, Deserialize)]
struct AgentError {
	#[serde(default)]
	message: String,
}

/// Maps a non-success agent response to a signer error.
async fn agent_error(response: reqwest::Response) -> SignerError {
	let status = response.status();
	let message = response
		.json::<AgentError>()
		.await
		.unwrap_or_default()
		.message;
	let message = if message.is_empty() {
		status.to_string()
	} else {
		message
	};

	match status {
		StatusCode::FORBIDDEN => SignerError::Rejected(message),
		StatusCode::UNAUTHORIZED => SignerError::SessionInvalid(message),
		_ => SignerError::Transport(format!("agent returned {}: {}", status, message)),
	}
}

/// Configuration schema for WalletAgentSigner.
pub struct WalletAgentSchema;

impl ConfigSchema for WalletAgentSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			// Required fields
			vec![Field::new("agent_url", FieldType::Url)],
			// Optional fields
			vec![],
		);

		schema.validate(config)
	}
}

#[async_trait]
impl SignerInterface for WalletAgentSigner {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(WalletAgentSchema)
	}

	async fn public_key(&self) -> Result<AccountId, SignerError> {
		let response = self
			.client
			.get(self.endpoint("account"))
			.send()
			.await
			.map_err(|e| SignerError::Transport(e.to_string()))?;

		if !response.status().is_success() {
			return Err(agent_error(response).await);
		}

		let body: AccountResponse = response
			.json()
			.await
			.map_err(|e| SignerError::InvalidResponse(e.to_string()))?;
		Ok(body.public_key)
	}

	async fn sign_transaction(
		&self,
		envelope: &TransactionEnvelope,
		options: &SignOptions,
	) -> Result<TransactionEnvelope, SignerError> {
		let request = SignRequest {
			transaction: envelope,
			network: &options.network.name,
			network_passphrase: &options.network.passphrase,
			account_to_sign: &options.account_to_sign,
		};
		debug!(account = %options.account_to_sign, "Forwarding envelope to wallet agent");

		let response = self
			.client
			.post(self.endpoint("sign"))
			.json(&request)
			.send()
			.await
			.map_err(|e| SignerError::Transport(e.to_string()))?;

		if !response.status().is_success() {
			return Err(agent_error(response).await);
		}

		let body: SignResponse = response
			.json()
			.await
			.map_err(|e| SignerError::InvalidResponse(e.to_string()))?;
		Ok(body.signed_transaction)
	}
}

/// Factory function to create a wallet agent signer from configuration.
///
/// Configuration parameters:
/// - `agent_url`: base URL of the wallet agent
pub fn create_agent_signer(config: &toml::Value) -> Result<Box<dyn SignerInterface>, SignerError> {
	WalletAgentSchema
		.validate(config)
		.map_err(|e| SignerError::Config(e.to_string()))?;

	let agent_url = config
		.get("agent_url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| SignerError::Config("agent_url is required".to_string()))?;

	Ok(Box::new(WalletAgentSigner::new(agent_url)?))
}
