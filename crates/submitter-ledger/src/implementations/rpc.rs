//! JSON-RPC ledger implementation.
//!
//! Talks to a ledger node over JSON-RPC 2.0 using four methods:
//! `getAccount`, `simulateTransaction`, `sendTransaction` and
//! `getTransaction`. Transactions travel as base64 envelopes, hashes as hex
//! and sequence numbers and fees as decimal strings.

use crate::{LedgerError, LedgerInterface};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use submitter_types::{
	Account, AccountId, ConfigSchema, Field, FieldType, FailurePayload, LedgerValue, ResourceData,
	Schema, SimulationResponse, SubmissionReceipt, SubmissionStatus, TransactionEnvelope,
	TransactionHash, TransactionStatus, ValidationError,
};
use tracing::{debug, info};

/// Ledger node reached over JSON-RPC.
pub struct RpcLedger {
	/// Shared HTTP client; holds no per-request state.
	client: reqwest::Client,
	rpc_url: String,
	/// JSON-RPC request id counter.
	next_id: AtomicU64,
}

impl RpcLedger {
	pub fn new(rpc_url: impl Into<String>) -> Result<Self, LedgerError> {
		let client = reqwest::Client::builder()
			.build()
			.map_err(|e| LedgerError::Config(e.to_string()))?;
		Ok(Self {
			client,
			rpc_url: rpc_url.into(),
			next_id: AtomicU64::new(1),
		})
	}

	/// Performs one JSON-RPC call. A `null` result is returned as `None`.
	async fn call<P, R>(&self, method: &str, params: P) -> Result<Option<R>, LedgerError>
	where
		P: Serialize,
		R: DeserializeOwned,
	{
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let payload = serde_json::json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": method,
			"params": params,
		});
		debug!(method, id, "Sending ledger RPC request");

		let response = self
			.client
			.post(&self.rpc_url)
			.json(&payload)
			.send()
			.await
			.map_err(|e| LedgerError::Network(e.to_string()))?;
		let status = response.status();
		let body = response
			.bytes()
			.await
			.map_err(|e| LedgerError::Network(e.to_string()))?;

		// Some nodes pair a JSON-RPC error object with a non-2xx status.
		if !status.is_success() {
			return Err(
				match serde_json::from_slice::<JsonRpcResponse<serde_json::Value>>(&body) {
					Ok(JsonRpcResponse {
						error: Some(error), ..
					}) => LedgerError::Rpc {
						code: error.code,
						message: error.message,
					},
					_ => LedgerError::Network(format!("HTTP status {}", status)),
				},
			);
		}

		let parsed: JsonRpcResponse<R> = serde_json::from_slice(&body)
			.map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;

		if let Some(error) = parsed.error {
			return Err(LedgerError::Rpc {
				code: error.code,
				message: error.message,
			});
		}
		Ok(parsed.result)
	}

	async fn call_required<P, R>(&self, method: &str, params: P) -> Result<R, LedgerError>
	where
		P: Serialize,
		R: DeserializeOwned,
	{
		self.call(method, params).await?.ok_or_else(|| {
			LedgerError::InvalidResponse(format!("{} returned neither result nor error", method))
		})
	}
}

/// JSON-RPC envelope.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<R> {
	/// Result value for successful calls.
	result: Option<R>,
	/// Error payload for failed calls.
	error: Option<JsonRpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Deserialize)]
struct JsonRpcError {
	code: i64,
	message: String,
}

#[derive(Debug, Serialize)]
struct AccountParams<'a> {
	account: &'a AccountId,
}

#[derive(Debug, Serialize)]
struct EnvelopeParams<'a> {
	transaction: &'a TransactionEnvelope,
}

#[derive(Debug, Serialize)]
struct HashParams<'a> {
	hash: &'a TransactionHash,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResult {
	latest_ledger: u64,
	error: Option<String>,
	transaction_data: Option<ResourceData>,
	return_value: Option<LedgerValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResult {
	hash: TransactionHash,
	status: SubmissionStatus,
	error_result_xdr: Option<String>,
	latest_ledger: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum GetTransactionState {
	NotFound,
	Success,
	Failed,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetTransactionResult {
	status: GetTransactionState,
	ledger: Option<u64>,
	return_value: Option<LedgerValue>,
	result_xdr: Option<String>,
	diagnostic: Option<String>,
}

impl GetTransactionResult {
	fn into_status(self) -> Result<TransactionStatus, LedgerError> {
		let ledger = || {
			self.ledger.ok_or_else(|| {
				LedgerError::InvalidResponse("terminal transaction without ledger".to_string())
			})
		};
		match self.status {
			GetTransactionState::NotFound => Ok(TransactionStatus::NotFound),
			GetTransactionState::Success => Ok(TransactionStatus::Success {
				ledger: ledger()?,
				return_value: self.return_value,
			}),
			GetTransactionState::Failed => Ok(TransactionStatus::Failed {
				ledger: ledger()?,
				payload: FailurePayload {
					result_xdr: self.result_xdr.unwrap_or_default(),
					diagnostic: self.diagnostic,
				},
			}),
		}
	}
}

/// Configuration schema for RpcLedger.
pub struct RpcLedgerSchema;

impl ConfigSchema for RpcLedgerSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			// Required fields
			vec![Field::new("rpc_url", FieldType::Url)],
			// Optional fields
			vec![Field::new("allow_http", FieldType::Boolean)],
		);
		schema.validate(config)?;

		let allow_http = config
			.get("allow_http")
			.and_then(|v| v.as_bool())
			.unwrap_or(false);
		let insecure = config
			.get("rpc_url")
			.and_then(|v| v.as_str())
			.is_some_and(|url| url.starts_with("http://"));
		if insecure && !allow_http {
			return Err(ValidationError::InvalidValue {
				field: "rpc_url".to_string(),
				message: "plain http requires allow_http = true".to_string(),
			});
		}
		Ok(())
	}
}

#[async_trait]
impl LedgerInterface for RpcLedger {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(RpcLedgerSchema)
	}

	async fn get_account(&self, id: &AccountId) -> Result<Account, LedgerError> {
		let account: Option<Account> = self
			.call("getAccount", AccountParams { account: id })
			.await?;
		let account = account.ok_or_else(|| LedgerError::AccountNotFound(id.clone()))?;
		debug!(account = %id, sequence = %account.sequence, "Fetched account");
		Ok(account)
	}

	async fn simulate_transaction(
		&self,
		envelope: &TransactionEnvelope,
	) -> Result<SimulationResponse, LedgerError> {
		let result: SimulateResult = self
			.call_required("simulateTransaction", EnvelopeParams {
				transaction: envelope,
			})
			.await?;

		if let Some(message) = result.error {
			debug!(latest_ledger = result.latest_ledger, error = %message, "Simulation reported an error");
			return Ok(SimulationResponse::Error { message });
		}
		Ok(SimulationResponse::Success {
			resources: result.transaction_data,
			return_value: result.return_value,
			latest_ledger: result.latest_ledger,
		})
	}

	async fn send_transaction(
		&self,
		envelope: &TransactionEnvelope,
	) -> Result<SubmissionReceipt, LedgerError> {
		let result: SendResult = self
			.call_required("sendTransaction", EnvelopeParams {
				transaction: envelope,
			})
			.await?;

		info!(
			tx_hash = %result.hash.short(),
			status = ?result.status,
			"Transaction sent"
		);
		Ok(SubmissionReceipt {
			hash: result.hash,
			status: result.status,
			error_result: result.error_result_xdr,
			latest_ledger: result.latest_ledger,
		})
	}

	async fn get_transaction(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionStatus, LedgerError> {
		let result: GetTransactionResult = self
			.call_required("getTransaction", HashParams { hash })
			.await?;
		result.into_status()
	}
}

/// Factory function to create a ledger implementation from configuration.
///
/// Configuration parameters:
/// - `rpc_url`: JSON-RPC endpoint of the ledger node
/// - `allow_http`: permit a plain-http endpoint (default: false)
pub fn create_rpc_ledger(config: &toml::Value) -> Result<Box<dyn LedgerInterface>, LedgerError> {
	RpcLedgerSchema
		.validate(config)
		.map_err(|e| LedgerError::Config(e.to_string()))?;

	let rpc_url = config
		.get("rpc_url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| LedgerError::Config("rpc_url is required".to_string()))?;

	Ok(Box::new(RpcLedger::new(rpc_url)?))
}
