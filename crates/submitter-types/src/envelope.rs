//! Base64 wire form of transactions exchanged with signers and the node.

use crate::account::AccountId;
use crate::transaction::{DecoratedSignature, UnsignedTransaction};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors produced when encoding or decoding envelopes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
	#[error("Failed to encode envelope: {0}")]
	Encode(String),
	#[error("Envelope is not valid base64: {0}")]
	Base64(String),
	#[error("Envelope body is malformed: {0}")]
	Malformed(String),
	#[error("Envelope carries no signature")]
	Unsigned,
	#[error("Signed envelope does not match the transaction sent for signing")]
	TransactionMismatch,
}

#[derive(Serialize)]
struct EnvelopeBodyRef<'a> {
	transaction: &'a UnsignedTransaction,
	signatures: &'a [DecoratedSignature],
}

#[derive(Deserialize)]
struct EnvelopeBody {
	transaction: UnsignedTransaction,
	#[serde(default)]
	signatures: Vec<DecoratedSignature>,
}

/// Transaction envelope, signed or not, as a base64 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionEnvelope(String);

impl TransactionEnvelope {
	/// Wraps an envelope string received from outside. Validity is checked on
	/// [`decode`](Self::decode).
	pub fn from_base64(encoded: impl Into<String>) -> Self {
		Self(encoded.into())
	}

	pub fn encode(
		transaction: &UnsignedTransaction,
		signatures: &[DecoratedSignature],
	) -> Result<Self, EnvelopeError> {
		let body = EnvelopeBodyRef {
			transaction,
			signatures,
		};
		let json = serde_json::to_vec(&body).map_err(|e| EnvelopeError::Encode(e.to_string()))?;
		Ok(Self(BASE64_STANDARD.encode(json)))
	}

	pub fn decode(&self) -> Result<(UnsignedTransaction, Vec<DecoratedSignature>), EnvelopeError> {
		let json = BASE64_STANDARD
			.decode(self.0.trim())
			.map_err(|e| EnvelopeError::Base64(e.to_string()))?;
		let body: EnvelopeBody =
			serde_json::from_slice(&json).map_err(|e| EnvelopeError::Malformed(e.to_string()))?;
		Ok((body.transaction, body.signatures))
	}

	pub fn source_account(&self) -> Result<AccountId, EnvelopeError> {
		self.decode().map(|(transaction, _)| transaction.source)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for TransactionEnvelope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Reports whether the envelope's source account is `expected`.
///
/// A backend uses this to check that an envelope signed on a client belongs
/// to the authenticated wallet before relaying it.
pub fn verify_source_account(
	envelope: &TransactionEnvelope,
	expected: &AccountId,
) -> Result<bool, EnvelopeError> {
	Ok(&envelope.source_account()? == expected)
}
