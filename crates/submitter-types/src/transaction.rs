//! Transactions: building, preparing, hashing and signing.
//!
//! An [`UnsignedTransaction`] is built once from an account snapshot and one
//! or more operations, optionally prepared with simulation data, and then
//! turned into exactly one [`SignedTransaction`] by an external signer.

use crate::account::{Account, AccountId, SequenceNumber};
use crate::delivery::TransactionHash;
use crate::envelope::{EnvelopeError, TransactionEnvelope};
use crate::fee::{Fee, FeeError};
use crate::network::NetworkId;
use crate::operation::Operation;
use crate::serde_helpers::{hex_bytes, hex_bytes_vec};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use thiserror::Error;

/// Domain separator mixed into transaction hashes.
const TX_HASH_TAG: &[u8] = b"tx";

/// Errors produced by [`TransactionBuilder::build`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
	#[error("Transaction must contain at least one operation")]
	NoOperations,
	#[error("Sequence number of account {0} is exhausted")]
	SequenceExhausted(AccountId),
}

/// Validity window of a transaction. Transactions never expire client-side;
/// an unconfirmed one is only ever given up on by the poll budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBounds {
	#[default]
	Infinite,
}

/// Ledger entries a transaction reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Footprint {
	#[serde(with = "hex_bytes_vec")]
	pub read_only: Vec<Vec<u8>>,
	#[serde(with = "hex_bytes_vec")]
	pub read_write: Vec<Vec<u8>>,
}

/// Resource data produced by simulation and merged in by the prepare step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
	/// Fee charged for the resources the invocation consumes.
	pub resource_fee: Fee,
	/// CPU instruction budget.
	pub instructions: u32,
	pub footprint: Footprint,
}

/// A transaction that has not been signed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
	/// Source account paying for and authorizing the transaction.
	pub source: AccountId,
	/// Sequence number this transaction consumes.
	pub sequence: SequenceNumber,
	/// Inclusion fee ceiling.
	pub fee: Fee,
	pub operations: Vec<Operation>,
	pub time_bounds: TimeBounds,
	/// Present once the transaction has been prepared from a simulation.
	pub resources: Option<ResourceData>,
}

impl UnsignedTransaction {
	pub fn is_prepared(&self) -> bool {
		self.resources.is_some()
	}

	/// Inclusion fee plus resource fee.
	pub fn total_fee(&self) -> Result<Fee, FeeError> {
		match &self.resources {
			Some(resources) => self.fee.checked_add(resources.resource_fee),
			None => Ok(self.fee),
		}
	}

	/// Returns a copy of this transaction carrying the simulated resources.
	pub fn prepare(&self, resources: ResourceData) -> Result<UnsignedTransaction, FeeError> {
		let prepared = UnsignedTransaction {
			resources: Some(resources),
			..self.clone()
		};
		prepared.total_fee()?;
		Ok(prepared)
	}

	/// Hash of this transaction on the given network.
	pub fn hash(&self, network: &NetworkId) -> Result<TransactionHash, EnvelopeError> {
		let body = serde_json::to_vec(self).map_err(|e| EnvelopeError::Encode(e.to_string()))?;
		let mut hasher = Sha3_256::new();
		hasher.update(network.network_hash());
		hasher.update(TX_HASH_TAG);
		hasher.update(&body);
		Ok(TransactionHash(hasher.finalize().to_vec()))
	}

	pub fn to_envelope(&self) -> Result<TransactionEnvelope, EnvelopeError> {
		TransactionEnvelope::encode(self, &[])
	}
}

/// Builds [`UnsignedTransaction`]s.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
	account: Account,
	fee: Fee,
	operations: Vec<Operation>,
}

impl TransactionBuilder {
	pub fn new(account: Account, fee: Fee) -> Self {
		Self {
			account,
			fee,
			operations: Vec::new(),
		}
	}

	pub fn add_operation(mut self, operation: Operation) -> Self {
		self.operations.push(operation);
		self
	}

	pub fn add_operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
		self.operations.extend(operations);
		self
	}

	pub fn build(self) -> Result<UnsignedTransaction, BuildError> {
		if self.operations.is_empty() {
			return Err(BuildError::NoOperations);
		}
		let sequence = self
			.account
			.next_sequence()
			.ok_or_else(|| BuildError::SequenceExhausted(self.account.id.clone()))?;

		Ok(UnsignedTransaction {
			source: self.account.id,
			sequence,
			fee: self.fee,
			operations: self.operations,
			time_bounds: TimeBounds::Infinite,
			resources: None,
		})
	}
}

/// Signature attached by the external signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedSignature {
	/// Last bytes of the signing key, used by the node to pick the key.
	#[serde(with = "hex_bytes")]
	pub hint: Vec<u8>,
	#[serde(with = "hex_bytes")]
	pub signature: Vec<u8>,
}

/// A transaction carrying signatures for a specific network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
	transaction: UnsignedTransaction,
	signatures: Vec<DecoratedSignature>,
	network: NetworkId,
}

impl SignedTransaction {
	/// Accepts a signed envelope returned for `expected`.
	///
	/// Fails if the signer changed the transaction or attached no signature.
	pub fn from_envelope(
		expected: &UnsignedTransaction,
		envelope: &TransactionEnvelope,
		network: &NetworkId,
	) -> Result<Self, EnvelopeError> {
		let signed = Self::decode(envelope, network)?;
		if &signed.transaction != expected {
			return Err(EnvelopeError::TransactionMismatch);
		}
		Ok(signed)
	}

	/// Decodes a signed envelope received from elsewhere (e.g. a wallet
	/// that signed on a client and handed the envelope to a backend).
	pub fn decode(envelope: &TransactionEnvelope, network: &NetworkId) -> Result<Self, EnvelopeError> {
		let (transaction, signatures) = envelope.decode()?;
		if signatures.is_empty() {
			return Err(EnvelopeError::Unsigned);
		}
		Ok(Self {
			transaction,
			signatures,
			network: network.clone(),
		})
	}

	pub fn transaction(&self) -> &UnsignedTransaction {
		&self.transaction
	}

	pub fn signatures(&self) -> &[DecoratedSignature] {
		&self.signatures
	}

	pub fn network(&self) -> &NetworkId {
		&self.network
	}

	pub fn hash(&self) -> Result<TransactionHash, EnvelopeError> {
		self.transaction.hash(&self.network)
	}

	pub fn to_envelope(&self) -> Result<TransactionEnvelope, EnvelopeError> {
		TransactionEnvelope::encode(&self.transaction, &self.signatures)
	}
}
