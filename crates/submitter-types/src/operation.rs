//! Contract invocation operations.

use crate::value::LedgerValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing contract addresses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractAddressError {
	#[error("Contract address must be valid hexadecimal: {0}")]
	InvalidHex(String),
	#[error("Contract address must be 32 bytes, got {0}")]
	InvalidLength(usize),
}

/// Contract address as a raw 32-byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractAddress(pub [u8; 32]);

impl ContractAddress {
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}
}

impl TryFrom<&[u8]> for ContractAddress {
	type Error = ContractAddressError;

	fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
		let array: [u8; 32] = bytes
			.try_into()
			.map_err(|_| ContractAddressError::InvalidLength(bytes.len()))?;
		Ok(Self(array))
	}
}

impl FromStr for ContractAddress {
	type Err = ContractAddressError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let stripped = s.strip_prefix("0x").unwrap_or(s);
		let bytes =
			hex::decode(stripped).map_err(|e| ContractAddressError::InvalidHex(e.to_string()))?;
		Self::try_from(bytes.as_slice())
	}
}

impl fmt::Display for ContractAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&hex::encode(self.0))
	}
}

impl Serialize for ContractAddress {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for ContractAddress {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		raw.parse().map_err(serde::de::Error::custom)
	}
}

/// One contract invocation, the unit of work carried by a transaction.
///
/// Operations are opaque to the submitter: it serializes them into the
/// transaction and never inspects or mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
	/// Contract being invoked.
	pub contract: ContractAddress,
	/// Contract function name.
	pub function: String,
	/// Positional arguments.
	pub args: Vec<LedgerValue>,
}

impl Operation {
	pub fn invoke(
		contract: ContractAddress,
		function: impl Into<String>,
		args: Vec<LedgerValue>,
	) -> Self {
		Self {
			contract,
			function: function.into(),
			args,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_contract_address_from_hex() {
		let hex = "11".repeat(32);
		let address: ContractAddress = hex.parse().unwrap();
		assert_eq!(address.as_bytes(), &[0x11; 32]);
		assert_eq!(address.to_string(), hex);
		assert_eq!(
			format!("0x{}", hex).parse::<ContractAddress>(),
			Ok(address)
		);
	}

	#[test]
	fn test_contract_address_rejects_wrong_length() {
		assert_eq!(
			"abcd".parse::<ContractAddress>(),
			Err(ContractAddressError::InvalidLength(2))
		);
		assert!(matches!(
			"xyz".parse::<ContractAddress>(),
			Err(ContractAddressError::InvalidHex(_))
		));
	}
}
