//! Account-related types for the submitter.
//!
//! Accounts are owned by the caller's wallet. The submitter only reads their
//! sequence number at build time and never stores it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of a public account identifier in its textual form.
const ACCOUNT_ID_LEN: usize = 56;

/// Errors produced when parsing account identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountIdError {
	#[error("Account id must be 56 characters, got {0}")]
	InvalidLength(usize),
	#[error("Account id must start with 'G'")]
	InvalidPrefix,
	#[error("Account id contains invalid character '{0}'")]
	InvalidCharacter(char),
}

/// Public account identifier (`G...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl FromStr for AccountId {
	type Err = AccountIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.len() != ACCOUNT_ID_LEN {
			return Err(AccountIdError::InvalidLength(s.len()));
		}
		if !s.starts_with('G') {
			return Err(AccountIdError::InvalidPrefix);
		}
		// RFC 4648 base32 alphabet
		if let Some(c) = s
			.chars()
			.find(|c| !(c.is_ascii_uppercase() || ('2'..='7').contains(c)))
		{
			return Err(AccountIdError::InvalidCharacter(c));
		}
		Ok(Self(s.to_string()))
	}
}

impl TryFrom<String> for AccountId {
	type Error = AccountIdError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<AccountId> for String {
	fn from(id: AccountId) -> Self {
		id.0
	}
}

impl fmt::Display for AccountId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Per-account replay counter as reported by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceNumber(#[serde(with = "crate::serde_helpers::decimal_u64")] pub u64);

impl fmt::Display for SequenceNumber {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Snapshot of an account taken when a transaction is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
	/// Public identifier of the account.
	pub id: AccountId,
	/// Current sequence number on the ledger.
	pub sequence: SequenceNumber,
}

impl Account {
	pub fn new(id: AccountId, sequence: SequenceNumber) -> Self {
		Self { id, sequence }
	}

	/// Sequence number the next transaction from this account must carry.
	pub fn next_sequence(&self) -> Option<SequenceNumber> {
		self.sequence.0.checked_add(1).map(SequenceNumber)
	}
}
