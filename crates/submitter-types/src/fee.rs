//! Transaction fee amounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing or combining fees.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeeError {
	#[error("Invalid fee '{0}': expected a non-negative decimal integer")]
	Invalid(String),
	#[error("Fee overflow adding {0} and {1}")]
	Overflow(Fee, Fee),
}

/// Fee in the ledger's smallest fee unit.
///
/// Always crosses process boundaries as a decimal string, so amounts above
/// 2^53 survive JSON consumers that would otherwise go through a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fee(u64);

impl Fee {
	/// Default inclusion fee ceiling used when none is configured.
	pub const DEFAULT: Fee = Fee(1_000_000);

	pub const fn new(amount: u64) -> Self {
		Self(amount)
	}

	pub const fn amount(&self) -> u64 {
		self.0
	}

	pub fn checked_add(self, other: Fee) -> Result<Fee, FeeError> {
		self.0
			.checked_add(other.0)
			.map(Fee)
			.ok_or(FeeError::Overflow(self, other))
	}
}

impl FromStr for Fee {
	type Err = FeeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		// u64::from_str accepts a leading '+', which is not a valid wire fee
		if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
			return Err(FeeError::Invalid(s.to_string()));
		}
		s.parse::<u64>()
			.map(Fee)
			.map_err(|_| FeeError::Invalid(s.to_string()))
	}
}

impl fmt::Display for Fee {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Fee {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Fee {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		raw.parse().map_err(serde::de::Error::custom)
	}
}
