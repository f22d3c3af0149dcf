//! Ledger-native values passed to and returned from contract calls.

use crate::serde_helpers::{decimal_i128, decimal_i64, decimal_u128, decimal_u64, hex_bytes};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A value as the ledger represents it.
///
/// 64- and 128-bit integers serialize as decimal strings and byte buffers as
/// hex, so neither is ever truncated by a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerValue {
	Void,
	Bool(bool),
	U32(u32),
	I32(i32),
	U64(#[serde(with = "decimal_u64")] u64),
	I64(#[serde(with = "decimal_i64")] i64),
	U128(#[serde(with = "decimal_u128")] u128),
	I128(#[serde(with = "decimal_i128")] i128),
	Bytes(#[serde(with = "hex_bytes")] Vec<u8>),
	String(String),
	Symbol(String),
	Address(String),
	Vec(Vec<LedgerValue>),
	Map(Vec<MapEntry>),
}

/// One key/value pair of a ledger map. Order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
	pub key: LedgerValue,
	pub value: LedgerValue,
}

impl LedgerValue {
	/// Name of the variant, used in decode errors.
	pub fn kind(&self) -> &'static str {
		match self {
			LedgerValue::Void => "void",
			LedgerValue::Bool(_) => "bool",
			LedgerValue::U32(_) => "u32",
			LedgerValue::I32(_) => "i32",
			LedgerValue::U64(_) => "u64",
			LedgerValue::I64(_) => "i64",
			LedgerValue::U128(_) => "u128",
			LedgerValue::I128(_) => "i128",
			LedgerValue::Bytes(_) => "bytes",
			LedgerValue::String(_) => "string",
			LedgerValue::Symbol(_) => "symbol",
			LedgerValue::Address(_) => "address",
			LedgerValue::Vec(_) => "vec",
			LedgerValue::Map(_) => "map",
		}
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			LedgerValue::Bytes(bytes) => Some(bytes),
			_ => None,
		}
	}

	/// Looks up a map entry whose key is the given symbol or string.
	pub fn field(&self, name: &str) -> Option<&LedgerValue> {
		let LedgerValue::Map(entries) = self else {
			return None;
		};
		entries
			.iter()
			.find(|entry| match &entry.key {
				LedgerValue::Symbol(key) | LedgerValue::String(key) => key == name,
				_ => false,
			})
			.map(|entry| &entry.value)
	}

	fn to_i128(&self) -> Option<i128> {
		match *self {
			LedgerValue::U32(v) => Some(v.into()),
			LedgerValue::I32(v) => Some(v.into()),
			LedgerValue::U64(v) => Some(v.into()),
			LedgerValue::I64(v) => Some(v.into()),
			LedgerValue::U128(v) => i128::try_from(v).ok(),
			LedgerValue::I128(v) => Some(v),
			_ => None,
		}
	}
}

/// Errors produced when decoding a ledger value into a domain value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
	#[error("Expected {expected}, found {found}")]
	UnexpectedType {
		expected: &'static str,
		found: &'static str,
	},
	#[error("Value out of range for {0}")]
	OutOfRange(&'static str),
}

/// Decodes a ledger value into a domain value.
pub trait FromLedgerValue: Sized {
	fn from_ledger_value(value: LedgerValue) -> Result<Self, DecodeError>;
}

impl FromLedgerValue for LedgerValue {
	fn from_ledger_value(value: LedgerValue) -> Result<Self, DecodeError> {
		Ok(value)
	}
}

impl FromLedgerValue for bool {
	fn from_ledger_value(value: LedgerValue) -> Result<Self, DecodeError> {
		match value {
			LedgerValue::Bool(b) => Ok(b),
			other => Err(DecodeError::UnexpectedType {
				expected: "bool",
				found: other.kind(),
			}),
		}
	}
}

impl FromLedgerValue for String {
	fn from_ledger_value(value: LedgerValue) -> Result<Self, DecodeError> {
		match value {
			LedgerValue::String(s) | LedgerValue::Symbol(s) | LedgerValue::Address(s) => Ok(s),
			other => Err(DecodeError::UnexpectedType {
				expected: "string",
				found: other.kind(),
			}),
		}
	}
}

macro_rules! impl_integer {
	($($ty:ty),*) => {
		$(
			impl FromLedgerValue for $ty {
				fn from_ledger_value(value: LedgerValue) -> Result<Self, DecodeError> {
					let wide = value.to_i128().ok_or(DecodeError::UnexpectedType {
						expected: stringify!($ty),
						found: value.kind(),
					})?;
					<$ty>::try_from(wide).map_err(|_| DecodeError::OutOfRange(stringify!($ty)))
				}
			}
		)*
	};
}

impl_integer!(u32, i32, u64, i64, i128);

impl FromLedgerValue for u128 {
	fn from_ledger_value(value: LedgerValue) -> Result<Self, DecodeError> {
		match value {
			LedgerValue::U128(v) => Ok(v),
			other => {
				let wide = other.to_i128().ok_or(DecodeError::UnexpectedType {
					expected: "u128",
					found: other.kind(),
				})?;
				u128::try_from(wide).map_err(|_| DecodeError::OutOfRange("u128"))
			}
		}
	}
}

impl<T: FromLedgerValue> FromLedgerValue for Option<T> {
	fn from_ledger_value(value: LedgerValue) -> Result<Self, DecodeError> {
		match value {
			LedgerValue::Void => Ok(None),
			other => T::from_ledger_value(other).map(Some),
		}
	}
}

impl<T: FromLedgerValue> FromLedgerValue for Vec<T> {
	fn from_ledger_value(value: LedgerValue) -> Result<Self, DecodeError> {
		match value {
			LedgerValue::Vec(items) => items.into_iter().map(T::from_ledger_value).collect(),
			other => Err(DecodeError::UnexpectedType {
				expected: "vec",
				found: other.kind(),
			}),
		}
	}
}
