//! Serde helpers for wire encodings that must not lose precision.
//!
//! Integers wider than 53 bits travel as decimal strings and binary payloads
//! travel as hex, so no JSON consumer ever routes them through a float.

use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
use std::fmt::Display;
use std::str::FromStr;

fn serialize_decimal<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.collect_str(value)
}

fn deserialize_decimal<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
	T: FromStr,
	T::Err: Display,
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;
	raw.parse::<T>()
		.map_err(|e| D::Error::custom(format!("Invalid decimal '{}': {}", raw, e)))
}

macro_rules! decimal_module {
	($name:ident, $ty:ty) => {
		/// Decimal string (de)serialization.
		pub mod $name {
			use super::*;

			pub fn serialize<S: Serializer>(value: &$ty, serializer: S) -> Result<S::Ok, S::Error> {
				serialize_decimal(value, serializer)
			}

			pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<$ty, D::Error> {
				deserialize_decimal(deserializer)
			}
		}
	};
}

decimal_module!(decimal_u64, u64);
decimal_module!(decimal_i64, i64);
decimal_module!(decimal_u128, u128);
decimal_module!(decimal_i128, i128);

/// Hex string (de)serialization for raw byte buffers.
pub mod hex_bytes {
	use super::*;

	pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&hex::encode(bytes))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
		let raw = String::deserialize(deserializer)?;
		let stripped = raw.strip_prefix("0x").unwrap_or(&raw);
		hex::decode(stripped).map_err(|e| D::Error::custom(format!("Invalid hex: {}", e)))
	}
}

/// Hex string (de)serialization for lists of raw byte buffers.
pub mod hex_bytes_vec {
	use super::*;
	use serde::ser::SerializeSeq;

	pub fn serialize<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
		let mut seq = serializer.serialize_seq(Some(items.len()))?;
		for item in items {
			seq.serialize_element(&hex::encode(item))?;
		}
		seq.end()
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(
		deserializer: D,
	) -> Result<Vec<Vec<u8>>, D::Error> {
		Vec::<String>::deserialize(deserializer)?
			.into_iter()
			.map(|raw| hex::decode(&raw).map_err(|e| D::Error::custom(format!("Invalid hex: {}", e))))
			.collect()
	}
}
