//! Network identity used to bind signatures to a single ledger.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::fmt;

/// Passphrase of the public test network.
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";
/// Passphrase of the future-features test network.
pub const FUTURENET_PASSPHRASE: &str = "Test SDF Future Network ; October 2022";

/// Identifies the network a transaction is signed for.
///
/// The passphrase is hashed into every transaction hash, so a signature
/// produced for one network cannot be replayed on another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkId {
	/// Short network name handed to the wallet (e.g. `testnet`).
	pub name: String,
	/// Full network passphrase.
	pub passphrase: String,
}

impl NetworkId {
	pub fn new(name: impl Into<String>, passphrase: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			passphrase: passphrase.into(),
		}
	}

	pub fn testnet() -> Self {
		Self::new("testnet", TESTNET_PASSPHRASE)
	}

	pub fn futurenet() -> Self {
		Self::new("futurenet", FUTURENET_PASSPHRASE)
	}

	/// SHA3-256 of the passphrase.
	pub fn network_hash(&self) -> [u8; 32] {
		let digest = Sha3_256::digest(self.passphrase.as_bytes());
		let mut hash = [0u8; 32];
		hash.copy_from_slice(&digest);
		hash
	}
}

impl fmt::Display for NetworkId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}
