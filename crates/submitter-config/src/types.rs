//! Configuration types for the submitter.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use submitter_types::{AccountId, Fee, NetworkId};

/// Complete submitter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Network identity and endpoints.
	pub network: NetworkConfig,
	/// Transaction construction settings.
	#[serde(default)]
	pub transaction: TransactionConfig,
	/// Confirmation polling budget.
	#[serde(default)]
	pub polling: PollingConfig,
	/// Per-request network timeouts.
	#[serde(default)]
	pub timeouts: TimeoutConfig,
	/// Ledger node provider.
	pub ledger: ProviderConfig,
	/// External signer provider. Absent for read-only deployments.
	pub signer: Option<ProviderConfig>,
}

/// Well-known networks with their default endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkPreset {
	Testnet,
	Futurenet,
}

impl NetworkPreset {
	pub fn network_id(&self) -> NetworkId {
		match self {
			NetworkPreset::Testnet => NetworkId::testnet(),
			NetworkPreset::Futurenet => NetworkId::futurenet(),
		}
	}

	pub fn rpc_url(&self) -> &'static str {
		match self {
			NetworkPreset::Testnet => "https://soroban-testnet.stellar.org:443",
			NetworkPreset::Futurenet => "https://rpc-futurenet.stellar.org",
		}
	}

	/// Account used as the source of read-only simulations.
	pub fn read_only_account(&self) -> &'static str {
		"GBOAWTUJNSI5VKE3MDGY32LJF723OCQ42XYLNJWXDHCJKRZSFV3PKKMY"
	}
}

/// Network settings. With a preset, every other field is optional and
/// overrides the preset's value.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NetworkConfig {
	pub preset: Option<NetworkPreset>,
	/// Short network name handed to the wallet.
	pub name: Option<String>,
	/// Network passphrase signatures are bound to.
	pub passphrase: Option<String>,
	/// Ledger node RPC endpoint.
	pub rpc_url: Option<String>,
	/// Source account for read-only queries; never signs.
	pub read_only_account: Option<String>,
}

impl NetworkConfig {
	/// Applies the preset and checks every value is present and well formed.
	pub fn resolve(&self) -> Result<ResolvedNetwork, ConfigError> {
		let preset = self.preset;
		let missing = |field: &str| {
			ConfigError::ValidationError(format!(
				"network.{} is required when no preset is selected",
				field
			))
		};

		let (name, passphrase) = match (&self.name, &self.passphrase, preset) {
			(name, Some(passphrase), _) => (
				name.clone()
					.or_else(|| preset.map(|p| p.network_id().name))
					.unwrap_or_else(|| "custom".to_string()),
				passphrase.clone(),
			),
			(name, None, Some(p)) => (
				name.clone().unwrap_or_else(|| p.network_id().name),
				p.network_id().passphrase,
			),
			(_, None, None) => return Err(missing("passphrase")),
		};
		if passphrase.trim().is_empty() {
			return Err(ConfigError::ValidationError(
				"network.passphrase must not be empty".to_string(),
			));
		}

		let rpc_url = self
			.rpc_url
			.clone()
			.or_else(|| preset.map(|p| p.rpc_url().to_string()))
			.ok_or_else(|| missing("rpc_url"))?;

		let read_only_account = self
			.read_only_account
			.clone()
			.or_else(|| preset.map(|p| p.read_only_account().to_string()))
			.ok_or_else(|| missing("read_only_account"))?
			.parse::<AccountId>()
			.map_err(|e| {
				ConfigError::ValidationError(format!("network.read_only_account: {}", e))
			})?;

		Ok(ResolvedNetwork {
			id: NetworkId::new(name, passphrase),
			rpc_url,
			read_only_account,
		})
	}
}

/// Network settings after presets are applied and values validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNetwork {
	pub id: NetworkId,
	pub rpc_url: String,
	pub read_only_account: AccountId,
}

/// Transaction construction settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransactionConfig {
	/// Inclusion fee ceiling, as a decimal string.
	#[serde(default = "default_fee")]
	pub fee: Fee,
}

impl Default for TransactionConfig {
	fn default() -> Self {
		Self { fee: default_fee() }
	}
}

/// Confirmation polling budget.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollingConfig {
	/// Maximum number of status queries per transaction.
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	/// Fixed delay between two status queries.
	#[serde(default = "default_interval_ms")]
	pub interval_ms: u64,
}

impl PollingConfig {
	pub fn interval(&self) -> Duration {
		Duration::from_millis(self.interval_ms)
	}
}

impl Default for PollingConfig {
	fn default() -> Self {
		Self {
			max_attempts: default_max_attempts(),
			interval_ms: default_interval_ms(),
		}
	}
}

/// Per-request network timeouts. Signing is never subject to these.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutConfig {
	/// Timeout for account fetch, simulate, submit and status calls.
	/// `None` leaves the transport's default in place.
	#[serde(default = "default_request_secs")]
	pub request_secs: Option<u64>,
}

impl TimeoutConfig {
	pub fn request_timeout(&self) -> Option<Duration> {
		self.request_secs.map(Duration::from_secs)
	}
}

impl Default for TimeoutConfig {
	fn default() -> Self {
		Self {
			request_secs: default_request_secs(),
		}
	}
}

/// Selects a provider implementation and carries its raw settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
	/// Implementation name, e.g. `rpc` or `agent`.
	pub implementation: String,
	/// Implementation-specific settings, validated by its schema.
	#[serde(default = "empty_table")]
	pub config: toml::Value,
}

fn default_fee() -> Fee {
	Fee::DEFAULT
}

fn default_max_attempts() -> u32 {
	20
}

fn default_interval_ms() -> u64 {
	1_000
}

fn default_request_secs() -> Option<u64> {
	Some(30)
}

fn empty_table() -> toml::Value {
	toml::Value::Table(toml::Table::new())
}
