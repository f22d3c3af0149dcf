//! Configuration loading from files and environment.

use crate::{Config, ConfigError};
use regex::Regex;
use std::env;
use std::path::Path;
use submitter_types::Fee;
use tracing::{debug, info};

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
	Toml,
	Json,
	Yaml,
}

impl ConfigFormat {
	pub fn from_path(path: &Path) -> Option<Self> {
		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Some(ConfigFormat::Toml),
			Some("json") => Some(ConfigFormat::Json),
			Some("yaml") | Some("yml") => Some(ConfigFormat::Yaml),
			_ => None,
		}
	}
}

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "SUBMITTER_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<Config, ConfigError> {
		let file_path = self.file_path.as_deref().ok_or_else(|| {
			ConfigError::FileNotFound("No configuration file specified".to_string())
		})?;
		info!("Loading configuration from {}", file_path);

		let path = Path::new(file_path);
		let format = ConfigFormat::from_path(path).ok_or_else(|| {
			ConfigError::ParseError(format!("Unsupported config format: {}", file_path))
		})?;

		let content = match tokio::fs::read_to_string(path).await {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(ConfigError::FileNotFound(file_path.to_string()))
			}
			Err(e) => return Err(e.into()),
		};

		self.parse(&content, format)
	}

	/// Parses configuration text, then applies substitution, overrides and
	/// validation from the process environment.
	pub fn parse(&self, content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
		self.parse_with(content, format, |name| env::var(name).ok())
	}

	fn parse_with<F>(&self, content: &str, format: ConfigFormat, lookup: F) -> Result<Config, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let substituted = substitute_env_vars(content, &lookup)?;

		let mut config: Config = match format {
			ConfigFormat::Toml => toml::from_str(&substituted)
				.map_err(|e| ConfigError::ParseError(format!("Failed to parse TOML: {}", e)))?,
			ConfigFormat::Json => serde_json::from_str(&substituted)
				.map_err(|e| ConfigError::ParseError(format!("Failed to parse JSON: {}", e)))?,
			ConfigFormat::Yaml => serde_yaml::from_str(&substituted)
				.map_err(|e| ConfigError::ParseError(format!("Failed to parse YAML: {}", e)))?,
		};

		self.apply_env_overrides(&mut config, &lookup)?;
		apply_network_defaults(&mut config)?;
		validate_config(&config)?;

		Ok(config)
	}

	fn apply_env_overrides<F>(&self, config: &mut Config, lookup: &F) -> Result<(), ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |name: &str| lookup(&format!("{}{}", self.env_prefix, name));

		// The override applies to the provider too, even when it sets its own URL.
		if let Some(rpc_url) = var("RPC_URL") {
			debug!("Overriding RPC URL from environment");
			if let Some(table) = config.ledger.config.as_table_mut() {
				table.insert("rpc_url".to_string(), toml::Value::String(rpc_url.clone()));
			}
			config.network.rpc_url = Some(rpc_url);
		}

		if let Some(fee) = var("FEE") {
			config.transaction.fee = fee
				.parse::<Fee>()
				.map_err(|e| ConfigError::ValidationError(e.to_string()))?;
		}

		if let Some(attempts) = var("POLL_ATTEMPTS") {
			config.polling.max_attempts = attempts.parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid poll attempts: {}", e))
			})?;
		}

		if let Some(interval) = var("POLL_INTERVAL_MS") {
			config.polling.interval_ms = interval.parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid poll interval: {}", e))
			})?;
		}

		if let Some(timeout) = var("REQUEST_TIMEOUT_SECS") {
			config.timeouts.request_secs = Some(timeout.parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid request timeout: {}", e))
			})?);
		}

		Ok(())
	}
}

/// Replaces `${VAR_NAME}` references with values from `lookup`.
fn substitute_env_vars<F>(content: &str, lookup: &F) -> Result<String, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::ParseError(e.to_string()))?;
	let mut result = content.to_string();

	for cap in re.captures_iter(content) {
		let full_match = &cap[0];
		let var_name = &cap[1];
		let value =
			lookup(var_name).ok_or_else(|| ConfigError::EnvVarNotFound(var_name.to_string()))?;
		result = result.replace(full_match, &value);
	}

	Ok(result)
}

/// Copies the resolved RPC URL into the ledger provider table when the
/// provider does not set its own.
fn apply_network_defaults(config: &mut Config) -> Result<(), ConfigError> {
	let network = config.network.resolve()?;
	if let Some(table) = config.ledger.config.as_table_mut() {
		if !table.contains_key("rpc_url") {
			table.insert("rpc_url".to_string(), toml::Value::String(network.rpc_url));
		}
	}
	Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
	if config.polling.max_attempts == 0 {
		return Err(ConfigError::ValidationError(
			"polling.max_attempts must be at least 1".to_string(),
		));
	}

	if config.ledger.implementation.trim().is_empty() {
		return Err(ConfigError::ValidationError(
			"ledger.implementation must not be empty".to_string(),
		));
	}

	if !config.ledger.config.is_table() {
		return Err(ConfigError::ValidationError(
			"ledger.config must be a table".to_string(),
		));
	}

	if let Some(signer) = &config.signer {
		if signer.implementation.trim().is_empty() {
			return Err(ConfigError::ValidationError(
				"signer.implementation must not be empty".to_string(),
			));
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;
	use submitter_types::NetworkId;

	const MINIMAL: &str = r#"
[network]
preset = "testnet"

[ledger]
implementation = "rpc"
"#;

	fn no_env(_: &str) -> Option<String> {
		None
	}

	#[test]
	fn test_preset_defaults() {
		let config = ConfigLoader::new()
			.parse_with(MINIMAL, ConfigFormat::Toml, no_env)
			.unwrap();

		assert_eq!(config.transaction.fee, Fee::DEFAULT);
		assert_eq!(config.polling.max_attempts, 20);
		assert_eq!(config.polling.interval_ms, 1_000);
		assert_eq!(config.timeouts.request_secs, Some(30));
		assert!(config.signer.is_none());

		let network = config.network.resolve().unwrap();
		assert_eq!(network.id, NetworkId::testnet());
		assert_eq!(
			config.ledger.config.get("rpc_url").and_then(|v| v.as_str()),
			Some("https://soroban-testnet.stellar.org:443")
		);
	}

	#[test]
	fn test_custom_network_and_fee_string() {
		let raw = r#"
[network]
name = "standalone"
passphrase = "Standalone Network ; February 2017"
rpc_url = "http://localhost:8000/soroban/rpc"
read_only_account = "GBOAWTUJNSI5VKE3MDGY32LJF723OCQ42XYLNJWXDHCJKRZSFV3PKKMY"

[transaction]
fee = "9007199254740993"

[polling]
max_attempts = 5
interval_ms = 250

[ledger]
implementation = "rpc"
config = { rpc_url = "http://other:8000", allow_http = true }

[signer]
implementation = "agent"
config = { agent_url = "http://localhost:7000" }
"#;
		let config = ConfigLoader::new()
			.parse_with(raw, ConfigFormat::Toml, no_env)
			.unwrap();

		assert_eq!(config.transaction.fee.to_string(), "9007199254740993");
		assert_eq!(config.polling.max_attempts, 5);
		assert_eq!(config.polling.interval().as_millis(), 250);
		// provider's own URL wins
		assert_eq!(
			config.ledger.config.get("rpc_url").and_then(|v| v.as_str()),
			Some("http://other:8000")
		);
		assert_eq!(config.network.resolve().unwrap().id.name, "standalone");
		assert_eq!(config.signer.unwrap().implementation, "agent");
	}

	#[test]
	fn test_numeric_fee_is_rejected() {
		let raw = format!("{}\n[transaction]\nfee = 100\n", MINIMAL);
		let err = ConfigLoader::new()
			.parse_with(&raw, ConfigFormat::Toml, no_env)
			.unwrap_err();
		assert!(matches!(err, ConfigError::ParseError(_)));
	}

	#[test]
	fn test_env_substitution_and_overrides() {
		let raw = r#"
[network]
preset = "futurenet"

[ledger]
implementation = "rpc"
config = { api_key = "${LEDGER_API_KEY}" }
"#;
		let env: HashMap<&str, &str> = HashMap::from([
			("LEDGER_API_KEY", "secret"),
			("APP_RPC_URL", "https://rpc.internal"),
			("APP_FEE", "250"),
			("APP_POLL_ATTEMPTS", "3"),
		]);
		let config = ConfigLoader::new()
			.with_env_prefix("APP_")
			.parse_with(raw, ConfigFormat::Toml, |name| {
				env.get(name).map(|v| v.to_string())
			})
			.unwrap();

		assert_eq!(
			config.ledger.config.get("api_key").and_then(|v| v.as_str()),
			Some("secret")
		);
		assert_eq!(
			config.ledger.config.get("rpc_url").and_then(|v| v.as_str()),
			Some("https://rpc.internal")
		);
		assert_eq!(config.transaction.fee, Fee::new(250));
		assert_eq!(config.polling.max_attempts, 3);
		assert_eq!(
			config.network.resolve().unwrap().id,
			NetworkId::futurenet()
		);
	}

	#[test]
	fn test_rpc_url_override_reaches_provider() {
		let raw = include_str!("../../../config/local.toml");
		let config = ConfigLoader::new()
			.parse_with(raw, ConfigFormat::Toml, |name| {
				(name == "SUBMITTER_RPC_URL").then(|| "https://override.example".to_string())
			})
			.unwrap();

		assert_eq!(
			config.network.resolve().unwrap().rpc_url,
			"https://override.example"
		);
		assert_eq!(
			config.ledger.config.get("rpc_url").and_then(|v| v.as_str()),
			Some("https://override.example")
		);
		// unrelated provider settings survive
		assert_eq!(
			config.ledger.config.get("allow_http").and_then(|v| v.as_bool()),
			Some(true)
		);
	}

	#[test]
	fn test_missing_env_var() {
		let raw = MINIMAL.replace("rpc\"", "${IMPL}\"");
		let err = ConfigLoader::new()
			.parse_with(&raw, ConfigFormat::Toml, no_env)
			.unwrap_err();
		assert!(matches!(err, ConfigError::EnvVarNotFound(ref name) if name == "IMPL"));
	}

	#[test]
	fn test_validation_failures() {
		let zero_attempts = format!("{}\n[polling]\nmax_attempts = 0\n", MINIMAL);
		assert!(matches!(
			ConfigLoader::new().parse_with(&zero_attempts, ConfigFormat::Toml, no_env),
			Err(ConfigError::ValidationError(_))
		));

		let no_network = "[network]\n[ledger]\nimplementation = \"rpc\"\n";
		let err = ConfigLoader::new()
			.parse_with(no_network, ConfigFormat::Toml, no_env)
			.unwrap_err();
		assert!(err.to_string().contains("network.passphrase"));

		let bad_account = MINIMAL.replace(
			"preset = \"testnet\"",
			"preset = \"testnet\"\nread_only_account = \"GNOPE\"",
		);
		let err = ConfigLoader::new()
			.parse_with(&bad_account, ConfigFormat::Toml, no_env)
			.unwrap_err();
		assert!(err.to_string().contains("read_only_account"));
	}

	#[test]
	fn test_json_format() {
		let raw = r#"{
			"network": { "preset": "testnet" },
			"polling": { "max_attempts": 7 },
			"ledger": { "implementation": "rpc" }
		}"#;
		let config = ConfigLoader::new()
			.parse_with(raw, ConfigFormat::Json, no_env)
			.unwrap();
		assert_eq!(config.polling.max_attempts, 7);
	}

	#[tokio::test]
	async fn test_load_from_file() {
		let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
		file.write_all(MINIMAL.as_bytes()).unwrap();

		let config = ConfigLoader::new()
			.with_file(file.path())
			.with_env_prefix("SUBMITTER_TEST_UNSET_")
			.load()
			.await
			.unwrap();
		assert_eq!(config.ledger.implementation, "rpc");
	}

	#[tokio::test]
	async fn test_load_errors() {
		let err = ConfigLoader::new().load().await.unwrap_err();
		assert!(matches!(err, ConfigError::FileNotFound(_)));

		let err = ConfigLoader::new()
			.with_file("/definitely/not/here.toml")
			.load()
			.await
			.unwrap_err();
		assert!(matches!(err, ConfigError::FileNotFound(_)));

		let err = ConfigLoader::new()
			.with_file("config.ini")
			.load()
			.await
			.unwrap_err();
		assert!(matches!(err, ConfigError::ParseError(_)));
	}
}
