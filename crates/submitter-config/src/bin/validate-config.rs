//! Configuration validation utility
//!
//! Usage: cargo run --bin validate-config config/testnet.toml

use std::env;
use std::process;

use submitter_config::ConfigLoader;

#[tokio::main(flavor = "current_thread")]
async fn main() {
	let args: Vec<String> = env::args().collect();

	if args.len() != 2 {
		eprintln!("Usage: {} <config-file>", args[0]);
		process::exit(1);
	}

	let config_path = &args[1];

	println!("Validating configuration file: {}", config_path);

	let loaded = ConfigLoader::new().with_file(config_path).load().await;
	let result = loaded.and_then(|config| config.network.resolve().map(|network| (config, network)));

	match result {
		Ok((config, network)) => {
			println!("✅ Configuration is valid!");
			println!("Network: {} ({})", network.id, network.id.passphrase);
			println!("RPC endpoint: {}", network.rpc_url);
			println!("Read-only account: {}", network.read_only_account);
			println!("Fee: {}", config.transaction.fee);
			println!(
				"Polling: {} attempts every {} ms",
				config.polling.max_attempts, config.polling.interval_ms
			);
			println!("Ledger provider: {}", config.ledger.implementation);
			match &config.signer {
				Some(signer) => println!("Signer provider: {}", signer.implementation),
				None => println!("Signer provider: none (read-only)"),
			}
		}
		Err(e) => {
			eprintln!("❌ Configuration validation failed:");
			eprintln!("{}", e);
			process::exit(1);
		}
	}
}
