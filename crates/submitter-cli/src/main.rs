use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use submitter_config::ConfigLoader;
use submitter_core::SubmitterBuilder;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "ledger-submitter")]
#[command(about = "Submit and query contract calls on a ledger node", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[arg(short, long, value_name = "FILE", default_value = "config/testnet.toml")]
	config: PathBuf,

	#[arg(long, env = "SUBMITTER_LOG_LEVEL", default_value = "info")]
	log_level: String,
}

#[derive(Subcommand)]
enum Commands {
	/// Validate the configuration file
	Validate,
	/// Show an account and its current sequence number
	Account {
		/// Account identifier (G...)
		id: String,
	},
	/// Simulate a read-only contract call and print its return value
	Query(commands::CallArgs),
	/// Sign, submit and confirm a contract call
	Submit {
		#[command(flatten)]
		call: commands::CallArgs,
		/// Signing account; defaults to the account unlocked in the wallet
		#[arg(long)]
		account: Option<String>,
	},
	/// Poll the outcome of a submitted transaction
	Status {
		/// Transaction hash (hex)
		hash: String,
	},
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	// Initialize tracing
	setup_tracing(&cli.log_level)?;

	info!("Loading configuration from: {:?}", cli.config);
	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.context("Failed to load configuration")?;

	if let Commands::Validate = cli.command {
		return commands::validate(&config);
	}

	let submitter = SubmitterBuilder::new(config)
		.with_default_factories()
		.build()
		.context("Failed to build submitter")?;

	// Ctrl-C cancels whatever is in flight
	let cancel = CancellationToken::new();
	let trigger = cancel.clone();
	tokio::spawn(async move {
		shutdown_signal().await;
		warn!("Shutdown signal received, cancelling");
		trigger.cancel();
	});

	match cli.command {
		Commands::Validate => Ok(()),
		Commands::Account { id } => commands::account(&submitter, &id).await,
		Commands::Query(call) => commands::query(&submitter, &call).await,
		Commands::Submit { call, account } => {
			commands::submit(&submitter, &call, account.as_deref(), &cancel).await
		}
		Commands::Status { hash } => commands::status(&submitter, &hash, &cancel).await,
	}
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			warn!("Failed to listen for Ctrl+C: {}", e);
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(e) => {
				warn!("Failed to install SIGTERM handler: {}", e);
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
