//! Hand-written collaborators for submitter tests.

use crate::poller::Sleeper;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use submitter_ledger::{LedgerError, LedgerInterface, LedgerService};
use submitter_signer::{SignOptions, SignerError, SignerInterface, SignerService};
use submitter_types::{
	Account, AccountId, ConfigSchema, DecoratedSignature, Fee, Footprint, LedgerValue,
	ResourceData, SequenceNumber, SimulationResponse, SubmissionReceipt, SubmissionStatus,
	TransactionEnvelope, TransactionHash, TransactionStatus, UnsignedTransaction, ValidationError,
};

pub const ALICE: &str = "GBOAWTUJNSI5VKE3MDGY32LJF723OCQ42XYLNJWXDHCJKRZSFV3PKKMY";
pub const READ_ONLY: &str = "GCEZWKCA5VLDNRLN3RPRJMRZOX3Z6G5CHCGSNFHEYVXM3XOJMDS674JZ";

pub fn alice() -> AccountId {
	ALICE.parse().unwrap()
}

pub fn read_only() -> AccountId {
	READ_ONLY.parse().unwrap()
}

struct NoSchema;

impl ConfigSchema for NoSchema {
	fn validate(&self, _config: &toml::Value) -> Result<(), ValidationError> {
		Ok(())
	}
}

/// Number of calls each collaborator method received.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
	pub get_account: u32,
	pub simulate: u32,
	pub send: u32,
	pub get_transaction: u32,
}

#[derive(Default)]
struct LedgerRecorder {
	counts: Mutex<CallCounts>,
	simulated: Mutex<Vec<UnsignedTransaction>>,
	sent: Mutex<Vec<TransactionEnvelope>>,
}

/// Scripted ledger node.
#[derive(Clone)]
pub struct MockLedger {
	sequence: u64,
	account_missing: bool,
	simulation: SimulationResponse,
	send_status: SubmissionStatus,
	statuses: Vec<TransactionStatus>,
	status_error: bool,
	send_delay: Option<Duration>,
	recorder: Arc<LedgerRecorder>,
}

impl MockLedger {
	/// Account at sequence 41, a successful simulation, PENDING on submit
	/// and NOT_FOUND forever.
	pub fn new() -> Self {
		Self {
			sequence: 41,
			account_missing: false,
			simulation: SimulationResponse::Success {
				resources: Some(resources()),
				return_value: Some(LedgerValue::U32(1)),
				latest_ledger: 10,
			},
			send_status: SubmissionStatus::Pending,
			statuses: Vec::new(),
			status_error: false,
			send_delay: None,
			recorder: Arc::default(),
		}
	}

	pub fn with_missing_account(mut self) -> Self {
		self.account_missing = true;
		self
	}

	pub fn with_simulation(mut self, simulation: SimulationResponse) -> Self {
		self.simulation = simulation;
		self
	}

	pub fn with_send_status(mut self, status: SubmissionStatus) -> Self {
		self.send_status = status;
		self
	}

	/// Statuses returned by successive lookups; the last one repeats.
	pub fn with_statuses(mut self, statuses: Vec<TransactionStatus>) -> Self {
		self.statuses = statuses;
		self
	}

	pub fn with_status_error(mut self) -> Self {
		self.status_error = true;
		self
	}

	/// The node takes `delay` to answer a submission it has already accepted.
	pub fn with_slow_send(mut self, delay: Duration) -> Self {
		self.send_delay = Some(delay);
		self
	}

	pub fn service(&self) -> LedgerService {
		LedgerService::new(Box::new(self.clone()))
	}

	pub fn counts(&self) -> CallCounts {
		*self.recorder.counts.lock().unwrap()
	}

	pub fn simulated(&self) -> Vec<UnsignedTransaction> {
		self.recorder.simulated.lock().unwrap().clone()
	}

	pub fn sent(&self) -> Vec<TransactionEnvelope> {
		self.recorder.sent.lock().unwrap().clone()
	}

	pub fn submitted_hash() -> TransactionHash {
		TransactionHash(vec![0x5e; 32])
	}

	fn count(&self, f: impl FnOnce(&mut CallCounts) -> &mut u32) -> u32 {
		let mut counts = self.recorder.counts.lock().unwrap();
		let counter = f(&mut *counts);
		*counter += 1;
		*counter
	}
}

pub fn resources() -> ResourceData {
	ResourceData {
		resource_fee: Fee::new(52_000),
		instructions: 1_500_000,
		footprint: Footprint {
			read_only: vec![vec![0x01, 0x02]],
			read_write: vec![vec![0x03]],
		},
	}
}

#[async_trait]
impl LedgerInterface for MockLedger {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(NoSchema)
	}

	async fn get_account(&self, id: &AccountId) -> Result<Account, LedgerError> {
		self.count(|c| &mut c.get_account);
		if self.account_missing {
			return Err(LedgerError::AccountNotFound(id.clone()));
		}
		Ok(Account::new(id.clone(), SequenceNumber(self.sequence)))
	}

	async fn simulate_transaction(
		&self,
		envelope: &TransactionEnvelope,
	) -> Result<SimulationResponse, LedgerError> {
		self.count(|c| &mut c.simulate);
		let (transaction, _) = envelope
			.decode()
			.map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;
		self.recorder.simulated.lock().unwrap().push(transaction);
		Ok(self.simulation.clone())
	}

	async fn send_transaction(
		&self,
		envelope: &TransactionEnvelope,
	) -> Result<SubmissionReceipt, LedgerError> {
		self.count(|c| &mut c.send);
		self.recorder.sent.lock().unwrap().push(envelope.clone());
		if let Some(delay) = self.send_delay {
			tokio::time::sleep(delay).await;
		}
		Ok(SubmissionReceipt {
			hash: Self::submitted_hash(),
			status: self.send_status,
			error_result: match self.send_status {
				SubmissionStatus::Error => Some("AAAAAAAAAAD////7AAAAAA==".to_string()),
				_ => None,
			},
			latest_ledger: 11,
		})
	}

	async fn get_transaction(
		&self,
		_hash: &TransactionHash,
	) -> Result<TransactionStatus, LedgerError> {
		let call = self.count(|c| &mut c.get_transaction) as usize;
		if self.status_error {
			return Err(LedgerError::Network("connection reset".to_string()));
		}
		Ok(self
			.statuses
			.get(call - 1)
			.or_else(|| self.statuses.last())
			.cloned()
			.unwrap_or(TransactionStatus::NotFound))
	}
}

/// How the mock wallet answers signature requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignBehavior {
	Sign,
	Reject,
	/// The wallet session has expired.
	SessionExpired,
	/// Signs a transaction other than the one it was given.
	Tamper,
	/// Never answers.
	Hang,
}

#[derive(Default)]
struct SignerRecorder {
	calls: Mutex<u32>,
	options: Mutex<Vec<SignOptions>>,
}

#[derive(Clone)]
pub struct MockSigner {
	behavior: SignBehavior,
	recorder: Arc<SignerRecorder>,
}

impl MockSigner {
	pub fn new(behavior: SignBehavior) -> Self {
		Self {
			behavior,
			recorder: Arc::default(),
		}
	}

	pub fn service(&self) -> SignerService {
		SignerService::new(Box::new(self.clone()))
	}

	pub fn calls(&self) -> u32 {
		*self.recorder.calls.lock().unwrap()
	}

	pub fn options(&self) -> Vec<SignOptions> {
		self.recorder.options.lock().unwrap().clone()
	}
}

pub fn signature() -> DecoratedSignature {
	DecoratedSignature {
		hint: vec![0xde, 0xad, 0xbe, 0xef],
		signature: vec![0x42; 64],
	}
}

#[async_trait]
impl SignerInterface for MockSigner {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(NoSchema)
	}

	async fn public_key(&self) -> Result<AccountId, SignerError> {
		Ok(alice())
	}

	async fn sign_transaction(
		&self,
		envelope: &TransactionEnvelope,
		options: &SignOptions,
	) -> Result<TransactionEnvelope, SignerError> {
		*self.recorder.calls.lock().unwrap() += 1;
		self.recorder.options.lock().unwrap().push(options.clone());

		let (mut transaction, _) = envelope
			.decode()
			.map_err(|e| SignerError::InvalidResponse(e.to_string()))?;
		match self.behavior {
			SignBehavior::Sign => {}
			SignBehavior::Reject => {
				return Err(SignerError::Rejected("User declined access".to_string()))
			}
			SignBehavior::SessionExpired => {
				return Err(SignerError::SessionInvalid("session expired".to_string()))
			}
			SignBehavior::Tamper => transaction.fee = Fee::new(1),
			SignBehavior::Hang => std::future::pending::<()>().await,
		}
		TransactionEnvelope::encode(&transaction, &[signature()])
			.map_err(|e| SignerError::InvalidResponse(e.to_string()))
	}
}

/// Records requested delays and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
	sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
	pub fn sleeps(&self) -> Vec<Duration> {
		self.sleeps.lock().unwrap().clone()
	}
}

#[async_trait]
impl Sleeper for RecordingSleeper {
	async fn sleep(&self, duration: Duration) {
		self.sleeps.lock().unwrap().push(duration);
	}
}
