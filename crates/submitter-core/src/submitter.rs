//! Transaction submission and read-only queries.

use crate::poller::{ConfirmationPoller, PollConfig, Sleeper};
use crate::SubmitterError;
use std::future::Future;
use std::sync::Arc;
use submitter_ledger::LedgerService;
use submitter_signer::{SignOptions, SignerService};
use submitter_types::{
	Account, AccountId, ConfirmationResult, ConfirmedTransaction, Fee, FromLedgerValue,
	LedgerValue, NetworkId, Operation, SequenceNumber, SignedTransaction, SimulationResponse,
	SubmissionReceipt, TransactionBuilder, TransactionEnvelope, TransactionHash,
	UnsignedTransaction,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Drives contract calls against a ledger node.
///
/// Writes go through fetch account, build, simulate, sign, send and poll.
/// Queries only build and simulate against a read-only account. Without a
/// signer the submitter can still query.
pub struct TransactionSubmitter {
	ledger: Arc<LedgerService>,
	signer: Option<Arc<SignerService>>,
	network: NetworkId,
	/// Source of read-only simulations. Never signs.
	read_only_account: AccountId,
	/// Inclusion fee ceiling for every transaction built here.
	fee: Fee,
	poller: ConfirmationPoller,
}

impl TransactionSubmitter {
	pub fn new(ledger: LedgerService, network: NetworkId, read_only_account: AccountId) -> Self {
		Self {
			ledger: Arc::new(ledger),
			signer: None,
			network,
			read_only_account,
			fee: Fee::DEFAULT,
			poller: ConfirmationPoller::new(PollConfig::default()),
		}
	}

	pub fn with_signer(mut self, signer: SignerService) -> Self {
		self.signer = Some(Arc::new(signer));
		self
	}

	pub fn with_fee(mut self, fee: Fee) -> Self {
		self.fee = fee;
		self
	}

	pub fn with_poll_config(mut self, config: PollConfig) -> Self {
		self.poller = ConfirmationPoller::new(config);
		self
	}

	pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
		self.poller = self.poller.with_sleeper(sleeper);
		self
	}

	pub fn network(&self) -> &NetworkId {
		&self.network
	}

	pub fn fee(&self) -> Fee {
		self.fee
	}

	pub fn ledger(&self) -> &LedgerService {
		&self.ledger
	}

	/// Account currently unlocked in the external signer.
	pub async fn signer_account(&self) -> Result<AccountId, SubmitterError> {
		let signer = self
			.signer
			.as_ref()
			.ok_or_else(|| SubmitterError::Config("no signer configured".to_string()))?;
		Ok(signer.public_key().await?)
	}

	/// Submits one operation signed by `account` and waits for the outcome.
	pub async fn submit(
		&self,
		operation: Operation,
		account: &AccountId,
		cancel: &CancellationToken,
	) -> Result<ConfirmedTransaction, SubmitterError> {
		self.submit_batch(vec![operation], account, cancel).await
	}

	/// Submits several operations as one transaction.
	#[instrument(skip_all, fields(account = %account, operations = operations.len()))]
	pub async fn submit_batch(
		&self,
		operations: Vec<Operation>,
		account: &AccountId,
		cancel: &CancellationToken,
	) -> Result<ConfirmedTransaction, SubmitterError> {
		let prepared = cancellable(cancel, self.prepare(operations, account)).await?;
		let signed = self.sign(&prepared, account, cancel).await?;
		// Once signed, the broadcast always completes so its hash reaches the
		// caller. A cancellation surfaces from polling, carrying that hash.
		let receipt = self.send(&signed).await?;
		self.wait_for_confirmation(&receipt.hash, cancel).await
	}

	/// Builds a transaction from `account`'s current sequence and merges in
	/// the simulated resources. Nothing is signed or sent.
	pub async fn prepare(
		&self,
		operations: Vec<Operation>,
		account: &AccountId,
	) -> Result<UnsignedTransaction, SubmitterError> {
		let source = self
			.ledger
			.get_account(account)
			.await
			.map_err(|source| SubmitterError::AccountFetch {
				account: account.clone(),
				source,
			})?;

		let transaction = TransactionBuilder::new(source, self.fee)
			.add_operations(operations)
			.build()?;

		match self.simulate(&transaction).await? {
			SimulationResponse::Success {
				resources: Some(resources),
				..
			} => {
				let prepared = transaction.prepare(resources)?;
				debug!(
					account = %account,
					sequence = %prepared.sequence,
					total_fee = %prepared.total_fee()?,
					"Transaction prepared"
				);
				Ok(prepared)
			}
			SimulationResponse::Success { resources: None, .. } => Err(SubmitterError::QueryFailed {
				message: "simulation returned no resource data".to_string(),
			}),
			SimulationResponse::Error { message } => Err(SubmitterError::QueryFailed { message }),
		}
	}

	/// Requests exactly one signature for `prepared` from the external signer.
	///
	/// No timeout applies; the wallet's user may take as long as they need.
	/// Only `cancel` aborts the wait.
	pub async fn sign(
		&self,
		prepared: &UnsignedTransaction,
		account: &AccountId,
		cancel: &CancellationToken,
	) -> Result<SignedTransaction, SubmitterError> {
		let signer = self
			.signer
			.as_ref()
			.ok_or_else(|| SubmitterError::Config("no signer configured".to_string()))?;

		let envelope = prepared.to_envelope()?;
		let options = SignOptions {
			network: self.network.clone(),
			account_to_sign: account.clone(),
		};

		let signed = cancellable(cancel, async {
			signer.sign(&envelope, &options).await.map_err(SubmitterError::from)
		})
		.await?;

		Ok(SignedTransaction::from_envelope(
			prepared,
			&signed,
			&self.network,
		)?)
	}

	/// Broadcasts a signed transaction. Only PENDING and DUPLICATE count as
	/// accepted.
	pub async fn send(&self, signed: &SignedTransaction) -> Result<SubmissionReceipt, SubmitterError> {
		let envelope = signed.to_envelope()?;
		debug!(
			tx_hash = %signed.hash()?.short(),
			source = %signed.transaction().source,
			sequence = %signed.transaction().sequence,
			"Broadcasting transaction"
		);
		let receipt = self.ledger.send(&envelope).await?;

		if !receipt.status.is_accepted() {
			warn!(
				tx_hash = %receipt.hash.short(),
				status = ?receipt.status,
				"Submission rejected"
			);
			return Err(SubmitterError::Submission {
				hash: receipt.hash,
				status: receipt.status,
				error_result: receipt.error_result,
			});
		}

		info!(
			tx_hash = %receipt.hash.short(),
			latest_ledger = receipt.latest_ledger,
			"Transaction submitted"
		);
		Ok(receipt)
	}

	/// Broadcasts an envelope signed elsewhere, e.g. by a wallet on a client
	/// that handed it to a backend.
	pub async fn send_envelope(
		&self,
		envelope: &TransactionEnvelope,
	) -> Result<SubmissionReceipt, SubmitterError> {
		let signed = SignedTransaction::decode(envelope, &self.network)?;
		self.send(&signed).await
	}

	/// Polls for the outcome of a submitted transaction. Safe to call again
	/// with the same hash after a timeout.
	pub async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		cancel: &CancellationToken,
	) -> Result<ConfirmedTransaction, SubmitterError> {
		Ok(self.confirm(hash, cancel).await?.into_result()?)
	}

	/// Like [`wait_for_confirmation`](Self::wait_for_confirmation) but
	/// returns every terminal outcome as a value.
	pub async fn confirm(
		&self,
		hash: &TransactionHash,
		cancel: &CancellationToken,
	) -> Result<ConfirmationResult, SubmitterError> {
		self.poller.poll(&self.ledger, hash, cancel).await
	}

	/// Simulates a read-only call and returns the contract's return value.
	///
	/// Runs against the read-only account at sequence 0: no account fetch,
	/// no signature, never broadcast.
	pub async fn query(&self, operation: Operation) -> Result<LedgerValue, SubmitterError> {
		let source = Account::new(self.read_only_account.clone(), SequenceNumber(0));
		let transaction = TransactionBuilder::new(source, self.fee)
			.add_operation(operation)
			.build()?;

		match self.simulate(&transaction).await? {
			SimulationResponse::Success {
				return_value: Some(value),
				latest_ledger,
				..
			} => {
				debug!(latest_ledger, kind = value.kind(), "Query returned");
				Ok(value)
			}
			SimulationResponse::Success {
				return_value: None, ..
			} => Err(SubmitterError::QueryFailed {
				message: "Query failed".to_string(),
			}),
			SimulationResponse::Error { message } => Err(SubmitterError::QueryFailed { message }),
		}
	}

	/// [`query`](Self::query) decoded into a domain value.
	pub async fn query_as<T: FromLedgerValue>(&self, operation: Operation) -> Result<T, SubmitterError> {
		let value = self.query(operation).await?;
		Ok(T::from_ledger_value(value)?)
	}

	async fn simulate(
		&self,
		transaction: &UnsignedTransaction,
	) -> Result<SimulationResponse, SubmitterError> {
		let envelope = transaction.to_envelope()?;
		let response = self.ledger.simulate(&envelope).await?;
		if let SimulationResponse::Error { message } = &response {
			warn!(source = %transaction.source, error = %message, "Simulation failed");
		}
		Ok(response)
	}
}

/// Runs `future` unless `cancel` fires first.
async fn cancellable<T, F>(cancel: &CancellationToken, future: F) -> Result<T, SubmitterError>
where
	F: Future<Output = Result<T, SubmitterError>>,
{
	tokio::select! {
		biased;
		_ = cancel.cancelled() => Err(SubmitterError::Cancelled { hash: None }),
		result = future => result,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::*;
	use std::time::Duration;
	use submitter_types::{
		ContractAddress, FailurePayload, SubmissionStatus, TransactionStatus,
	};

	fn operation() -> Operation {
		Operation::invoke(
			ContractAddress([9; 32]),
			"distribute_tokens",
			vec![
				LedgerValue::Address(ALICE.to_string()),
				LedgerValue::I128(1_000),
			],
		)
	}

	fn submitter(ledger: &MockLedger, signer: &MockSigner) -> TransactionSubmitter {
		TransactionSubmitter::new(ledger.service(), NetworkId::testnet(), read_only())
			.with_signer(signer.service())
			.with_sleeper(Arc::new(RecordingSleeper::default()))
	}

	fn success(ledger: u64) -> TransactionStatus {
		TransactionStatus::Success {
			ledger,
			return_value: Some(LedgerValue::Bool(true)),
		}
	}

	#[tokio::test]
	async fn test_submit_happy_path() {
		let ledger = MockLedger::new().with_statuses(vec![success(42)]);
		let signer = MockSigner::new(SignBehavior::Sign);

		let confirmed = submitter(&ledger, &signer)
			.submit(operation(), &alice(), &CancellationToken::new())
			.await
			.unwrap();

		assert_eq!(
			confirmed,
			ConfirmedTransaction {
				hash: MockLedger::submitted_hash(),
				ledger: 42,
				payload: Some(LedgerValue::Bool(true)),
			}
		);
		assert_eq!(
			ledger.counts(),
			CallCounts {
				get_account: 1,
				simulate: 1,
				send: 1,
				get_transaction: 1,
			}
		);
		assert_eq!(signer.calls(), 1);
		assert_eq!(
			signer.options(),
			vec![SignOptions {
				network: NetworkId::testnet(),
				account_to_sign: alice(),
			}]
		);

		// the broadcast transaction is the simulated one plus resources
		let simulated = ledger.simulated();
		let sent = ledger.sent();
		let (sent_tx, signatures) = sent[0].decode().unwrap();
		assert_eq!(signatures, vec![signature()]);
		assert_eq!(sent_tx.sequence, SequenceNumber(42));
		assert_eq!(sent_tx.resources, Some(resources()));
		assert_eq!(sent_tx.operations, simulated[0].operations);
	}

	#[tokio::test]
	async fn test_fee_string_preserved() {
		let ledger = MockLedger::new().with_statuses(vec![success(1)]);
		let signer = MockSigner::new(SignBehavior::Sign);
		let fee: Fee = "9007199254740993".parse().unwrap();

		submitter(&ledger, &signer)
			.with_fee(fee)
			.submit(operation(), &alice(), &CancellationToken::new())
			.await
			.unwrap();

		assert_eq!(ledger.simulated()[0].fee.to_string(), "9007199254740993");
		let (sent_tx, _) = ledger.sent()[0].decode().unwrap();
		assert_eq!(sent_tx.fee, fee);
		assert_eq!(sent_tx.total_fee().unwrap().to_string(), "9007199254792993");
	}

	#[tokio::test]
	async fn test_account_fetch_failure() {
		let ledger = MockLedger::new().with_missing_account();
		let signer = MockSigner::new(SignBehavior::Sign);

		let err = submitter(&ledger, &signer)
			.submit(operation(), &alice(), &CancellationToken::new())
			.await
			.unwrap_err();

		assert!(matches!(err, SubmitterError::AccountFetch { ref account, .. } if *account == alice()));
		assert_eq!(ledger.counts().get_account, 1);
		assert_eq!(ledger.counts().simulate, 0);
		assert_eq!(signer.calls(), 0);
	}

	#[tokio::test]
	async fn test_no_signature_after_simulation_error() {
		let ledger = MockLedger::new().with_simulation(SimulationResponse::Error {
			message: "HostError: Error(Contract, #107)".to_string(),
		});
		let signer = MockSigner::new(SignBehavior::Sign);

		let err = submitter(&ledger, &signer)
			.submit(operation(), &alice(), &CancellationToken::new())
			.await
			.unwrap_err();

		assert!(matches!(err, SubmitterError::QueryFailed { .. }));
		assert_eq!(
			err.contract_error().map(|e| e.to_string()),
			Some("Splitter Contract Error: Total shares must be equal to 100".to_string())
		);
		assert_eq!(signer.calls(), 0);
		assert_eq!(ledger.counts().send, 0);
	}

	#[tokio::test]
	async fn test_missing_resources_is_query_failure() {
		let ledger = MockLedger::new().with_simulation(SimulationResponse::Success {
			resources: None,
			return_value: None,
			latest_ledger: 3,
		});
		let signer = MockSigner::new(SignBehavior::Sign);

		let err = submitter(&ledger, &signer)
			.submit(operation(), &alice(), &CancellationToken::new())
			.await
			.unwrap_err();

		assert!(matches!(err, SubmitterError::QueryFailed { .. }));
		assert_eq!(signer.calls(), 0);
	}

	#[tokio::test]
	async fn test_signing_rejected() {
		let ledger = MockLedger::new();
		let signer = MockSigner::new(SignBehavior::Reject);

		let err = submitter(&ledger, &signer)
			.submit(operation(), &alice(), &CancellationToken::new())
			.await
			.unwrap_err();

		assert!(matches!(err, SubmitterError::SigningRejected(_)));
		assert_eq!(signer.calls(), 1);
		assert_eq!(ledger.counts().send, 0);
	}

	#[tokio::test]
	async fn test_expired_session_is_signing_rejection() {
		let ledger = MockLedger::new();
		let signer = MockSigner::new(SignBehavior::SessionExpired);

		let err = submitter(&ledger, &signer)
			.submit(operation(), &alice(), &CancellationToken::new())
			.await
			.unwrap_err();

		assert!(matches!(err, SubmitterError::SigningRejected(ref reason) if reason == "session expired"));
		assert_eq!(signer.calls(), 1);
		assert_eq!(ledger.counts().send, 0);
	}

	#[tokio::test]
	async fn test_tampered_signature_is_refused() {
		let ledger = MockLedger::new();
		let signer = MockSigner::new(SignBehavior::Tamper);

		let err = submitter(&ledger, &signer)
			.submit(operation(), &alice(), &CancellationToken::new())
			.await
			.unwrap_err();

		assert!(matches!(
			err,
			SubmitterError::Envelope(submitter_types::EnvelopeError::TransactionMismatch)
		));
		assert_eq!(ledger.counts().send, 0);
	}

	#[tokio::test]
	async fn test_submission_rejected() {
		let ledger = MockLedger::new().with_send_status(SubmissionStatus::Error);
		let signer = MockSigner::new(SignBehavior::Sign);

		let err = submitter(&ledger, &signer)
			.submit(operation(), &alice(), &CancellationToken::new())
			.await
			.unwrap_err();

		assert!(matches!(
			err,
			SubmitterError::Submission {
				status: SubmissionStatus::Error,
				error_result: Some(_),
				..
			}
		));
		assert_eq!(ledger.counts().get_transaction, 0);
	}

	#[tokio::test]
	async fn test_duplicate_submission_is_polled() {
		let ledger = MockLedger::new()
			.with_send_status(SubmissionStatus::Duplicate)
			.with_statuses(vec![TransactionStatus::NotFound, success(9)]);
		let signer = MockSigner::new(SignBehavior::Sign);

		let confirmed = submitter(&ledger, &signer)
			.submit(operation(), &alice(), &CancellationToken::new())
			.await
			.unwrap();

		assert_eq!(confirmed.ledger, 9);
		assert_eq!(ledger.counts().get_transaction, 2);
	}

	#[tokio::test]
	async fn test_submit_times_out_after_twenty_queries() {
		let ledger = MockLedger::new();
		let signer = MockSigner::new(SignBehavior::Sign);

		let err = submitter(&ledger, &signer)
			.submit(operation(), &alice(), &CancellationToken::new())
			.await
			.unwrap_err();

		assert!(matches!(
			err,
			SubmitterError::TransactionTimeout { ref hash, attempts: 20 } if *hash == MockLedger::submitted_hash()
		));
		assert_eq!(ledger.counts().get_transaction, 20);
		assert_eq!(signer.calls(), 1);
	}

	#[tokio::test]
	async fn test_submit_failed_transaction() {
		let payload = FailurePayload {
			result_xdr: "AAAAAAAAAGT////9AAAAAA==".to_string(),
			diagnostic: Some("Error(Contract, #113)".to_string()),
		};
		let ledger = MockLedger::new().with_statuses(vec![
			TransactionStatus::NotFound,
			TransactionStatus::Failed {
				ledger: 50,
				payload: payload.clone(),
			},
		]);
		let signer = MockSigner::new(SignBehavior::Sign);

		let err = submitter(&ledger, &signer)
			.submit(operation(), &alice(), &CancellationToken::new())
			.await
			.unwrap_err();

		match &err {
			SubmitterError::TransactionFailed { payload: got, .. } => assert_eq!(got, &payload),
			other => panic!("unexpected error: {:?}", other),
		}
		assert_eq!(err.contract_error().map(|e| e.code), Some(113));
		assert_eq!(ledger.counts().get_transaction, 2);
	}

	#[tokio::test]
	async fn test_submit_batch_builds_one_transaction() {
		let ledger = MockLedger::new().with_statuses(vec![success(3)]);
		let signer = MockSigner::new(SignBehavior::Sign);
		let second = Operation::invoke(ContractAddress([9; 32]), "lock_shares", vec![]);

		submitter(&ledger, &signer)
			.submit_batch(
				vec![operation(), second.clone()],
				&alice(),
				&CancellationToken::new(),
			)
			.await
			.unwrap();

		let (sent_tx, _) = ledger.sent()[0].decode().unwrap();
		assert_eq!(sent_tx.operations, vec![operation(), second]);
		assert_eq!(signer.calls(), 1);
		assert_eq!(ledger.counts().send, 1);
	}

	#[tokio::test]
	async fn test_empty_batch_is_rejected() {
		let ledger = MockLedger::new();
		let signer = MockSigner::new(SignBehavior::Sign);

		let err = submitter(&ledger, &signer)
			.submit_batch(vec![], &alice(), &CancellationToken::new())
			.await
			.unwrap_err();

		assert!(matches!(
			err,
			SubmitterError::Build(submitter_types::BuildError::NoOperations)
		));
		assert_eq!(ledger.counts().simulate, 0);
	}

	#[tokio::test(start_paused = true)]
	async fn test_cancel_while_waiting_for_signature() {
		let ledger = MockLedger::new();
		let signer = MockSigner::new(SignBehavior::Hang);
		let cancel = CancellationToken::new();

		let trigger = cancel.clone();
		tokio::spawn(async move {
			tokio::time::sleep(Duration::from_secs(600)).await;
			trigger.cancel();
		});

		let err = submitter(&ledger, &signer)
			.submit(operation(), &alice(), &cancel)
			.await
			.unwrap_err();

		assert!(matches!(err, SubmitterError::Cancelled { hash: None }));
		assert_eq!(signer.calls(), 1);
		assert_eq!(ledger.counts().send, 0);
	}

	#[tokio::test(start_paused = true)]
	async fn test_cancel_during_broadcast_keeps_hash() {
		let ledger = MockLedger::new().with_slow_send(Duration::from_secs(5));
		let signer = MockSigner::new(SignBehavior::Sign);
		let cancel = CancellationToken::new();

		let trigger = cancel.clone();
		tokio::spawn(async move {
			tokio::time::sleep(Duration::from_secs(1)).await;
			trigger.cancel();
		});

		let submitter = submitter(&ledger, &signer);
		let err = submitter
			.submit(operation(), &alice(), &cancel)
			.await
			.unwrap_err();

		let hash = match err {
			SubmitterError::Cancelled { hash: Some(hash) } => hash,
			other => panic!("unexpected error: {:?}", other),
		};
		assert_eq!(hash, MockLedger::submitted_hash());
		assert_eq!(ledger.counts().send, 1);
		assert_eq!(ledger.counts().get_transaction, 0);

		// the caller picks up polling with the hash it was handed
		let result = submitter
			.confirm(&hash, &CancellationToken::new())
			.await
			.unwrap();
		assert!(matches!(result, ConfirmationResult::TimedOut { attempts: 20, .. }));
		assert_eq!(ledger.counts().get_transaction, 20);
	}

	#[tokio::test]
	async fn test_split_flow_with_external_envelope() {
		let ledger = MockLedger::new().with_statuses(vec![success(8)]);
		let signer = MockSigner::new(SignBehavior::Sign);
		let submitter = submitter(&ledger, &signer);
		let cancel = CancellationToken::new();

		let prepared = submitter
			.prepare(vec![operation()], &alice())
			.await
			.unwrap();
		assert!(prepared.is_prepared());

		// a client signs and hands back the envelope
		let signed = TransactionEnvelope::encode(&prepared, &[signature()]).unwrap();
		assert!(submitter_types::verify_source_account(&signed, &alice()).unwrap());

		let receipt = submitter.send_envelope(&signed).await.unwrap();
		let confirmed = submitter
			.wait_for_confirmation(&receipt.hash, &cancel)
			.await
			.unwrap();
		assert_eq!(confirmed.ledger, 8);
		assert_eq!(signer.calls(), 0);
	}

	#[tokio::test]
	async fn test_unsigned_envelope_is_not_sent() {
		let ledger = MockLedger::new();
		let signer = MockSigner::new(SignBehavior::Sign);
		let submitter = submitter(&ledger, &signer);

		let prepared = submitter
			.prepare(vec![operation()], &alice())
			.await
			.unwrap();
		let err = submitter
			.send_envelope(&prepared.to_envelope().unwrap())
			.await
			.unwrap_err();

		assert!(matches!(
			err,
			SubmitterError::Envelope(submitter_types::EnvelopeError::Unsigned)
		));
		assert_eq!(ledger.counts().send, 0);
	}

	#[tokio::test]
	async fn test_query_never_submits() {
		let ledger = MockLedger::new();
		let signer = MockSigner::new(SignBehavior::Sign);

		let value = submitter(&ledger, &signer)
			.query(operation())
			.await
			.unwrap();

		assert_eq!(value, LedgerValue::U32(1));
		assert_eq!(
			ledger.counts(),
			CallCounts {
				get_account: 0,
				simulate: 1,
				send: 0,
				get_transaction: 0,
			}
		);
		assert_eq!(signer.calls(), 0);

		let simulated = ledger.simulated();
		assert_eq!(simulated[0].source, read_only());
		assert_eq!(simulated[0].sequence, SequenceNumber(1));
	}

	#[tokio::test]
	async fn test_query_without_signer() {
		let ledger = MockLedger::new();
		let submitter =
			TransactionSubmitter::new(ledger.service(), NetworkId::futurenet(), read_only());

		let shares: u32 = submitter.query_as(operation()).await.unwrap();
		assert_eq!(shares, 1);

		let err = submitter
			.submit(operation(), &alice(), &CancellationToken::new())
			.await
			.unwrap_err();
		assert!(matches!(err, SubmitterError::Config(_)));
		assert_eq!(ledger.counts().send, 0);
	}

	#[tokio::test]
	async fn test_query_failures() {
		let ledger = MockLedger::new().with_simulation(SimulationResponse::Error {
			message: "HostError: Error(Contract, #201)".to_string(),
		});
		let signer = MockSigner::new(SignBehavior::Sign);
		let err = submitter(&ledger, &signer)
			.query(operation())
			.await
			.unwrap_err();
		assert!(matches!(err, SubmitterError::QueryFailed { .. }));
		assert_eq!(err.contract_error().map(|e| e.code), Some(201));

		let ledger = MockLedger::new().with_simulation(SimulationResponse::Success {
			resources: None,
			return_value: None,
			latest_ledger: 1,
		});
		let err = submitter(&ledger, &signer)
			.query(operation())
			.await
			.unwrap_err();
		assert!(matches!(err, SubmitterError::QueryFailed { ref message } if message == "Query failed"));

		let ledger = MockLedger::new();
		let err = submitter(&ledger, &signer)
			.query_as::<bool>(operation())
			.await
			.unwrap_err();
		assert!(matches!(err, SubmitterError::Decode(_)));
	}
}
