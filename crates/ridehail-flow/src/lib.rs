//! Ride lifecycle orchestration module for the ridehail client.
//!
//! This module walks a ride through the fixed
//! request -> accept -> complete pipeline against the deployed contract:
//! it resolves the three actors, optionally funds the test actors,
//! mints and registers a driver capability, then threads the ride
//! identifier extracted from the request transaction's events through
//! the accept and end steps. Every step blocks on the prior step's
//! remote confirmation; any failure aborts the remaining steps.

use ridehail_account::{AccountError, Actor, ActorRole};
use ridehail_config::{Config, ContractConfig, FlowConfig, KeyMaterialConfig};
use ridehail_ledger::{LedgerError, LedgerService};
use ridehail_types::{
	truncate_id, Address, EventError, Transaction, TransactionDigest, TransactionResult,
};
use std::fmt;
use thiserror::Error;

/// Event payloads emitted by the ride contract.
pub mod events;
/// Per-entrypoint transaction constructors.
pub mod tx;

pub use events::{RideRequestEvent, RIDE_REQUEST_EVENT};

/// Errors that can occur while driving the ride lifecycle.
#[derive(Debug, Error)]
pub enum FlowError {
	/// Error that occurs while resolving actor key material.
	#[error("Account error: {0}")]
	Account(#[from] AccountError),
	/// Error that occurs while submitting a transaction to the node.
	#[error("Ledger error: {0}")]
	Ledger(#[from] LedgerError),
	/// Error that occurs when an expected event is missing or malformed.
	#[error("Event error: {0}")]
	Event(#[from] EventError),
	/// Error that occurs when the extracted ride identifier is unusable.
	#[error("Invalid ride identifier {value:?}: {reason}")]
	InvalidRideId {
		/// The raw identifier carried by the event payload.
		value: String,
		/// Why it could not be used.
		reason: String,
	},
}

/// Lifecycle states of a ride, observed through confirmed submissions.
///
/// The client tracks the state for reporting only; transition rules are
/// enforced remotely by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RideState {
	/// No ride-specific transaction has been confirmed yet.
	Created,
	/// The ride request was confirmed and a ride identifier extracted.
	Requested,
	/// The driver's accept transaction was confirmed.
	Accepted,
	/// The driver's end transaction was confirmed.
	Completed,
}

impl fmt::Display for RideState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			RideState::Created => "created",
			RideState::Requested => "requested",
			RideState::Accepted => "accepted",
			RideState::Completed => "completed",
		};
		write!(f, "{}", name)
	}
}

/// One confirmed flow step and the digest of its transaction.
#[derive(Debug, Clone)]
pub struct StepRecord {
	/// Name of the step, matching the entrypoint it invoked.
	pub name: &'static str,
	/// Digest the node assigned to the confirmed transaction.
	pub digest: TransactionDigest,
}

/// Outcome of one completed lifecycle run.
#[derive(Debug, Clone)]
pub struct RideSummary {
	/// Identifier of the ride the run created and completed.
	pub ride_id: Address,
	/// Confirmed steps in submission order.
	pub steps: Vec<StepRecord>,
	/// Final ride state reached by the run.
	pub final_state: RideState,
}

/// Resolves one actor from its configured key material.
fn resolve_actor(role: ActorRole, material: &KeyMaterialConfig) -> Result<Actor, AccountError> {
	Actor::resolve(role, material.mnemonic.as_ref(), material.secret_key.as_ref())
}

/// Orchestrator for one unattended run of the ride lifecycle.
///
/// Steps are strictly sequential: accept and end both need the ride
/// identifier obtained at request time, and the shared storage object
/// is versioned per confirmed transaction, so nothing can be submitted
/// speculatively.
pub struct RideFlow {
	/// Ledger service used to sign and submit every transaction.
	ledger: LedgerService,
	/// Deployed contract and well-known object addresses.
	contract: ContractConfig,
	/// Distances, funding amount, and funding switch for this run.
	params: FlowConfig,
	/// Actor holding the admin capability.
	admin: Actor,
	/// Actor requesting the ride.
	rider: Actor,
	/// Actor accepting and completing the ride.
	driver: Actor,
	/// Current lifecycle state.
	state: RideState,
}

impl RideFlow {
	/// Creates a flow over the given ledger service, resolving the
	/// three actors from configuration.
	///
	/// Actors with no configured key material get a freshly generated
	/// ephemeral keypair for the run.
	pub fn new(ledger: LedgerService, config: &Config) -> Result<Self, FlowError> {
		let admin = resolve_actor(ActorRole::Admin, &config.actors.admin)?;
		let rider = resolve_actor(ActorRole::Rider, &config.actors.rider)?;
		let driver = resolve_actor(ActorRole::Driver, &config.actors.driver)?;
		tracing::info!(
			admin = %admin.address(),
			rider = %rider.address(),
			driver = %driver.address(),
			"Resolved actors"
		);

		Ok(Self {
			ledger,
			contract: config.contract.clone(),
			params: config.flow.clone(),
			admin,
			rider,
			driver,
			state: RideState::Created,
		})
	}

	/// Runs the full lifecycle once, consuming the flow.
	///
	/// Pipeline: fund rider and driver (when enabled), mint and
	/// register the driver capability, request the ride, extract the
	/// ride identifier from the request's own events, accept, end.
	/// The first failure aborts all remaining steps.
	pub async fn run(mut self) -> Result<RideSummary, FlowError> {
		let mut steps = Vec::new();
		tracing::info!(state = %self.state, "Starting ride lifecycle");

		if self.params.fund_actors {
			let amount = self.params.funding_amount;
			let fund_rider = tx::fund(self.admin.address(), self.rider.address(), amount);
			self.submit_step(&mut steps, "fund_rider", fund_rider, &self.admin)
				.await?;
			let fund_driver = tx::fund(self.admin.address(), self.driver.address(), amount);
			self.submit_step(&mut steps, "fund_driver", fund_driver, &self.admin)
				.await?;
		}

		let mint = tx::create_driver(&self.contract, self.admin.address());
		self.submit_step(&mut steps, "create_driver", mint, &self.admin)
			.await?;

		let register = tx::send_driver_cap(&self.contract, self.admin.address());
		self.submit_step(&mut steps, "send_driver_cap", register, &self.admin)
			.await?;

		let request = tx::request_ride(
			&self.contract,
			self.rider.address(),
			self.params.estimate_distance,
		);
		let result = self
			.submit_step(&mut steps, "request_ride", request, &self.rider)
			.await?;
		let ride_id = self.extract_ride_id(&result)?;
		self.state = RideState::Requested;
		tracing::info!(
			ride_id = %truncate_id(&ride_id.to_string()),
			state = %self.state,
			"Ride requested"
		);

		let accept = tx::accept_ride(&self.contract, self.driver.address(), ride_id);
		self.submit_step(&mut steps, "accept_ride", accept, &self.driver)
			.await?;
		self.state = RideState::Accepted;
		tracing::info!(
			ride_id = %truncate_id(&ride_id.to_string()),
			state = %self.state,
			"Ride accepted"
		);

		let end = tx::end_ride(
			&self.contract,
			self.driver.address(),
			ride_id,
			self.params.actual_distance,
		);
		self.submit_step(&mut steps, "end_ride", end, &self.driver)
			.await?;
		self.state = RideState::Completed;
		tracing::info!(
			ride_id = %truncate_id(&ride_id.to_string()),
			state = %self.state,
			"Ride completed"
		);

		Ok(RideSummary {
			ride_id,
			steps,
			final_state: self.state,
		})
	}

	/// Signs, submits, and records one flow step.
	async fn submit_step(
		&self,
		steps: &mut Vec<StepRecord>,
		name: &'static str,
		tx: Transaction,
		signer: &Actor,
	) -> Result<TransactionResult, FlowError> {
		tracing::info!(step = name, signer = %signer.role(), "Submitting transaction");
		let result = self.ledger.execute(&tx, signer).await.map_err(|e| {
			tracing::error!(step = name, error = %e, "Step failed, aborting flow");
			e
		})?;
		tracing::info!(
			step = name,
			digest = %truncate_id(&result.digest.0),
			"Confirmed"
		);
		steps.push(StepRecord {
			name,
			digest: result.digest.clone(),
		});
		Ok(result)
	}

	/// Pulls the ride identifier out of the request transaction's own
	/// event list.
	///
	/// Scoped to that transaction's result, so concurrent external
	/// activity on the ledger can never be mistaken for this run's
	/// ride.
	fn extract_ride_id(&self, result: &TransactionResult) -> Result<Address, FlowError> {
		let event_type = events::ride_request_event_type(&self.contract.package_id);
		let payload: RideRequestEvent = result.extract_event(&event_type)?;
		payload
			.ride_adr
			.trim()
			.parse::<Address>()
			.map_err(|e| FlowError::InvalidRideId {
				value: payload.ride_adr.clone(),
				reason: e.to_string(),
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use base64::{engine::general_purpose::STANDARD, Engine as _};
	use ridehail_account::Keypair;
	use ridehail_config::{ActorsConfig, LedgerConfig};
	use ridehail_ledger::{LedgerInterface, RetryPolicy};
	use ridehail_types::{
		CallArg, EventRecord, ExecutionStatus, SecretString, SignedTransaction,
		TransactionEffects, TransactionKind,
	};
	use serde_json::json;
	use std::collections::VecDeque;
	use std::sync::{Arc, Mutex};
	use std::time::Duration;

	const ADMIN_PHRASE: &str =
		"gravity machine north sort system female filter attitude volume fold club stay";
	const RIDER_PHRASE: &str =
		"cycle lunar aware mention vivid identify velvet sun cluster tortoise beach surge";
	const DRIVER_PHRASE: &str =
		"robot silent giggle slender carpet digital kangaroo glory panel dolphin mosquito craft";

	struct ScriptedLedger {
		responses: Mutex<VecDeque<Result<TransactionResult, LedgerError>>>,
		submissions: Arc<Mutex<Vec<SignedTransaction>>>,
	}

	impl ScriptedLedger {
		fn new(responses: Vec<Result<TransactionResult, LedgerError>>) -> Self {
			Self {
				responses: Mutex::new(responses.into()),
				submissions: Arc::new(Mutex::new(Vec::new())),
			}
		}

		fn submissions(&self) -> Arc<Mutex<Vec<SignedTransaction>>> {
			self.submissions.clone()
		}
	}

	#[async_trait]
	impl LedgerInterface for ScriptedLedger {
		async fn submit_transaction(
			&self,
			tx: &SignedTransaction,
		) -> Result<TransactionResult, LedgerError> {
			self.submissions.lock().unwrap().push(tx.clone());
			self.responses
				.lock()
				.unwrap()
				.pop_front()
				.expect("script exhausted")
		}
	}

	fn test_contract() -> ContractConfig {
		ContractConfig {
			package_id: "0x2".parse().unwrap(),
			ride_storage: "0x11".parse().unwrap(),
			admin_cap: "0x12".parse().unwrap(),
			driver_cap: "0x13".parse().unwrap(),
			driver_address: "0x14".parse().unwrap(),
		}
	}

	fn test_config() -> Config {
		Config {
			ledger: LedgerConfig {
				rpc_url: "http://127.0.0.1:9000".to_string(),
				request_timeout_secs: 30,
				max_attempts: 1,
				retry_delay_ms: 1,
			},
			contract: test_contract(),
			actors: ActorsConfig {
				admin: material(ADMIN_PHRASE),
				rider: material(RIDER_PHRASE),
				driver: material(DRIVER_PHRASE),
			},
			flow: FlowConfig::default(),
		}
	}

	fn material(phrase: &str) -> KeyMaterialConfig {
		KeyMaterialConfig {
			mnemonic: Some(SecretString::from(phrase)),
			secret_key: None,
		}
	}

	fn address_of(phrase: &str) -> Address {
		Keypair::from_mnemonic(phrase).unwrap().address()
	}

	fn success(digest: &str) -> Result<TransactionResult, LedgerError> {
		Ok(TransactionResult {
			digest: TransactionDigest(digest.to_string()),
			effects: TransactionEffects {
				status: ExecutionStatus::Success,
			},
			events: Vec::new(),
		})
	}

	fn request_success(
		digest: &str,
		contract: &ContractConfig,
		ride_adr: &str,
	) -> Result<TransactionResult, LedgerError> {
		Ok(TransactionResult {
			digest: TransactionDigest(digest.to_string()),
			effects: TransactionEffects {
				status: ExecutionStatus::Success,
			},
			events: vec![EventRecord {
				event_type: events::ride_request_event_type(&contract.package_id),
				payload: json!({ "ride_adr": ride_adr }),
			}],
		})
	}

	fn onchain_failure(digest: &str, error: &str) -> Result<TransactionResult, LedgerError> {
		Ok(TransactionResult {
			digest: TransactionDigest(digest.to_string()),
			effects: TransactionEffects {
				status: ExecutionStatus::Failure {
					error: error.to_string(),
				},
			},
			events: Vec::new(),
		})
	}

	fn service(scripted: ScriptedLedger) -> LedgerService {
		LedgerService::new(
			Box::new(scripted),
			RetryPolicy::new(1, Duration::from_millis(1)),
		)
	}

	fn decode(submission: &SignedTransaction) -> Transaction {
		let bytes = STANDARD.decode(&submission.tx_bytes).unwrap();
		serde_json::from_slice(&bytes).unwrap()
	}

	fn call_function(tx: &Transaction) -> &str {
		match &tx.kind {
			TransactionKind::Call { target, .. } => &target.function,
			TransactionKind::Transfer { .. } => panic!("expected a call transaction"),
		}
	}

	fn call_arguments(tx: &Transaction) -> &[CallArg] {
		match &tx.kind {
			TransactionKind::Call { arguments, .. } => arguments,
			TransactionKind::Transfer { .. } => panic!("expected a call transaction"),
		}
	}

	#[tokio::test]
	async fn test_full_lifecycle_happy_path() {
		let config = test_config();
		let contract = config.contract.clone();
		let scripted = ScriptedLedger::new(vec![
			success("d-fund-rider"),
			success("d-fund-driver"),
			success("d-create"),
			success("d-send"),
			request_success("d-request", &contract, "0x51de"),
			success("d-accept"),
			success("d-end"),
		]);
		let submissions = scripted.submissions();
		let flow = RideFlow::new(service(scripted), &config).unwrap();

		let summary = flow.run().await.unwrap();

		let expected_ride_id: Address = "0x51de".parse().unwrap();
		assert_eq!(summary.final_state, RideState::Completed);
		assert_eq!(summary.ride_id, expected_ride_id);
		assert_eq!(
			summary.steps.iter().map(|s| s.name).collect::<Vec<_>>(),
			vec![
				"fund_rider",
				"fund_driver",
				"create_driver",
				"send_driver_cap",
				"request_ride",
				"accept_ride",
				"end_ride",
			]
		);

		let submitted: Vec<Transaction> = submissions.lock().unwrap().iter().map(decode).collect();
		assert_eq!(submitted.len(), 7);

		// Funding precedes every ride-specific transaction.
		assert_eq!(
			submitted[0].kind,
			TransactionKind::Transfer {
				recipient: address_of(RIDER_PHRASE),
				amount: 2_000_000_000,
			}
		);
		assert_eq!(
			submitted[1].kind,
			TransactionKind::Transfer {
				recipient: address_of(DRIVER_PHRASE),
				amount: 2_000_000_000,
			}
		);

		// Admin signs setup, rider requests, driver accepts and ends.
		for tx in &submitted[..4] {
			assert_eq!(tx.sender, address_of(ADMIN_PHRASE));
		}
		assert_eq!(submitted[4].sender, address_of(RIDER_PHRASE));
		assert_eq!(submitted[5].sender, address_of(DRIVER_PHRASE));
		assert_eq!(submitted[6].sender, address_of(DRIVER_PHRASE));

		// The request carries the estimate; accept and end carry the
		// ride identifier captured at request time.
		assert_eq!(call_function(&submitted[4]), "request_ride");
		assert_eq!(
			call_arguments(&submitted[4])[1],
			CallArg::pure_u64(10),
		);
		assert_eq!(call_function(&submitted[5]), "accept_ride");
		assert_eq!(
			call_arguments(&submitted[5])[1],
			CallArg::pure_address(expected_ride_id),
		);
		assert_eq!(call_function(&submitted[6]), "end_ride");
		assert_eq!(
			call_arguments(&submitted[6]),
			&[
				CallArg::object(contract.ride_storage),
				CallArg::pure_address(expected_ride_id),
				CallArg::pure_u64(10),
			]
		);
	}

	#[tokio::test]
	async fn test_missing_request_event_aborts_flow() {
		let config = test_config();
		let scripted = ScriptedLedger::new(vec![
			success("d-fund-rider"),
			success("d-fund-driver"),
			success("d-create"),
			success("d-send"),
			success("d-request"),
		]);
		let submissions = scripted.submissions();
		let flow = RideFlow::new(service(scripted), &config).unwrap();

		let err = flow.run().await.unwrap_err();
		assert!(matches!(err, FlowError::Event(EventError::NotFound(_))));

		// Neither accept nor end was ever submitted.
		let submitted = submissions.lock().unwrap();
		assert_eq!(submitted.len(), 5);
		assert_eq!(call_function(&decode(submitted.last().unwrap())), "request_ride");
	}

	#[tokio::test]
	async fn test_empty_ride_id_aborts_flow() {
		let config = test_config();
		let contract = config.contract.clone();
		let scripted = ScriptedLedger::new(vec![
			success("d-fund-rider"),
			success("d-fund-driver"),
			success("d-create"),
			success("d-send"),
			request_success("d-request", &contract, ""),
		]);
		let submissions = scripted.submissions();
		let flow = RideFlow::new(service(scripted), &config).unwrap();

		let err = flow.run().await.unwrap_err();
		assert!(matches!(err, FlowError::InvalidRideId { .. }));
		assert_eq!(submissions.lock().unwrap().len(), 5);
	}

	#[tokio::test]
	async fn test_funding_skipped_when_disabled() {
		let mut config = test_config();
		config.flow.fund_actors = false;
		let contract = config.contract.clone();
		let scripted = ScriptedLedger::new(vec![
			success("d-create"),
			success("d-send"),
			request_success("d-request", &contract, "0x51de"),
			success("d-accept"),
			success("d-end"),
		]);
		let submissions = scripted.submissions();
		let flow = RideFlow::new(service(scripted), &config).unwrap();

		let summary = flow.run().await.unwrap();
		assert_eq!(summary.final_state, RideState::Completed);
		assert_eq!(summary.steps[0].name, "create_driver");

		let submitted: Vec<Transaction> = submissions.lock().unwrap().iter().map(decode).collect();
		assert_eq!(submitted.len(), 5);
		assert_eq!(call_function(&submitted[0]), "create_driver");
	}

	#[tokio::test]
	async fn test_end_ride_failure_surfaces_execution_error() {
		let config = test_config();
		let contract = config.contract.clone();
		let scripted = ScriptedLedger::new(vec![
			success("d-fund-rider"),
			success("d-fund-driver"),
			success("d-create"),
			success("d-send"),
			request_success("d-request", &contract, "0x51de"),
			success("d-accept"),
			onchain_failure("d-end", "MoveAbort: ride already completed"),
		]);
		let flow = RideFlow::new(service(scripted), &config).unwrap();

		let err = flow.run().await.unwrap_err();
		assert!(matches!(err, FlowError::Ledger(LedgerError::Execution(_))));
		assert!(err.to_string().contains("ride already completed"));
	}

	#[tokio::test]
	async fn test_configured_distances_are_threaded() {
		let mut config = test_config();
		config.flow.estimate_distance = 25;
		config.flow.actual_distance = 40;
		let contract = config.contract.clone();
		let scripted = ScriptedLedger::new(vec![
			success("d-fund-rider"),
			success("d-fund-driver"),
			success("d-create"),
			success("d-send"),
			request_success("d-request", &contract, "0x51de"),
			success("d-accept"),
			success("d-end"),
		]);
		let submissions = scripted.submissions();
		let flow = RideFlow::new(service(scripted), &config).unwrap();

		flow.run().await.unwrap();

		let submitted: Vec<Transaction> = submissions.lock().unwrap().iter().map(decode).collect();
		assert_eq!(call_arguments(&submitted[4])[1], CallArg::pure_u64(25));
		assert_eq!(call_arguments(&submitted[6])[2], CallArg::pure_u64(40));
	}
}
