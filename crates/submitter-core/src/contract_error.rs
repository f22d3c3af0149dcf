//! Decoding of contract error codes carried in node error text.
//!
//! Contracts abort with `Error(Contract, #N)`. Codes below 200 come from the
//! splitter contract, codes from 200 up from the diversifier contract.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Contract family a code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
	Splitter,
	Diversifier,
}

impl ContractKind {
	fn for_code(code: u32) -> Self {
		if code < 200 {
			ContractKind::Splitter
		} else {
			ContractKind::Diversifier
		}
	}

	fn prefix(&self) -> &'static str {
		match self {
			ContractKind::Splitter => "Splitter Contract Error:",
			ContractKind::Diversifier => "Diversifier Contract Error:",
		}
	}
}

/// A contract error code with its user-facing description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractError {
	pub code: u32,
	pub kind: ContractKind,
}

impl ContractError {
	pub fn from_code(code: u32) -> Self {
		Self {
			code,
			kind: ContractKind::for_code(code),
		}
	}

	/// Extracts the first `Error(Contract, #N)` code from `text`.
	pub fn from_message(text: &str) -> Option<Self> {
		static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
		let pattern = PATTERN
			.get_or_init(|| Regex::new(r"Error\(Contract, #(\d+)\)").ok())
			.as_ref()?;

		let code = pattern.captures(text)?.get(1)?.as_str().parse().ok()?;
		Some(Self::from_code(code))
	}

	/// Description of the code; `None` for codes the catalog does not know.
	pub fn description(&self) -> Option<&'static str> {
		let description = match self.code {
			101 => "Contract not initialized",
			102 => "Contract is already initialized",
			103 => "Unauthorized access",
			104 => "Shareholders & shares are locked for this contract",
			105 => "Total amount of shares must be at least 2",
			106 => "Cannot add contract address as a shareholder",
			107 => "Total shares must be equal to 100",
			108 => "Insufficient token balance",
			109 => "Transfer amount must be greater than 0",
			110 => "Transfer amount exceeds balance",
			111 => "Transfer amount exceeds unused balance",
			112 => "Withdrawal amount must be greater than 0",
			113 => "Withdrawal amount exceeds allocation",
			114 => "Token is not whitelisted",
			201 => "Contract is not initialized",
			202 => "Diversifier is not active",
			203 => "Method not allowed",
			204 => "Invalid swap path",
			205 => "Invalid swap token",
			206 => "Insufficient token balance",
			_ => return None,
		};
		Some(description)
	}
}

impl fmt::Display for ContractError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.description() {
			Some(description) => write!(f, "{} {}", self.kind.prefix(), description),
			None => write!(f, "{} unknown error #{}", self.kind.prefix(), self.code),
		}
	}
}
