//! Enumerations shared between the service and the storage rows, with
//! explicit parsing from the free-form strings the HTTP surface accepts.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
	Query,
	Info,
}
impl EntryKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Query => "query",
			Self::Info => "info",
		}
	}

	/// Case-insensitive parse. The error carries the rejected value so the
	/// caller can surface it verbatim.
	pub fn parse(raw: &str) -> Result<Self, String> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"query" => Ok(Self::Query),
			"info" => Ok(Self::Info),
			_ => Err(raw.to_string()),
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
	Initial,
	Supervisor,
}
impl EntrySource {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Initial => "initial",
			Self::Supervisor => "supervisor",
		}
	}

	pub fn parse(raw: &str) -> Result<Self, String> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"initial" => Ok(Self::Initial),
			"supervisor" => Ok(Self::Supervisor),
			_ => Err(raw.to_string()),
		}
	}
}

/// Escalation state machine. `Pending` may transition to either terminal
/// state; nothing transitions out of a terminal state.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
	Pending,
	Resolved,
	Unresolved,
}
impl RequestStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Pending => "pending",
			Self::Resolved => "resolved",
			Self::Unresolved => "unresolved",
		}
	}

	pub fn parse(raw: &str) -> Result<Self, String> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"pending" => Ok(Self::Pending),
			"resolved" => Ok(Self::Resolved),
			"unresolved" => Ok(Self::Unresolved),
			_ => Err(raw.to_string()),
		}
	}

	pub fn is_terminal(&self) -> bool {
		!matches!(self, Self::Pending)
	}

	pub fn can_become(&self, next: Self) -> bool {
		matches!((self, next), (Self::Pending, Self::Resolved) | (Self::Pending, Self::Unresolved))
	}
}
