//! User-facing notifications that do not live in the state document.

use serde::Serialize;

/// Something the presentation layer should surface outside the normal
/// snapshot rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
	/// The server rejected a command. Meant to block until acknowledged.
	ServerError { message: String },
	/// The session is over; the presentation layer decides where to go next.
	SessionEnded { message: String },
}

impl Notice {
	pub fn message(&self) -> &str {
		match self {
			Notice::ServerError { message } | Notice::SessionEnded { message } => message,
		}
	}

	/// True for notices that need explicit acknowledgement.
	pub fn is_blocking(&self) -> bool {
		matches!(self, Notice::ServerError { .. })
	}
}
