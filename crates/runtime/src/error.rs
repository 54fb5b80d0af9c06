//! Error types for the session runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a session server.
#[derive(Debug, Error)]
pub enum Error {
	/// The websocket handshake with the server failed.
	#[error("Failed to connect to session server at {url}: {reason}")]
	ConnectionFailed { url: String, reason: String },

	/// Transport-level error on an established connection.
	#[error("Transport error: {0}")]
	TransportError(String),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Returns true if the error happened before a connection was established.
	pub fn is_connect_failure(&self) -> bool {
		matches!(self, Error::ConnectionFailed { .. })
	}
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
	fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
		Error::TransportError(err.to_string())
	}
}
