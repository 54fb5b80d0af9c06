use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Runtime(#[from] tale_runtime::Error),

	/// An inbound payload could not be decoded into a server event.
	#[error("Failed to decode server event: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("Timeout: {0}")]
	Timeout(String),

	/// The session was dropped while a caller was waiting on it.
	#[error("Channel closed unexpectedly")]
	ChannelClosed,
}

impl Error {
	/// True when the session never got a connection in the first place.
	pub fn is_connect_failure(&self) -> bool {
		matches!(self, Error::Runtime(err) if err.is_connect_failure())
	}
}
