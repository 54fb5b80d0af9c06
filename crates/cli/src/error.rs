use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	/// A line typed at the play prompt could not be understood.
	#[error("{0}")]
	Input(String),

	#[error("could not read {path}")]
	ReadLog {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Session(#[from] tale::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl CliError {
	pub fn input(message: impl Into<String>) -> Self {
		Self::Input(message.into())
	}

	/// Errors the play loop reports and then keeps going.
	pub fn is_recoverable(&self) -> bool {
		matches!(self, CliError::Input(_))
	}
}
