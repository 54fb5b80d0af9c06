//! Offline folding of recorded server events.
//!
//! A [`Replayer`] runs the same transition function a live [`Session`]
//! uses, without a connection. Feed it the raw frames a server sent, in
//! order, and inspect the resulting state.
//!
//! [`Session`]: crate::Session

use tale_protocol::ServerEvent;

use crate::assets::AssetBase;
use crate::error::Result;
use crate::notice::Notice;
use crate::reducer::{self, ReduceContext};
use crate::session::now_millis;
use crate::state::{Identity, SessionState};

pub struct Replayer {
	assets: AssetBase,
	state: SessionState,
	applied: usize,
}

impl Replayer {
	/// Starts from the default document with `identity` staged, so join
	/// events compute role flags as they would have live.
	pub fn new(identity: Identity, assets: AssetBase) -> Self {
		Self {
			assets,
			state: SessionState {
				identity,
				..SessionState::default()
			},
			applied: 0,
		}
	}

	/// Decodes and applies one raw frame, stamping system entries with the
	/// current time.
	pub fn feed(&mut self, frame: &str) -> Result<Option<Notice>> {
		self.feed_at(frame, now_millis())
	}

	/// Like [`feed`](Self::feed) with an explicit receipt time.
	///
	/// A frame that fails to decode leaves the state untouched.
	pub fn feed_at(&mut self, frame: &str, received_at: i64) -> Result<Option<Notice>> {
		let event = ServerEvent::decode(frame)?;
		Ok(self.apply(&event, received_at))
	}

	pub fn apply(&mut self, event: &ServerEvent, received_at: i64) -> Option<Notice> {
		let ctx = ReduceContext {
			assets: &self.assets,
			received_at,
		};
		let transition = reducer::apply(&self.state, event, &ctx);
		self.state = transition.state;
		self.applied += 1;
		transition.notice
	}

	pub fn state(&self) -> &SessionState {
		&self.state
	}

	/// Number of events applied so far.
	pub fn applied(&self) -> usize {
		self.applied
	}

	pub fn into_state(self) -> SessionState {
		self.state
	}
}
