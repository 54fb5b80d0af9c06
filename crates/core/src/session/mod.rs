//! The session state container.
//!
//! A [`Session`] owns at most one [`Connection`] and the canonical
//! [`SessionState`]. Every inbound event goes through [`reducer::apply`]
//! under the session lock, so exactly one event is folded at a time and
//! outbound commands never observe a half-applied transition.
//!
//! Consumers read state through [`Session::snapshot`] or
//! [`Session::subscribe`] and get out-of-band notifications through
//! [`Session::notices`].
//!
//! # Example
//!
//! ```ignore
//! use tale::{ClientConfig, Session};
//! use tale_protocol::ActionKind;
//!
//! # async fn example() -> tale::Result<()> {
//! let session = Session::new(ClientConfig::default());
//! session.connect("S1", "Alice").await?;
//!
//! let mut updates = session.subscribe();
//! updates.changed().await.ok();
//! if updates.borrow().can_submit_action() {
//!     session.submit_action(ActionKind::Speak, "Hello")?;
//! }
//! session.disconnect();
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use tale_protocol::{ActionKind, CharacterProfile, ServerEvent};
use tale_runtime::{Connection, ConnectionEvent, ConnectionEvents, TransportParts, WebSocketTransport};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::commands::{self, ConfigUpdate, Outbound, StartOptions};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::notice::Notice;
use crate::reducer::{self, ReduceContext, Transition};
use crate::state::{Identity, SessionState};

const NOTICE_CAPACITY: usize = 64;

/// Client-side view of one multiplayer session.
pub struct Session {
	config: ClientConfig,
	state_tx: watch::Sender<SessionState>,
	notice_tx: broadcast::Sender<Notice>,
	inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
	/// Bumped whenever the current connection is replaced or torn down.
	generation: u64,
	connection: Option<Arc<Connection>>,
	pump: Option<JoinHandle<()>>,
}

impl Inner {
	/// Detaches the current connection, if any, and invalidates its events.
	fn teardown(&mut self) {
		self.generation += 1;
		if let Some(connection) = self.connection.take() {
			connection.close();
		}
		if let Some(pump) = self.pump.take() {
			pump.abort();
		}
	}
}

impl Session {
	pub fn new(config: ClientConfig) -> Arc<Self> {
		let (state_tx, _) = watch::channel(SessionState::default());
		let (notice_tx, _) = broadcast::channel(NOTICE_CAPACITY);
		Arc::new(Self {
			config,
			state_tx,
			notice_tx,
			inner: Mutex::new(Inner::default()),
		})
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Current state document.
	pub fn snapshot(&self) -> SessionState {
		self.state_tx.borrow().clone()
	}

	/// Receiver that is notified each time a new snapshot is published.
	pub fn subscribe(&self) -> watch::Receiver<SessionState> {
		self.state_tx.subscribe()
	}

	pub fn notices(&self) -> broadcast::Receiver<Notice> {
		self.notice_tx.subscribe()
	}

	/// Connects to the server as a new player of `session_id`.
	///
	/// Any previous connection is torn down and the state reset first. The
	/// player id is generated locally. Once the transport is open the
	/// identity is staged and a join request is sent before this returns.
	///
	/// # Errors
	///
	/// Returns an error if the websocket handshake fails; the state is then
	/// left at its disconnected defaults. There is no retry.
	pub async fn connect(self: &Arc<Self>, session_id: &str, player_name: &str) -> Result<()> {
		self.disconnect();

		let player_id = generate_player_id();
		let url = self.config.endpoint(&player_id);
		let parts = match WebSocketTransport::connect(&url).await {
			Ok(parts) => parts,
			Err(err) => {
				tracing::warn!(%url, error = %err, "Could not reach session server");
				return Err(err.into());
			}
		};

		self.attach(
			parts,
			Identity {
				session_id: session_id.to_string(),
				local_player_id: player_id,
				local_player_name: player_name.to_string(),
			},
		);
		Ok(())
	}

	/// Runs the session over an already-open transport.
	///
	/// Must be called from within a tokio runtime.
	pub fn attach(self: &Arc<Self>, parts: TransportParts, identity: Identity) {
		let (connection, mut events) = Connection::start(parts);

		let generation = {
			let mut inner = self.inner.lock();
			inner.teardown();
			inner.connection = Some(connection);
			self.state_tx.send_replace(SessionState::default());
			inner.generation
		};

		tracing::info!(
			session_id = %identity.session_id,
			player_id = %identity.local_player_id,
			"Attached session connection"
		);

		// `Open` is already queued; fold it now so callers see the staged
		// identity as soon as this returns.
		let mut open = true;
		while let Ok(event) = events.try_recv() {
			open = self.on_connection_event(generation, &identity, event);
			if !open {
				break;
			}
		}
		if !open {
			return;
		}

		let pump = tokio::spawn(pump(Arc::downgrade(self), generation, identity, events));

		let mut inner = self.inner.lock();
		if inner.generation == generation {
			inner.pump = Some(pump);
		} else {
			pump.abort();
		}
	}

	/// Tears down the connection and resets the state to its defaults.
	///
	/// This is the only path that clears the document.
	pub fn disconnect(&self) {
		let mut inner = self.inner.lock();
		let had_connection = inner.connection.is_some();
		inner.teardown();
		self.state_tx.send_replace(SessionState::default());
		if had_connection {
			tracing::info!("Disconnected from session");
		}
	}

	pub fn is_connected(&self) -> bool {
		self.state_tx.borrow().is_connected()
	}

	/// Submits the local player's action for the current round.
	///
	/// Returns `Ok(false)` when the action was not sent: not connected, not
	/// this player's turn, or an action was already submitted this round.
	pub fn submit_action(&self, kind: ActionKind, text: &str) -> Result<bool> {
		self.dispatch("game_action", |state| {
			commands::submit_action(state, kind, text)
		})
	}

	/// Sends a chat line. Returns `Ok(false)` when not connected.
	pub fn send_chat(&self, text: &str) -> Result<bool> {
		self.dispatch("chat_message", |state| commands::send_chat(state, text))
	}

	/// Asks the server to start the session. Only the creator can.
	pub fn start_session(&self, options: StartOptions) -> Result<bool> {
		self.dispatch("start_game", |state| {
			commands::start_session(state, options)
		})
	}

	pub fn update_character(&self, profile: CharacterProfile) -> Result<bool> {
		self.dispatch("update_character", |state| {
			commands::update_character(state, profile)
		})
	}

	/// Stages session settings locally. Works while disconnected.
	pub fn update_config(&self, update: ConfigUpdate) {
		let _inner = self.inner.lock();
		self.state_tx
			.send_modify(|state| *state = commands::stage_config(state, update));
	}

	/// Waits until the state satisfies `predicate` and returns that snapshot.
	///
	/// # Errors
	///
	/// Returns [`Error::Timeout`] if `timeout` elapses first.
	pub async fn wait_for<F>(&self, predicate: F, timeout: Duration) -> Result<SessionState>
	where
		F: Fn(&SessionState) -> bool,
	{
		let mut rx = self.subscribe();
		tokio::time::timeout(timeout, async move {
			let state = rx
				.wait_for(|state| predicate(state))
				.await
				.map_err(|_| Error::ChannelClosed)?;
			Ok::<_, Error>(state.clone())
		})
		.await
		.map_err(|_| Error::Timeout("Timeout waiting for session state".to_string()))?
	}

	/// Waits for the next notice.
	///
	/// # Errors
	///
	/// Returns [`Error::Timeout`] or [`Error::ChannelClosed`].
	pub async fn next_notice(&self, timeout: Duration) -> Result<Notice> {
		let mut rx = self.notices();
		tokio::time::timeout(timeout, async move {
			loop {
				match rx.recv().await {
					Ok(notice) => return Ok(notice),
					Err(broadcast::error::RecvError::Lagged(n)) => {
						tracing::warn!(dropped = n, "Notice receiver lagged");
					}
					Err(broadcast::error::RecvError::Closed) => return Err(Error::ChannelClosed),
				}
			}
		})
		.await
		.map_err(|_| Error::Timeout("Timeout waiting for notice".to_string()))?
	}

	/// Plans a command against the current state and sends it.
	fn dispatch<F>(&self, kind: &'static str, plan: F) -> Result<bool>
	where
		F: FnOnce(&SessionState) -> Option<Outbound>,
	{
		let inner = self.inner.lock();
		let planned = plan(&self.state_tx.borrow());
		let Some(outbound) = planned else {
			tracing::debug!(kind, "Command suppressed by session state");
			return Ok(false);
		};
		let Some(connection) = inner.connection.as_ref() else {
			return Ok(false);
		};
		if !connection.send(&outbound.command)? {
			return Ok(false);
		}
		if let Some(next) = outbound.next {
			self.state_tx.send_replace(next);
		}
		Ok(true)
	}

	/// Folds one connection event. Returns false once the connection is done
	/// or has been replaced.
	fn on_connection_event(
		&self,
		generation: u64,
		identity: &Identity,
		event: ConnectionEvent,
	) -> bool {
		let inner = self.inner.lock();
		if inner.generation != generation {
			tracing::debug!(generation, "Dropping event from stale connection");
			return false;
		}

		match event {
			ConnectionEvent::Open => {
				self.state_tx
					.send_modify(|state| *state = reducer::on_open(state, identity.clone()));
				let join = commands::join(&self.state_tx.borrow());
				if let (Some(command), Some(connection)) = (join, inner.connection.as_ref()) {
					tracing::info!(
						session_id = %identity.session_id,
						player = %identity.local_player_name,
						"Joining session"
					);
					if let Err(err) = connection.send(&command) {
						tracing::error!(error = %err, "Failed to send join request");
					}
				}
				true
			}
			ConnectionEvent::Message(text) => {
				match ServerEvent::decode(&text) {
					Ok(event) => self.apply_event(&event),
					Err(err) => {
						tracing::error!(error = %err, "Failed to decode server event");
					}
				}
				true
			}
			ConnectionEvent::Error(reason) => {
				tracing::warn!(%reason, "Session connection failed");
				true
			}
			ConnectionEvent::Closed => {
				tracing::info!("Session connection closed");
				self.state_tx.send_modify(|state| *state = reducer::on_closed(state));
				false
			}
		}
	}

	fn apply_event(&self, event: &ServerEvent) {
		tracing::debug!(kind = event.kind(), "Server event");
		let ctx = ReduceContext {
			assets: &self.config.assets,
			received_at: now_millis(),
		};

		let mut notice = None;
		self.state_tx.send_if_modified(|state| {
			let Transition { state: next, notice: raised } = reducer::apply(state, event, &ctx);
			notice = raised;
			if next == *state {
				return false;
			}
			*state = next;
			true
		});

		if let Some(notice) = notice {
			if notice.is_blocking() {
				tracing::warn!(error = notice.message(), "Server reported an error");
			}
			// No receivers is fine.
			let _ = self.notice_tx.send(notice);
		}
	}
}

impl Drop for Session {
	fn drop(&mut self) {
		self.inner.get_mut().teardown();
	}
}

async fn pump(
	session: Weak<Session>,
	generation: u64,
	identity: Identity,
	mut events: ConnectionEvents,
) {
	while let Some(event) = events.recv().await {
		let Some(session) = session.upgrade() else {
			break;
		};
		if !session.on_connection_event(generation, &identity, event) {
			break;
		}
	}
}

/// Unix time in milliseconds.
pub(crate) fn now_millis() -> i64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_millis() as i64)
		.unwrap_or_default()
}

/// Opaque local player id.
pub fn generate_player_id() -> String {
	uuid::Uuid::new_v4().simple().to_string()
}
