//! Connection lifecycle on top of a [`Transport`](crate::transport::Transport).
//!
//! A [`Connection`] owns exactly one open transport. It
//! - serializes outbound [`ClientCommand`]s and queues them for a writer task
//! - forwards inbound text frames, untouched, as [`ConnectionEvent::Message`]
//! - surfaces lifecycle transitions as [`ConnectionEvent::Open`],
//!   [`ConnectionEvent::Error`] and [`ConnectionEvent::Closed`]
//!
//! There is no retry and no outbound buffering: a command sent while the
//! connection is not open is dropped. Reconnecting means building a new
//! `Connection`.
//!
//! # Event order
//!
//! `Open` is always the first event and `Closed` always the last. Messages
//! arrive in the order the transport delivered them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tale_protocol::ClientCommand;
use tokio::sync::{Notify, mpsc};

use crate::error::Result;
use crate::transport::TransportParts;

/// Lifecycle and data events observed on a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
	/// The transport is open and accepting commands.
	Open,
	/// One raw inbound text frame.
	Message(String),
	/// The transport failed; a `Closed` event follows.
	Error(String),
	/// The transport is gone. No further events are emitted.
	Closed,
}

/// Ordered stream of [`ConnectionEvent`]s for one connection.
pub type ConnectionEvents = mpsc::UnboundedReceiver<ConnectionEvent>;

/// One outbound connection to a session server.
pub struct Connection {
	/// True from start until close, transport failure, or peer close
	connected: Arc<AtomicBool>,
	/// Queue feeding the writer task; taken on close
	outbound_tx: Mutex<Option<mpsc::UnboundedSender<String>>>,
	/// Wakes the reader task on close
	shutdown: Arc<Notify>,
}

impl Connection {
	/// Starts reader and writer tasks over an already-open transport.
	///
	/// Must be called from within a tokio runtime.
	pub fn start(parts: TransportParts) -> (Arc<Self>, ConnectionEvents) {
		let TransportParts {
			sender: mut transport_sender,
			receiver: transport_receiver,
		} = parts;

		let (events_tx, events_rx) = mpsc::unbounded_channel();
		let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
		let connected = Arc::new(AtomicBool::new(true));
		let shutdown = Arc::new(Notify::new());

		let _ = events_tx.send(ConnectionEvent::Open);

		let writer_events = events_tx.clone();
		let writer_connected = Arc::clone(&connected);
		let writer_shutdown = Arc::clone(&shutdown);
		tokio::spawn(async move {
			while let Some(text) = outbound_rx.recv().await {
				if let Err(e) = transport_sender.send(text).await {
					tracing::error!("Transport write error: {}", e);
					writer_connected.store(false, Ordering::SeqCst);
					let _ = writer_events.send(ConnectionEvent::Error(e.to_string()));
					writer_shutdown.notify_one();
					return;
				}
			}
			// Outbound queue closed: the connection was closed or dropped.
			if let Err(e) = transport_sender.close().await {
				tracing::debug!("Transport close error: {}", e);
			}
		});

		let reader_connected = Arc::clone(&connected);
		let reader_shutdown = Arc::clone(&shutdown);
		tokio::spawn(async move {
			let (inbound_tx, mut inbound_rx) = mpsc::unbounded_channel();
			let mut read = transport_receiver.run(inbound_tx);

			let outcome = loop {
				tokio::select! {
					biased;
					_ = reader_shutdown.notified() => break Ok(()),
					Some(text) = inbound_rx.recv() => {
						let _ = events_tx.send(ConnectionEvent::Message(text));
					}
					result = &mut read => {
						while let Ok(text) = inbound_rx.try_recv() {
							let _ = events_tx.send(ConnectionEvent::Message(text));
						}
						break result;
					}
				}
			};

			reader_connected.store(false, Ordering::SeqCst);
			if let Err(e) = outcome {
				tracing::warn!("Transport read error: {}", e);
				let _ = events_tx.send(ConnectionEvent::Error(e.to_string()));
			}
			tracing::debug!("Connection closed");
			let _ = events_tx.send(ConnectionEvent::Closed);
		});

		let connection = Arc::new(Self {
			connected,
			outbound_tx: Mutex::new(Some(outbound_tx)),
			shutdown,
		});
		(connection, events_rx)
	}

	/// Returns true while the transport is open.
	pub fn is_connected(&self) -> bool {
		self.connected.load(Ordering::SeqCst)
	}

	/// Serializes and queues a command.
	///
	/// Returns `Ok(false)` when the connection is not open; the command is
	/// dropped, not buffered.
	pub fn send(&self, command: &ClientCommand) -> Result<bool> {
		if !self.is_connected() {
			tracing::debug!(kind = command.kind(), "Dropping command: not connected");
			return Ok(false);
		}

		let text = serde_json::to_string(command)?;
		tracing::debug!(kind = command.kind(), "Sending command");

		let guard = self.outbound_tx.lock();
		match guard.as_ref() {
			Some(tx) if tx.send(text).is_ok() => Ok(true),
			_ => {
				tracing::debug!(kind = command.kind(), "Dropping command: outbound queue closed");
				Ok(false)
			}
		}
	}

	/// Closes the connection. Idempotent.
	///
	/// The writer flushes a close frame, the reader stops, and the event
	/// stream ends with [`ConnectionEvent::Closed`].
	pub fn close(&self) {
		self.connected.store(false, Ordering::SeqCst);
		if self.outbound_tx.lock().take().is_some() {
			tracing::debug!("Closing connection");
			self.shutdown.notify_one();
		}
	}
}

impl Drop for Connection {
	fn drop(&mut self) {
		self.close();
	}
}
