//! Text-frame transport over a websocket.
//!
//! A transport is split into a writer half ([`Transport`]) and a reader half
//! ([`TransportReceiver`]) so the connection can drive them from separate
//! tasks. The reader forwards every inbound text frame, untouched, into an
//! unbounded channel; it does not look at message content.

use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::error::{Error, Result};

/// Boxed future returned by transport operations.
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Writer half of a transport.
pub trait Transport: Send {
	/// Writes one text frame.
	fn send(&mut self, text: String) -> TransportFuture<'_>;

	/// Sends a close frame and flushes.
	fn close(&mut self) -> TransportFuture<'_>;
}

/// Reader half of a transport.
pub trait TransportReceiver: Send {
	/// Reads frames until the peer closes, forwarding text payloads to `inbound`.
	///
	/// Returns `Ok(())` on an orderly close or when `inbound` is dropped, and an
	/// error when the stream fails.
	fn run(self: Box<Self>, inbound: mpsc::UnboundedSender<String>) -> TransportFuture<'static>;
}

/// Both halves of a freshly opened transport.
pub struct TransportParts {
	pub sender: Box<dyn Transport>,
	pub receiver: Box<dyn TransportReceiver>,
}

/// Websocket transport built on `tokio-tungstenite`.
pub struct WebSocketTransport;

impl WebSocketTransport {
	/// Performs the client handshake against `url` and splits the stream.
	pub async fn connect(url: &str) -> Result<TransportParts> {
		tracing::debug!(url, "Opening websocket");
		let (stream, response) =
			tokio_tungstenite::connect_async(url)
				.await
				.map_err(|e| Error::ConnectionFailed {
					url: url.to_string(),
					reason: e.to_string(),
				})?;
		tracing::debug!(url, status = %response.status(), "Websocket handshake complete");
		Ok(Self::from_stream(stream))
	}

	/// Splits an already-established websocket stream into transport halves.
	pub fn from_stream<S>(stream: WebSocketStream<S>) -> TransportParts
	where
		S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
	{
		let (sink, stream) = stream.split();
		TransportParts {
			sender: Box::new(WebSocketTransportSender { sink }),
			receiver: Box::new(WebSocketTransportReceiver { stream }),
		}
	}
}

/// Writer half of a [`WebSocketTransport`].
pub struct WebSocketTransportSender<S> {
	sink: SplitSink<WebSocketStream<S>, Message>,
}

impl<S> Transport for WebSocketTransportSender<S>
where
	S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
	fn send(&mut self, text: String) -> TransportFuture<'_> {
		Box::pin(async move {
			self.sink.send(Message::Text(text)).await?;
			Ok(())
		})
	}

	fn close(&mut self) -> TransportFuture<'_> {
		Box::pin(async move {
			self.sink.close().await?;
			Ok(())
		})
	}
}

/// Reader half of a [`WebSocketTransport`].
pub struct WebSocketTransportReceiver<S> {
	stream: SplitStream<WebSocketStream<S>>,
}

impl<S> TransportReceiver for WebSocketTransportReceiver<S>
where
	S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
	fn run(self: Box<Self>, inbound: mpsc::UnboundedSender<String>) -> TransportFuture<'static> {
		let mut stream = self.stream;
		Box::pin(async move {
			while let Some(frame) = stream.next().await {
				let text = match frame? {
					Message::Text(text) => text,
					Message::Binary(bytes) => match String::from_utf8(bytes) {
						Ok(text) => text,
						Err(e) => {
							tracing::warn!(len = e.as_bytes().len(), "Dropping non-UTF-8 binary frame");
							continue;
						}
					},
					Message::Close(frame) => {
						tracing::debug!(?frame, "Peer closed websocket");
						return Ok(());
					}
					Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
				};

				if inbound.send(text).is_err() {
					// Connection side hung up; nothing left to deliver to.
					return Ok(());
				}
			}
			Ok(())
		})
	}
}
