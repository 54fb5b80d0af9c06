//! Traveler's Tale runtime - connection lifecycle and websocket transport
//!
//! This crate owns the single persistent connection a client keeps to a
//! session server. It knows nothing about session semantics:
//!
//! - **Transport**: text frames over a websocket (`tokio-tungstenite`)
//! - **Connection**: outbound command serialization, inbound frame
//!   forwarding, lifecycle events (open/message/error/closed)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │     tale     │  Session state reducer
//! └──────┬───────┘
//!        │ ConnectionEvent stream / send(ClientCommand)
//! ┌──────▼───────┐
//! │ tale-runtime │  This crate
//! │  ┌────────┐  │
//! │  │ Conn   │  │  Lifecycle, guarded send
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Trans  │  │  WebSocket transport
//! │  └────────┘  │
//! └──────────────┘
//! ```

pub mod connection;
pub mod error;
pub mod transport;

pub use connection::{Connection, ConnectionEvent, ConnectionEvents};
pub use error::{Error, Result};
pub use transport::{
	Transport, TransportFuture, TransportParts, TransportReceiver, WebSocketTransport,
	WebSocketTransportReceiver, WebSocketTransportSender,
};
