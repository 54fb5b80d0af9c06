//! Wire types for the Traveler's Tale session protocol.
//!
//! Every message on the socket is a JSON object tagged by a `"type"` string.
//! This crate holds the shapes of those messages and nothing else:
//!
//! - [`ServerEvent`] - events pushed by the session server
//! - [`ClientCommand`] - commands sent by a client
//! - [`Player`], [`GamePhase`], [`ActionKind`], [`ChapterLength`] - shared values
//!
//! Interpreting events (folding them into a session view) happens in the
//! `tale` crate; moving bytes happens in `tale-runtime`.

pub mod command;
pub mod event;
pub mod types;

pub use command::*;
pub use event::*;
pub use types::*;
