//! Traveler's Tale client - session state synchronization
//!
//! This crate folds the ordered event stream of one multiplayer session
//! into a single [`SessionState`] document and gates the commands a player
//! may send back.
//!
//! - [`reducer`]: pure transition function, one arm per server event
//! - [`commands`]: pure planners for outbound intents and their preconditions
//! - [`Session`]: injectable container that owns the connection, publishes
//!   snapshots on a `watch` channel and notices on a `broadcast` channel
//! - [`Replayer`]: the same fold over recorded frames, offline
//!
//! # Example
//!
//! ```ignore
//! use tale::{ClientConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> tale::Result<()> {
//!     let session = Session::new(ClientConfig::default());
//!     session.connect("S1", "Alice").await?;
//!
//!     let mut updates = session.subscribe();
//!     while updates.changed().await.is_ok() {
//!         let state = updates.borrow().clone();
//!         println!("{}: {}", state.phase, state.narrative.current_story);
//!     }
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod commands;
pub mod config;
pub mod error;
pub mod notice;
pub mod reducer;
pub mod replay;
pub mod session;
pub mod state;

pub use assets::AssetBase;
pub use commands::{ConfigUpdate, Outbound, StartOptions};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use notice::Notice;
pub use reducer::{ReduceContext, Transition};
pub use replay::Replayer;
pub use session::{Session, generate_player_id};
pub use state::{
	ChatEntry, ConnectionStatus, Identity, Loading, Narrative, RoleFlags, SessionConfig,
	SessionState, StoryEntry, TurnGate,
};
// Re-export the wire types consumers need to drive a session.
pub use tale_protocol::{
	ActionKind, ChapterLength, CharacterProfile, GamePhase, Player, ResolvedAction, ServerEvent,
};
