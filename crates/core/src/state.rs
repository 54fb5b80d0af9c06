//! The session state document.
//!
//! [`SessionState`] is the single value a UI renders from. It is replaced
//! wholesale on every transition; nothing outside the reducer and the
//! command planners produces a new one.

use serde::Serialize;
use tale_protocol::{ChapterLength, GamePhase, Player, ResolvedAction};

/// Author name on chat entries generated from server status events.
pub const SYSTEM_AUTHOR: &str = "System";

/// Whether the underlying connection is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
	#[default]
	Disconnected,
	Connected,
}

/// Who this client is. Staged when the connection opens, fixed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identity {
	pub session_id: String,
	/// Opaque id generated locally, not assigned by the server.
	pub local_player_id: String,
	pub local_player_name: String,
}

/// One segment of the story as it was told.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoryEntry {
	pub text: String,
	/// Server-relative narration audio path.
	pub voice_file: Option<String>,
	/// Server-relative background track path.
	pub background_music: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Narrative {
	pub current_story: String,
	/// Whose turn the server says it is (a display name or "All players").
	pub current_player: String,
	/// Append-only.
	pub history: Vec<StoryEntry>,
	/// Fetch location of the current segment's narration.
	pub voice_url: Option<String>,
	/// Fetch location of the current background track.
	pub music_url: Option<String>,
	/// How the previous round's actions were resolved.
	pub resolved_actions: Vec<ResolvedAction>,
}

/// Per-round bookkeeping that gates action submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TurnGate {
	pub actions_needed: u32,
	pub actions_received: u32,
	/// Display names of players the server is still waiting on.
	pub waiting_for: Vec<String>,
	pub has_submitted_action: bool,
	pub is_my_turn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatEntry {
	pub author: String,
	pub text: String,
	/// Unix milliseconds.
	pub timestamp: i64,
}

impl ChatEntry {
	pub fn system(text: impl Into<String>, timestamp: i64) -> Self {
		Self {
			author: SYSTEM_AUTHOR.to_string(),
			text: text.into(),
			timestamp,
		}
	}

	pub fn is_system(&self) -> bool {
		self.author == SYSTEM_AUTHOR
	}
}

/// Busy indicator shown while the client cannot usefully act.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Loading {
	pub is_loading: bool,
	pub message: String,
}

impl Loading {
	pub fn busy(message: impl Into<String>) -> Self {
		Self {
			is_loading: true,
			message: message.into(),
		}
	}

	pub fn idle() -> Self {
		Self::default()
	}
}

/// Session settings staged locally before the creator starts the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionConfig {
	pub theme: String,
	pub language: String,
	pub gm_role: String,
	pub chapter_length: ChapterLength,
	pub narrator_voice_id: String,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			theme: String::new(),
			language: "English".to_string(),
			gm_role: String::new(),
			chapter_length: ChapterLength::default(),
			narrator_voice_id: String::new(),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleFlags {
	/// Only player in the roster when it last changed through a join.
	pub is_first_player: bool,
	/// Asserted by the server on the latest join event.
	pub is_creator: bool,
}

/// Complete client-side view of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
	pub connection: ConnectionStatus,
	pub identity: Identity,
	pub roster: Vec<Player>,
	pub narrative: Narrative,
	pub phase: GamePhase,
	pub turn_gate: TurnGate,
	pub chat_log: Vec<ChatEntry>,
	pub loading: Loading,
	pub session_config: SessionConfig,
	pub role_flags: RoleFlags,
}

impl SessionState {
	pub fn is_connected(&self) -> bool {
		self.connection == ConnectionStatus::Connected
	}

	/// True when an action submission would pass the gate.
	pub fn can_submit_action(&self) -> bool {
		self.is_connected() && self.turn_gate.is_my_turn && !self.turn_gate.has_submitted_action
	}

	pub fn player(&self, id: &str) -> Option<&Player> {
		self.roster.iter().find(|p| p.id == id)
	}

	/// The local player's roster entry, once the server has reported it.
	pub fn local_player(&self) -> Option<&Player> {
		self.player(&self.identity.local_player_id)
	}
}
