//! Events pushed by the session server.
//!
//! Each event is a JSON object whose `"type"` field selects the variant. A
//! discriminator this crate does not know decodes to [`ServerEvent::Unknown`]
//! so newer servers can add events without breaking older clients; a known
//! discriminator with a malformed body is a decode error.

use serde::{Deserialize, Serialize};

use crate::types::{GamePhase, Player, ResolvedAction};

/// Inbound event from the session server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
	/// A player (possibly the local one) joined the session.
	PlayerJoined(PlayerJoined),
	/// The game master finished a round and produced the next story segment.
	StoryUpdate(StoryUpdate),
	/// The creator started the session; carries the opening story segment.
	GameStarted(GameStarted),
	/// A player's action was accepted; more are still outstanding.
	ActionReceived(ActionReceived),
	/// Every action for the round is in and the game master is resolving them.
	GmWorking(GmWorking),
	/// A player left; carries the remaining roster.
	PlayerDisconnected(PlayerDisconnected),
	/// The session is over.
	GameEnded { message: String },
	/// Chat line relayed by the server with a server-assigned timestamp.
	ChatMessage(ChatRelay),
	/// Some player edited their character profile; carries the full roster.
	CharacterUpdated { all_players: Vec<Player> },
	/// The server rejected something the client did.
	Error { message: String },
	#[serde(other)]
	Unknown,
}

impl ServerEvent {
	/// Decodes one text frame.
	pub fn decode(text: &str) -> serde_json::Result<Self> {
		serde_json::from_str(text)
	}

	/// Wire discriminator of this event, `"unknown"` for the fallback variant.
	pub fn kind(&self) -> &'static str {
		match self {
			ServerEvent::PlayerJoined(_) => "player_joined",
			ServerEvent::StoryUpdate(_) => "story_update",
			ServerEvent::GameStarted(_) => "game_started",
			ServerEvent::ActionReceived(_) => "action_received",
			ServerEvent::GmWorking(_) => "gm_working",
			ServerEvent::PlayerDisconnected(_) => "player_disconnected",
			ServerEvent::GameEnded { .. } => "game_ended",
			ServerEvent::ChatMessage(_) => "chat_message",
			ServerEvent::CharacterUpdated { .. } => "character_updated",
			ServerEvent::Error { .. } => "error",
			ServerEvent::Unknown => "unknown",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerJoined {
	/// The player who just joined.
	pub player: Player,
	/// Full roster snapshot; when absent only `player` is appended.
	#[serde(default)]
	pub all_players: Option<Vec<Player>>,
	/// Personalized per recipient: true only on the creator's copy.
	#[serde(default)]
	pub is_game_creator: bool,
	#[serde(default)]
	pub current_story: Option<String>,
	#[serde(default)]
	pub current_player: Option<String>,
	pub game_state: GamePhase,
	#[serde(default)]
	pub creator_id: Option<String>,
	#[serde(default)]
	pub players_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryUpdate {
	pub story: String,
	pub current_player: String,
	pub game_state: GamePhase,
	/// Server-relative path of the narration audio.
	#[serde(default)]
	pub voice_file: Option<String>,
	/// Server-relative path of the background track.
	#[serde(default)]
	pub background_music: Option<String>,
	#[serde(default)]
	pub actions_needed: Option<u32>,
	#[serde(default)]
	pub actions_received: Option<u32>,
	#[serde(default)]
	pub waiting_for: Option<Vec<String>>,
	/// How each action of the finished round was resolved.
	#[serde(default)]
	pub actions_processed: Vec<ResolvedAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStarted {
	pub current_story: String,
	pub current_player: String,
	pub game_state: GamePhase,
	#[serde(default)]
	pub voice_file: Option<String>,
	#[serde(default)]
	pub background_music: Option<String>,
	#[serde(default)]
	pub actions_needed: Option<u32>,
	#[serde(default)]
	pub actions_received: Option<u32>,
	#[serde(default)]
	pub waiting_for: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionReceived {
	pub actions_received: u32,
	pub actions_needed: u32,
	/// Display names of players who have not acted yet.
	#[serde(default)]
	pub waiting_for: Option<Vec<String>>,
	pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GmWorking {
	pub actions_received: u32,
	pub actions_needed: u32,
	pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDisconnected {
	pub remaining_players: Vec<Player>,
	#[serde(default)]
	pub current_player: Option<String>,
	pub message: String,
	#[serde(default)]
	pub disconnected_player: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRelay {
	pub player_name: String,
	pub message: String,
	/// Unix milliseconds, assigned by the server.
	pub timestamp: i64,
}
