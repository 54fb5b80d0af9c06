//! Commands sent by a client to the session server.

use serde::{Deserialize, Serialize};

use crate::types::{ActionKind, ChapterLength};

/// Outbound command. Serialized as a JSON object tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
	JoinGame {
		game_id: String,
		player_name: String,
	},
	GameAction {
		game_id: String,
		action_type: ActionKind,
		action_text: String,
	},
	ChatMessage {
		game_id: String,
		player_name: String,
		message: String,
	},
	StartGame {
		game_id: String,
		theme: String,
		language: String,
		gm_role: String,
		chapter_length: ChapterLength,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		narrator_voice: Option<String>,
	},
	UpdateCharacter {
		game_id: String,
		#[serde(flatten)]
		profile: CharacterProfile,
	},
}

impl ClientCommand {
	/// Wire discriminator of this command.
	pub fn kind(&self) -> &'static str {
		match self {
			ClientCommand::JoinGame { .. } => "join_game",
			ClientCommand::GameAction { .. } => "game_action",
			ClientCommand::ChatMessage { .. } => "chat_message",
			ClientCommand::StartGame { .. } => "start_game",
			ClientCommand::UpdateCharacter { .. } => "update_character",
		}
	}
}

/// Character profile edit. Absent fields are omitted from the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub character_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub character_description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub character_voice: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub character_gender: Option<String>,
}

impl CharacterProfile {
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}
