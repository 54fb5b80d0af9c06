//! Values shared by inbound events and outbound commands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A participant in a session as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
	/// Connection-scoped player identifier (generated by the client).
	pub id: String,
	/// Display name chosen at join time.
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub character_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub character_description: Option<String>,
	/// Voice id used when narrating this character's lines.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub character_voice: Option<String>,
	/// `"male"` or `"female"` in practice; passed through untouched.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub character_gender: Option<String>,
	#[serde(default = "default_active")]
	pub is_active: bool,
}

fn default_active() -> bool {
	true
}

impl Player {
	/// Creates a player with no character profile.
	pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			character_name: None,
			character_description: None,
			character_voice: None,
			character_gender: None,
			is_active: true,
		}
	}

	/// Returns true when any character profile field is set.
	pub fn has_character(&self) -> bool {
		self.character_name.is_some()
			|| self.character_description.is_some()
			|| self.character_voice.is_some()
			|| self.character_gender.is_some()
	}
}

/// Session phase. Always server-authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
	#[default]
	Waiting,
	StoryTelling,
	GmWorking,
	PlayerTurn,
	Combat,
	Paused,
}

impl GamePhase {
	pub fn as_str(self) -> &'static str {
		match self {
			GamePhase::Waiting => "waiting",
			GamePhase::StoryTelling => "story_telling",
			GamePhase::GmWorking => "gm_working",
			GamePhase::PlayerTurn => "player_turn",
			GamePhase::Combat => "combat",
			GamePhase::Paused => "paused",
		}
	}
}

impl fmt::Display for GamePhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Kind of in-game action a player submits for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
	Speak,
	Action,
	Attack,
	Defend,
	CastSpell,
	UseItem,
}

impl ActionKind {
	pub const ALL: [ActionKind; 6] = [
		ActionKind::Speak,
		ActionKind::Action,
		ActionKind::Attack,
		ActionKind::Defend,
		ActionKind::CastSpell,
		ActionKind::UseItem,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			ActionKind::Speak => "speak",
			ActionKind::Action => "action",
			ActionKind::Attack => "attack",
			ActionKind::Defend => "defend",
			ActionKind::CastSpell => "cast_spell",
			ActionKind::UseItem => "use_item",
		}
	}
}

impl fmt::Display for ActionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Returned when a string names no known [`ActionKind`] or [`ChapterLength`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unknown value '{}'", self.0)
	}
}

impl std::error::Error for UnknownVariant {}

impl FromStr for ActionKind {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		ActionKind::ALL
			.into_iter()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| UnknownVariant(s.to_string()))
	}
}

/// Pacing of narrative chapters, chosen before the session starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterLength {
	Short,
	#[default]
	Medium,
	Long,
}

impl ChapterLength {
	pub fn as_str(self) -> &'static str {
		match self {
			ChapterLength::Short => "short",
			ChapterLength::Medium => "medium",
			ChapterLength::Long => "long",
		}
	}
}

impl FromStr for ChapterLength {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"short" => Ok(ChapterLength::Short),
			"medium" => Ok(ChapterLength::Medium),
			"long" => Ok(ChapterLength::Long),
			other => Err(UnknownVariant(other.to_string())),
		}
	}
}

/// One player's action as resolved by the game master at the end of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAction {
	/// Display name of the acting player.
	pub player: String,
	/// Free text the player submitted.
	pub action: String,
	#[serde(rename = "type")]
	pub kind: ActionKind,
}
