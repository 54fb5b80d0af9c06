//! Outbound intent planning.
//!
//! Each planner looks at the current [`SessionState`] and either returns the
//! command to send together with any optimistic state change, or `None` when
//! a precondition fails. A failed precondition is not an error: the
//! presentation layer is expected to have disabled the control already.

use tale_protocol::{ActionKind, ChapterLength, CharacterProfile, ClientCommand};

use crate::reducer::{GM_PROCESSING, PREPARING_ADVENTURE, WAITING_FOR_OTHERS};
use crate::state::{Loading, SessionState};

/// A command ready to send, with the state to publish once it is queued.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
	pub command: ClientCommand,
	/// `None` when sending does not change local state.
	pub next: Option<SessionState>,
}

impl Outbound {
	fn send(command: ClientCommand) -> Self {
		Self {
			command,
			next: None,
		}
	}
}

/// Arguments to [`start_session`]. Unset or empty fields fall back to the
/// staged session config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartOptions {
	pub theme: Option<String>,
	pub language: Option<String>,
	pub gm_role: Option<String>,
	pub chapter_length: Option<ChapterLength>,
}

/// Partial edit of the staged session config. Unset fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
	pub theme: Option<String>,
	pub language: Option<String>,
	pub gm_role: Option<String>,
	pub chapter_length: Option<ChapterLength>,
	pub narrator_voice_id: Option<String>,
}

/// Join request sent right after the connection opens.
pub fn join(state: &SessionState) -> Option<ClientCommand> {
	if !state.is_connected() {
		return None;
	}
	Some(ClientCommand::JoinGame {
		game_id: state.identity.session_id.clone(),
		player_name: state.identity.local_player_name.clone(),
	})
}

/// Submits the local player's action for this round. At most one per round.
pub fn submit_action(state: &SessionState, kind: ActionKind, text: &str) -> Option<Outbound> {
	if !state.can_submit_action() {
		return None;
	}

	let gate = &state.turn_gate;
	let completes_round = gate.actions_received.saturating_add(1) >= gate.actions_needed;
	let mut next = state.clone();
	next.turn_gate.has_submitted_action = true;
	next.loading = Loading::busy(if completes_round {
		GM_PROCESSING
	} else {
		WAITING_FOR_OTHERS
	});

	Some(Outbound {
		command: ClientCommand::GameAction {
			game_id: state.identity.session_id.clone(),
			action_type: kind,
			action_text: text.to_string(),
		},
		next: Some(next),
	})
}

pub fn send_chat(state: &SessionState, text: &str) -> Option<Outbound> {
	if !state.is_connected() {
		return None;
	}
	Some(Outbound::send(ClientCommand::ChatMessage {
		game_id: state.identity.session_id.clone(),
		player_name: state.identity.local_player_name.clone(),
		message: text.to_string(),
	}))
}

/// Asks the server to start the session. Only the creator may do this.
pub fn start_session(state: &SessionState, options: StartOptions) -> Option<Outbound> {
	if !state.is_connected() || !state.role_flags.is_creator {
		return None;
	}

	let staged = &state.session_config;
	let pick = |given: Option<String>, fallback: &str| {
		given
			.filter(|s| !s.is_empty())
			.unwrap_or_else(|| fallback.to_string())
	};
	let narrator_voice = Some(staged.narrator_voice_id.clone()).filter(|v| !v.is_empty());

	let command = ClientCommand::StartGame {
		game_id: state.identity.session_id.clone(),
		theme: pick(options.theme, &staged.theme),
		language: pick(options.language, &staged.language),
		gm_role: pick(options.gm_role, &staged.gm_role),
		chapter_length: options.chapter_length.unwrap_or(staged.chapter_length),
		narrator_voice,
	};

	let mut next = state.clone();
	next.loading = Loading::busy(PREPARING_ADVENTURE);
	Some(Outbound {
		command,
		next: Some(next),
	})
}

/// Stages session settings locally. Never touches the network.
pub fn stage_config(state: &SessionState, update: ConfigUpdate) -> SessionState {
	let mut next = state.clone();
	let config = &mut next.session_config;
	if let Some(theme) = update.theme {
		config.theme = theme;
	}
	if let Some(language) = update.language {
		config.language = language;
	}
	if let Some(gm_role) = update.gm_role {
		config.gm_role = gm_role;
	}
	if let Some(chapter_length) = update.chapter_length {
		config.chapter_length = chapter_length;
	}
	if let Some(voice) = update.narrator_voice_id {
		config.narrator_voice_id = voice;
	}
	next
}

/// Sends a character profile edit. The roster changes only once the server
/// echoes `character_updated`.
pub fn update_character(state: &SessionState, profile: CharacterProfile) -> Option<Outbound> {
	if !state.is_connected() {
		return None;
	}
	Some(Outbound::send(ClientCommand::UpdateCharacter {
		game_id: state.identity.session_id.clone(),
		profile,
	}))
}

#[cfg(test)]
mod tests {
	use tale_protocol::GamePhase;

	use super::*;
	use crate::reducer::on_open;
	use crate::state::Identity;

	fn connected() -> SessionState {
		on_open(
			&SessionState::default(),
			Identity {
				session_id: "S1".into(),
				local_player_id: "p1".into(),
				local_player_name: "Alice".into(),
			},
		)
	}

	fn in_round(needed: u32, received: u32) -> SessionState {
		let mut state = connected();
		state.phase = GamePhase::PlayerTurn;
		state.turn_gate.is_my_turn = true;
		state.turn_gate.actions_needed = needed;
		state.turn_gate.actions_received = received;
		state
	}

	#[test]
	fn join_uses_staged_identity() {
		assert_eq!(
			join(&connected()),
			Some(ClientCommand::JoinGame {
				game_id: "S1".into(),
				player_name: "Alice".into(),
			})
		);
		assert_eq!(join(&SessionState::default()), None);
	}

	#[test]
	fn submit_waits_for_others_when_round_incomplete() {
		let out = submit_action(&in_round(2, 0), ActionKind::Speak, "Hello").unwrap();

		assert_eq!(
			out.command,
			ClientCommand::GameAction {
				game_id: "S1".into(),
				action_type: ActionKind::Speak,
				action_text: "Hello".into(),
			}
		);
		let next = out.next.unwrap();
		assert!(next.turn_gate.has_submitted_action);
		assert!(next.loading.is_loading);
		assert_eq!(next.loading.message, WAITING_FOR_OTHERS);
		assert_eq!(next.turn_gate.actions_received, 0);
	}

	#[test]
	fn submit_completing_round_shows_processing() {
		let out = submit_action(&in_round(2, 1), ActionKind::Attack, "Swing").unwrap();
		let next = out.next.unwrap();
		assert_eq!(next.loading.message, GM_PROCESSING);
	}

	#[test]
	fn second_submit_in_round_is_suppressed() {
		let state = in_round(2, 0);
		let first = submit_action(&state, ActionKind::Speak, "Hello").unwrap();
		let after = first.next.unwrap();

		assert!(submit_action(&after, ActionKind::Speak, "Again").is_none());
	}

	#[test]
	fn submit_requires_connection_and_turn() {
		let mut state = in_round(2, 0);
		state.turn_gate.is_my_turn = false;
		assert!(submit_action(&state, ActionKind::Speak, "x").is_none());

		let offline = crate::reducer::on_closed(&in_round(2, 0));
		assert!(submit_action(&offline, ActionKind::Speak, "x").is_none());
	}

	#[test]
	fn chat_needs_only_connection() {
		let mut state = connected();
		state.turn_gate.has_submitted_action = true;
		let out = send_chat(&state, "hi").unwrap();
		assert_eq!(out.next, None);
		assert_eq!(out.command.kind(), "chat_message");

		assert!(send_chat(&SessionState::default(), "hi").is_none());
	}

	#[test]
	fn start_requires_creator() {
		let state = connected();
		assert!(start_session(&state, StartOptions::default()).is_none());
	}

	#[test]
	fn start_falls_back_to_staged_config() {
		let mut state = connected();
		state.role_flags.is_creator = true;
		let state = stage_config(
			&state,
			ConfigUpdate {
				theme: Some("Haunted keep".into()),
				gm_role: Some("Grim narrator".into()),
				chapter_length: Some(ChapterLength::Long),
				narrator_voice_id: Some("voice-7".into()),
				..ConfigUpdate::default()
			},
		);

		let out = start_session(
			&state,
			StartOptions {
				theme: Some(String::new()),
				language: Some("French".into()),
				..StartOptions::default()
			},
		)
		.unwrap();

		assert_eq!(
			out.command,
			ClientCommand::StartGame {
				game_id: "S1".into(),
				theme: "Haunted keep".into(),
				language: "French".into(),
				gm_role: "Grim narrator".into(),
				chapter_length: ChapterLength::Long,
				narrator_voice: Some("voice-7".into()),
			}
		);
		let next = out.next.unwrap();
		assert_eq!(next.loading.message, PREPARING_ADVENTURE);
	}

	#[test]
	fn start_omits_unstaged_narrator_voice() {
		let mut state = connected();
		state.role_flags.is_creator = true;
		let out = start_session(&state, StartOptions::default()).unwrap();
		match out.command {
			ClientCommand::StartGame {
				language,
				narrator_voice,
				chapter_length,
				..
			} => {
				assert_eq!(language, "English");
				assert_eq!(chapter_length, ChapterLength::Medium);
				assert_eq!(narrator_voice, None);
			}
			other => panic!("Expected StartGame, got {other:?}"),
		}
	}

	#[test]
	fn stage_config_works_offline_and_keeps_unset_fields() {
		let state = SessionState::default();
		let next = stage_config(
			&state,
			ConfigUpdate {
				theme: Some("Pirates".into()),
				..ConfigUpdate::default()
			},
		);
		assert_eq!(next.session_config.theme, "Pirates");
		assert_eq!(next.session_config.language, "English");
		assert!(!next.is_connected());
	}

	#[test]
	fn character_update_sends_profile() {
		let profile = CharacterProfile {
			character_name: Some("Elara".into()),
			..CharacterProfile::default()
		};
		let out = update_character(&connected(), profile.clone()).unwrap();
		assert_eq!(
			out.command,
			ClientCommand::UpdateCharacter {
				game_id: "S1".into(),
				profile,
			}
		);
		assert_eq!(out.next, None);
		assert!(update_character(&SessionState::default(), CharacterProfile::default()).is_none());
	}
}
