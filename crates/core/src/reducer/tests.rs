use tale_protocol::{ActionKind, ResolvedAction};

use super::*;

const NOW: i64 = 1_700_000_000_000;

fn assets() -> AssetBase {
	AssetBase::new("http://localhost:8000")
}

fn identity(id: &str, name: &str) -> Identity {
	Identity {
		session_id: "S1".into(),
		local_player_id: id.into(),
		local_player_name: name.into(),
	}
}

fn connected(id: &str, name: &str) -> SessionState {
	on_open(&SessionState::default(), identity(id, name))
}

fn fold(state: &SessionState, event: ServerEvent) -> Transition {
	let assets = assets();
	let ctx = ReduceContext {
		assets: &assets,
		received_at: NOW,
	};
	apply(state, &event, &ctx)
}

fn decode(json: &str) -> ServerEvent {
	ServerEvent::decode(json).unwrap()
}

fn started(needed: u32, received: u32) -> ServerEvent {
	ServerEvent::GameStarted(GameStarted {
		current_story: "You wake in a tavern.".into(),
		current_player: "p1".into(),
		game_state: GamePhase::PlayerTurn,
		voice_file: None,
		background_music: None,
		actions_needed: Some(needed),
		actions_received: Some(received),
		waiting_for: None,
	})
}

#[test]
fn first_join_sets_roster_and_role_flags() {
	let state = connected("p1", "Alice");
	let event = decode(
		r#"{"type":"player_joined","player":{"id":"p1","name":"Alice"},
		"all_players":[{"id":"p1","name":"Alice"}],"is_game_creator":true,"game_state":"waiting"}"#,
	);

	let next = fold(&state, event).state;

	assert_eq!(next.roster.len(), 1);
	assert_eq!(next.roster[0].name, "Alice");
	assert!(next.role_flags.is_first_player);
	assert!(next.role_flags.is_creator);
	assert_eq!(next.phase, GamePhase::Waiting);
}

#[test]
fn larger_roster_is_never_first_player() {
	let state = connected("p1", "Alice");
	let event = decode(
		r#"{"type":"player_joined","player":{"id":"p2","name":"Bob"},
		"all_players":[{"id":"p1","name":"Alice"},{"id":"p2","name":"Bob"}],
		"is_game_creator":false,"game_state":"waiting"}"#,
	);

	let next = fold(&state, event).state;

	assert_eq!(next.roster.len(), 2);
	assert!(!next.role_flags.is_first_player);
	assert!(!next.role_flags.is_creator);
}

#[test]
fn sole_player_with_other_id_is_not_first_player() {
	let state = connected("p9", "Zed");
	let event = decode(
		r#"{"type":"player_joined","player":{"id":"p1","name":"Alice"},
		"all_players":[{"id":"p1","name":"Alice"}],"game_state":"waiting"}"#,
	);

	let next = fold(&state, event).state;

	assert!(!next.role_flags.is_first_player);
}

#[test]
fn join_without_full_roster_appends_player() {
	let mut state = connected("p1", "Alice");
	state.roster = vec![Player::new("p1", "Alice")];
	let event = decode(
		r#"{"type":"player_joined","player":{"id":"p2","name":"Bob"},"game_state":"waiting"}"#,
	);

	let next = fold(&state, event).state;

	let ids: Vec<_> = next.roster.iter().map(|p| p.id.as_str()).collect();
	assert_eq!(ids, ["p1", "p2"]);
}

#[test]
fn join_without_full_roster_keeps_ids_unique() {
	let mut state = connected("p1", "Alice");
	state.roster = vec![Player::new("p1", "Alice"), Player::new("p2", "Bob")];
	let event = decode(
		r#"{"type":"player_joined","player":{"id":"p2","name":"Bobby"},"game_state":"waiting"}"#,
	);

	let next = fold(&state, event).state;

	assert_eq!(next.roster.len(), 2);
	assert_eq!(next.roster[1].name, "Bobby");
}

#[test]
fn join_keeps_story_when_event_has_none() {
	let mut state = connected("p2", "Bob");
	state.narrative.current_story = "Earlier.".into();
	state.narrative.current_player = "All players".into();
	let event = decode(
		r#"{"type":"player_joined","player":{"id":"p2","name":"Bob"},
		"current_story":"","current_player":null,"game_state":"player_turn"}"#,
	);

	let next = fold(&state, event).state;

	assert_eq!(next.narrative.current_story, "Earlier.");
	assert_eq!(next.narrative.current_player, "All players");
	assert_eq!(next.phase, GamePhase::PlayerTurn);
}

#[test]
fn game_started_opens_round() {
	let state = connected("p1", "Alice");

	let next = fold(&state, started(2, 0)).state;

	assert_eq!(next.phase, GamePhase::PlayerTurn);
	assert!(next.turn_gate.is_my_turn);
	assert!(!next.turn_gate.has_submitted_action);
	assert_eq!(next.turn_gate.actions_needed, 2);
	assert_eq!(next.turn_gate.actions_received, 0);
	assert_eq!(next.narrative.history.len(), 1);
	assert_eq!(next.narrative.history[0].text, "You wake in a tavern.");
	assert_eq!(next.narrative.current_story, "You wake in a tavern.");
}

#[test]
fn game_started_resets_a_stale_round() {
	let mut state = connected("p1", "Alice");
	state.turn_gate.has_submitted_action = true;
	state.turn_gate.is_my_turn = false;
	state.turn_gate.waiting_for = vec!["Bob".into()];
	state.loading = Loading::busy(PREPARING_ADVENTURE);
	state.phase = GamePhase::GmWorking;

	let next = fold(&state, started(3, 1)).state;

	assert!(next.turn_gate.is_my_turn);
	assert!(!next.turn_gate.has_submitted_action);
	assert!(next.turn_gate.waiting_for.is_empty());
	assert!(!next.loading.is_loading);
	assert_eq!(next.turn_gate.actions_needed, 3);
	assert_eq!(next.turn_gate.actions_received, 1);
	assert_eq!(next.phase, GamePhase::PlayerTurn);
}

#[test]
fn story_update_resets_submission_and_loading() {
	let mut state = connected("p1", "Alice");
	state.turn_gate.has_submitted_action = true;
	state.turn_gate.is_my_turn = false;
	state.turn_gate.waiting_for = vec!["Bob".into()];
	state.loading = Loading::busy(GM_PROCESSING);
	state.phase = GamePhase::GmWorking;

	let event = decode(
		r#"{"type":"story_update","story":"The door creaks.","current_player":"All players",
		"game_state":"player_turn"}"#,
	);
	let next = fold(&state, event).state;

	assert!(next.turn_gate.is_my_turn);
	assert!(!next.turn_gate.has_submitted_action);
	assert!(!next.loading.is_loading);
	assert!(next.loading.message.is_empty());
	assert_eq!(next.turn_gate.actions_needed, 0);
	assert_eq!(next.turn_gate.actions_received, 0);
	assert!(next.turn_gate.waiting_for.is_empty());
	assert_eq!(next.narrative.current_player, "All players");
}

#[test]
fn story_update_resolves_media_locations() {
	let state = connected("p1", "Alice");
	let event = decode(
		r#"{"type":"story_update","story":"Rain.","current_player":"All players",
		"game_state":"player_turn","voice_file":"static/audio/n1.mp3",
		"background_music":"static/music/rain.mp3"}"#,
	);

	let next = fold(&state, event).state;

	assert_eq!(
		next.narrative.voice_url.as_deref(),
		Some("http://localhost:8000/static/audio/n1.mp3")
	);
	assert_eq!(
		next.narrative.music_url.as_deref(),
		Some("http://localhost:8000/static/music/rain.mp3")
	);
	let entry = &next.narrative.history[0];
	assert_eq!(entry.voice_file.as_deref(), Some("static/audio/n1.mp3"));
	assert_eq!(entry.background_music.as_deref(), Some("static/music/rain.mp3"));
}

#[test]
fn missing_media_yields_no_reference() {
	let mut state = connected("p1", "Alice");
	state.narrative.voice_url = Some("http://localhost:8000/old.mp3".into());
	let event = decode(
		r#"{"type":"story_update","story":"Quiet.","current_player":"All players",
		"game_state":"player_turn","voice_file":"","background_music":null}"#,
	);

	let next = fold(&state, event).state;

	assert_eq!(next.narrative.voice_url, None);
	assert_eq!(next.narrative.music_url, None);
	assert_eq!(next.narrative.history[0].voice_file, None);
}

#[test]
fn story_update_records_resolved_actions() {
	let state = connected("p1", "Alice");
	let event = decode(
		r#"{"type":"story_update","story":"Done.","current_player":"All players",
		"game_state":"player_turn",
		"actions_processed":[{"player":"Alice","action":"Hello","type":"speak"}]}"#,
	);

	let next = fold(&state, event).state;
	assert_eq!(
		next.narrative.resolved_actions,
		vec![ResolvedAction {
			player: "Alice".into(),
			action: "Hello".into(),
			kind: ActionKind::Speak,
		}]
	);

	let restarted = fold(&next, started(1, 0)).state;
	assert!(restarted.narrative.resolved_actions.is_empty());
}

#[test]
fn action_received_overwrites_tallies_and_logs() {
	let mut state = fold(&connected("p1", "Alice"), started(2, 0)).state;
	state.turn_gate.has_submitted_action = true;
	let event = decode(
		r#"{"type":"action_received","actions_received":2,"actions_needed":2,"message":"All in"}"#,
	);

	let next = fold(&state, event).state;

	assert_eq!(next.turn_gate.actions_received, 2);
	assert_eq!(next.turn_gate.actions_needed, 2);
	assert!(next.turn_gate.has_submitted_action);
	assert_eq!(next.chat_log.len(), state.chat_log.len() + 1);
	let entry = next.chat_log.last().unwrap();
	assert!(entry.is_system());
	assert_eq!(entry.text, "All in");
	assert_eq!(entry.timestamp, NOW);
}

#[test]
fn action_received_trusts_server_counts() {
	let state = connected("p1", "Alice");
	let event = decode(
		r#"{"type":"action_received","actions_received":5,"actions_needed":2,
		"waiting_for":["Bob"],"message":"odd"}"#,
	);

	let next = fold(&state, event).state;

	assert_eq!(next.turn_gate.actions_received, 5);
	assert_eq!(next.turn_gate.actions_needed, 2);
	assert_eq!(next.turn_gate.waiting_for, vec!["Bob".to_string()]);
}

#[test]
fn gm_working_sets_phase_and_loading() {
	let state = fold(&connected("p1", "Alice"), started(2, 1)).state;
	let event = decode(
		r#"{"type":"gm_working","actions_received":2,"actions_needed":2,"message":"Thinking"}"#,
	);

	let next = fold(&state, event).state;

	assert_eq!(next.phase, GamePhase::GmWorking);
	assert!(next.loading.is_loading);
	assert_eq!(next.loading.message, GM_PROCESSING);
	assert_eq!(next.turn_gate.actions_received, 2);
	assert_eq!(next.chat_log.last().map(|c| c.text.as_str()), Some("Thinking"));
}

#[test]
fn player_disconnected_replaces_roster() {
	let mut state = connected("p1", "Alice");
	state.roster = vec![Player::new("p1", "Alice"), Player::new("p2", "Bob")];
	state.narrative.current_player = "Bob".into();
	let event = decode(
		r#"{"type":"player_disconnected","remaining_players":[{"id":"p1","name":"Alice"}],
		"current_player":"Alice","message":"Bob left the game"}"#,
	);

	let next = fold(&state, event).state;

	assert_eq!(next.roster.len(), 1);
	assert_eq!(next.narrative.current_player, "Alice");
	assert_eq!(next.chat_log.last().map(|c| c.text.as_str()), Some("Bob left the game"));
}

#[test]
fn game_ended_logs_and_notifies() {
	let state = fold(&connected("p1", "Alice"), started(1, 0)).state;

	let transition = fold(
		&state,
		ServerEvent::GameEnded {
			message: "The End".into(),
		},
	);

	assert_eq!(
		transition.notice,
		Some(Notice::SessionEnded {
			message: "The End".into()
		})
	);
	let mut expected = state.clone();
	expected.chat_log.push(ChatEntry::system("The End", NOW));
	assert_eq!(transition.state, expected);
}

#[test]
fn chat_relay_keeps_server_timestamp() {
	let state = connected("p1", "Alice");
	let event = decode(
		r#"{"type":"chat_message","player_name":"Bob","message":"hi","timestamp":42}"#,
	);

	let next = fold(&state, event).state;

	let entry = next.chat_log.last().unwrap();
	assert_eq!(entry.author, "Bob");
	assert_eq!(entry.text, "hi");
	assert_eq!(entry.timestamp, 42);
	assert!(!entry.is_system());
}

#[test]
fn character_updated_replaces_roster() {
	let mut state = connected("p1", "Alice");
	state.roster = vec![Player::new("p1", "Alice")];
	let event = decode(
		r#"{"type":"character_updated","all_players":[
		{"id":"p1","name":"Alice","character_name":"Elara","character_gender":"female"}]}"#,
	);

	let next = fold(&state, event).state;

	assert_eq!(next.roster[0].character_name.as_deref(), Some("Elara"));
	assert!(next.roster[0].has_character());
}

#[test]
fn error_event_notifies_without_touching_state() {
	let state = fold(&connected("p1", "Alice"), started(2, 0)).state;

	let transition = fold(
		&state,
		ServerEvent::Error {
			message: "Game is full".into(),
		},
	);

	assert_eq!(transition.state, state);
	let notice = transition.notice.unwrap();
	assert!(notice.is_blocking());
	assert_eq!(notice.message(), "Game is full");
}

#[test]
fn unknown_event_is_identity() {
	let state = fold(&connected("p1", "Alice"), started(2, 0)).state;

	let transition = fold(&state, decode(r#"{"type":"voices_list","voices":[]}"#));

	assert_eq!(transition.state, state);
	assert_eq!(transition.notice, None);
}

#[test]
fn open_and_close_toggle_connection_only() {
	let opened = connected("p1", "Alice");
	assert!(opened.is_connected());
	assert_eq!(opened.identity.local_player_name, "Alice");

	let mut busy = fold(&opened, started(2, 0)).state;
	busy.chat_log.push(ChatEntry::system("x", 1));
	let closed = on_closed(&busy);

	assert!(!closed.is_connected());
	assert_eq!(closed.chat_log, busy.chat_log);
	assert_eq!(closed.narrative, busy.narrative);
}
