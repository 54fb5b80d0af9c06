//! Pure transition function from server events to session state.
//!
//! [`apply`] is total over [`ServerEvent`]: every variant has an arm and the
//! [`ServerEvent::Unknown`] arm returns the state untouched. Nothing here
//! performs IO; the caller supplies receipt time and the asset base through
//! [`ReduceContext`] so transitions are reproducible.

use tale_protocol::{
	ActionReceived, ChatRelay, GamePhase, GameStarted, GmWorking, Player, PlayerDisconnected,
	PlayerJoined, ServerEvent, StoryUpdate,
};

use crate::assets::AssetBase;
use crate::notice::Notice;
use crate::state::{
	ChatEntry, ConnectionStatus, Identity, Loading, SessionState, StoryEntry,
};

/// Loading message shown while the game master resolves a round.
pub const GM_PROCESSING: &str = "The Game Master is processing all actions...";

/// Loading message shown after submitting while others still have to act.
pub const WAITING_FOR_OTHERS: &str = "Action submitted! Waiting for other players...";

/// Loading message shown to the creator after asking the server to start.
pub const PREPARING_ADVENTURE: &str = "The Game Master is preparing your adventure...";

/// Inputs a transition needs besides the state and the event.
#[derive(Debug, Clone, Copy)]
pub struct ReduceContext<'a> {
	pub assets: &'a AssetBase,
	/// Local receipt time in unix milliseconds, stamped on system chat entries.
	pub received_at: i64,
}

/// Result of folding one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
	pub state: SessionState,
	/// Out-of-band notification for the presentation layer, if any.
	pub notice: Option<Notice>,
}

impl Transition {
	fn quiet(state: SessionState) -> Self {
		Self { state, notice: None }
	}
}

/// Folds one inbound event into `state`.
pub fn apply(state: &SessionState, event: &ServerEvent, ctx: &ReduceContext<'_>) -> Transition {
	let mut next = state.clone();
	match event {
		ServerEvent::PlayerJoined(joined) => player_joined(&mut next, joined),
		ServerEvent::StoryUpdate(update) => story_update(&mut next, update, ctx),
		ServerEvent::GameStarted(started) => game_started(&mut next, started, ctx),
		ServerEvent::ActionReceived(tally) => action_received(&mut next, tally, ctx),
		ServerEvent::GmWorking(working) => gm_working(&mut next, working, ctx),
		ServerEvent::PlayerDisconnected(left) => player_disconnected(&mut next, left, ctx),
		ServerEvent::GameEnded { message } => {
			next.chat_log.push(ChatEntry::system(message.clone(), ctx.received_at));
			return Transition {
				state: next,
				notice: Some(Notice::SessionEnded {
					message: message.clone(),
				}),
			};
		}
		ServerEvent::ChatMessage(relay) => chat_relay(&mut next, relay),
		ServerEvent::CharacterUpdated { all_players } => {
			next.roster = all_players.clone();
		}
		ServerEvent::Error { message } => {
			return Transition {
				state: next,
				notice: Some(Notice::ServerError {
					message: message.clone(),
				}),
			};
		}
		ServerEvent::Unknown => {}
	}
	Transition::quiet(next)
}

/// Marks the connection open and stages the local identity.
pub fn on_open(state: &SessionState, identity: Identity) -> SessionState {
	SessionState {
		connection: ConnectionStatus::Connected,
		identity,
		..state.clone()
	}
}

/// Marks the connection closed. Everything else is kept for display until
/// the session is explicitly torn down.
pub fn on_closed(state: &SessionState) -> SessionState {
	SessionState {
		connection: ConnectionStatus::Disconnected,
		..state.clone()
	}
}

fn player_joined(state: &mut SessionState, joined: &PlayerJoined) {
	match &joined.all_players {
		Some(all) => state.roster = all.clone(),
		None => upsert_player(&mut state.roster, joined.player.clone()),
	}

	if let Some(story) = joined.current_story.as_deref().filter(|s| !s.is_empty()) {
		state.narrative.current_story = story.to_string();
	}
	if let Some(current) = joined.current_player.as_deref().filter(|s| !s.is_empty()) {
		state.narrative.current_player = current.to_string();
	}
	state.phase = joined.game_state;

	let local_id = state.identity.local_player_id.as_str();
	state.role_flags.is_first_player =
		matches!(state.roster.as_slice(), [only] if only.id == local_id);
	state.role_flags.is_creator = joined.is_game_creator;
}

/// Appends `player`, or replaces the entry with the same id.
fn upsert_player(roster: &mut Vec<Player>, player: Player) {
	match roster.iter_mut().find(|p| p.id == player.id) {
		Some(existing) => *existing = player,
		None => roster.push(player),
	}
}

/// Fields shared by the two events that open a round.
struct Round<'a> {
	story: &'a str,
	current_player: &'a str,
	phase: GamePhase,
	voice_file: Option<&'a str>,
	background_music: Option<&'a str>,
	actions_needed: Option<u32>,
	actions_received: Option<u32>,
	waiting_for: Option<&'a [String]>,
}

fn story_update(state: &mut SessionState, update: &StoryUpdate, ctx: &ReduceContext<'_>) {
	begin_round(
		state,
		Round {
			story: &update.story,
			current_player: &update.current_player,
			phase: update.game_state,
			voice_file: update.voice_file.as_deref(),
			background_music: update.background_music.as_deref(),
			actions_needed: update.actions_needed,
			actions_received: update.actions_received,
			waiting_for: update.waiting_for.as_deref(),
		},
		ctx,
	);
	state.narrative.resolved_actions = update.actions_processed.clone();
}

fn game_started(state: &mut SessionState, started: &GameStarted, ctx: &ReduceContext<'_>) {
	begin_round(
		state,
		Round {
			story: &started.current_story,
			current_player: &started.current_player,
			phase: started.game_state,
			voice_file: started.voice_file.as_deref(),
			background_music: started.background_music.as_deref(),
			actions_needed: started.actions_needed,
			actions_received: started.actions_received,
			waiting_for: started.waiting_for.as_deref(),
		},
		ctx,
	);
	state.narrative.resolved_actions.clear();
}

fn begin_round(state: &mut SessionState, round: Round<'_>, ctx: &ReduceContext<'_>) {
	let voice_file = round.voice_file.filter(|p| !p.is_empty());
	let background_music = round.background_music.filter(|p| !p.is_empty());

	let narrative = &mut state.narrative;
	narrative.current_story = round.story.to_string();
	narrative.current_player = round.current_player.to_string();
	narrative.history.push(StoryEntry {
		text: round.story.to_string(),
		voice_file: voice_file.map(str::to_string),
		background_music: background_music.map(str::to_string),
	});
	narrative.voice_url = ctx.assets.resolve_opt(voice_file);
	narrative.music_url = ctx.assets.resolve_opt(background_music);

	state.phase = round.phase;
	state.loading = Loading::idle();

	// Every player acts once per round.
	let gate = &mut state.turn_gate;
	gate.is_my_turn = true;
	gate.has_submitted_action = false;
	gate.actions_needed = round.actions_needed.unwrap_or(0);
	gate.actions_received = round.actions_received.unwrap_or(0);
	gate.waiting_for = round.waiting_for.map(<[String]>::to_vec).unwrap_or_default();
}

fn action_received(state: &mut SessionState, tally: &ActionReceived, ctx: &ReduceContext<'_>) {
	let gate = &mut state.turn_gate;
	gate.actions_received = tally.actions_received;
	gate.actions_needed = tally.actions_needed;
	gate.waiting_for = tally.waiting_for.clone().unwrap_or_default();
	state
		.chat_log
		.push(ChatEntry::system(tally.message.clone(), ctx.received_at));
}

fn gm_working(state: &mut SessionState, working: &GmWorking, ctx: &ReduceContext<'_>) {
	state.phase = GamePhase::GmWorking;
	state.loading = Loading::busy(GM_PROCESSING);
	state.turn_gate.actions_received = working.actions_received;
	state.turn_gate.actions_needed = working.actions_needed;
	state
		.chat_log
		.push(ChatEntry::system(working.message.clone(), ctx.received_at));
}

fn player_disconnected(
	state: &mut SessionState,
	left: &PlayerDisconnected,
	ctx: &ReduceContext<'_>,
) {
	state.roster = left.remaining_players.clone();
	if let Some(current) = left.current_player.as_deref().filter(|s| !s.is_empty()) {
		state.narrative.current_player = current.to_string();
	}
	state
		.chat_log
		.push(ChatEntry::system(left.message.clone(), ctx.received_at));
}

fn chat_relay(state: &mut SessionState, relay: &ChatRelay) {
	// Relayed lines keep the server's clock, unlike system entries.
	state.chat_log.push(ChatEntry {
		author: relay.player_name.clone(),
		text: relay.message.clone(),
		timestamp: relay.timestamp,
	});
}

#[cfg(test)]
mod tests;
