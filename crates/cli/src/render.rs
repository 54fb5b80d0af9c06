//! Turns consecutive snapshots into lines for the play screen.
//!
//! The session publishes whole documents; the terminal only wants what
//! changed. [`changes`] compares two snapshots and renders the difference.

use tale::{ChatEntry, Notice, Player, SessionState};

use crate::styles;

/// Lines describing what changed from `prev` to `next`, in display order.
pub fn changes(prev: &SessionState, next: &SessionState) -> Vec<String> {
	let mut lines = Vec::new();

	if prev.connection != next.connection {
		if next.is_connected() {
			lines.push(format!(
				"{} {} as {}",
				styles::label("Connected"),
				next.identity.session_id,
				styles::author(&next.identity.local_player_name)
			));
		} else {
			lines.push(styles::error("Disconnected").to_string());
		}
	}

	if prev.roster != next.roster && !next.roster.is_empty() {
		lines.push(format!("{} {}", styles::label("Players:"), roster(&next.roster)));
	}

	let character = |state: &SessionState| {
		state
			.local_player()
			.and_then(|p| p.character_name.clone())
	};
	if let Some(name) = character(next).filter(|name| character(prev).as_ref() != Some(name)) {
		lines.push(styles::system(&format!("You are playing {name}.")).to_string());
	}

	if prev.role_flags.is_creator != next.role_flags.is_creator && next.role_flags.is_creator {
		lines.push(
			styles::system("You created this session. Use /start [theme] when everyone is here.")
				.to_string(),
		);
	}

	if next.narrative.resolved_actions != prev.narrative.resolved_actions {
		for action in &next.narrative.resolved_actions {
			lines.push(format!(
				"  {} ({}): {}",
				styles::author(&action.player),
				action.kind,
				action.action
			));
		}
	}

	let told = prev.narrative.history.len();
	for entry in next.narrative.history.iter().skip(told) {
		lines.push(String::new());
		lines.push(styles::story(&entry.text).to_string());
	}
	if next.narrative.history.len() > told {
		if let Some(voice) = &next.narrative.voice_url {
			lines.push(styles::dim(&format!("narration: {voice}")).to_string());
		}
		if next.narrative.music_url != prev.narrative.music_url {
			if let Some(music) = &next.narrative.music_url {
				lines.push(styles::dim(&format!("music: {music}")).to_string());
			}
		}
	}

	if prev.phase != next.phase {
		lines.push(format!("{} {}", styles::label("Phase:"), next.phase));
	}

	for entry in next.chat_log.iter().skip(prev.chat_log.len()) {
		lines.push(chat(entry));
	}

	let prev_gate = &prev.turn_gate;
	let gate = &next.turn_gate;
	if (prev_gate.actions_received, prev_gate.actions_needed)
		!= (gate.actions_received, gate.actions_needed)
		&& gate.actions_needed > 0
	{
		let mut tally = format!("Actions {}/{}", gate.actions_received, gate.actions_needed);
		if !gate.waiting_for.is_empty() {
			tally.push_str(&format!(", waiting for {}", gate.waiting_for.join(", ")));
		}
		lines.push(styles::dim(&tally).to_string());
	}

	if next.loading.is_loading && next.loading != prev.loading {
		lines.push(styles::dim(&next.loading.message).to_string());
	}

	if next.can_submit_action() && !prev.can_submit_action() {
		lines.push(styles::label("Your move. /act <kind> <text>").to_string());
	}

	lines
}

pub fn chat(entry: &ChatEntry) -> String {
	if entry.is_system() {
		styles::system(&entry.text).to_string()
	} else {
		format!("{}: {}", styles::author(&entry.author), entry.text)
	}
}

pub fn notice(notice: &Notice) -> String {
	match notice {
		Notice::ServerError { message } => format!("{} {message}", styles::error("Server error:")),
		Notice::SessionEnded { message } => {
			format!("{} {message}", styles::label("The session has ended."))
		}
	}
}

fn roster(players: &[Player]) -> String {
	players
		.iter()
		.map(|p| match &p.character_name {
			Some(character) => format!("{} ({character})", p.name),
			None => p.name.clone(),
		})
		.collect::<Vec<_>>()
		.join(", ")
}
