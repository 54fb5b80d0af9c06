//! Parsing of lines typed at the play prompt.

use tale::{ActionKind, ChapterLength, CharacterProfile, ConfigUpdate, StartOptions};

use crate::error::{CliError, Result};

/// One parsed prompt line.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
	Chat(String),
	Act { kind: ActionKind, text: String },
	Start(StartOptions),
	Config(ConfigUpdate),
	Character(CharacterProfile),
	ShowState,
	Help,
	Quit,
}

pub const HELP: &str = "\
/act <kind> <text>     submit this round's action (kinds: speak, action, attack, defend, cast_spell, use_item)
/start [theme]         start the session (creator only)
/config key=value...   stage settings: theme, language, gm_role, chapter_length, narrator_voice
/char key=value...     edit your character: name, description, voice, gender
/state                 print the full session state as JSON
/quit                  leave the session
anything else          chat";

/// Parses one line. Returns `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<Input>> {
	let line = line.trim();
	if line.is_empty() {
		return Ok(None);
	}
	let Some(rest) = line.strip_prefix('/') else {
		return Ok(Some(Input::Chat(line.to_string())));
	};

	let (command, args) = match rest.split_once(char::is_whitespace) {
		Some((command, args)) => (command, args.trim()),
		None => (rest, ""),
	};

	let input = match command {
		"act" | "a" => parse_act(args)?,
		"start" => Input::Start(StartOptions {
			theme: Some(args.to_string()).filter(|t| !t.is_empty()),
			..StartOptions::default()
		}),
		"config" => Input::Config(parse_config(args)?),
		"char" | "character" => Input::Character(parse_character(args)?),
		"state" => Input::ShowState,
		"help" | "?" => Input::Help,
		"quit" | "exit" | "q" => Input::Quit,
		other => return Err(CliError::input(format!("unknown command '/{other}', try /help"))),
	};
	Ok(Some(input))
}

fn parse_act(args: &str) -> Result<Input> {
	let (kind, text) = args
		.split_once(char::is_whitespace)
		.ok_or_else(|| CliError::input("usage: /act <kind> <text>"))?;
	let kind = kind
		.parse::<ActionKind>()
		.map_err(|e| CliError::input(e.to_string()))?;
	let text = text.trim();
	if text.is_empty() {
		return Err(CliError::input("usage: /act <kind> <text>"));
	}
	Ok(Input::Act {
		kind,
		text: text.to_string(),
	})
}

fn parse_config(args: &str) -> Result<ConfigUpdate> {
	let mut update = ConfigUpdate::default();
	for (key, value) in pairs(args)? {
		match key {
			"theme" => update.theme = Some(value),
			"language" | "lang" => update.language = Some(value),
			"gm_role" | "gm" => update.gm_role = Some(value),
			"chapter_length" | "length" => {
				let length = value
					.parse::<ChapterLength>()
					.map_err(|e| CliError::input(e.to_string()))?;
				update.chapter_length = Some(length);
			}
			"narrator_voice" | "voice" => update.narrator_voice_id = Some(value),
			other => return Err(CliError::input(format!("unknown setting '{other}'"))),
		}
	}
	Ok(update)
}

fn parse_character(args: &str) -> Result<CharacterProfile> {
	let mut profile = CharacterProfile::default();
	for (key, value) in pairs(args)? {
		match key {
			"name" => profile.character_name = Some(value),
			"description" | "desc" => profile.character_description = Some(value),
			"voice" => profile.character_voice = Some(value),
			"gender" => profile.character_gender = Some(value),
			other => return Err(CliError::input(format!("unknown character field '{other}'"))),
		}
	}
	if profile.is_empty() {
		return Err(CliError::input("usage: /char key=value..."));
	}
	Ok(profile)
}

/// Splits `a=1 b=two words` into `[("a", "1"), ("b", "two words")]`. Words
/// without `=` continue the previous value.
fn pairs(args: &str) -> Result<Vec<(&str, String)>> {
	let mut pairs: Vec<(&str, String)> = Vec::new();
	for word in args.split_whitespace() {
		if let Some((key, value)) = word.split_once('=').filter(|(key, _)| !key.is_empty()) {
			pairs.push((key, value.to_string()));
			continue;
		}
		let Some((_, value)) = pairs.last_mut() else {
			return Err(CliError::input(format!("expected key=value, got '{word}'")));
		};
		value.push(' ');
		value.push_str(word);
	}
	Ok(pairs)
}
