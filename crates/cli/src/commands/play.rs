use tale::{ClientConfig, Session, SessionState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use crate::error::{CliError, Result};
use crate::input::{HELP, Input, parse_line};
use crate::{render, styles};

/// Interactive session: renders snapshot changes, reads prompt lines.
pub async fn run(config: ClientConfig, session_id: &str, name: &str) -> Result<()> {
	let session = Session::new(config);
	let mut updates = session.subscribe();
	let mut notices = session.notices();
	let mut shown = SessionState::default();

	println!(
		"{}",
		styles::dim(&format!("Connecting to {}...", session.config().server_url))
	);
	session.connect(session_id, name).await?;
	println!("{}", styles::dim("Type /help for commands."));

	let mut lines = BufReader::new(tokio::io::stdin()).lines();
	loop {
		tokio::select! {
			changed = updates.changed() => {
				if changed.is_err() {
					break;
				}
				let next = updates.borrow_and_update().clone();
				for line in render::changes(&shown, &next) {
					println!("{line}");
				}
				let dropped = shown.is_connected() && !next.is_connected();
				shown = next;
				if dropped {
					break;
				}
			}
			notice = notices.recv() => match notice {
				Ok(notice) => println!("{}", render::notice(&notice)),
				Err(RecvError::Lagged(n)) => tracing::warn!(dropped = n, "Notice receiver lagged"),
				Err(RecvError::Closed) => break,
			},
			line = lines.next_line() => {
				let Some(line) = line? else {
					break;
				};
				match handle(&session, &line) {
					Ok(true) => {}
					Ok(false) => break,
					Err(err) if err.is_recoverable() => {
						eprintln!("{}", styles::error(&err.to_string()));
					}
					Err(err) => return Err(err),
				}
			}
			_ = tokio::signal::ctrl_c() => break,
		}
	}

	session.disconnect();
	Ok(())
}

/// Executes one prompt line. Returns false when the player asked to quit.
fn handle(session: &Session, line: &str) -> Result<bool> {
	let Some(input) = parse_line(line)? else {
		return Ok(true);
	};

	match input {
		Input::Chat(text) => {
			if !session.send_chat(&text)? {
				return Err(CliError::input("not connected"));
			}
		}
		Input::Act { kind, text } => {
			if !session.submit_action(kind, &text)? {
				let state = session.snapshot();
				let reason = if state.turn_gate.has_submitted_action {
					"you already acted this round"
				} else {
					"it is not your turn"
				};
				return Err(CliError::input(reason));
			}
		}
		Input::Start(options) => {
			if !session.start_session(options)? {
				return Err(CliError::input("only the session creator can start the story"));
			}
		}
		Input::Config(update) => {
			session.update_config(update);
			let config = session.snapshot().session_config;
			println!(
				"{} theme={:?} language={} gm_role={:?} length={}",
				styles::label("Staged:"),
				config.theme,
				config.language,
				config.gm_role,
				config.chapter_length.as_str()
			);
		}
		Input::Character(profile) => {
			if !session.update_character(profile)? {
				return Err(CliError::input("not connected"));
			}
		}
		Input::ShowState => {
			println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
		}
		Input::Help => println!("{HELP}"),
		Input::Quit => return Ok(false),
	}
	Ok(true)
}
