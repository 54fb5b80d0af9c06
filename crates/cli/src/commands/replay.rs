use std::path::Path;

use tale::{ClientConfig, Identity, Replayer};

use crate::error::{CliError, Result};

/// Folds an NDJSON event log and prints the final state to stdout.
///
/// Lines that fail to decode are reported on stderr and skipped.
pub fn run(
	config: &ClientConfig,
	file: &Path,
	session_id: String,
	player_id: String,
	player_name: String,
) -> Result<()> {
	let log = std::fs::read_to_string(file).map_err(|source| CliError::ReadLog {
		path: file.to_path_buf(),
		source,
	})?;

	let identity = Identity {
		session_id,
		local_player_id: player_id,
		local_player_name: player_name,
	};
	let mut replayer = Replayer::new(identity, config.assets.clone());

	let mut skipped = 0usize;
	for (index, line) in log.lines().enumerate() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}
		match replayer.feed(line) {
			Ok(Some(notice)) => tracing::info!(line = index + 1, ?notice, "Notice"),
			Ok(None) => {}
			Err(err) => {
				skipped += 1;
				eprintln!("line {}: {err}", index + 1);
			}
		}
	}

	tracing::info!(applied = replayer.applied(), skipped, "Replay finished");
	let state = replayer.into_state();
	println!("{}", serde_json::to_string_pretty(&state)?);
	Ok(())
}
