
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tale::config::{DEFAULT_ASSET_BASE, DEFAULT_SERVER_URL};
use url::Url;

use crate::styles::cli_styles;

#[derive(Parser, Debug)]
#[command(name = "tale")]
#[command(about = "Traveler's Tale - play a shared story from the terminal")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Websocket base of the session server
	#[arg(long, global = true, value_name = "URL", default_value = DEFAULT_SERVER_URL, value_parser = parse_server_url)]
	pub server: String,

	/// Base address narration and music paths are resolved against
	#[arg(long, global = true, value_name = "URL", default_value = DEFAULT_ASSET_BASE, value_parser = parse_asset_url)]
	pub assets: String,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Join a session and play interactively
	///
	/// Lines typed at the prompt are sent as chat. Slash commands:
	/// /act <kind> <text>, /start [theme], /config key=value..., /char key=value...,
	/// /state, /quit
	Play {
		/// Session to join
		session: String,
		/// Display name of the local player
		name: String,
	},

	/// Fold a recorded NDJSON event log and print the final state as JSON
	Replay {
		/// File with one server event per line
		file: PathBuf,

		/// Local player id the log was recorded as
		#[arg(long, default_value = "")]
		player_id: String,

		/// Local player name the log was recorded as
		#[arg(long, default_value = "")]
		player_name: String,

		/// Session id to stage in the replayed identity
		#[arg(long, default_value = "replay")]
		session: String,
	},
}

fn parse_server_url(value: &str) -> Result<String, String> {
	parse_url(value, &["ws", "wss"])
}

fn parse_asset_url(value: &str) -> Result<String, String> {
	parse_url(value, &["http", "https"])
}

fn parse_url(value: &str, schemes: &[&str]) -> Result<String, String> {
	let url = Url::parse(value).map_err(|e| format!("invalid URL '{value}': {e}"))?;
	if !schemes.contains(&url.scheme()) {
		return Err(format!(
			"unsupported scheme '{}', expected one of: {}",
			url.scheme(),
			schemes.join(", ")
		));
	}
	Ok(value.trim_end_matches('/').to_string())
}
