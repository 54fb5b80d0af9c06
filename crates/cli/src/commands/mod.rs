mod play;
mod replay;

use tale::{AssetBase, ClientConfig};

use crate::cli::{Cli, Commands};
use crate::error::Result;

pub async fn dispatch(cli: Cli) -> Result<()> {
	let config = ClientConfig::new(cli.server).with_assets(AssetBase::new(cli.assets));
	tracing::debug!(server = %config.server_url, assets = %config.assets.as_str(), "Resolved client config");

	match cli.command {
		Commands::Play { session, name } => play::run(config, &session, &name).await,
		Commands::Replay {
			file,
			player_id,
			player_name,
			session,
		} => replay::run(&config, &file, session, player_id, player_name),
	}
}
