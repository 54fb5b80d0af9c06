//! Client configuration.

use crate::assets::AssetBase;

/// Websocket base of the session server.
pub const DEFAULT_SERVER_URL: &str = "ws://localhost:8000";

/// Base address media paths are resolved against.
pub const DEFAULT_ASSET_BASE: &str = "http://localhost:8000";

/// Where to connect and where to fetch media from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
	/// Websocket base, e.g. `ws://localhost:8000`.
	pub server_url: String,
	/// Base for narration and music locations.
	pub assets: AssetBase,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			server_url: DEFAULT_SERVER_URL.to_string(),
			assets: AssetBase::default(),
		}
	}
}

impl ClientConfig {
	/// Creates a config for `server_url` with the default asset base.
	pub fn new(server_url: impl Into<String>) -> Self {
		Self {
			server_url: server_url.into(),
			..Self::default()
		}
	}

	pub fn with_assets(mut self, assets: AssetBase) -> Self {
		self.assets = assets;
		self
	}

	/// Websocket endpoint for one player connection.
	pub fn endpoint(&self, player_id: &str) -> String {
		format!("{}/ws/{}", self.server_url.trim_end_matches('/'), player_id)
	}
}
