//! Resolution of server-relative media paths into fetch locations.

/// Base address of the server that hosts narration and music files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBase(String);

impl AssetBase {
	/// Creates a base from an absolute address; a trailing `/` is dropped.
	pub fn new(base: impl Into<String>) -> Self {
		let base = base.into();
		Self(base.trim_end_matches('/').to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Joins `path` onto the base. An empty path yields no location.
	pub fn resolve(&self, path: &str) -> Option<String> {
		if path.is_empty() {
			return None;
		}
		Some(format!("{}/{}", self.0, path.trim_start_matches('/')))
	}

	/// Like [`resolve`](Self::resolve), for an optional server field.
	pub fn resolve_opt(&self, path: Option<&str>) -> Option<String> {
		path.and_then(|p| self.resolve(p))
	}
}

impl Default for AssetBase {
	fn default() -> Self {
		Self::new(crate::config::DEFAULT_ASSET_BASE)
	}
}
