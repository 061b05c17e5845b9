use crate::config::parser::parse_layer_file;
use crate::config::types::{LAYER_FILE_NAME, LoadedLayer, MergedLayers};
use crate::error::{MergeError, Result};
use crate::merge::{MergeOptions, deep_update_with};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that, if truthy, skips the user layer.
pub const DISABLE_USER_LAYER_ENV_VAR: &str = "DEEPMERGE_NO_USER_CONFIG";

/// Discover and load all layer files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.deepmerge.toml`
/// 2. If found and its `[deepmerge]` table says `root = true`, skip to the user layer
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.deepmerge.toml (unless disabled)
///
/// Returns layers in cascade order (most specific first).
pub fn discover_layers(start_dir: &Path) -> Result<Vec<LoadedLayer>> {
	let mut layers = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	loop {
		let layer_path = current_dir.join(LAYER_FILE_NAME);

		if layer_path.is_file() {
			let layer = parse_layer_file(&layer_path)?;
			let is_root = layer.meta.root;
			debug!(path = %layer_path.display(), root = is_root, "found layer");

			layers.push(LoadedLayer {
				layer,
				path: layer_path,
			});

			if is_root {
				break;
			}
		}

		match current_dir.parent() {
			Some(parent) => current_dir = parent.to_path_buf(),
			None => break,
		}
	}

	if let Some(user_layer) = load_user_layer(&layers)? {
		layers.push(user_layer);
	}

	Ok(layers)
}

/// Load the user's ~/.deepmerge.toml if it exists and isn't disabled.
fn load_user_layer(existing: &[LoadedLayer]) -> Result<Option<LoadedLayer>> {
	if is_env_truthy(DISABLE_USER_LAYER_ENV_VAR) {
		debug!("user layer disabled by {}", DISABLE_USER_LAYER_ENV_VAR);
		return Ok(None);
	}

	let user_layer_path = user_layer_path()?;

	// The directory walk already picked it up when start_dir is under $HOME.
	if existing.iter().any(|loaded| loaded.path == user_layer_path) {
		return Ok(None);
	}

	if user_layer_path.is_file() {
		let layer = parse_layer_file(&user_layer_path)?;
		debug!(path = %user_layer_path.display(), "found user layer");
		Ok(Some(LoadedLayer {
			layer,
			path: user_layer_path,
		}))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Merge discovered layers into a single effective configuration.
///
/// Layers arrive most specific first, so they are applied in reverse: the
/// user layer first, the layer closest to `start_dir` last.
pub fn merge_layers(layers: &[LoadedLayer], opts: MergeOptions) -> MergedLayers {
	let mut merged = MergedLayers::default();

	for loaded in layers.iter().rev() {
		deep_update_with(&mut merged.data, [&loaded.layer.data], opts);
		merged.sources.push(loaded.path.clone());
	}

	merged
}

/// Convenience function to discover, load, and merge layers from a directory.
pub fn load_merged_layers(start_dir: &Path, opts: MergeOptions) -> Result<MergedLayers> {
	let layers = discover_layers(start_dir)?;
	Ok(merge_layers(&layers, opts))
}

/// Get the path to the user's layer file.
pub fn user_layer_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(MergeError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(LAYER_FILE_NAME))
}
