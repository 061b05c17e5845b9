use crate::node::Mapping;
use serde::Deserialize;
use std::path::PathBuf;

/// Name of the reserved top-level table that carries layer metadata.
///
/// The table is stripped before the layer's data takes part in a merge.
pub const META_TABLE: &str = "deepmerge";

/// File name looked up in every directory of the cascade.
pub const LAYER_FILE_NAME: &str = ".deepmerge.toml";

/// Metadata from the `[deepmerge]` table of a layer file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LayerMeta {
	/// If true, stop the directory cascade here and jump directly to the user layer.
	#[serde(default)]
	pub root: bool,
}

/// A parsed layer: metadata plus the configuration data it contributes.
#[derive(Debug, Clone, Default)]
pub struct Layer {
	/// Cascade metadata.
	pub meta: LayerMeta,

	/// Everything except the `[deepmerge]` table.
	pub data: Mapping,
}

/// A layer with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedLayer {
	/// The parsed layer.
	pub layer: Layer,

	/// The path this layer was loaded from.
	pub path: PathBuf,
}

/// The effective configuration of a cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedLayers {
	/// Data of all layers, least specific merged first.
	pub data: Mapping,

	/// Contributing layer files, in the order they were applied.
	pub sources: Vec<PathBuf>,
}
