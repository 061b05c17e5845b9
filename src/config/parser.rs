use crate::config::types::{Layer, LayerMeta, META_TABLE};
use crate::error::{MergeError, Result};
use crate::node::Mapping;
use std::path::Path;
use tracing::debug;

/// Parse a TOML file into a mapping, without interpreting any keys.
pub fn parse_mapping_file(path: &Path) -> Result<Mapping> {
	let content = read_file(path)?;
	parse_mapping_str(&content, path)
}

/// Parse TOML text into a mapping (useful for testing).
pub fn parse_mapping_str(content: &str, path: &Path) -> Result<Mapping> {
	let table: toml::Table = toml::from_str(content).map_err(|source| MergeError::LayerParse {
		path: path.to_path_buf(),
		source,
	})?;

	Ok(Mapping::from(table))
}

/// Parse a layer file from the given path.
pub fn parse_layer_file(path: &Path) -> Result<Layer> {
	let content = read_file(path)?;
	parse_layer_str(&content, path)
}

/// Parse a layer from a string (useful for testing).
pub fn parse_layer_str(content: &str, path: &Path) -> Result<Layer> {
	let mut table: toml::Table =
		toml::from_str(content).map_err(|source| MergeError::LayerParse {
			path: path.to_path_buf(),
			source,
		})?;

	let meta = match table.remove(META_TABLE) {
		Some(value) => value
			.try_into::<LayerMeta>()
			.map_err(|source| MergeError::LayerMeta {
				path: path.to_path_buf(),
				source,
			})?,
		None => LayerMeta::default(),
	};

	debug!(path = %path.display(), root = meta.root, keys = table.len(), "parsed layer");

	Ok(Layer {
		meta,
		data: Mapping::from(table),
	})
}

fn read_file(path: &Path) -> Result<String> {
	std::fs::read_to_string(path).map_err(|source| MergeError::LayerRead {
		path: path.to_path_buf(),
		source,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::node::Node;
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_layer() {
		let path = PathBuf::from("test.toml");
		let layer = parse_layer_str("", &path).unwrap();

		assert!(!layer.meta.root);
		assert!(layer.data.is_empty());
	}

	#[test]
	fn test_parse_layer_strips_meta_table() {
		let content = r#"
[deepmerge]
root = true

[params]
car = "4gheap"
"#;
		let path = PathBuf::from("test.toml");
		let layer = parse_layer_str(content, &path).unwrap();

		assert!(layer.meta.root);
		assert!(!layer.data.contains_key(META_TABLE));
		assert_eq!(
			layer
				.data
				.get("params")
				.and_then(Node::as_mapping)
				.and_then(|p| p.get("car")),
			Some(&Node::from("4gheap"))
		);
	}

	#[test]
	fn test_parse_mapping_keeps_meta_table() {
		let content = r#"
[deepmerge]
root = true
"#;
		let path = PathBuf::from("test.toml");
		let mapping = parse_mapping_str(content, &path).unwrap();

		assert!(mapping.contains_key(META_TABLE));
	}

	#[test]
	fn test_unknown_meta_key_is_rejected() {
		let content = r#"
[deepmerge]
rooot = true
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_layer_str(content, &path);

		match result.unwrap_err() {
			MergeError::LayerMeta { path, .. } => assert_eq!(path, PathBuf::from("test.toml")),
			other => panic!("Expected LayerMeta error, got {other:?}"),
		}
	}

	#[test]
	fn test_invalid_toml_is_rejected() {
		let path = PathBuf::from("broken.toml");
		let result = parse_layer_str("params = [1, 2", &path);

		assert!(matches!(result, Err(MergeError::LayerParse { .. })));
	}

	#[test]
	fn test_missing_file_reports_path() {
		let path = PathBuf::from("/nonexistent/dir/.deepmerge.toml");

		match parse_layer_file(&path).unwrap_err() {
			MergeError::LayerRead { path: reported, .. } => assert_eq!(reported, path),
			other => panic!("Expected LayerRead error, got {other:?}"),
		}
	}
}
