use crate::node::Kind;
use std::path::PathBuf;

/// Library-level structured errors for deepmerge.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
	#[error("{role} must be a mapping, got a {kind}")]
	NotAMapping { role: &'static str, kind: Kind },

	#[error("Value at `{path}` cannot be represented in TOML")]
	Unrepresentable { path: String },

	#[error("Failed to read layer file: {path}")]
	LayerRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse layer file: {path}")]
	LayerParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to write {path}")]
	LayerWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Invalid layer metadata in {path}")]
	LayerMeta {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to serialize merged configuration")]
	Serialize {
		#[source]
		source: toml::ser::Error,
	},

	#[error("Invalid assignment `{input}`, expected KEY.PATH=VALUE")]
	InvalidAssignment { input: String },

	#[error("Invalid key path: {key}")]
	InvalidKeyPath { key: String },

	#[error("Unknown sequence policy `{value}`, expected concat, union or replace")]
	InvalidSequencePolicy { value: String },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using MergeError.
pub type Result<T> = std::result::Result<T, MergeError>;
