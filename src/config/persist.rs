use crate::error::{MergeError, Result};
use crate::node::Mapping;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Render `mapping` as TOML and atomically replace the file at `path`.
///
/// The document is written to a temporary file in the same directory and
/// renamed over `path`, so readers see either the old or the new contents.
pub fn write_mapping_file(path: &Path, mapping: &Mapping) -> Result<()> {
	let rendered = mapping.to_toml_string()?;
	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};

	let write_error = |source: std::io::Error| MergeError::LayerWrite {
		path: path.to_path_buf(),
		source,
	};

	let mut staged = NamedTempFile::new_in(dir).map_err(write_error)?;
	staged.write_all(rendered.as_bytes()).map_err(write_error)?;
	staged.as_file().sync_all().map_err(write_error)?;
	staged.persist(path).map_err(|e| write_error(e.error))?;

	debug!(path = %path.display(), keys = mapping.len(), "wrote mapping");
	Ok(())
}
