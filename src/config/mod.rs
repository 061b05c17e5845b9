//! Layer file loading for deepmerge.
//!
//! This module handles:
//! - TOML layer file parsing
//! - Directory cascade discovery
//! - Folding the cascade into one effective mapping
//! - `key.path=value` command-line overrides
//! - Atomic write-back of updated files

pub mod assign;
pub mod cascade;
pub mod parser;
pub mod persist;
pub mod types;

pub use assign::{Assignment, parse_assignments};
pub use cascade::{discover_layers, load_merged_layers, merge_layers, user_layer_path};
pub use parser::{parse_layer_file, parse_layer_str, parse_mapping_file, parse_mapping_str};
pub use persist::write_mapping_file;
pub use types::{Layer, LayerMeta, LoadedLayer, MergedLayers};
