//! Deep merging of configuration mappings.
//!
//! This module handles:
//! - The shared merge rule (override wins, mappings recurse, sequences combine)
//! - A lazy, non-mutating merge view over two mappings
//! - In-place deep updates of a target mapping from any number of sources

pub mod rule;
pub mod update;
pub mod view;

pub use rule::{MergeOptions, SequencePolicy, merge_values};
pub use update::{deep_update, deep_update_with, update_node};
pub use view::{MergeView, merge_dicts, merge_dicts_with, merge_nodes};
