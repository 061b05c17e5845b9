//! Deepmerge - deep-merge layered configuration with override-wins semantics.
//!
//! This library provides:
//! - A mapping/sequence/scalar configuration model
//! - A lazy, non-mutating merge of two mappings
//! - An in-place deep update that never aliases its sources
//! - Layer file discovery and cascade merging
//!
//! # Example
//!
//! ```
//! use deepmerge_cli::merge::{deep_update, merge_dicts};
//! use deepmerge_cli::node::{Mapping, Node};
//!
//! let base = Mapping::from_iter([("p", Mapping::from_iter([("x", 1), ("y", 2)]))]);
//! let overlay = Mapping::from_iter([("p", Mapping::from_iter([("y", 3), ("z", 4)]))]);
//!
//! let merged = merge_dicts(&base, &overlay).into_mapping();
//! assert_eq!(
//!     merged,
//!     Mapping::from_iter([("p", Mapping::from_iter([("x", 1), ("y", 3), ("z", 4)]))])
//! );
//!
//! let mut target = base.clone();
//! deep_update(&mut target, [&overlay]);
//! assert_eq!(target, merged);
//! ```

pub mod config;
pub mod error;
pub mod merge;
pub mod node;

pub use error::{MergeError, Result};
