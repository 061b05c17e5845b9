//! Configuration nodes.
//!
//! This module handles:
//! - The mapping/sequence/scalar value model
//! - Shape dispatch used by the merge rules
//! - Conversion to and from TOML values

pub mod convert;
pub mod types;

pub use types::{Kind, Mapping, Node, Scalar};
