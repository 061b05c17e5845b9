use crate::error::MergeError;
use crate::merge::view::merge_dicts_with;
use crate::node::Node;
use std::fmt;
use std::str::FromStr;

/// How two sequences under the same key are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SequencePolicy {
	/// Left elements followed by right elements, duplicates kept.
	#[default]
	Concat,
	/// Like `Concat`, but each distinct element is kept once, at its first
	/// occurrence.
	Union,
	/// Sequences are treated like scalars: the right side wins.
	Replace,
}

impl FromStr for SequencePolicy {
	type Err = MergeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"concat" | "Concat" => Ok(Self::Concat),
			"union" | "Union" => Ok(Self::Union),
			"replace" | "Replace" => Ok(Self::Replace),
			_ => Err(MergeError::InvalidSequencePolicy {
				value: s.to_string(),
			}),
		}
	}
}

impl fmt::Display for SequencePolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Concat => write!(f, "concat"),
			Self::Union => write!(f, "union"),
			Self::Replace => write!(f, "replace"),
		}
	}
}

/// Knobs shared by the merge view and the in-place updater.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
	pub sequences: SequencePolicy,
}

impl SequencePolicy {
	/// Whether two sequences are combined rather than overridden.
	pub fn combines(self) -> bool {
		self != SequencePolicy::Replace
	}
}

impl MergeOptions {
	pub fn with_sequences(sequences: SequencePolicy) -> Self {
		MergeOptions { sequences }
	}
}

/// Merge two values found under the same key.
///
/// - Two mappings are merged key by key, recursively.
/// - Two sequences are combined according to `opts.sequences`.
/// - Anything else (a scalar on either side, or mismatched container kinds)
///   resolves to a copy of `right`.
///
/// The result never shares nested containers with either input.
pub fn merge_values(left: &Node, right: &Node, opts: MergeOptions) -> Node {
	match (left, right) {
		(Node::Mapping(l), Node::Mapping(r)) => {
			Node::Mapping(merge_dicts_with(l, r, opts).into_mapping())
		}
		(Node::Sequence(l), Node::Sequence(r)) if opts.sequences.combines() => {
			let mut combined = l.clone();
			append_sequence(&mut combined, r, opts.sequences == SequencePolicy::Union);
			Node::Sequence(combined)
		}
		(_, right) => right.deep_copy(),
	}
}

/// Append copies of `incoming` to `target`.
///
/// With `unique`, `target` is first reduced to its distinct elements and
/// incoming elements already present are skipped.
pub(crate) fn append_sequence(target: &mut Vec<Node>, incoming: &[Node], unique: bool) {
	if !unique {
		target.extend(incoming.iter().cloned());
		return;
	}

	let mut distinct: Vec<Node> = Vec::with_capacity(target.len() + incoming.len());
	for item in target.drain(..) {
		if !distinct.contains(&item) {
			distinct.push(item);
		}
	}
	for item in incoming {
		if !distinct.contains(item) {
			distinct.push(item.clone());
		}
	}
	*target = distinct;
}
