use crate::error::{MergeError, Result};
use crate::merge::rule::{MergeOptions, merge_values};
use crate::node::{Mapping, Node};
use indexmap::map;
use std::borrow::Cow;

/// Lazily merged entries of two mappings.
///
/// Yields one `(key, value)` pair per distinct key of `base ∪ overlay`:
/// base keys in base order, then override-only keys in override order.
/// Keys found on both sides yield freshly merged owned values. Keys found on
/// one side only are passed through as borrows of the input they came from;
/// call [`Cow::into_owned`] (or [`MergeView::into_mapping`]) before handing
/// them to code that must not alias the inputs.
pub struct MergeView<'a> {
	base: &'a Mapping,
	overlay: &'a Mapping,
	base_entries: map::Iter<'a, String, Node>,
	overlay_entries: map::Iter<'a, String, Node>,
	opts: MergeOptions,
}

impl<'a> MergeView<'a> {
	/// Materialize the view into an owned mapping.
	pub fn into_mapping(self) -> Mapping {
		self.map(|(key, value)| (key, value.into_owned())).collect()
	}
}

impl<'a> Iterator for MergeView<'a> {
	type Item = (&'a str, Cow<'a, Node>);

	fn next(&mut self) -> Option<Self::Item> {
		if let Some((key, left)) = self.base_entries.next() {
			let value = match self.overlay.get(key) {
				Some(right) => Cow::Owned(merge_values(left, right, self.opts)),
				None => Cow::Borrowed(left),
			};
			return Some((key.as_str(), value));
		}

		let base = self.base;
		self.overlay_entries
			.find(|(key, _)| !base.contains_key(key))
			.map(|(key, value)| (key.as_str(), Cow::Borrowed(value)))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let base = self.base_entries.len();
		let overlay = self.overlay_entries.len();
		(base, Some(base + overlay))
	}
}

/// Merge `overlay` over `base` without mutating either.
///
/// `overlay` wins scalar conflicts, nested mappings merge recursively and
/// sequences concatenate.
pub fn merge_dicts<'a>(base: &'a Mapping, overlay: &'a Mapping) -> MergeView<'a> {
	merge_dicts_with(base, overlay, MergeOptions::default())
}

/// Like [`merge_dicts`], with explicit options.
pub fn merge_dicts_with<'a>(
	base: &'a Mapping,
	overlay: &'a Mapping,
	opts: MergeOptions,
) -> MergeView<'a> {
	MergeView {
		base,
		overlay,
		base_entries: base.iter(),
		overlay_entries: overlay.iter(),
		opts,
	}
}

/// Merge two arbitrary nodes whose roots must both be mappings.
pub fn merge_nodes(base: &Node, overlay: &Node, opts: MergeOptions) -> Result<Mapping> {
	let base = expect_mapping(base, "base")?;
	let overlay = expect_mapping(overlay, "override")?;
	Ok(merge_dicts_with(base, overlay, opts).into_mapping())
}

pub(crate) fn expect_mapping<'a>(node: &'a Node, role: &'static str) -> Result<&'a Mapping> {
	node.as_mapping().ok_or(MergeError::NotAMapping {
		role,
		kind: node.kind(),
	})
}
