use crate::error::{MergeError, Result};
use crate::merge::rule::{MergeOptions, SequencePolicy, append_sequence};
use crate::merge::view::expect_mapping;
use crate::node::{Mapping, Node};
use indexmap::map::Entry;
use tracing::trace;

/// Merge each source into `target`, left to right.
///
/// Keys new to `target` receive a deep copy of the source value. Nested
/// mappings already owned by `target` are extended in place. Calling with no
/// sources leaves `target` untouched.
///
/// Sequence concatenation is not idempotent: applying the same source twice
/// appends its elements twice.
pub fn deep_update<'a, I>(target: &mut Mapping, sources: I)
where
	I: IntoIterator<Item = &'a Mapping>,
{
	deep_update_with(target, sources, MergeOptions::default());
}

/// Like [`deep_update`], with explicit options.
pub fn deep_update_with<'a, I>(target: &mut Mapping, sources: I, opts: MergeOptions)
where
	I: IntoIterator<Item = &'a Mapping>,
{
	for source in sources {
		update_mapping(target, source, opts);
	}
}

/// Update a node in place from source nodes.
///
/// Every root must be a mapping. Roots are checked before anything is
/// written, so a rejected call leaves `target` unchanged.
pub fn update_node<'a, I>(target: &mut Node, sources: I, opts: MergeOptions) -> Result<()>
where
	I: IntoIterator<Item = &'a Node>,
{
	let sources = sources
		.into_iter()
		.map(|node| expect_mapping(node, "source"))
		.collect::<Result<Vec<_>>>()?;

	let kind = target.kind();
	let target = target
		.as_mapping_mut()
		.ok_or(MergeError::NotAMapping {
			role: "target",
			kind,
		})?;

	deep_update_with(target, sources, opts);
	Ok(())
}

fn update_mapping(target: &mut Mapping, source: &Mapping, opts: MergeOptions) {
	for (key, incoming) in source {
		match target.entry(key.clone()) {
			Entry::Vacant(slot) => {
				trace!(key = %key, "introducing key");
				slot.insert(incoming.deep_copy());
			}
			Entry::Occupied(mut slot) => update_value(key, slot.get_mut(), incoming, opts),
		}
	}
}

fn update_value(key: &str, existing: &mut Node, incoming: &Node, opts: MergeOptions) {
	match (existing, incoming) {
		(Node::Mapping(existing), Node::Mapping(incoming)) => {
			update_mapping(existing, incoming, opts);
		}
		(Node::Sequence(existing), Node::Sequence(incoming)) if opts.sequences.combines() => {
			trace!(key, policy = %opts.sequences, "combining sequences");
			append_sequence(existing, incoming, opts.sequences == SequencePolicy::Union);
		}
		(existing, incoming) => {
			trace!(key, "overriding value");
			*existing = incoming.deep_copy();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::node::Kind;

	fn car_params() -> Mapping {
		let car_params = Mapping::from_iter([("data_paths", "/mnt/local_ssd")]);
		Mapping::from_iter([("params", Mapping::from_iter([("car-params", car_params)]))])
	}

	#[test]
	fn test_can_update_empty_mapping_with_empty_source() {
		let mut target = Mapping::new();
		let source = Mapping::new();

		deep_update(&mut target, [&source]);

		assert_eq!(target, source);
		assert!(target.is_empty());
	}

	#[test]
	fn test_can_update_with_no_sources() {
		let mut target = Mapping::from_iter([("foo", "bar")]);

		deep_update(&mut target, std::iter::empty());

		assert_eq!(target.get("foo"), Some(&Node::from("bar")));
		assert_eq!(target.len(), 1);
	}

	#[test]
	fn test_can_update_with_empty_source() {
		let mut target = Mapping::from_iter([("foo", "bar")]);

		deep_update(&mut target, [&Mapping::new()]);

		assert_eq!(target, Mapping::from_iter([("foo", "bar")]));
	}

	#[test]
	fn test_can_update_empty_target() {
		let mut target = Mapping::new();
		let source = Mapping::from_iter([("foo", "bar")]);

		deep_update(&mut target, [&source]);

		assert_eq!(target, source);
	}

	#[test]
	fn test_scalar_override_wins() {
		let mut target = Mapping::from_iter([("foo", "bar")]);
		let source = Mapping::from_iter([("foo", "baz")]);

		deep_update(&mut target, [&source]);

		assert_eq!(target.get("foo"), Some(&Node::from("baz")));
	}

	#[test]
	fn test_can_update_nested_mapping() {
		let mut target = Mapping::from_iter([("foo", Mapping::from_iter([("bar", "baz")]))]);
		let source = Mapping::from_iter([("foo", Mapping::from_iter([("bar", "qux")]))]);

		deep_update(&mut target, [&source]);

		assert_eq!(target, source);
	}

	#[test]
	fn test_nested_sequences_concatenate() {
		let mut target = Mapping::from_iter([("foo", vec![1, 2, 3])]);
		let source = Mapping::from_iter([("foo", vec![3, 4, 5])]);

		deep_update(&mut target, [&source]);

		assert_eq!(target, Mapping::from_iter([("foo", vec![1, 2, 3, 3, 4, 5])]));
	}

	#[test]
	fn test_replace_policy_overrides_sequences() {
		let mut target = Mapping::from_iter([("foo", vec![1, 2, 3])]);
		let source = Mapping::from_iter([("foo", vec![3, 4, 5])]);

		deep_update_with(
			&mut target,
			[&source],
			MergeOptions::with_sequences(SequencePolicy::Replace),
		);

		assert_eq!(target, source);
	}

	#[test]
	fn test_union_policy_deduplicates() {
		let mut target = Mapping::from_iter([("foo", vec![1, 2, 3])]);
		let source = Mapping::from_iter([("foo", vec![3, 4, 5])]);

		deep_update_with(&mut target, [&source], MergeOptions::with_sequences(SequencePolicy::Union));
		deep_update_with(&mut target, [&source], MergeOptions::with_sequences(SequencePolicy::Union));

		assert_eq!(target, Mapping::from_iter([("foo", vec![1, 2, 3, 4, 5])]));
	}

	#[test]
	fn test_randomized_empty_and_non_empty() {
		for target_is_empty in [true, false] {
			let dct = car_params();
			let (mut target, source) = if target_is_empty {
				(Mapping::new(), dct.clone())
			} else {
				(dct.clone(), Mapping::new())
			};

			deep_update(&mut target, [&source]);

			assert_eq!(target, dct);
		}
	}

	#[test]
	fn test_can_update_nested_mappings() {
		let settings: Mapping = [
			("indices.queries.cache.size", Node::from("5%")),
			("transport.tcp.compress", Node::from(true)),
		]
		.into_iter()
		.collect();
		let params: Mapping = [
			("car", Node::from("4gheap")),
			(
				"car-params",
				Node::from(Mapping::from_iter([("additional_cluster_settings", settings.clone())])),
			),
			("unique-param", Node::from("foobar")),
		]
		.into_iter()
		.collect();
		let mut target = Mapping::from_iter([("params", params)]);

		deep_update(&mut target, [&car_params()]);

		let params = target.get("params").and_then(Node::as_mapping).unwrap();
		let car_params = params.get("car-params").and_then(Node::as_mapping).unwrap();
		assert_eq!(params.get("car"), Some(&Node::from("4gheap")));
		assert_eq!(params.get("unique-param"), Some(&Node::from("foobar")));
		assert_eq!(car_params.get("data_paths"), Some(&Node::from("/mnt/local_ssd")));
		assert_eq!(
			car_params.get("additional_cluster_settings"),
			Some(&Node::from(settings))
		);
	}

	#[test]
	fn test_nested_updates_are_deep_copied() {
		let mut target = Mapping::from_iter([("foo", Mapping::from_iter([("bar", "baz")]))]);
		let mut source = Mapping::from_iter([("foo", Mapping::from_iter([("bar", vec![1, 2, 3])]))]);

		deep_update(&mut target, [&source]);

		// Mutating the source afterwards must not leak into the target.
		if let Some(Node::Mapping(foo)) = source.get_mut("foo") {
			foo.insert("bar", vec![9]);
			foo.insert("extra", true);
		}

		assert_eq!(
			target,
			Mapping::from_iter([("foo", Mapping::from_iter([("bar", vec![1, 2, 3])]))])
		);

		// And the other way around.
		if let Some(Node::Mapping(foo)) = target.get_mut("foo") {
			foo.insert("bar", "changed");
		}
		assert_eq!(
			source.get("foo").and_then(Node::as_mapping).and_then(|m| m.get("bar")),
			Some(&Node::from(vec![9]))
		);
	}

	#[test]
	fn test_repeated_update_is_idempotent_for_mappings_not_sequences() {
		let source: Mapping = [
			("name", Node::from("bench")),
			("nested", Node::from(Mapping::from_iter([("x", 1)]))),
			("list", Node::from(vec![1])),
		]
		.into_iter()
		.collect();
		let mut target = Mapping::new();

		deep_update(&mut target, [&source]);
		deep_update(&mut target, [&source]);

		assert_eq!(target.get("name"), Some(&Node::from("bench")));
		assert_eq!(target.get("nested"), Some(&Node::from(Mapping::from_iter([("x", 1)]))));
		assert_eq!(target.get("list"), Some(&Node::from(vec![1, 1])));
	}

	#[test]
	fn test_new_keys_follow_existing_keys() {
		let mut target = Mapping::from_iter([("zeta", 1), ("alpha", 2)]);
		let source = Mapping::from_iter([("beta", 3), ("zeta", 10)]);

		deep_update(&mut target, [&source]);

		assert_eq!(target.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "beta"]);
		assert_eq!(target.get("zeta"), Some(&Node::from(10)));
	}

	#[test]
	fn test_sources_apply_left_to_right() {
		let mut target = Mapping::from_iter([("level", "base")]);
		let first = Mapping::from_iter([("level", "first")]);
		let second = Mapping::from_iter([("level", "second")]);

		deep_update(&mut target, [&first, &second]);

		assert_eq!(target.get("level"), Some(&Node::from("second")));
	}

	#[test]
	fn test_update_node_rejects_non_mapping_target() {
		let mut target = Node::from(vec![1, 2]);
		let source = Node::from(Mapping::from_iter([("a", 1)]));

		match update_node(&mut target, [&source], MergeOptions::default()).unwrap_err() {
			MergeError::NotAMapping { role, kind } => {
				assert_eq!(role, "target");
				assert_eq!(kind, Kind::Sequence);
			}
			other => panic!("Expected NotAMapping error, got {other:?}"),
		}
		assert_eq!(target, Node::from(vec![1, 2]));
	}

	#[test]
	fn test_update_node_rejects_bad_source_without_partial_update() {
		let mut target = Node::from(Mapping::from_iter([("a", 1)]));
		let good = Node::from(Mapping::from_iter([("a", 2)]));
		let bad = Node::from(true);

		let result = update_node(&mut target, [&good, &bad], MergeOptions::default());

		assert!(matches!(result, Err(MergeError::NotAMapping { role: "source", .. })));
		assert_eq!(target, Node::from(Mapping::from_iter([("a", 1)])));
	}
}
