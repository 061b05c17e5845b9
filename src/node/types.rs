use indexmap::IndexMap;
use indexmap::map;
use std::fmt;
use toml::value::Datetime;

/// A configuration value: a mapping, a sequence, or a scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	Mapping(Mapping),
	Sequence(Vec<Node>),
	Scalar(Scalar),
}

/// An indivisible configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
	Null,
	Bool(bool),
	Integer(i64),
	Float(f64),
	String(String),
	/// Copied by value, never inspected.
	Datetime(Datetime),
}

/// The shape of a node, used to pick a merge rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
	Mapping,
	Sequence,
	Scalar,
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Kind::Mapping => write!(f, "mapping"),
			Kind::Sequence => write!(f, "sequence"),
			Kind::Scalar => write!(f, "scalar"),
		}
	}
}

impl Node {
	/// Shape of this node.
	pub fn kind(&self) -> Kind {
		match self {
			Node::Mapping(_) => Kind::Mapping,
			Node::Sequence(_) => Kind::Sequence,
			Node::Scalar(_) => Kind::Scalar,
		}
	}

	pub fn as_mapping(&self) -> Option<&Mapping> {
		match self {
			Node::Mapping(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
		match self {
			Node::Mapping(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_sequence(&self) -> Option<&[Node]> {
		match self {
			Node::Sequence(items) => Some(items),
			_ => None,
		}
	}

	/// Recursively copy this node.
	///
	/// Nodes own all of their children, so the copy shares no nested
	/// containers with `self`.
	pub fn deep_copy(&self) -> Node {
		self.clone()
	}

	pub fn null() -> Node {
		Node::Scalar(Scalar::Null)
	}
}

impl From<Mapping> for Node {
	fn from(map: Mapping) -> Self {
		Node::Mapping(map)
	}
}

impl<T: Into<Node>> From<Vec<T>> for Node {
	fn from(items: Vec<T>) -> Self {
		Node::Sequence(items.into_iter().map(Into::into).collect())
	}
}

impl From<Scalar> for Node {
	fn from(scalar: Scalar) -> Self {
		Node::Scalar(scalar)
	}
}

impl From<bool> for Node {
	fn from(value: bool) -> Self {
		Node::Scalar(Scalar::Bool(value))
	}
}

impl From<i64> for Node {
	fn from(value: i64) -> Self {
		Node::Scalar(Scalar::Integer(value))
	}
}

impl From<i32> for Node {
	fn from(value: i32) -> Self {
		Node::Scalar(Scalar::Integer(i64::from(value)))
	}
}

impl From<f64> for Node {
	fn from(value: f64) -> Self {
		Node::Scalar(Scalar::Float(value))
	}
}

impl From<&str> for Node {
	fn from(value: &str) -> Self {
		Node::Scalar(Scalar::String(value.to_string()))
	}
}

impl From<String> for Node {
	fn from(value: String) -> Self {
		Node::Scalar(Scalar::String(value))
	}
}

/// A string-keyed mapping of configuration nodes.
///
/// Keys iterate in insertion order; equality ignores order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
	entries: IndexMap<String, Node>,
}

impl Mapping {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &str) -> Option<&Node> {
		self.entries.get(key)
	}

	pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
		self.entries.get_mut(key)
	}

	/// Insert a value, returning the one it replaced.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
		self.entries.insert(key.into(), value.into())
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn iter(&self) -> map::Iter<'_, String, Node> {
		self.entries.iter()
	}

	pub(crate) fn entry(&mut self, key: String) -> map::Entry<'_, String, Node> {
		self.entries.entry(key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Mapping {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Mapping {
			entries: iter
				.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
		}
	}
}

impl IntoIterator for Mapping {
	type Item = (String, Node);
	type IntoIter = map::IntoIter<String, Node>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

impl<'a> IntoIterator for &'a Mapping {
	type Item = (&'a String, &'a Node);
	type IntoIter = map::Iter<'a, String, Node>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}
