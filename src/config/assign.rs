use crate::error::{MergeError, Result};
use crate::node::{Mapping, Node};
use regex::Regex;
use std::sync::LazyLock;

/// A bare `[A-Za-z0-9_-]+` key or a double-quoted key that may hold dots.
const SEGMENT: &str = r#"[A-Za-z0-9_-]+|"[^"]*""#;

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
	let pattern = format!(r"(?s)^\s*((?:{SEGMENT})(?:\.(?:{SEGMENT}))*)\s*=(.*)$");
	Regex::new(&pattern).expect("assignment pattern is valid")
});

static KEY_SEGMENT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(SEGMENT).expect("key segment pattern is valid"));

/// A single `key.path=value` override given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
	/// Dotted key path, split into segments.
	pub path: Vec<String>,

	/// The value to store at `path`.
	pub value: Node,
}

impl Assignment {
	/// Parse `KEY.PATH=VALUE`.
	///
	/// Key segments containing dots or `=` are double-quoted, as in
	/// `settings."indices.queries.cache.size"=5%`. The value is read as a
	/// TOML value when it parses as one (`true`, `42`, `[1, 2]`, `"quoted"`,
	/// `{ a = 1 }`) and as a plain string otherwise.
	pub fn parse(input: &str) -> Result<Self> {
		let Some((unchecked_key, _)) = input.split_once('=') else {
			return Err(MergeError::InvalidAssignment {
				input: input.to_string(),
			});
		};

		let captures = ASSIGNMENT
			.captures(input)
			.ok_or_else(|| MergeError::InvalidKeyPath {
				key: unchecked_key.trim().to_string(),
			})?;
		let (_, [key, raw_value]) = captures.extract();

		Ok(Assignment {
			path: KEY_SEGMENT
				.find_iter(key)
				.map(|segment| segment.as_str().trim_matches('"').to_string())
				.collect(),
			value: parse_value(raw_value.trim()),
		})
	}
}

fn parse_value(raw: &str) -> Node {
	let document = format!("value = {raw}");
	match toml::from_str::<toml::Table>(&document) {
		Ok(mut table) => table
			.remove("value")
			.map(Node::from)
			.unwrap_or_else(|| Node::from(raw)),
		Err(_) => Node::from(raw),
	}
}

/// Parse a list of assignments into one nested mapping.
///
/// Later assignments to the same key path replace earlier ones. An
/// assignment below a key that holds a non-mapping value replaces that value
/// with a mapping.
pub fn parse_assignments<I, S>(inputs: I) -> Result<Mapping>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut root = Mapping::new();

	for input in inputs {
		let assignment = Assignment::parse(input.as_ref())?;
		insert_at(&mut root, &assignment.path, assignment.value);
	}

	Ok(root)
}

fn insert_at(map: &mut Mapping, path: &[String], value: Node) {
	match path {
		[] => {}
		[leaf] => {
			map.insert(leaf.clone(), value);
		}
		[head, rest @ ..] => {
			let slot = map
				.entry(head.clone())
				.or_insert_with(|| Node::Mapping(Mapping::new()));
			if slot.as_mapping().is_none() {
				*slot = Node::Mapping(Mapping::new());
			}
			if let Node::Mapping(child) = slot {
				insert_at(child, rest, value);
			}
		}
	}
}
