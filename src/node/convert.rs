use crate::error::{MergeError, Result};
use crate::node::types::{Mapping, Node, Scalar};
use toml::{Table, Value};

impl From<Value> for Node {
	fn from(value: Value) -> Self {
		match value {
			Value::String(s) => Node::Scalar(Scalar::String(s)),
			Value::Integer(i) => Node::Scalar(Scalar::Integer(i)),
			Value::Float(f) => Node::Scalar(Scalar::Float(f)),
			Value::Boolean(b) => Node::Scalar(Scalar::Bool(b)),
			Value::Datetime(dt) => Node::Scalar(Scalar::Datetime(dt)),
			Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
			Value::Table(table) => Node::Mapping(Mapping::from(table)),
		}
	}
}

impl From<Table> for Mapping {
	fn from(table: Table) -> Self {
		table.into_iter().collect()
	}
}

impl Node {
	/// Convert into a TOML value.
	///
	/// Fails on `Scalar::Null`, which TOML cannot express.
	pub fn to_toml(&self) -> Result<Value> {
		to_toml_at(self, &mut Vec::new())
	}
}

impl Mapping {
	/// Convert into a TOML table.
	pub fn to_toml(&self) -> Result<Table> {
		table_at(self, &mut Vec::new())
	}

	/// Render as a TOML document.
	pub fn to_toml_string(&self) -> Result<String> {
		let table = self.to_toml()?;
		toml::to_string(&table).map_err(|source| MergeError::Serialize { source })
	}
}

fn to_toml_at(node: &Node, path: &mut Vec<String>) -> Result<Value> {
	let value = match node {
		Node::Mapping(map) => Value::Table(table_at(map, path)?),
		Node::Sequence(items) => {
			let mut out = Vec::with_capacity(items.len());
			for (i, item) in items.iter().enumerate() {
				path.push(i.to_string());
				out.push(to_toml_at(item, path)?);
				path.pop();
			}
			Value::Array(out)
		}
		Node::Scalar(Scalar::Null) => {
			return Err(MergeError::Unrepresentable {
				path: path.join("."),
			});
		}
		Node::Scalar(Scalar::Bool(b)) => Value::Boolean(*b),
		Node::Scalar(Scalar::Integer(i)) => Value::Integer(*i),
		Node::Scalar(Scalar::Float(f)) => Value::Float(*f),
		Node::Scalar(Scalar::String(s)) => Value::String(s.clone()),
		Node::Scalar(Scalar::Datetime(dt)) => Value::Datetime(*dt),
	};
	Ok(value)
}

fn table_at(map: &Mapping, path: &mut Vec<String>) -> Result<Table> {
	let mut table = Table::new();
	for (key, value) in map {
		path.push(key.clone());
		table.insert(key.clone(), to_toml_at(value, path)?);
		path.pop();
	}
	Ok(table)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_toml_document() {
		let table: Table = toml::from_str(
			r#"
[params]
car = "4gheap"
heap = 4
ratio = 0.5
compress = true
paths = ["/a", "/b"]
"#,
		)
		.unwrap();

		let map = Mapping::from(table);
		let params = map.get("params").and_then(Node::as_mapping).unwrap();

		assert_eq!(params.get("car"), Some(&Node::from("4gheap")));
		assert_eq!(params.get("heap"), Some(&Node::from(4)));
		assert_eq!(params.get("ratio"), Some(&Node::from(0.5)));
		assert_eq!(params.get("compress"), Some(&Node::from(true)));
		assert_eq!(params.get("paths"), Some(&Node::from(vec!["/a", "/b"])));
	}

	#[test]
	fn test_to_toml_string() {
		let params: Mapping = [("car", Node::from("4gheap")), ("heap", Node::from(4))]
			.into_iter()
			.collect();
		let map = Mapping::from_iter([("params", params)]);

		let rendered = map.to_toml_string().unwrap();
		assert!(rendered.contains("[params]"));
		assert!(rendered.contains("4gheap"));
		assert!(rendered.contains("heap = 4"));
	}

	#[test]
	fn test_null_is_unrepresentable() {
		let inner = Mapping::from_iter([("missing", Node::null())]);
		let map = Mapping::from_iter([("outer", inner)]);

		match map.to_toml().unwrap_err() {
			MergeError::Unrepresentable { path } => assert_eq!(path, "outer.missing"),
			other => panic!("Expected Unrepresentable error, got {other:?}"),
		}
	}

	#[test]
	fn test_null_inside_sequence_reports_index() {
		let map = Mapping::from_iter([("items", Node::Sequence(vec![Node::from(1), Node::null()]))]);

		match map.to_toml().unwrap_err() {
			MergeError::Unrepresentable { path } => assert_eq!(path, "items.1"),
			other => panic!("Expected Unrepresentable error, got {other:?}"),
		}
	}
}
