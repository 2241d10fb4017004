use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::IndexError;
use crate::IndexResult;

/// Line that opens and closes a front-matter block.
pub const FRONT_MATTER_DELIMITER: &str = "---";
/// Prefix of a heading line that provides the display title.
pub const HEADING_PREFIX: &str = "# ";
/// Separator between key and value in an inline metadata line.
pub const INLINE_FIELD_SEPARATOR: &str = ":: ";

/// A summary record derived from one discovered file.
///
/// `stem`, `title` and `ref` are always present. Every other key read from
/// the file's metadata lands in [`Item::metadata`] and is flattened next to
/// the core fields when the record is handed to a template, so
/// `{{ f.author }}` works the same way as `{{ f.title }}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
	/// File name without its extension.
	pub stem: String,
	/// Display title. Defaults to the stem.
	pub title: String,
	/// Rendered link to the file, `[[stem]]` or `[[stem|title]]`.
	#[serde(rename = "ref")]
	pub reference: String,
	/// Arbitrary metadata keys parsed from the file.
	#[serde(flatten)]
	pub metadata: BTreeMap<String, Value>,
}

#[cfg(test)]
impl Item {
	/// Look up a field by name the way a template sees it.
	pub(crate) fn field(&self, name: &str) -> Option<Value> {
		match name {
			"stem" => Some(Value::String(self.stem.clone())),
			"title" => Some(Value::String(self.title.clone())),
			"ref" => Some(Value::String(self.reference.clone())),
			other => self.metadata.get(other).cloned(),
		}
	}
}

/// Fields collected while reading a file, before the derived ones are
/// computed.
#[derive(Debug, Default)]
struct Fields {
	title: Option<String>,
	metadata: BTreeMap<String, Value>,
}

impl Fields {
	fn set(&mut self, key: &str, value: Value) -> Result<(), String> {
		match key {
			"title" => {
				self.title = match value {
					Value::Null => None,
					Value::String(s) => Some(s),
					Value::Bool(b) => Some(b.to_string()),
					Value::Number(n) => Some(n.to_string()),
					Value::Array(_) | Value::Object(_) => {
						return Err("`title` must be a scalar value".to_string());
					}
				};
			}
			// Derived from the path, never from metadata.
			"stem" | "ref" => {
				tracing::trace!(key, "ignoring reserved metadata key");
			}
			_ => {
				self.metadata.insert(key.to_string(), value);
			}
		}

		Ok(())
	}

	fn into_item(self, stem: String) -> Item {
		let title = self.title.unwrap_or_else(|| stem.clone());
		let reference = if title == stem {
			format!("[[{stem}]]")
		} else {
			format!("[[{stem}|{title}]]")
		};

		Item {
			stem,
			title,
			reference,
			metadata: self.metadata,
		}
	}
}

/// Read a discovered file and derive its record.
pub fn build_item(path: &Path) -> IndexResult<Item> {
	let stem = path
		.file_stem()
		.map(|stem| stem.to_string_lossy().into_owned())
		.unwrap_or_default();
	let content = std::fs::read_to_string(path).map_err(|e| {
		IndexError::ReadItem {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})?;

	parse_item(stem, &content).map_err(|reason| {
		IndexError::MetadataParse {
			path: path.display().to_string(),
			reason,
		}
	})
}

/// Derive a record from a file's stem and content.
///
/// Metadata comes from exactly one of two places:
///
/// - a front-matter block when the first line is `---`. Nothing after the
///   closing delimiter is read, so `key:: value` lines below a front-matter
///   block are ignored.
/// - otherwise the leading run of `key:: value` lines, which starts after a
///   `# Title` heading when the file opens with one.
///
/// The error is the reason the front matter could not be parsed.
pub fn parse_item(stem: String, content: &str) -> Result<Item, String> {
	let mut fields = Fields::default();
	let mut lines = content.lines();

	if let Some(first) = lines.next() {
		if first == FRONT_MATTER_DELIMITER {
			// An unclosed block runs to the end of the file.
			let block: Vec<&str> = lines
				.take_while(|line| *line != FRONT_MATTER_DELIMITER)
				.collect();
			for (key, value) in parse_front_matter(&block.join("\n"))? {
				fields.set(&key, value)?;
			}
		} else if let Some(title) = first.strip_prefix(HEADING_PREFIX) {
			fields.title = Some(title.to_string());
			scan_inline_fields(lines, &mut fields)?;
		} else {
			scan_inline_fields(std::iter::once(first).chain(lines), &mut fields)?;
		}
	}

	Ok(fields.into_item(stem))
}

fn scan_inline_fields<'a>(
	lines: impl Iterator<Item = &'a str>,
	fields: &mut Fields,
) -> Result<(), String> {
	for line in lines {
		let Some((key, value)) = line.split_once(INLINE_FIELD_SEPARATOR) else {
			break;
		};
		fields.set(key, Value::String(value.to_string()))?;
	}

	Ok(())
}

fn parse_front_matter(block: &str) -> Result<serde_json::Map<String, Value>, String> {
	if block.trim().is_empty() {
		return Ok(serde_json::Map::new());
	}

	let value: Value = serde_yaml_ng::from_str(block).map_err(|e| e.to_string())?;
	match value {
		Value::Object(map) => Ok(map),
		Value::Null => Ok(serde_json::Map::new()),
		Value::Array(_) => Err("expected a mapping, found a sequence".to_string()),
		_ => Err("expected a mapping, found a scalar".to_string()),
	}
}
