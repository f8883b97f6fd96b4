//! Cell values, record access and row identifiers
//!
//! Every accessor in the table pipeline produces a [`Value`]. Row types expose
//! their fields through the [`Record`] trait so key-path accessors and the
//! global filter can reach them without knowing the concrete type.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A dynamically typed cell value
///
/// `Null` stands in for both "null" and "missing" fields; it always sorts last.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
	/// Missing or null value
	#[default]
	Null,
	/// Boolean value
	Bool(bool),
	/// Integer value
	Int(i64),
	/// Floating point value
	Float(f64),
	/// Text value
	String(String),
	/// Point in time, compared by timestamp
	DateTime(DateTime<Utc>),
}

impl Value {
	/// Returns true for [`Value::Null`]
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Returns the numeric value for `Int` and `Float`
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Int(i) => Some(*i as f64),
			Self::Float(f) => Some(*f),
			_ => None,
		}
	}

	/// Returns the text for `String` values
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	/// Renders the value the way filters and exports see it
	///
	/// `Null` renders as the empty string.
	pub fn to_display_string(&self) -> String {
		match self {
			Self::Null => String::new(),
			other => other.to_string(),
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("null"),
			Self::Bool(b) => write!(f, "{}", b),
			Self::Int(i) => write!(f, "{}", i),
			Self::Float(v) => write!(f, "{}", v),
			Self::String(s) => f.write_str(s),
			Self::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Self::Bool(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Self::Int(v.into())
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Self::Int(v)
	}
}

impl From<u32> for Value {
	fn from(v: u32) -> Self {
		Self::Int(v.into())
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Self::Float(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Self::String(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Self::String(v)
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(v: DateTime<Utc>) -> Self {
		Self::DateTime(v)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		v.map(Into::into).unwrap_or(Self::Null)
	}
}

impl From<&serde_json::Value> for Value {
	fn from(v: &serde_json::Value) -> Self {
		match v {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(b) => Self::Bool(*b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Self::Int(i),
				None => n.as_f64().map(Self::Float).unwrap_or(Self::Null),
			},
			serde_json::Value::String(s) => Self::String(s.clone()),
			// Composite values only take part in filtering through their JSON text
			other => Self::String(other.to_string()),
		}
	}
}

impl From<&Value> for serde_json::Value {
	fn from(v: &Value) -> Self {
		match v {
			Value::Null => serde_json::Value::Null,
			Value::Bool(b) => serde_json::Value::Bool(*b),
			Value::Int(i) => serde_json::Value::from(*i),
			Value::Float(f) => serde_json::Value::from(*f),
			Value::String(s) => serde_json::Value::String(s.clone()),
			Value::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
		}
	}
}

/// Field access for table rows
///
/// Key-path accessors call [`Record::get`]; the global filter inspects every
/// value returned by [`Record::values`].
pub trait Record {
	/// Resolves a key-path to a value, `Value::Null` when absent
	fn get(&self, key: &str) -> Value;

	/// Returns every field value of the record
	fn values(&self) -> Vec<Value>;
}

impl Record for serde_json::Map<String, serde_json::Value> {
	fn get(&self, key: &str) -> Value {
		let mut parts = key.split('.');
		let Some(first) = parts.next() else {
			return Value::Null;
		};
		let mut current = match serde_json::Map::get(self, first) {
			Some(v) => v,
			None => return Value::Null,
		};
		for part in parts {
			current = match current {
				serde_json::Value::Object(map) => match map.get(part) {
					Some(v) => v,
					None => return Value::Null,
				},
				serde_json::Value::Array(items) => {
					match part.parse::<usize>().ok().and_then(|i| items.get(i)) {
						Some(v) => v,
						None => return Value::Null,
					}
				}
				_ => return Value::Null,
			};
		}
		Value::from(current)
	}

	fn values(&self) -> Vec<Value> {
		serde_json::Map::values(self).map(Value::from).collect()
	}
}

impl Record for serde_json::Value {
	fn get(&self, key: &str) -> Value {
		match self {
			serde_json::Value::Object(map) => Record::get(map, key),
			_ => Value::Null,
		}
	}

	fn values(&self) -> Vec<Value> {
		match self {
			serde_json::Value::Object(map) => Record::values(map),
			serde_json::Value::Null => Vec::new(),
			other => vec![Value::from(other)],
		}
	}
}

impl Record for BTreeMap<String, Value> {
	fn get(&self, key: &str) -> Value {
		BTreeMap::get(self, key).cloned().unwrap_or_default()
	}

	fn values(&self) -> Vec<Value> {
		BTreeMap::values(self).cloned().collect()
	}
}

impl<S: std::hash::BuildHasher> Record for HashMap<String, Value, S> {
	fn get(&self, key: &str) -> Value {
		HashMap::get(self, key).cloned().unwrap_or_default()
	}

	fn values(&self) -> Vec<Value> {
		HashMap::values(self).cloned().collect()
	}
}

impl<T: Record + ?Sized> Record for &T {
	fn get(&self, key: &str) -> Value {
		(**self).get(key)
	}

	fn values(&self) -> Vec<Value> {
		(**self).values()
	}
}

/// Identifier of a row, produced by an externally supplied row-key function
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
	/// Numeric identifier
	Num(i64),
	/// Textual identifier
	Str(String),
}

impl fmt::Display for RowId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Num(n) => write!(f, "{}", n),
			Self::Str(s) => f.write_str(s),
		}
	}
}

impl From<i64> for RowId {
	fn from(v: i64) -> Self {
		Self::Num(v)
	}
}

impl From<i32> for RowId {
	fn from(v: i32) -> Self {
		Self::Num(v.into())
	}
}

impl From<usize> for RowId {
	fn from(v: usize) -> Self {
		Self::Num(i64::try_from(v).unwrap_or(i64::MAX))
	}
}

impl From<&str> for RowId {
	fn from(v: &str) -> Self {
		Self::Str(v.to_string())
	}
}

impl From<String> for RowId {
	fn from(v: String) -> Self {
		Self::Str(v)
	}
}
