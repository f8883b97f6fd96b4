//! Filtering functionality for tables
//!
//! A global filter and per-column text filters, both matched as
//! case-insensitive substrings. Filtering never reorders rows.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::value::{Record, Value};

/// Custom matcher deciding whether a value satisfies a filter string
pub type MatchFn = Arc<dyn Fn(&Value, &str) -> bool + Send + Sync>;

/// Current global and per-column filters
///
/// An empty (or whitespace-only) string leaves its slot inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
	/// Filter matched against every field of a record
	pub global_filter: String,
	/// Filters keyed by column id
	pub column_filters: BTreeMap<String, String>,
}

impl FilterState {
	/// Returns true if any slot holds a non-blank filter
	pub fn is_active(&self) -> bool {
		is_filter_active(self)
	}

	/// Returns a copy with `column_id` filtered by `value`
	///
	/// A blank value removes the column's entry.
	pub fn with_column_filter(&self, column_id: &str, value: impl Into<String>) -> Self {
		let value = value.into();
		let mut next = self.clone();
		if value.is_empty() {
			next.column_filters.remove(column_id);
		} else {
			next.column_filters.insert(column_id.to_string(), value);
		}
		next
	}
}

/// Returns true if the global filter or any column filter is non-blank
pub fn is_filter_active(state: &FilterState) -> bool {
	!state.global_filter.trim().is_empty()
		|| state.column_filters.values().any(|f| !f.trim().is_empty())
}

/// Case-insensitive substring match
///
/// A blank filter matches everything; `Null` matches as the empty string.
///
/// # Example
///
/// ```rust
/// use tablekit::filter::default_match;
/// use tablekit::value::Value;
///
/// assert!(default_match(&Value::from("Administrator"), "ADMIN"));
/// assert!(default_match(&Value::Int(1234), "23"));
/// assert!(default_match(&Value::Null, "  "));
/// assert!(!default_match(&Value::Null, "x"));
/// ```
pub fn default_match(value: &Value, filter: &str) -> bool {
	let needle = filter.trim();
	if needle.is_empty() {
		return true;
	}
	value
		.to_display_string()
		.to_lowercase()
		.contains(&needle.to_lowercase())
}

/// Keeps the records that satisfy `filter_state`
///
/// When no column filter is present the global filter must match at least one
/// of the record's values. When column filters are present the global filter
/// is ignored and every non-blank column filter must match its column.
/// Returns a copy of the input when `server_mode` is set or nothing is active.
pub fn apply_filters<'a, R, G>(
	records: &[&'a R],
	filter_state: &FilterState,
	get_value: G,
	match_fn: Option<&MatchFn>,
	server_mode: bool,
) -> Vec<&'a R>
where
	R: Record + ?Sized,
	G: Fn(&R, &str) -> Value,
{
	if server_mode || !is_filter_active(filter_state) {
		return records.to_vec();
	}

	let matches = |value: &Value, filter: &str| match match_fn {
		Some(f) => f(value, filter),
		None => default_match(value, filter),
	};

	let global = filter_state.global_filter.trim();
	let has_column_filters = filter_state
		.column_filters
		.values()
		.any(|f| !f.trim().is_empty());

	let filtered: Vec<&'a R> = records
		.iter()
		.copied()
		.filter(|record| {
			if !global.is_empty()
				&& !has_column_filters
				&& !record.values().iter().any(|value| matches(value, global))
			{
				return false;
			}
			filter_state
				.column_filters
				.iter()
				.filter(|(_, filter)| !filter.trim().is_empty())
				.all(|(column_id, filter)| matches(&get_value(*record, column_id), filter))
		})
		.collect();

	tracing::trace!(
		input = records.len(),
		output = filtered.len(),
		"filtered rows"
	);
	filtered
}
