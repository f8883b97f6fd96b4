//! Sorting functionality for tables
//!
//! Single-column sorting with a typed default comparator. Sorting is always
//! stable: rows with equal keys keep their relative input order.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Comparator over cell values
pub type CompareFn = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
	/// Ascending order
	Asc,
	/// Descending order
	Desc,
}

impl SortDirection {
	/// Returns the opposite direction
	pub fn toggle(&self) -> Self {
		match self {
			Self::Asc => Self::Desc,
			Self::Desc => Self::Asc,
		}
	}

	/// Parses `asc`/`desc`, ignoring case
	///
	/// Anything else is treated as no direction at all.
	pub fn parse(s: &str) -> Option<Self> {
		if s.eq_ignore_ascii_case("asc") {
			Some(Self::Asc)
		} else if s.eq_ignore_ascii_case("desc") {
			Some(Self::Desc)
		} else {
			None
		}
	}

	/// Returns the query-string form of the direction
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}
}

/// Current sort column and direction
///
/// Both fields are `None` when unsorted. Mutators keep them in lockstep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
	/// Column being sorted
	pub column_id: Option<String>,
	/// Direction of the sort
	pub direction: Option<SortDirection>,
}

impl SortState {
	/// Unsorted state
	pub fn none() -> Self {
		Self::default()
	}

	/// Sorts by `column_id` in `direction`
	pub fn by(column_id: impl Into<String>, direction: SortDirection) -> Self {
		Self {
			column_id: Some(column_id.into()),
			direction: Some(direction),
		}
	}

	/// Returns true when both column and direction are set
	pub fn is_active(&self) -> bool {
		self.column_id.is_some() && self.direction.is_some()
	}
}

/// Cycles the sort for `column_id`: none, asc, desc, none
///
/// Switching to another column always starts ascending.
///
/// # Example
///
/// ```rust
/// use tablekit::sort::{toggle_sort, SortDirection, SortState};
///
/// let state = toggle_sort(&SortState::none(), "age");
/// assert_eq!(state, SortState::by("age", SortDirection::Asc));
/// let state = toggle_sort(&state, "age");
/// assert_eq!(state.direction, Some(SortDirection::Desc));
/// assert_eq!(toggle_sort(&state, "age"), SortState::none());
/// ```
pub fn toggle_sort(state: &SortState, column_id: &str) -> SortState {
	if state.column_id.as_deref() != Some(column_id) {
		return SortState::by(column_id, SortDirection::Asc);
	}
	match state.direction {
		None => SortState::by(column_id, SortDirection::Asc),
		Some(SortDirection::Asc) => SortState::by(column_id, SortDirection::Desc),
		Some(SortDirection::Desc) => SortState::none(),
	}
}

/// Lowercase-first ordering with case as the tie-break
fn compare_text(a: &str, b: &str) -> Ordering {
	let folded = a
		.chars()
		.flat_map(char::to_lowercase)
		.cmp(b.chars().flat_map(char::to_lowercase));
	folded.then_with(|| a.cmp(b))
}

/// Default value comparator
///
/// - `Null` is greater than any defined value, two nulls are equal
/// - numbers compare numerically, integers and floats across each other
/// - strings compare case-insensitively first
/// - datetimes compare by timestamp
/// - anything else compares by its string form
pub fn default_compare(a: &Value, b: &Value) -> Ordering {
	match (a, b) {
		(Value::Null, Value::Null) => Ordering::Equal,
		(Value::Null, _) => Ordering::Greater,
		(_, Value::Null) => Ordering::Less,
		(Value::Int(x), Value::Int(y)) => x.cmp(y),
		(Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
			let (x, y) = (a.as_f64().unwrap_or_default(), b.as_f64().unwrap_or_default());
			x.partial_cmp(&y).unwrap_or(Ordering::Equal)
		}
		(Value::String(x), Value::String(y)) => compare_text(x, y),
		(Value::DateTime(x), Value::DateTime(y)) => x.cmp(y),
		_ => compare_text(&a.to_display_string(), &b.to_display_string()),
	}
}

/// Sorts `records` by the value of the sorted column
///
/// Returns an unchanged copy when `server_mode` is set or the sort is inactive.
/// Nulls stay at the end in both directions.
pub fn apply_sort<T, G>(
	records: &[T],
	sort_state: &SortState,
	get_value: G,
	compare_fn: Option<&CompareFn>,
	server_mode: bool,
) -> Vec<T>
where
	T: Clone,
	G: Fn(&T, &str) -> Value,
{
	let (Some(column_id), Some(direction)) = (&sort_state.column_id, sort_state.direction) else {
		return records.to_vec();
	};
	if server_mode {
		return records.to_vec();
	}

	let compare = |a: &Value, b: &Value| match compare_fn {
		Some(f) => f(a, b),
		None => default_compare(a, b),
	};

	let mut keyed: Vec<(Value, T)> = records
		.iter()
		.map(|record| (get_value(record, column_id), record.clone()))
		.collect();

	// slice::sort_by is stable
	keyed.sort_by(|(a, _), (b, _)| match (a.is_null(), b.is_null()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => match direction {
			SortDirection::Asc => compare(a, b),
			SortDirection::Desc => compare(a, b).reverse(),
		},
	});

	tracing::trace!(column = %column_id, rows = keyed.len(), "sorted rows");
	keyed.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{TimeZone, Utc};
	use rstest::rstest;

	#[rstest]
	fn test_toggle_cycle() {
		let start = SortState::none();
		let asc = toggle_sort(&start, "name");
		let desc = toggle_sort(&asc, "name");
		let back = toggle_sort(&desc, "name");

		assert_eq!(asc, SortState::by("name", SortDirection::Asc));
		assert_eq!(desc, SortState::by("name", SortDirection::Desc));
		assert_eq!(back, start);
		assert!(!back.is_active());
	}

	#[rstest]
	fn test_toggle_other_column_starts_ascending() {
		let desc = SortState::by("name", SortDirection::Desc);
		assert_eq!(
			toggle_sort(&desc, "age"),
			SortState::by("age", SortDirection::Asc)
		);
	}

	#[rstest]
	#[case("asc", Some(SortDirection::Asc))]
	#[case("DESC", Some(SortDirection::Desc))]
	#[case("Asc", Some(SortDirection::Asc))]
	#[case("up", None)]
	#[case("", None)]
	fn test_direction_parse(#[case] input: &str, #[case] expected: Option<SortDirection>) {
		assert_eq!(SortDirection::parse(input), expected);
	}

	#[rstest]
	#[case(Value::Null, Value::Int(1), Ordering::Greater)]
	#[case(Value::Int(1), Value::Null, Ordering::Less)]
	#[case(Value::Null, Value::Null, Ordering::Equal)]
	#[case(Value::Int(2), Value::Int(10), Ordering::Less)]
	#[case(Value::Float(2.5), Value::Int(2), Ordering::Greater)]
	#[case(Value::from("apple"), Value::from("Banana"), Ordering::Less)]
	#[case(Value::from("b"), Value::from("B"), Ordering::Greater)]
	#[case(Value::Bool(false), Value::Bool(true), Ordering::Less)]
	fn test_default_compare(#[case] a: Value, #[case] b: Value, #[case] expected: Ordering) {
		assert_eq!(default_compare(&a, &b), expected);
	}

	#[rstest]
	fn test_default_compare_dates() {
		let early = Value::from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
		let late = Value::from(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
		assert_eq!(default_compare(&early, &late), Ordering::Less);
	}

	fn get(record: &(&'static str, Value), _column: &str) -> Value {
		record.1.clone()
	}

	#[rstest]
	fn test_apply_sort_is_stable() {
		let rows = vec![
			("a", Value::Int(2)),
			("b", Value::Int(1)),
			("c", Value::Int(2)),
			("d", Value::Int(1)),
		];

		let asc = apply_sort(&rows, &SortState::by("v", SortDirection::Asc), get, None, false);
		let names: Vec<_> = asc.iter().map(|r| r.0).collect();
		assert_eq!(names, vec!["b", "d", "a", "c"]);

		let desc = apply_sort(&rows, &SortState::by("v", SortDirection::Desc), get, None, false);
		let names: Vec<_> = desc.iter().map(|r| r.0).collect();
		assert_eq!(names, vec!["a", "c", "b", "d"]);
	}

	#[rstest]
	fn test_apply_sort_nulls_last_both_directions() {
		let rows = vec![("x", Value::Null), ("y", Value::Int(5)), ("z", Value::Int(9))];

		let asc = apply_sort(&rows, &SortState::by("v", SortDirection::Asc), get, None, false);
		assert_eq!(asc.iter().map(|r| r.0).collect::<Vec<_>>(), vec!["y", "z", "x"]);

		let desc = apply_sort(&rows, &SortState::by("v", SortDirection::Desc), get, None, false);
		assert_eq!(desc.iter().map(|r| r.0).collect::<Vec<_>>(), vec!["z", "y", "x"]);
	}

	#[rstest]
	fn test_apply_sort_inactive_or_server_mode_is_copy() {
		let rows = vec![("b", Value::Int(2)), ("a", Value::Int(1))];

		assert_eq!(apply_sort(&rows, &SortState::none(), get, None, false), rows);

		let half = SortState {
			column_id: Some("v".to_string()),
			direction: None,
		};
		assert_eq!(apply_sort(&rows, &half, get, None, false), rows);

		let active = SortState::by("v", SortDirection::Asc);
		assert_eq!(apply_sort(&rows, &active, get, None, true), rows);
	}

	#[rstest]
	fn test_apply_sort_custom_comparator() {
		let rows = vec![
			("a", Value::from("aaa")),
			("b", Value::from("z")),
			("c", Value::from("mm")),
		];
		let by_len: CompareFn = Arc::new(|a: &Value, b: &Value| {
			a.to_display_string().len().cmp(&b.to_display_string().len())
		});

		let sorted = apply_sort(
			&rows,
			&SortState::by("v", SortDirection::Asc),
			get,
			Some(&by_len),
			false,
		);
		assert_eq!(sorted.iter().map(|r| r.0).collect::<Vec<_>>(), vec!["b", "c", "a"]);
	}
}
