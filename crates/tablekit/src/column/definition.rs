//! Declarative column definitions

use std::fmt::{self, Debug};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::sort::CompareFn;
use crate::value::Value;

/// Value accessor shared by definitions and runtime columns
pub type AccessorFn<R> = Arc<dyn Fn(&R) -> Value + Send + Sync>;

/// How a column's value is read from a record
pub enum Accessor<R> {
	/// Key-path lookup through [`Record::get`](crate::value::Record::get)
	Key(String),
	/// Arbitrary extraction function
	Func(AccessorFn<R>),
}

impl<R> Clone for Accessor<R> {
	fn clone(&self) -> Self {
		match self {
			Self::Key(key) => Self::Key(key.clone()),
			Self::Func(f) => Self::Func(Arc::clone(f)),
		}
	}
}

impl<R> Debug for Accessor<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Key(key) => f.debug_tuple("Key").field(key).finish(),
			Self::Func(_) => f.write_str("Func(..)"),
		}
	}
}

/// Kind of filter input a column offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
	/// Case-insensitive substring filter
	#[default]
	Text,
	/// Column is not filterable
	None,
}

/// Horizontal alignment hint for the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
	/// Left aligned
	#[default]
	Left,
	/// Centered
	Center,
	/// Right aligned
	Right,
}

/// Optional settings for a column definition
///
/// # Example
///
/// ```rust
/// use tablekit::column::{Align, ColumnOptions};
///
/// let options = ColumnOptions::new()
///     .header("Age")
///     .align(Align::Right)
///     .width(80);
/// assert_eq!(options.header.as_deref(), Some("Age"));
/// ```
#[derive(Clone, Default)]
pub struct ColumnOptions {
	/// Header label, defaults to the column id
	pub header: Option<String>,
	/// Whether the column can be sorted (default: true)
	pub sortable: Option<bool>,
	/// Filter kind (default: text)
	pub filter: FilterKind,
	/// Preferred width
	pub width: Option<u32>,
	/// Minimum width
	pub min_width: Option<u32>,
	/// Maximum width
	pub max_width: Option<u32>,
	/// Whether the column starts visible (default: true)
	pub visible: Option<bool>,
	/// Cell alignment
	pub align: Align,
	/// Free-form metadata for the view layer
	pub meta: serde_json::Value,
	/// Comparator overriding the default one when sorting by this column
	pub compare: Option<CompareFn>,
}

impl ColumnOptions {
	/// Creates empty options
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the header label
	pub fn header(mut self, header: impl Into<String>) -> Self {
		self.header = Some(header.into());
		self
	}

	/// Sets whether the column is sortable
	pub fn sortable(mut self, sortable: bool) -> Self {
		self.sortable = Some(sortable);
		self
	}

	/// Sets the filter kind
	pub fn filter(mut self, filter: FilterKind) -> Self {
		self.filter = filter;
		self
	}

	/// Sets the preferred width
	pub fn width(mut self, width: u32) -> Self {
		self.width = Some(width);
		self
	}

	/// Sets the minimum width
	pub fn min_width(mut self, min_width: u32) -> Self {
		self.min_width = Some(min_width);
		self
	}

	/// Sets the maximum width
	pub fn max_width(mut self, max_width: u32) -> Self {
		self.max_width = Some(max_width);
		self
	}

	/// Sets whether the column is initially visible
	pub fn visible(mut self, visible: bool) -> Self {
		self.visible = Some(visible);
		self
	}

	/// Sets the cell alignment
	pub fn align(mut self, align: Align) -> Self {
		self.align = align;
		self
	}

	/// Attaches free-form metadata
	pub fn meta(mut self, meta: serde_json::Value) -> Self {
		self.meta = meta;
		self
	}

	/// Sets a custom comparator for this column
	pub fn compare(mut self, compare: CompareFn) -> Self {
		self.compare = Some(compare);
		self
	}
}

impl Debug for ColumnOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ColumnOptions")
			.field("header", &self.header)
			.field("sortable", &self.sortable)
			.field("filter", &self.filter)
			.field("visible", &self.visible)
			.field("align", &self.align)
			.finish_non_exhaustive()
	}
}

/// An immutable column declaration
///
/// Built with [`col`] or [`col_with_accessor`].
pub struct ColumnDefinition<R> {
	/// Unique, stable identifier
	pub id: String,
	/// Header label
	pub header: String,
	/// Whether the column can be sorted
	pub sortable: bool,
	/// Filter kind
	pub filter: FilterKind,
	/// Preferred width
	pub width: Option<u32>,
	/// Minimum width
	pub min_width: Option<u32>,
	/// Maximum width
	pub max_width: Option<u32>,
	/// Whether the column starts visible
	pub visible: bool,
	/// Cell alignment
	pub align: Align,
	/// How values are read
	pub accessor: Accessor<R>,
	/// Free-form metadata
	pub meta: serde_json::Value,
	/// Column-specific comparator
	pub compare: Option<CompareFn>,
}

impl<R> ColumnDefinition<R> {
	fn from_options(id: String, accessor: Accessor<R>, options: ColumnOptions) -> Self {
		Self {
			header: options.header.unwrap_or_else(|| id.clone()),
			id,
			sortable: options.sortable.unwrap_or(true),
			filter: options.filter,
			width: options.width,
			min_width: options.min_width,
			max_width: options.max_width,
			visible: options.visible.unwrap_or(true),
			align: options.align,
			accessor,
			meta: options.meta,
			compare: options.compare,
		}
	}

	/// Returns whether the column accepts a text filter
	pub fn filterable(&self) -> bool {
		self.filter == FilterKind::Text
	}
}

impl<R> Clone for ColumnDefinition<R> {
	fn clone(&self) -> Self {
		Self {
			id: self.id.clone(),
			header: self.header.clone(),
			sortable: self.sortable,
			filter: self.filter,
			width: self.width,
			min_width: self.min_width,
			max_width: self.max_width,
			visible: self.visible,
			align: self.align,
			accessor: self.accessor.clone(),
			meta: self.meta.clone(),
			compare: self.compare.clone(),
		}
	}
}

impl<R> Debug for ColumnDefinition<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ColumnDefinition")
			.field("id", &self.id)
			.field("header", &self.header)
			.field("sortable", &self.sortable)
			.field("filter", &self.filter)
			.field("visible", &self.visible)
			.field("accessor", &self.accessor)
			.finish_non_exhaustive()
	}
}

/// Declares a column read by key
///
/// The key doubles as the column id and as the key-path accessor.
///
/// # Example
///
/// ```rust
/// use tablekit::column::{col, ColumnOptions};
///
/// let name = col::<serde_json::Value>("name", ColumnOptions::new().header("Name"));
/// assert_eq!(name.id, "name");
/// assert_eq!(name.header, "Name");
/// ```
pub fn col<R>(key: impl Into<String>, options: ColumnOptions) -> ColumnDefinition<R> {
	let key = key.into();
	ColumnDefinition::from_options(key.clone(), Accessor::Key(key), options)
}

/// Declares a column computed by a function
///
/// Function columns have no key to fall back on, so the id is explicit.
pub fn col_with_accessor<R, F>(
	id: impl Into<String>,
	accessor: F,
	options: ColumnOptions,
) -> ColumnDefinition<R>
where
	F: Fn(&R) -> Value + Send + Sync + 'static,
{
	ColumnDefinition::from_options(id.into(), Accessor::Func(Arc::new(accessor)), options)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[derive(Debug)]
	struct TestRow {
		first: String,
		last: String,
	}

	#[rstest]
	fn test_key_column_defaults() {
		let column = col::<TestRow>("first", ColumnOptions::new());
		assert_eq!(column.id, "first");
		assert_eq!(column.header, "first");
		assert!(column.sortable);
		assert!(column.visible);
		assert!(column.filterable());
		assert!(matches!(column.accessor, Accessor::Key(ref k) if k == "first"));
	}

	#[rstest]
	fn test_accessor_column() {
		let column = col_with_accessor(
			"full_name",
			|row: &TestRow| Value::from(format!("{} {}", row.first, row.last)),
			ColumnOptions::new().header("Full Name").sortable(false),
		);
		let row = TestRow {
			first: "Ada".to_string(),
			last: "Lovelace".to_string(),
		};

		assert_eq!(column.id, "full_name");
		assert_eq!(column.header, "Full Name");
		assert!(!column.sortable);
		match &column.accessor {
			Accessor::Func(f) => assert_eq!(f(&row), Value::from("Ada Lovelace")),
			Accessor::Key(_) => panic!("expected a function accessor"),
		}
	}

	#[rstest]
	fn test_options_builder() {
		let column = col::<TestRow>(
			"last",
			ColumnOptions::new()
				.filter(FilterKind::None)
				.visible(false)
				.width(120)
				.min_width(40)
				.max_width(300)
				.align(Align::Center)
				.meta(serde_json::json!({ "group": "identity" })),
		);

		assert!(!column.filterable());
		assert!(!column.visible);
		assert_eq!(column.width, Some(120));
		assert_eq!(column.min_width, Some(40));
		assert_eq!(column.max_width, Some(300));
		assert_eq!(column.align, Align::Center);
		assert_eq!(column.meta["group"], "identity");
	}
}
