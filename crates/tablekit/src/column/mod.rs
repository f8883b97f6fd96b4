//! Column model
//!
//! Column definitions are declared once per table with [`col`] or
//! [`col_with_accessor`]. [`create_columns`] turns them into [`RuntimeColumn`]s
//! whose accessors all share the `record -> Value` shape, and the helpers in
//! this module derive the visible and ordered column lists from table state.

pub mod definition;

use std::collections::{BTreeMap, HashSet};
use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::error::ColumnValidationError;
use crate::value::{Record, Value};

pub use definition::{
	Accessor, AccessorFn, Align, ColumnDefinition, ColumnOptions, FilterKind, col,
	col_with_accessor,
};

/// Column visibility map, absent ids are visible
pub type ColumnVisibility = BTreeMap<String, bool>;

/// Preferred column order, absent ids keep their declaration order
pub type ColumnOrder = Vec<String>;

/// A column definition with its accessor resolved
pub struct RuntimeColumn<R> {
	definition: ColumnDefinition<R>,
	get_value: AccessorFn<R>,
}

impl<R> RuntimeColumn<R> {
	/// Returns the column id
	pub fn id(&self) -> &str {
		&self.definition.id
	}

	/// Returns the header label
	pub fn header(&self) -> &str {
		&self.definition.header
	}

	/// Returns the underlying definition
	pub fn definition(&self) -> &ColumnDefinition<R> {
		&self.definition
	}

	/// Reads this column's value from a record
	pub fn value(&self, record: &R) -> Value {
		(self.get_value)(record)
	}
}

impl<R> Clone for RuntimeColumn<R> {
	fn clone(&self) -> Self {
		Self {
			definition: self.definition.clone(),
			get_value: Arc::clone(&self.get_value),
		}
	}
}

impl<R> Debug for RuntimeColumn<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RuntimeColumn")
			.field("definition", &self.definition)
			.finish_non_exhaustive()
	}
}

/// Resolves every definition's accessor into a uniform value function
pub fn create_columns<R>(defs: &[ColumnDefinition<R>]) -> Vec<RuntimeColumn<R>>
where
	R: Record + 'static,
{
	defs.iter()
		.map(|def| {
			let get_value: AccessorFn<R> = match &def.accessor {
				Accessor::Key(key) => {
					let key = key.clone();
					Arc::new(move |record: &R| record.get(&key))
				}
				Accessor::Func(f) => Arc::clone(f),
			};
			RuntimeColumn {
				definition: def.clone(),
				get_value,
			}
		})
		.collect()
}

/// Reads the value of `column_id` from a record
///
/// Unknown column ids yield [`Value::Null`], which filters and sorts as a
/// missing value.
pub fn column_value<R>(columns: &[RuntimeColumn<R>], record: &R, column_id: &str) -> Value {
	columns
		.iter()
		.find(|c| c.id() == column_id)
		.map(|c| c.value(record))
		.unwrap_or(Value::Null)
}

/// Keeps columns not explicitly hidden
pub fn get_visible_columns<'a, R>(
	columns: &'a [RuntimeColumn<R>],
	visibility: &ColumnVisibility,
) -> Vec<&'a RuntimeColumn<R>> {
	columns
		.iter()
		.filter(|c| visibility.get(c.id()).copied() != Some(false))
		.collect()
}

/// Places columns named in `order` first, then the rest in declaration order
///
/// Ids in `order` that match no column are skipped; repeated ids count once.
pub fn get_ordered_columns<'a, C>(columns: &[&'a C], order: &[String]) -> Vec<&'a C>
where
	C: HasColumnId,
{
	let mut placed: HashSet<&str> = HashSet::with_capacity(columns.len());
	let mut result = Vec::with_capacity(columns.len());

	for id in order {
		if placed.contains(id.as_str()) {
			continue;
		}
		if let Some(column) = columns.iter().find(|c| c.column_id() == id.as_str()) {
			placed.insert(column.column_id());
			result.push(*column);
		}
	}

	for column in columns {
		if !placed.contains(column.column_id()) {
			result.push(*column);
		}
	}

	result
}

/// Anything carrying a column id, so ordering works on definitions and runtime columns
pub trait HasColumnId {
	/// Returns the column id
	fn column_id(&self) -> &str;
}

impl<R> HasColumnId for RuntimeColumn<R> {
	fn column_id(&self) -> &str {
		self.id()
	}
}

impl<R> HasColumnId for ColumnDefinition<R> {
	fn column_id(&self) -> &str {
		&self.id
	}
}

/// Outcome of [`validate_columns`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnValidation {
	/// True when no errors were found
	pub valid: bool,
	/// Every problem found, in declaration order
	pub errors: Vec<ColumnValidationError>,
}

/// Checks definitions for blank and duplicate ids
///
/// Problems are reported, never raised; the caller decides whether to go on.
pub fn validate_columns<R>(defs: &[ColumnDefinition<R>]) -> ColumnValidation {
	let mut seen = HashSet::with_capacity(defs.len());
	let mut errors = Vec::new();

	for (index, def) in defs.iter().enumerate() {
		if def.id.trim().is_empty() {
			errors.push(ColumnValidationError::EmptyId { index });
			continue;
		}
		if !seen.insert(def.id.as_str()) {
			errors.push(ColumnValidationError::DuplicateId { id: def.id.clone() });
		}
	}

	ColumnValidation {
		valid: errors.is_empty(),
		errors,
	}
}

/// Seeds a visibility map from the definitions' `visible` defaults
pub fn initial_visibility<R>(defs: &[ColumnDefinition<R>]) -> ColumnVisibility {
	defs.iter()
		.filter(|def| !def.visible)
		.map(|def| (def.id.clone(), false))
		.collect()
}
