//! Caller-facing state configuration
//!
//! [`StateOptions`] mirrors the three ways a caller can own table state. The
//! shape of the options decides the [`OwnershipMode`]; see
//! [`StateOptions::mode`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::TableState;
use crate::column::{ColumnOrder, ColumnVisibility};
use crate::filter::FilterState;
use crate::pagination::PaginationState;
use crate::selection::SelectionState;
use crate::sort::SortState;

/// Reads the current value of an externally owned slice
pub type StateReader<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Receives the new value of a slice after a mutation
pub type StateCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Who owns the table state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipMode {
	/// The caller owns the whole snapshot and receives every update
	Controlled,
	/// The table owns every slice
	Uncontrolled,
	/// Each slice is owned by the caller or the table independently
	PerField,
}

/// Partial overrides applied on top of the default initial state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InitialState {
	/// Initial pagination
	pub pagination: Option<PaginationState>,
	/// Initial sort
	pub sorting: Option<SortState>,
	/// Initial filters
	pub filtering: Option<FilterState>,
	/// Initial visibility map
	pub column_visibility: Option<ColumnVisibility>,
	/// Initial column order
	pub column_order: Option<ColumnOrder>,
	/// Initial selection
	pub selection: Option<SelectionState>,
}

impl InitialState {
	/// Applies every present override to `base`
	pub fn apply(&self, base: TableState) -> TableState {
		use super::StateSlice;

		let mut state = base;
		if let Some(v) = &self.pagination {
			state = state.with(StateSlice::Pagination(v.clone()));
		}
		if let Some(v) = &self.sorting {
			state = state.with(StateSlice::Sorting(v.clone()));
		}
		if let Some(v) = &self.filtering {
			state = state.with(StateSlice::Filtering(v.clone()));
		}
		if let Some(v) = &self.column_visibility {
			state = state.with(StateSlice::ColumnVisibility(v.clone()));
		}
		if let Some(v) = &self.column_order {
			state = state.with(StateSlice::ColumnOrder(v.clone()));
		}
		if let Some(v) = &self.selection {
			state = state.with(StateSlice::Selection(v.clone()));
		}
		state
	}
}

/// One externally supplied slice: a reader, a change callback, or both
pub struct FieldControl<T> {
	/// Reader for an externally owned value
	pub value: Option<StateReader<T>>,
	/// Callback invoked with every new value
	pub on_change: Option<StateCallback<T>>,
}

impl<T> FieldControl<T> {
	/// Returns true if either a reader or a callback was supplied
	pub fn is_present(&self) -> bool {
		self.value.is_some() || self.on_change.is_some()
	}

	/// Returns true if the caller owns the value
	pub fn is_controlled(&self) -> bool {
		self.value.is_some()
	}
}

impl<T> Default for FieldControl<T> {
	fn default() -> Self {
		Self {
			value: None,
			on_change: None,
		}
	}
}

impl<T> Clone for FieldControl<T> {
	fn clone(&self) -> Self {
		Self {
			value: self.value.clone(),
			on_change: self.on_change.clone(),
		}
	}
}

impl<T> fmt::Debug for FieldControl<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldControl")
			.field("controlled", &self.value.is_some())
			.field("on_change", &self.on_change.is_some())
			.finish()
	}
}

/// State ownership configuration
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tablekit::sort::SortState;
/// use tablekit::state::{OwnershipMode, StateOptions};
///
/// let options = StateOptions::new().on_sorting_change(Arc::new(|sort: &SortState| {
///     println!("sort changed: {:?}", sort);
/// }));
/// assert_eq!(options.mode(), OwnershipMode::PerField);
/// assert_eq!(StateOptions::new().mode(), OwnershipMode::Uncontrolled);
/// ```
#[derive(Clone, Default)]
pub struct StateOptions {
	/// Externally owned full snapshot
	pub state: Option<StateReader<TableState>>,
	/// Setter receiving every new snapshot
	pub set_state: Option<StateCallback<TableState>>,
	/// Overrides for an internally owned initial state
	pub initial_state: Option<InitialState>,
	/// Listener notified with every new snapshot
	pub on_state_change: Option<StateCallback<TableState>>,
	/// Per-field pagination control
	pub pagination: FieldControl<PaginationState>,
	/// Per-field sort control
	pub sorting: FieldControl<SortState>,
	/// Per-field filter control
	pub filtering: FieldControl<FilterState>,
	/// Per-field visibility control
	pub column_visibility: FieldControl<ColumnVisibility>,
	/// Per-field order control
	pub column_order: FieldControl<ColumnOrder>,
}

impl StateOptions {
	/// Options for a fully uncontrolled table
	pub fn new() -> Self {
		Self::default()
	}

	/// Options for a fully controlled table
	pub fn controlled(
		state: StateReader<TableState>,
		set_state: StateCallback<TableState>,
	) -> Self {
		Self {
			state: Some(state),
			set_state: Some(set_state),
			..Self::default()
		}
	}

	/// Sets initial overrides
	pub fn initial_state(mut self, initial: InitialState) -> Self {
		self.initial_state = Some(initial);
		self
	}

	/// Sets the aggregate change listener
	pub fn on_state_change(mut self, callback: StateCallback<TableState>) -> Self {
		self.on_state_change = Some(callback);
		self
	}

	/// Hands pagination to the caller
	pub fn pagination(mut self, value: StateReader<PaginationState>) -> Self {
		self.pagination.value = Some(value);
		self
	}

	/// Listens to pagination changes
	pub fn on_pagination_change(mut self, callback: StateCallback<PaginationState>) -> Self {
		self.pagination.on_change = Some(callback);
		self
	}

	/// Hands sorting to the caller
	pub fn sorting(mut self, value: StateReader<SortState>) -> Self {
		self.sorting.value = Some(value);
		self
	}

	/// Listens to sort changes
	pub fn on_sorting_change(mut self, callback: StateCallback<SortState>) -> Self {
		self.sorting.on_change = Some(callback);
		self
	}

	/// Hands filtering to the caller
	pub fn filtering(mut self, value: StateReader<FilterState>) -> Self {
		self.filtering.value = Some(value);
		self
	}

	/// Listens to filter changes
	pub fn on_filtering_change(mut self, callback: StateCallback<FilterState>) -> Self {
		self.filtering.on_change = Some(callback);
		self
	}

	/// Hands column visibility to the caller
	pub fn column_visibility(mut self, value: StateReader<ColumnVisibility>) -> Self {
		self.column_visibility.value = Some(value);
		self
	}

	/// Listens to visibility changes
	pub fn on_column_visibility_change(
		mut self,
		callback: StateCallback<ColumnVisibility>,
	) -> Self {
		self.column_visibility.on_change = Some(callback);
		self
	}

	/// Hands column order to the caller
	pub fn column_order(mut self, value: StateReader<ColumnOrder>) -> Self {
		self.column_order.value = Some(value);
		self
	}

	/// Listens to order changes
	pub fn on_column_order_change(mut self, callback: StateCallback<ColumnOrder>) -> Self {
		self.column_order.on_change = Some(callback);
		self
	}

	fn has_per_field_keys(&self) -> bool {
		self.pagination.is_present()
			|| self.sorting.is_present()
			|| self.filtering.is_present()
			|| self.column_visibility.is_present()
			|| self.column_order.is_present()
	}

	/// Classifies the options by shape
	///
	/// `state` plus `set_state` is controlled; per-field keys or callbacks
	/// without `state`/`initial_state` are per-field; anything else is
	/// uncontrolled.
	pub fn mode(&self) -> OwnershipMode {
		if self.state.is_some() && self.set_state.is_some() {
			OwnershipMode::Controlled
		} else if self.has_per_field_keys()
			&& self.state.is_none()
			&& self.initial_state.is_none()
		{
			OwnershipMode::PerField
		} else {
			OwnershipMode::Uncontrolled
		}
	}
}

impl fmt::Debug for StateOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StateOptions")
			.field("mode", &self.mode())
			.field("initial_state", &self.initial_state)
			.field("on_state_change", &self.on_state_change.is_some())
			.field("pagination", &self.pagination)
			.field("sorting", &self.sorting)
			.field("filtering", &self.filtering)
			.field("column_visibility", &self.column_visibility)
			.field("column_order", &self.column_order)
			.finish_non_exhaustive()
	}
}
