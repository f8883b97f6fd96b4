//! Table state snapshot and ownership strategies
//!
//! [`TableState`] is the single externally visible snapshot. It is never
//! mutated in place: every update produces a new snapshot that shares all
//! unchanged slices with its predecessor.

pub mod options;
pub mod strategy;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::column::{ColumnOrder, ColumnVisibility};
use crate::filter::FilterState;
use crate::pagination::PaginationState;
use crate::selection::SelectionState;
use crate::sort::SortState;

pub use options::{InitialState, OwnershipMode, StateCallback, StateOptions, StateReader};
pub use strategy::{
	ControlledStrategy, PerFieldStrategy, StateStrategy, UncontrolledStrategy, resolve_strategy,
	resolve_strategy_with,
};

/// Pipeline stages delegated to a server
///
/// A stage whose flag is set passes its input through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerModeConfig {
	/// Input rows are already a single page
	pub pagination: bool,
	/// Input rows are already sorted
	pub sorting: bool,
	/// Input rows are already filtered
	pub filtering: bool,
}

/// Names of the state slices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
	/// [`PaginationState`]
	Pagination,
	/// [`SortState`]
	Sorting,
	/// [`FilterState`]
	Filtering,
	/// [`ColumnVisibility`]
	ColumnVisibility,
	/// [`ColumnOrder`]
	ColumnOrder,
	/// [`SelectionState`]
	Selection,
}

/// A value for one state slice
#[derive(Debug, Clone, PartialEq)]
pub enum StateSlice {
	/// New pagination
	Pagination(PaginationState),
	/// New sort
	Sorting(SortState),
	/// New filters
	Filtering(FilterState),
	/// New visibility map
	ColumnVisibility(ColumnVisibility),
	/// New column order
	ColumnOrder(ColumnOrder),
	/// New selection
	Selection(SelectionState),
}

impl StateSlice {
	/// Returns which slice this value belongs to
	pub fn field(&self) -> StateField {
		match self {
			Self::Pagination(_) => StateField::Pagination,
			Self::Sorting(_) => StateField::Sorting,
			Self::Filtering(_) => StateField::Filtering,
			Self::ColumnVisibility(_) => StateField::ColumnVisibility,
			Self::ColumnOrder(_) => StateField::ColumnOrder,
			Self::Selection(_) => StateField::Selection,
		}
	}
}

/// Aggregate table state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
	pagination: Arc<PaginationState>,
	sorting: Arc<SortState>,
	filtering: Arc<FilterState>,
	column_visibility: Arc<ColumnVisibility>,
	column_order: Arc<ColumnOrder>,
	#[serde(default)]
	selection: SelectionState,
	#[serde(default)]
	server_mode: ServerModeConfig,
}

impl Default for TableState {
	fn default() -> Self {
		Self::new(Vec::new(), PaginationState::default().page_size)
	}
}

impl TableState {
	/// Creates the initial state for a table with the given columns
	///
	/// The column order starts as declared; nothing is sorted, filtered,
	/// hidden or selected.
	pub fn new(column_ids: Vec<String>, page_size: usize) -> Self {
		Self {
			pagination: Arc::new(PaginationState::new(page_size)),
			sorting: Arc::new(SortState::none()),
			filtering: Arc::new(FilterState::default()),
			column_visibility: Arc::new(ColumnVisibility::new()),
			column_order: Arc::new(column_ids),
			selection: SelectionState::new(),
			server_mode: ServerModeConfig::default(),
		}
	}

	/// Returns a copy flagged with `server_mode`
	pub fn with_server_mode(mut self, server_mode: ServerModeConfig) -> Self {
		self.server_mode = server_mode;
		self
	}

	/// Returns a copy carrying `selection`
	pub fn with_selection(mut self, selection: SelectionState) -> Self {
		self.selection = selection;
		self
	}

	/// Current pagination
	pub fn pagination(&self) -> &PaginationState {
		&self.pagination
	}

	/// Current sort
	pub fn sorting(&self) -> &SortState {
		&self.sorting
	}

	/// Current filters
	pub fn filtering(&self) -> &FilterState {
		&self.filtering
	}

	/// Current visibility map
	pub fn column_visibility(&self) -> &ColumnVisibility {
		&self.column_visibility
	}

	/// Current column order
	pub fn column_order(&self) -> &ColumnOrder {
		&self.column_order
	}

	/// Current selection
	pub fn selection(&self) -> &SelectionState {
		&self.selection
	}

	/// Server delegation flags
	pub fn server_mode(&self) -> ServerModeConfig {
		self.server_mode
	}

	/// Reads one slice
	pub fn get(&self, field: StateField) -> StateSlice {
		match field {
			StateField::Pagination => StateSlice::Pagination((*self.pagination).clone()),
			StateField::Sorting => StateSlice::Sorting((*self.sorting).clone()),
			StateField::Filtering => StateSlice::Filtering((*self.filtering).clone()),
			StateField::ColumnVisibility => {
				StateSlice::ColumnVisibility((*self.column_visibility).clone())
			}
			StateField::ColumnOrder => StateSlice::ColumnOrder((*self.column_order).clone()),
			StateField::Selection => StateSlice::Selection(self.selection.clone()),
		}
	}

	/// Returns a new snapshot with `slice` replaced
	///
	/// Every other slice is shared with `self`.
	pub fn with(&self, slice: StateSlice) -> Self {
		let mut next = self.clone();
		match slice {
			StateSlice::Pagination(v) => next.pagination = Arc::new(v),
			StateSlice::Sorting(v) => next.sorting = Arc::new(v),
			StateSlice::Filtering(v) => next.filtering = Arc::new(v),
			StateSlice::ColumnVisibility(v) => next.column_visibility = Arc::new(v),
			StateSlice::ColumnOrder(v) => next.column_order = Arc::new(v),
			StateSlice::Selection(v) => next.selection = v,
		}
		next
	}

	/// Returns true if `field` is the very same allocation in both snapshots
	pub fn shares(&self, other: &Self, field: StateField) -> bool {
		match field {
			StateField::Pagination => Arc::ptr_eq(&self.pagination, &other.pagination),
			StateField::Sorting => Arc::ptr_eq(&self.sorting, &other.sorting),
			StateField::Filtering => Arc::ptr_eq(&self.filtering, &other.filtering),
			StateField::ColumnVisibility => {
				Arc::ptr_eq(&self.column_visibility, &other.column_visibility)
			}
			StateField::ColumnOrder => Arc::ptr_eq(&self.column_order, &other.column_order),
			StateField::Selection => self.selection == other.selection,
		}
	}
}
