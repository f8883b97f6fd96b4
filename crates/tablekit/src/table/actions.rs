//! Grouped table mutators
//!
//! Each group borrows the table mutably for the duration of one call chain and
//! turns a user intent into new state slices handed to the table's ownership
//! strategy.

use crate::column::{HasColumnId, get_ordered_columns};
use crate::filter::FilterState;
use crate::pagination::{
	go_to_first_page, go_to_last_page, go_to_next_page, go_to_page, go_to_previous_page,
	set_page_size,
};
use crate::selection::SelectionState;
use crate::sort::{SortDirection, SortState, toggle_sort};
use crate::state::StateSlice;
use crate::value::{Record, RowId};

use super::Table;

/// Sort mutators, see [`Table::sorting`]
pub struct SortingActions<'t, R> {
	table: &'t mut Table<R>,
}

impl<'t, R: Record + 'static> SortingActions<'t, R> {
	pub(super) fn new(table: &'t mut Table<R>) -> Self {
		Self { table }
	}

	fn is_sortable(&self, column_id: &str) -> bool {
		match self.table.find_column(column_id) {
			Some(column) if !column.definition().sortable => {
				tracing::debug!(column = column_id, "column is not sortable");
				false
			}
			_ => true,
		}
	}

	/// Cycles `column_id` through ascending, descending and unsorted
	///
	/// Moving to a different column starts over at ascending.
	pub fn toggle(&mut self, column_id: &str) {
		if !self.is_sortable(column_id) {
			return;
		}
		let next = toggle_sort(self.table.state().sorting(), column_id);
		self.table.commit(vec![StateSlice::Sorting(next)]);
	}

	/// Sorts by `column_id` in `direction`
	pub fn set(&mut self, column_id: &str, direction: SortDirection) {
		if !self.is_sortable(column_id) {
			return;
		}
		self.table
			.commit(vec![StateSlice::Sorting(SortState::by(column_id, direction))]);
	}

	/// Removes the sort
	pub fn clear(&mut self) {
		self.table.commit(vec![StateSlice::Sorting(SortState::none())]);
	}
}

/// Pagination mutators, see [`Table::pagination`]
///
/// Every move is clamped to the pages that currently exist.
pub struct PaginationActions<'t, R> {
	table: &'t mut Table<R>,
}

impl<'t, R: Record + 'static> PaginationActions<'t, R> {
	pub(super) fn new(table: &'t mut Table<R>) -> Self {
		Self { table }
	}

	/// Moves to `page_index`
	pub fn go_to_page(&mut self, page_index: usize) {
		let (current, page_count) = self.table.current_pagination();
		let next = go_to_page(&current, page_index, page_count);
		self.table.commit(vec![StateSlice::Pagination(next)]);
	}

	/// Moves forward one page
	pub fn next_page(&mut self) {
		let (current, page_count) = self.table.current_pagination();
		let next = go_to_next_page(&current, page_count);
		self.table.commit(vec![StateSlice::Pagination(next)]);
	}

	/// Moves back one page
	pub fn previous_page(&mut self) {
		let (current, page_count) = self.table.current_pagination();
		let next = go_to_previous_page(&current, page_count);
		self.table.commit(vec![StateSlice::Pagination(next)]);
	}

	/// Moves to the first page
	pub fn first_page(&mut self) {
		let (current, _) = self.table.current_pagination();
		self.table
			.commit(vec![StateSlice::Pagination(go_to_first_page(&current))]);
	}

	/// Moves to the last page
	pub fn last_page(&mut self) {
		let (current, page_count) = self.table.current_pagination();
		let next = go_to_last_page(&current, page_count);
		self.table.commit(vec![StateSlice::Pagination(next)]);
	}

	/// Changes the page size, keeping the page index in range
	///
	/// A size of 0 is ignored.
	pub fn set_page_size(&mut self, page_size: usize) {
		if page_size == 0 {
			tracing::warn!("ignoring page size of 0");
			return;
		}
		let state = self.table.state();
		let filtered = self.table.filtered_row_count();
		let next = set_page_size(state.pagination(), page_size, Some(filtered));
		self.table.commit(vec![StateSlice::Pagination(next)]);
	}
}

/// Filter mutators, see [`Table::filtering`]
///
/// Any filter change returns to the first page.
pub struct FilteringActions<'t, R> {
	table: &'t mut Table<R>,
}

impl<'t, R: Record + 'static> FilteringActions<'t, R> {
	pub(super) fn new(table: &'t mut Table<R>) -> Self {
		Self { table }
	}

	fn apply(&mut self, filtering: FilterState) {
		let state = self.table.state();
		if state.filtering() == &filtering {
			return;
		}
		let mut slices = vec![StateSlice::Filtering(filtering)];
		if state.pagination().page_index != 0 {
			slices.push(StateSlice::Pagination(go_to_first_page(state.pagination())));
		}
		self.table.commit(slices);
	}

	/// Sets the filter matched against every field
	pub fn set_global_filter(&mut self, value: impl Into<String>) {
		let filtering = FilterState {
			global_filter: value.into(),
			..self.table.state().filtering().clone()
		};
		self.apply(filtering);
	}

	/// Sets the filter of one column; a blank value removes it
	pub fn set_column_filter(&mut self, column_id: &str, value: impl Into<String>) {
		let filtering = self
			.table
			.state()
			.filtering()
			.with_column_filter(column_id, value);
		self.apply(filtering);
	}

	/// Removes the filter of one column
	pub fn clear_column_filter(&mut self, column_id: &str) {
		self.set_column_filter(column_id, "");
	}

	/// Removes every filter
	pub fn clear_all(&mut self) {
		self.apply(FilterState::default());
	}
}

/// Visibility and order mutators, see [`Table::column_management`]
pub struct ColumnActions<'t, R> {
	table: &'t mut Table<R>,
}

impl<'t, R: Record + 'static> ColumnActions<'t, R> {
	pub(super) fn new(table: &'t mut Table<R>) -> Self {
		Self { table }
	}

	fn declared_ids(&self) -> Vec<String> {
		self.table
			.columns()
			.iter()
			.map(|c| c.id().to_string())
			.collect()
	}

	/// Flips the visibility of `column_id`
	pub fn toggle_visibility(&mut self, column_id: &str) {
		let state = self.table.state();
		let visible = state.column_visibility().get(column_id).copied() != Some(false);
		self.set_visibility(column_id, !visible);
	}

	/// Shows or hides `column_id`
	pub fn set_visibility(&mut self, column_id: &str, visible: bool) {
		let mut visibility = self.table.state().column_visibility().clone();
		visibility.insert(column_id.to_string(), visible);
		self.table
			.commit(vec![StateSlice::ColumnVisibility(visibility)]);
	}

	/// Shows every column, including those hidden by default
	pub fn show_all(&mut self) {
		let visibility = self
			.declared_ids()
			.into_iter()
			.map(|id| (id, true))
			.collect();
		self.table
			.commit(vec![StateSlice::ColumnVisibility(visibility)]);
	}

	/// Replaces the preferred column order
	pub fn set_order(&mut self, order: Vec<String>) {
		self.table.commit(vec![StateSlice::ColumnOrder(order)]);
	}

	/// Moves `column_id` to `to_index` in the effective order
	///
	/// Unknown ids are ignored; indexes past the end move the column last.
	pub fn move_column(&mut self, column_id: &str, to_index: usize) {
		let state = self.table.state();
		let all: Vec<_> = self.table.columns().iter().collect();
		let mut order: Vec<String> = get_ordered_columns(&all, state.column_order())
			.into_iter()
			.map(|c| c.column_id().to_string())
			.collect();

		let Some(from) = order.iter().position(|id| id == column_id) else {
			tracing::debug!(column = column_id, "cannot move unknown column");
			return;
		};
		let id = order.remove(from);
		order.insert(to_index.min(order.len()), id);
		self.set_order(order);
	}

	/// Restores declaration order
	pub fn reset_order(&mut self) {
		let order = self.declared_ids();
		self.set_order(order);
	}
}

/// Selection mutators and queries, see [`Table::selection`]
///
/// `select_all` and `deselect_all` act on the current page only. When
/// selection is disabled the mutators do nothing.
pub struct SelectionActions<'t, R> {
	table: &'t mut Table<R>,
}

impl<'t, R: Record + 'static> SelectionActions<'t, R> {
	pub(super) fn new(table: &'t mut Table<R>) -> Self {
		Self { table }
	}

	fn update<F>(&mut self, f: F)
	where
		F: FnOnce(&SelectionState) -> SelectionState,
	{
		if !self.table.selection_config().enabled {
			tracing::trace!("selection is disabled");
			return;
		}
		let state = self.table.state();
		let next = f(state.selection());
		if &next != state.selection() {
			self.table.commit(vec![StateSlice::Selection(next)]);
		}
	}

	/// Selects one row
	pub fn select(&mut self, id: impl Into<RowId>) {
		let mode = self.table.selection_mode();
		let id = id.into();
		self.update(|selection| selection.select(id, mode));
	}

	/// Deselects one row
	pub fn deselect(&mut self, id: impl Into<RowId>) {
		let id = id.into();
		self.update(|selection| selection.deselect(&id));
	}

	/// Flips one row
	pub fn toggle(&mut self, id: impl Into<RowId>) {
		let mode = self.table.selection_mode();
		let id = id.into();
		self.update(|selection| selection.toggle(id, mode));
	}

	/// Selects every row of the current page
	pub fn select_all(&mut self) {
		let mode = self.table.selection_mode();
		let page_ids = self.table.page_row_ids();
		self.update(|selection| selection.select_all(&page_ids, mode));
	}

	/// Deselects every row of the current page
	pub fn deselect_all(&mut self) {
		let page_ids = self.table.page_row_ids();
		self.update(|selection| selection.deselect_all(&page_ids));
	}

	/// Deselects everything, on every page
	pub fn clear(&mut self) {
		self.update(SelectionState::clear);
	}

	/// Returns true if `id` is selected
	pub fn is_selected(&self, id: impl Into<RowId>) -> bool {
		self.table.state().selection().is_selected(&id.into())
	}

	/// True when the page is non-empty and every row on it is selected
	pub fn is_all_selected(&self) -> bool {
		let page_ids = self.table.page_row_ids();
		self.table.state().selection().is_all_selected(&page_ids)
	}

	/// True when some, but not all, rows of the page are selected
	pub fn is_indeterminate(&self) -> bool {
		let page_ids = self.table.page_row_ids();
		self.table.state().selection().is_indeterminate(&page_ids)
	}

	/// Number of selected rows, on every page
	pub fn len(&self) -> usize {
		self.table.state().selection().len()
	}

	/// Returns true when nothing is selected
	pub fn is_empty(&self) -> bool {
		self.table.state().selection().is_empty()
	}
}
