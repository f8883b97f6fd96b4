//! The table coordinator
//!
//! [`Table`] owns the input rows and the column model, resolves state
//! ownership once at construction, and derives every view through the
//! Filter → Sort → Pagination pipeline on demand. Mutations go through the
//! action groups returned by [`Table::sorting`], [`Table::pagination`],
//! [`Table::filtering`], [`Table::column_management`] and [`Table::selection`].
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tablekit::column::{col, ColumnOptions};
//! use tablekit::sort::SortDirection;
//! use tablekit::table::{Table, TableOptions};
//!
//! let rows = vec![
//!     json!({ "name": "Alice", "age": 31 }),
//!     json!({ "name": "Bob", "age": 45 }),
//!     json!({ "name": "Carol", "age": 27 }),
//! ];
//! let columns = vec![
//!     col("name", ColumnOptions::new().header("Name")),
//!     col("age", ColumnOptions::new().header("Age")),
//! ];
//!
//! let mut table = Table::new(rows, columns, TableOptions::new().page_size(2));
//! table.sorting().set("age", SortDirection::Desc);
//!
//! let names: Vec<_> = table
//!     .page_rows()
//!     .iter()
//!     .map(|row| row.record["name"].as_str().unwrap().to_string())
//!     .collect();
//! assert_eq!(names, ["Bob", "Alice"]);
//! assert_eq!(table.page_count(), 2);
//! ```

pub mod actions;
pub mod options;

use std::fmt;

use crate::column::{
	ColumnDefinition, ColumnValidation, RuntimeColumn, column_value, create_columns,
	get_ordered_columns, get_visible_columns, initial_visibility, validate_columns,
};
use crate::config::SelectionConfig;
use crate::filter::{MatchFn, apply_filters};
use crate::pagination::{
	DEFAULT_PAGE_SIZE, PaginationState, clamp_page_index, get_page_count, get_paginated_data,
};
use crate::selection::{RowKeyFn, SelectionMode, SelectionState};
use crate::sort::{CompareFn, apply_sort};
use crate::state::{
	ServerModeConfig, StateSlice, StateStrategy, TableState, resolve_strategy_with,
};
use crate::url_sync::{
	DebouncedWriter, RouterAdapter, UrlStatePatch, UrlSyncConfig, parse_state_from_url,
};
use crate::value::{Record, RowId, Value};

pub use actions::{
	ColumnActions, FilteringActions, PaginationActions, SelectionActions, SortingActions,
};
pub use options::TableOptions;

/// One input record with its position and id
pub struct Row<'a, R> {
	/// Position in the input collection
	pub index: usize,
	/// Id from the row-key function
	pub id: RowId,
	/// The record itself
	pub record: &'a R,
}

impl<R> Clone for Row<'_, R> {
	fn clone(&self) -> Self {
		Self {
			index: self.index,
			id: self.id.clone(),
			record: self.record,
		}
	}
}

impl<R: fmt::Debug> fmt::Debug for Row<'_, R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Row")
			.field("index", &self.index)
			.field("id", &self.id)
			.field("record", self.record)
			.finish()
	}
}

impl<R: Record> Record for Row<'_, R> {
	fn get(&self, key: &str) -> Value {
		self.record.get(key)
	}

	fn values(&self) -> Vec<Value> {
		self.record.values()
	}
}

/// Everything needed to render one page, derived in a single pass
#[derive(Debug)]
pub struct TableView<'a, R> {
	/// Visible columns in display order
	pub columns: Vec<&'a RuntimeColumn<R>>,
	/// Rows of the current page
	pub rows: Vec<Row<'a, R>>,
	/// Pagination with the page index clamped to the available pages
	pub pagination: PaginationState,
	/// Number of pages
	pub page_count: usize,
	/// Rows left after filtering, across all pages
	pub filtered_row_count: usize,
	/// Snapshot the view was derived from
	pub state: TableState,
}

struct Derived<'a, R> {
	filtered: Vec<Row<'a, R>>,
	sorted: Vec<Row<'a, R>>,
	page: Vec<Row<'a, R>>,
	pagination: PaginationState,
	page_count: usize,
}

/// Table state coordinator
pub struct Table<R> {
	records: Vec<R>,
	columns: Vec<RuntimeColumn<R>>,
	validation: ColumnValidation,
	strategy: Box<dyn StateStrategy>,
	server_mode: ServerModeConfig,
	selection: SelectionConfig,
	row_key: Option<RowKeyFn<R>>,
	match_fn: Option<MatchFn>,
	url_writer: Option<DebouncedWriter>,
}

impl<R: Record + 'static> Table<R> {
	/// Builds a table and resolves its state ownership
	///
	/// Column problems are logged, not raised. When URL sync is enabled and the
	/// router has a live location, the URL seeds pagination, sorting and
	/// filtering of internally owned state.
	pub fn new(
		records: Vec<R>,
		definitions: Vec<ColumnDefinition<R>>,
		options: TableOptions<R>,
	) -> Self {
		let validation = validate_columns(&definitions);
		for error in &validation.errors {
			tracing::warn!(%error, "invalid column definition");
		}

		let page_size = if options.page_size == 0 {
			tracing::warn!("page size of 0 is not usable, falling back to {DEFAULT_PAGE_SIZE}");
			DEFAULT_PAGE_SIZE
		} else {
			options.page_size
		};

		let column_ids = definitions.iter().map(|def| def.id.clone()).collect();
		let mut seed = TableState::new(column_ids, page_size)
			.with_server_mode(options.server_mode)
			.with(StateSlice::ColumnVisibility(initial_visibility(&definitions)));
		if options.selection.enabled && !options.selection.initial_selected_row_ids.is_empty() {
			seed = seed.with_selection(initial_selection(&options.selection));
		}

		let url_sync = match (options.url_sync, options.router) {
			(Some(config), Some(router)) if config.enabled => Some((config, router)),
			(Some(config), None) if config.enabled => {
				tracing::warn!("url sync is enabled but no router was supplied, sync disabled");
				None
			}
			_ => None,
		};
		let patch = url_sync
			.as_ref()
			.and_then(|(config, router)| read_url_patch(router.as_ref(), config));

		let strategy = resolve_strategy_with(&options.state, seed, |state| match &patch {
			Some(patch) => patch.apply(state),
			None => state,
		});

		tracing::debug!(
			mode = ?strategy.mode(),
			columns = definitions.len(),
			rows = records.len(),
			url_sync = url_sync.is_some(),
			"table created"
		);

		Self {
			columns: create_columns(&definitions),
			records,
			validation,
			strategy,
			server_mode: options.server_mode,
			selection: options.selection,
			row_key: options.row_key,
			match_fn: options.match_fn,
			url_writer: url_sync.map(|(config, router)| DebouncedWriter::new(router, config)),
		}
	}

	/// Current state snapshot
	pub fn state(&self) -> TableState {
		self.strategy.snapshot()
	}

	/// Every column, in declaration order
	pub fn columns(&self) -> &[RuntimeColumn<R>] {
		&self.columns
	}

	/// Visible columns in display order
	pub fn visible_columns(&self) -> Vec<&RuntimeColumn<R>> {
		self.visible_columns_for(&self.state())
	}

	/// Outcome of column validation at construction
	pub fn column_validation(&self) -> &ColumnValidation {
		&self.validation
	}

	/// The input records
	pub fn records(&self) -> &[R] {
		&self.records
	}

	/// Replaces the input records
	///
	/// State is left alone; an out-of-range page index is clamped on the next
	/// read.
	pub fn set_records(&mut self, records: Vec<R>) {
		tracing::debug!(rows = records.len(), "records replaced");
		self.records = records;
	}

	/// Rows surviving the filters, in input order
	pub fn filtered_rows(&self) -> Vec<Row<'_, R>> {
		self.derive(&self.state()).filtered
	}

	/// Filtered rows in sort order, across all pages
	pub fn sorted_rows(&self) -> Vec<Row<'_, R>> {
		self.derive(&self.state()).sorted
	}

	/// Rows of the current page
	pub fn page_rows(&self) -> Vec<Row<'_, R>> {
		self.derive(&self.state()).page
	}

	/// Input rows whose id is selected
	pub fn selected_rows(&self) -> Vec<Row<'_, R>> {
		let state = self.state();
		self.all_rows()
			.into_iter()
			.filter(|row| state.selection().is_selected(&row.id))
			.collect()
	}

	/// Columns, page rows and counts from one snapshot
	pub fn view(&self) -> TableView<'_, R> {
		let state = self.state();
		let derived = self.derive(&state);
		TableView {
			columns: self.visible_columns_for(&state),
			rows: derived.page,
			pagination: derived.pagination,
			page_count: derived.page_count,
			filtered_row_count: derived.filtered.len(),
			state,
		}
	}

	/// Number of rows left after filtering
	pub fn filtered_row_count(&self) -> usize {
		self.filtered_count(&self.state())
	}

	/// Number of pages
	///
	/// A server-supplied page count wins over a server-supplied total count,
	/// which wins over the local filtered count.
	pub fn page_count(&self) -> usize {
		let state = self.state();
		self.page_count_for(state.pagination(), self.filtered_count(&state))
	}

	/// True unless the current page is the last one
	pub fn has_next_page(&self) -> bool {
		let (pagination, page_count) = self.current_pagination();
		pagination.page_index + 1 < page_count
	}

	/// True unless the current page is the first one
	pub fn has_previous_page(&self) -> bool {
		self.current_pagination().0.page_index > 0
	}

	/// Ids of the rows on the current page
	pub fn page_row_ids(&self) -> Vec<RowId> {
		self.page_rows().into_iter().map(|row| row.id).collect()
	}

	/// Writes pending URL changes immediately
	pub fn flush_url_sync(&mut self) {
		let state = self.state();
		if let Some(writer) = &mut self.url_writer {
			writer.flush(&state);
		}
	}

	/// Sort mutators
	pub fn sorting(&mut self) -> SortingActions<'_, R> {
		SortingActions::new(self)
	}

	/// Pagination mutators
	pub fn pagination(&mut self) -> PaginationActions<'_, R> {
		PaginationActions::new(self)
	}

	/// Filter mutators
	pub fn filtering(&mut self) -> FilteringActions<'_, R> {
		FilteringActions::new(self)
	}

	/// Visibility and order mutators
	pub fn column_management(&mut self) -> ColumnActions<'_, R> {
		ColumnActions::new(self)
	}

	/// Selection mutators and queries
	pub fn selection(&mut self) -> SelectionActions<'_, R> {
		SelectionActions::new(self)
	}

	pub(crate) fn commit(&mut self, slices: Vec<StateSlice>) {
		if slices.is_empty() {
			return;
		}
		self.strategy.write_all(slices);
		if let Some(writer) = &mut self.url_writer {
			let read = self.strategy.reader();
			writer.schedule(move || read());
		}
	}

	pub(crate) fn selection_config(&self) -> &SelectionConfig {
		&self.selection
	}

	pub(crate) fn selection_mode(&self) -> SelectionMode {
		self.selection.mode
	}

	pub(crate) fn find_column(&self, column_id: &str) -> Option<&RuntimeColumn<R>> {
		self.columns.iter().find(|c| c.id() == column_id)
	}

	/// Pagination clamped to the current page count, with that count
	pub(crate) fn current_pagination(&self) -> (PaginationState, usize) {
		let state = self.state();
		let page_count = self.page_count_for(state.pagination(), self.filtered_count(&state));
		let pagination = state.pagination();
		(
			pagination.with_page_index(clamp_page_index(pagination.page_index, page_count)),
			page_count,
		)
	}

	fn row_id(&self, record: &R, index: usize) -> RowId {
		match &self.row_key {
			Some(key) => key(record, index),
			None => RowId::from(index),
		}
	}

	fn all_rows(&self) -> Vec<Row<'_, R>> {
		self.records
			.iter()
			.enumerate()
			.map(|(index, record)| Row {
				index,
				id: self.row_id(record, index),
				record,
			})
			.collect()
	}

	fn visible_columns_for(&self, state: &TableState) -> Vec<&RuntimeColumn<R>> {
		let visible = get_visible_columns(&self.columns, state.column_visibility());
		get_ordered_columns(&visible, state.column_order())
	}

	fn page_count_for(&self, pagination: &PaginationState, filtered: usize) -> usize {
		get_page_count(
			pagination.total_count.unwrap_or(filtered),
			pagination.page_size,
			pagination.page_count,
		)
	}

	fn filtered_count(&self, state: &TableState) -> usize {
		let rows = self.all_rows();
		let refs: Vec<&Row<'_, R>> = rows.iter().collect();
		self.filter_rows(&refs, state).len()
	}

	fn filter_rows<'r, 'a>(
		&self,
		rows: &[&'r Row<'a, R>],
		state: &TableState,
	) -> Vec<&'r Row<'a, R>> {
		apply_filters(
			rows,
			state.filtering(),
			|row, column_id| column_value(&self.columns, row.record, column_id),
			self.match_fn.as_ref(),
			self.server_mode.filtering,
		)
	}

	fn compare_fn(&self, state: &TableState) -> Option<&CompareFn> {
		let column_id = state.sorting().column_id.as_deref()?;
		self.find_column(column_id)?.definition().compare.as_ref()
	}

	fn derive(&self, state: &TableState) -> Derived<'_, R> {
		let rows = self.all_rows();
		let refs: Vec<&Row<'_, R>> = rows.iter().collect();

		let filtered = self.filter_rows(&refs, state);
		let sorted = apply_sort(
			&filtered,
			state.sorting(),
			|row, column_id| column_value(&self.columns, row.record, column_id),
			self.compare_fn(state),
			self.server_mode.sorting,
		);

		let page_count = self.page_count_for(state.pagination(), filtered.len());
		let pagination = state
			.pagination()
			.with_page_index(clamp_page_index(state.pagination().page_index, page_count));
		let page = get_paginated_data(&sorted, &pagination, self.server_mode.pagination);

		tracing::trace!(
			rows = rows.len(),
			filtered = filtered.len(),
			page = page.len(),
			page_index = pagination.page_index,
			"derived table view"
		);

		Derived {
			filtered: filtered.into_iter().cloned().collect(),
			sorted: sorted.into_iter().cloned().collect(),
			page: page.into_iter().cloned().collect(),
			pagination,
			page_count,
		}
	}
}

impl<R> fmt::Debug for Table<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Table")
			.field("rows", &self.records.len())
			.field("columns", &self.columns)
			.field("mode", &self.strategy.mode())
			.field("server_mode", &self.server_mode)
			.field("url_writer", &self.url_writer)
			.finish_non_exhaustive()
	}
}

fn initial_selection(config: &SelectionConfig) -> SelectionState {
	let ids = config.initial_selected_row_ids.iter().cloned();
	match config.mode {
		SelectionMode::Multi => ids.collect(),
		SelectionMode::Single => ids.take(1).collect(),
	}
}

fn read_url_patch(router: &dyn RouterAdapter, config: &UrlSyncConfig) -> Option<UrlStatePatch> {
	if !router.is_client() {
		tracing::debug!("no client location, skipping url state");
		return None;
	}
	match router.search_params() {
		Ok(params) => {
			let patch = parse_state_from_url(&params, config);
			if patch.is_empty() {
				None
			} else {
				tracing::debug!(?patch, "seeding table state from url");
				Some(patch)
			}
		}
		Err(error) => {
			tracing::warn!(%error, "failed to read url state, using defaults");
			None
		}
	}
}
