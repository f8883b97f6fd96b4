//! Ownership strategies
//!
//! The ownership mode is resolved once when a table is built. From then on the
//! table talks to a [`StateStrategy`] through `read`/`write` and never branches
//! on who owns what.

use std::sync::Arc;

use super::options::{FieldControl, OwnershipMode, StateCallback, StateOptions, StateReader};
use super::{StateField, StateSlice, TableState};
use crate::column::{ColumnOrder, ColumnVisibility};
use crate::filter::FilterState;
use crate::pagination::PaginationState;
use crate::sort::SortState;

/// Uniform access to table state, whoever owns it
pub trait StateStrategy: Send + Sync {
	/// The resolved ownership mode
	fn mode(&self) -> OwnershipMode;

	/// Reads one slice
	fn read(&self, field: StateField) -> StateSlice {
		self.snapshot().get(field)
	}

	/// Assembles the current snapshot
	fn snapshot(&self) -> TableState;

	/// A detached reader assembling the snapshot each time it is called
	///
	/// External owners are queried on every call, so the reader sees updates
	/// they apply after the write that produced it.
	fn reader(&self) -> StateReader<TableState>;

	/// Applies several slices as one update
	///
	/// Listeners see a single notification carrying the combined result.
	fn write_all(&mut self, slices: Vec<StateSlice>);

	/// Applies one slice
	fn write(&mut self, slice: StateSlice) {
		self.write_all(vec![slice]);
	}
}

/// Per-field readers and callbacks taken from [`StateOptions`]
#[derive(Clone, Default)]
struct FieldControls {
	pagination: FieldControl<PaginationState>,
	sorting: FieldControl<SortState>,
	filtering: FieldControl<FilterState>,
	column_visibility: FieldControl<ColumnVisibility>,
	column_order: FieldControl<ColumnOrder>,
}

impl FieldControls {
	fn from_options(options: &StateOptions) -> Self {
		Self {
			pagination: options.pagination.clone(),
			sorting: options.sorting.clone(),
			filtering: options.filtering.clone(),
			column_visibility: options.column_visibility.clone(),
			column_order: options.column_order.clone(),
		}
	}

	fn has_reader(&self) -> bool {
		self.pagination.is_controlled()
			|| self.sorting.is_controlled()
			|| self.filtering.is_controlled()
			|| self.column_visibility.is_controlled()
			|| self.column_order.is_controlled()
	}

	fn is_controlled(&self, field: StateField) -> bool {
		match field {
			StateField::Pagination => self.pagination.is_controlled(),
			StateField::Sorting => self.sorting.is_controlled(),
			StateField::Filtering => self.filtering.is_controlled(),
			StateField::ColumnVisibility => self.column_visibility.is_controlled(),
			StateField::ColumnOrder => self.column_order.is_controlled(),
			StateField::Selection => false,
		}
	}

	fn has_callback(&self, field: StateField) -> bool {
		match field {
			StateField::Pagination => self.pagination.on_change.is_some(),
			StateField::Sorting => self.sorting.on_change.is_some(),
			StateField::Filtering => self.filtering.on_change.is_some(),
			StateField::ColumnVisibility => self.column_visibility.on_change.is_some(),
			StateField::ColumnOrder => self.column_order.on_change.is_some(),
			StateField::Selection => false,
		}
	}

	fn notify(&self, slice: &StateSlice) {
		fn call<T>(control: &FieldControl<T>, value: &T) {
			if let Some(callback) = &control.on_change {
				callback(value);
			}
		}

		match slice {
			StateSlice::Pagination(v) => call(&self.pagination, v),
			StateSlice::Sorting(v) => call(&self.sorting, v),
			StateSlice::Filtering(v) => call(&self.filtering, v),
			StateSlice::ColumnVisibility(v) => call(&self.column_visibility, v),
			StateSlice::ColumnOrder(v) => call(&self.column_order, v),
			StateSlice::Selection(_) => {}
		}
	}

	/// Replaces every externally owned slice of `state` with its reader's value
	fn overlay(&self, state: TableState) -> TableState {
		let mut state = state;
		if let Some(read) = &self.pagination.value {
			state = state.with(StateSlice::Pagination(read()));
		}
		if let Some(read) = &self.sorting.value {
			state = state.with(StateSlice::Sorting(read()));
		}
		if let Some(read) = &self.filtering.value {
			state = state.with(StateSlice::Filtering(read()));
		}
		if let Some(read) = &self.column_visibility.value {
			state = state.with(StateSlice::ColumnVisibility(read()));
		}
		if let Some(read) = &self.column_order.value {
			state = state.with(StateSlice::ColumnOrder(read()));
		}
		state
	}
}

/// The caller owns the whole snapshot
pub struct ControlledStrategy {
	state: StateReader<TableState>,
	set_state: StateCallback<TableState>,
}

impl ControlledStrategy {
	/// Wraps an external reader and setter
	pub fn new(state: StateReader<TableState>, set_state: StateCallback<TableState>) -> Self {
		Self { state, set_state }
	}
}

impl StateStrategy for ControlledStrategy {
	fn mode(&self) -> OwnershipMode {
		OwnershipMode::Controlled
	}

	fn snapshot(&self) -> TableState {
		(self.state)()
	}

	fn reader(&self) -> StateReader<TableState> {
		Arc::clone(&self.state)
	}

	fn write_all(&mut self, slices: Vec<StateSlice>) {
		let next = slices
			.into_iter()
			.fold(self.snapshot(), |state, slice| state.with(slice));
		(self.set_state)(&next);
	}
}

/// The table owns every slice
///
/// Per-field change callbacks, if any were supplied, still see each slice
/// written.
pub struct UncontrolledStrategy {
	state: TableState,
	controls: FieldControls,
	on_state_change: Option<StateCallback<TableState>>,
}

impl UncontrolledStrategy {
	/// Starts from `state`, notifying `on_state_change` on every update
	pub fn new(state: TableState, on_state_change: Option<StateCallback<TableState>>) -> Self {
		Self {
			state,
			controls: FieldControls::default(),
			on_state_change,
		}
	}

	/// Starts from `state`, taking every listener supplied in `options`
	///
	/// Per-field readers in `options` are ignored; the table owns the values.
	pub fn from_options(state: TableState, options: &StateOptions) -> Self {
		Self {
			state,
			controls: FieldControls::from_options(options),
			on_state_change: options.on_state_change.clone(),
		}
	}
}

impl StateStrategy for UncontrolledStrategy {
	fn mode(&self) -> OwnershipMode {
		OwnershipMode::Uncontrolled
	}

	fn snapshot(&self) -> TableState {
		self.state.clone()
	}

	fn reader(&self) -> StateReader<TableState> {
		let state = self.state.clone();
		Arc::new(move || state.clone())
	}

	fn write_all(&mut self, slices: Vec<StateSlice>) {
		for slice in slices {
			self.controls.notify(&slice);
			self.state = self.state.with(slice);
		}
		if let Some(callback) = &self.on_state_change {
			callback(&self.state);
		}
	}
}

/// Each slice is owned by the caller or kept internally
///
/// Selection is always internal.
pub struct PerFieldStrategy {
	internal: TableState,
	controls: FieldControls,
	on_state_change: Option<StateCallback<TableState>>,
}

impl PerFieldStrategy {
	/// Builds the strategy from per-field controls, seeding internal slices from `internal`
	pub fn new(options: &StateOptions, internal: TableState) -> Self {
		Self {
			internal,
			controls: FieldControls::from_options(options),
			on_state_change: options.on_state_change.clone(),
		}
	}
}

impl StateStrategy for PerFieldStrategy {
	fn mode(&self) -> OwnershipMode {
		OwnershipMode::PerField
	}

	fn snapshot(&self) -> TableState {
		self.controls.overlay(self.internal.clone())
	}

	fn reader(&self) -> StateReader<TableState> {
		let internal = self.internal.clone();
		let controls = self.controls.clone();
		Arc::new(move || controls.overlay(internal.clone()))
	}

	fn write_all(&mut self, slices: Vec<StateSlice>) {
		let mut next = self.snapshot();
		for slice in slices {
			let field = slice.field();
			if !self.controls.is_controlled(field) {
				self.internal = self.internal.with(slice.clone());
			} else if !self.controls.has_callback(field) {
				tracing::warn!(
					?field,
					"state slice is controlled but has no change callback, update dropped"
				);
			}
			self.controls.notify(&slice);
			next = next.with(slice);
		}
		if let Some(callback) = &self.on_state_change {
			callback(&next);
		}
	}
}

/// Picks the strategy matching the shape of `options`
///
/// `seed` is the default initial state; it is ignored in controlled mode and
/// seeds every internally owned slice otherwise.
pub fn resolve_strategy(options: &StateOptions, seed: TableState) -> Box<dyn StateStrategy> {
	resolve_strategy_with(options, seed, |state| state)
}

/// Like [`resolve_strategy`], with `overlay` applied last to the internal seed
///
/// The overlay runs after `initial_state`, so values it sets (typically read
/// from the URL) take precedence. Controlled tables never see it.
pub fn resolve_strategy_with<F>(
	options: &StateOptions,
	seed: TableState,
	overlay: F,
) -> Box<dyn StateStrategy>
where
	F: FnOnce(TableState) -> TableState,
{
	match options.mode() {
		OwnershipMode::Controlled => match (&options.state, &options.set_state) {
			(Some(state), Some(set_state)) => {
				Box::new(ControlledStrategy::new(state.clone(), set_state.clone()))
			}
			_ => Box::new(UncontrolledStrategy::from_options(overlay(seed), options)),
		},
		OwnershipMode::PerField => Box::new(PerFieldStrategy::new(options, overlay(seed))),
		OwnershipMode::Uncontrolled => {
			let mut state = seed;
			if let Some(read) = &options.state {
				tracing::warn!("state supplied without set_state, treating it as initial state");
				let external = read();
				for field in [
					StateField::Pagination,
					StateField::Sorting,
					StateField::Filtering,
					StateField::ColumnVisibility,
					StateField::ColumnOrder,
					StateField::Selection,
				] {
					state = state.with(external.get(field));
				}
			}
			if let Some(initial) = &options.initial_state {
				state = initial.apply(state);
			}
			let strategy = UncontrolledStrategy::from_options(overlay(state), options);
			if strategy.controls.has_reader() {
				tracing::warn!("per-field state readers are ignored for an uncontrolled table");
			}
			Box::new(strategy)
		}
	}
}
