//! Row selection
//!
//! [`SelectionState`] is an immutable set of [`RowId`]s. Every update returns a
//! new state and leaves the previous one untouched, so snapshots holding an
//! older selection stay valid.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::value::RowId;

/// Row-key function: `(record, index in the input collection) -> id`
pub type RowKeyFn<R> = Arc<dyn Fn(&R, usize) -> RowId + Send + Sync>;

/// Whether one or many rows may be selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
	/// At most one selected row
	Single,
	/// Any number of selected rows
	#[default]
	Multi,
}

/// Set of selected row ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState {
	ids: Arc<BTreeSet<RowId>>,
}

impl SelectionState {
	/// Creates an empty selection
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns true if `id` is selected
	pub fn is_selected(&self, id: &RowId) -> bool {
		self.ids.contains(id)
	}

	/// Number of selected rows
	pub fn len(&self) -> usize {
		self.ids.len()
	}

	/// Returns true when nothing is selected
	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	/// Iterates the selected ids in order
	pub fn iter(&self) -> impl Iterator<Item = &RowId> {
		self.ids.iter()
	}

	fn update(&self, f: impl FnOnce(&mut BTreeSet<RowId>)) -> Self {
		let mut ids = (*self.ids).clone();
		f(&mut ids);
		Self { ids: Arc::new(ids) }
	}

	/// Selects `id`; in single mode every other row is deselected first
	pub fn select(&self, id: RowId, mode: SelectionMode) -> Self {
		self.update(|ids| {
			if mode == SelectionMode::Single {
				ids.clear();
			}
			ids.insert(id);
		})
	}

	/// Deselects `id`
	pub fn deselect(&self, id: &RowId) -> Self {
		self.update(|ids| {
			ids.remove(id);
		})
	}

	/// Flips the selection of `id`
	pub fn toggle(&self, id: RowId, mode: SelectionMode) -> Self {
		if self.is_selected(&id) {
			self.deselect(&id)
		} else {
			self.select(id, mode)
		}
	}

	/// Selects every id of the current page
	///
	/// Single mode keeps only the first page id, preserving the size bound.
	pub fn select_all(&self, page_ids: &[RowId], mode: SelectionMode) -> Self {
		match mode {
			SelectionMode::Multi => self.update(|ids| ids.extend(page_ids.iter().cloned())),
			SelectionMode::Single => match page_ids.first() {
				Some(first) => self.select(first.clone(), mode),
				None => self.clone(),
			},
		}
	}

	/// Deselects every id of the current page, leaving other pages alone
	pub fn deselect_all(&self, page_ids: &[RowId]) -> Self {
		self.update(|ids| {
			for id in page_ids {
				ids.remove(id);
			}
		})
	}

	/// Deselects everything
	pub fn clear(&self) -> Self {
		Self::new()
	}

	/// True when the page is non-empty and all its ids are selected
	pub fn is_all_selected(&self, page_ids: &[RowId]) -> bool {
		!page_ids.is_empty() && page_ids.iter().all(|id| self.is_selected(id))
	}

	/// True when some, but not all, page ids are selected
	pub fn is_indeterminate(&self, page_ids: &[RowId]) -> bool {
		let selected = page_ids.iter().filter(|id| self.is_selected(id)).count();
		selected > 0 && selected < page_ids.len()
	}
}

impl FromIterator<RowId> for SelectionState {
	fn from_iter<I: IntoIterator<Item = RowId>>(iter: I) -> Self {
		Self {
			ids: Arc::new(iter.into_iter().collect()),
		}
	}
}
