//! Pagination functionality for tables
//!
//! Page indices are 0-based. Every navigation helper clamps its target into
//! `[0, page_count - 1]`, or to 0 when there are no pages.

use serde::{Deserialize, Serialize};

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Pagination configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
	/// Current page (0-indexed)
	pub page_index: usize,
	/// Number of items per page
	pub page_size: usize,
	/// Total item count reported by a server
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_count: Option<usize>,
	/// Page count reported by a server
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page_count: Option<usize>,
}

impl Default for PaginationState {
	fn default() -> Self {
		Self::new(DEFAULT_PAGE_SIZE)
	}
}

impl PaginationState {
	/// Creates a pagination state on the first page
	///
	/// # Arguments
	///
	/// * `page_size` - Number of items per page
	pub fn new(page_size: usize) -> Self {
		Self {
			page_index: 0,
			page_size,
			total_count: None,
			page_count: None,
		}
	}

	/// Returns a copy on `page_index`, unclamped
	pub fn with_page_index(&self, page_index: usize) -> Self {
		Self {
			page_index,
			..self.clone()
		}
	}

	/// Total pages, preferring server-reported counts over `total_items`
	pub fn total_pages(&self, total_items: usize) -> usize {
		let items = self.total_count.unwrap_or(total_items);
		get_page_count(items, self.page_size, self.page_count)
	}

	/// Returns true if a page follows the current one
	pub fn has_next_page(&self, total_items: usize) -> bool {
		self.page_index.saturating_add(1) < self.total_pages(total_items)
	}

	/// Returns true if a page precedes the current one
	pub fn has_previous_page(&self) -> bool {
		self.page_index > 0
	}

	/// Returns the 1-based numbers of the first and last item on this page
	///
	/// `(0, 0)` when the page is empty.
	pub fn page_range(&self, total_items: usize) -> (usize, usize) {
		let total = self.total_count.unwrap_or(total_items);
		let start = self.page_index.saturating_mul(self.page_size);
		if self.page_size == 0 || start >= total {
			return (0, 0);
		}
		(start + 1, (start + self.page_size).min(total))
	}
}

/// Number of pages for `total_items`
///
/// A server-supplied page count always wins; a zero page size yields no pages.
pub fn get_page_count(
	total_items: usize,
	page_size: usize,
	server_page_count: Option<usize>,
) -> usize {
	if let Some(count) = server_page_count {
		return count;
	}
	if page_size == 0 {
		return 0;
	}
	total_items.div_ceil(page_size)
}

/// Clamps `page_index` into `[0, total_pages - 1]`, or 0 when there are no pages
pub fn clamp_page_index(page_index: usize, total_pages: usize) -> usize {
	if total_pages == 0 {
		0
	} else {
		page_index.min(total_pages - 1)
	}
}

/// Moves to the next page, staying on the last one
pub fn go_to_next_page(state: &PaginationState, total_pages: usize) -> PaginationState {
	go_to_page(state, state.page_index.saturating_add(1), total_pages)
}

/// Moves to the previous page, staying on the first one
pub fn go_to_previous_page(state: &PaginationState, total_pages: usize) -> PaginationState {
	go_to_page(state, state.page_index.saturating_sub(1), total_pages)
}

/// Moves to the first page
pub fn go_to_first_page(state: &PaginationState) -> PaginationState {
	state.with_page_index(0)
}

/// Moves to the last page
pub fn go_to_last_page(state: &PaginationState, total_pages: usize) -> PaginationState {
	go_to_page(state, total_pages.saturating_sub(1), total_pages)
}

/// Moves to `page_index`, clamped to the available pages
pub fn go_to_page(
	state: &PaginationState,
	page_index: usize,
	total_pages: usize,
) -> PaginationState {
	state.with_page_index(clamp_page_index(page_index, total_pages))
}

/// Changes the page size and reclamps the page index
///
/// Pages are counted from `state.page_count`, else `state.total_count`, else
/// `total_items`.
pub fn set_page_size(
	state: &PaginationState,
	page_size: usize,
	total_items: Option<usize>,
) -> PaginationState {
	let items = state.total_count.or(total_items).unwrap_or(0);
	let total_pages = get_page_count(items, page_size, state.page_count);
	PaginationState {
		page_index: clamp_page_index(state.page_index, total_pages),
		page_size,
		..state.clone()
	}
}

/// Slices out the current page
///
/// Returns a copy of the input when `server_mode` is set, since the server
/// already delivered a single page.
pub fn get_paginated_data<T: Clone>(
	records: &[T],
	pagination: &PaginationState,
	server_mode: bool,
) -> Vec<T> {
	if server_mode {
		return records.to_vec();
	}
	let start = pagination.page_index.saturating_mul(pagination.page_size);
	if start >= records.len() {
		return Vec::new();
	}
	let end = start.saturating_add(pagination.page_size).min(records.len());
	records[start..end].to_vec()
}
