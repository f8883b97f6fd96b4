//! Table construction options

use std::fmt;
use std::sync::Arc;

use crate::config::{SelectionConfig, TableConfig};
use crate::filter::MatchFn;
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::selection::RowKeyFn;
use crate::state::{ServerModeConfig, StateOptions};
use crate::url_sync::{RouterAdapter, UrlSyncConfig};
use crate::value::RowId;

/// Everything a [`Table`](super::Table) is built from besides rows and columns
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tablekit::table::TableOptions;
/// use tablekit::url_sync::{MemoryRouter, UrlSyncConfig};
///
/// let options: TableOptions<serde_json::Value> = TableOptions::new()
///     .page_size(25)
///     .url_sync(UrlSyncConfig::default(), Arc::new(MemoryRouter::default()));
/// assert_eq!(options.page_size, 25);
/// ```
pub struct TableOptions<R> {
	/// Rows per page
	pub page_size: usize,
	/// State ownership
	pub state: StateOptions,
	/// Stages delegated to a server
	pub server_mode: ServerModeConfig,
	/// Row selection settings
	pub selection: SelectionConfig,
	/// URL synchronization settings; disabled when absent
	pub url_sync: Option<UrlSyncConfig>,
	/// Location the URL is read from and written to
	pub router: Option<Arc<dyn RouterAdapter>>,
	/// Row id derivation; defaults to the row's index in the input
	pub row_key: Option<RowKeyFn<R>>,
	/// Filter predicate replacing the default substring match
	pub match_fn: Option<MatchFn>,
}

impl<R> Default for TableOptions<R> {
	fn default() -> Self {
		Self {
			page_size: DEFAULT_PAGE_SIZE,
			state: StateOptions::default(),
			server_mode: ServerModeConfig::default(),
			selection: SelectionConfig::default(),
			url_sync: None,
			router: None,
			row_key: None,
			match_fn: None,
		}
	}
}

impl<R> TableOptions<R> {
	/// Default options: uncontrolled, client-side, no URL sync
	pub fn new() -> Self {
		Self::default()
	}

	/// Lifts a data-only configuration
	pub fn from_config(config: TableConfig) -> Self {
		Self {
			page_size: config.page_size,
			server_mode: config.server_mode,
			selection: config.selection,
			url_sync: config.url_sync,
			..Self::default()
		}
	}

	/// Sets the page size
	pub fn page_size(mut self, page_size: usize) -> Self {
		self.page_size = page_size;
		self
	}

	/// Sets state ownership
	pub fn state(mut self, state: StateOptions) -> Self {
		self.state = state;
		self
	}

	/// Delegates pipeline stages to a server
	pub fn server_mode(mut self, server_mode: ServerModeConfig) -> Self {
		self.server_mode = server_mode;
		self
	}

	/// Sets selection settings
	pub fn selection(mut self, selection: SelectionConfig) -> Self {
		self.selection = selection;
		self
	}

	/// Enables URL synchronization against `router`
	pub fn url_sync(mut self, config: UrlSyncConfig, router: Arc<dyn RouterAdapter>) -> Self {
		self.url_sync = Some(config);
		self.router = Some(router);
		self
	}

	/// Sets the router used when URL sync comes from configuration
	pub fn router(mut self, router: Arc<dyn RouterAdapter>) -> Self {
		self.router = Some(router);
		self
	}

	/// Derives row ids with `row_key`
	pub fn row_key<F>(mut self, row_key: F) -> Self
	where
		F: Fn(&R, usize) -> RowId + Send + Sync + 'static,
	{
		self.row_key = Some(Arc::new(row_key));
		self
	}

	/// Replaces the default filter predicate
	pub fn match_fn(mut self, match_fn: MatchFn) -> Self {
		self.match_fn = Some(match_fn);
		self
	}
}

impl<R> fmt::Debug for TableOptions<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TableOptions")
			.field("page_size", &self.page_size)
			.field("state", &self.state)
			.field("server_mode", &self.server_mode)
			.field("selection", &self.selection)
			.field("url_sync", &self.url_sync)
			.field("router", &self.router.is_some())
			.field("row_key", &self.row_key.is_some())
			.field("match_fn", &self.match_fn.is_some())
			.finish()
	}
}
