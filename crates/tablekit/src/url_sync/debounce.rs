//! Debounced URL writes
//!
//! Bursts of state changes (typing into a filter box, paging quickly) collapse
//! into one location update carrying the latest state.

use std::fmt;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use super::UrlSyncConfig;
use super::adapter::{NavigateOptions, RouterAdapter};
use super::codec::{QueryParams, serialize_state_to_url};
use crate::state::TableState;

/// Owner of at most one pending URL write
///
/// Scheduling aborts any write still waiting; dropping the writer aborts it
/// too. Outside a tokio runtime, or with a zero interval, writes happen
/// immediately.
pub struct DebouncedWriter {
	adapter: Arc<dyn RouterAdapter>,
	config: Arc<UrlSyncConfig>,
	pending: Option<AbortHandle>,
}

impl DebouncedWriter {
	/// Creates a writer targeting `adapter`
	pub fn new(adapter: Arc<dyn RouterAdapter>, config: UrlSyncConfig) -> Self {
		Self {
			adapter,
			config: Arc::new(config),
			pending: None,
		}
	}

	/// Schedules a write, replacing any pending one
	///
	/// `read` is called when the write fires, so the location reflects the
	/// state at that moment rather than when the write was scheduled.
	pub fn schedule<F>(&mut self, read: F)
	where
		F: FnOnce() -> TableState + Send + 'static,
	{
		self.cancel();

		let delay = self.config.debounce();
		let handle = match Handle::try_current() {
			Ok(handle) if !delay.is_zero() => handle,
			_ => {
				write_state(self.adapter.as_ref(), &read(), &self.config);
				return;
			}
		};

		let adapter = Arc::clone(&self.adapter);
		let config = Arc::clone(&self.config);
		let task = handle.spawn(async move {
			tokio::time::sleep(delay).await;
			write_state(adapter.as_ref(), &read(), &config);
		});
		self.pending = Some(task.abort_handle());
	}

	/// Writes `state` now, discarding any pending write
	pub fn flush(&mut self, state: &TableState) {
		self.cancel();
		write_state(self.adapter.as_ref(), state, &self.config);
	}

	/// Aborts the pending write, if any
	pub fn cancel(&mut self) {
		if let Some(pending) = self.pending.take() {
			pending.abort();
		}
	}

	/// Returns true while a scheduled write has not run yet
	pub fn is_pending(&self) -> bool {
		self.pending.as_ref().is_some_and(|p| !p.is_finished())
	}

	/// The adapter writes go to
	pub fn adapter(&self) -> &Arc<dyn RouterAdapter> {
		&self.adapter
	}

	/// The active configuration
	pub fn config(&self) -> &UrlSyncConfig {
		&self.config
	}
}

impl Drop for DebouncedWriter {
	fn drop(&mut self) {
		self.cancel();
	}
}

impl fmt::Debug for DebouncedWriter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DebouncedWriter")
			.field("config", &self.config)
			.field("pending", &self.is_pending())
			.finish_non_exhaustive()
	}
}

/// Serializes `state` into the adapter's location
///
/// Unchanged query strings are not written. Adapter failures are logged and
/// dropped.
pub(crate) fn write_state(
	adapter: &dyn RouterAdapter,
	state: &TableState,
	config: &UrlSyncConfig,
) {
	if !adapter.is_client() {
		return;
	}

	let current = match adapter.search_params() {
		Ok(params) => params,
		Err(error) => {
			tracing::warn!(%error, "failed to read search params, writing from scratch");
			QueryParams::new()
		}
	};

	let next = serialize_state_to_url(state, &current, config);
	if next == current {
		tracing::trace!("url already reflects table state");
		return;
	}

	tracing::debug!(query = %next, "writing table state to url");
	if let Err(error) = adapter.set_search_params(&next, NavigateOptions::replace()) {
		tracing::warn!(%error, "failed to write table state to url");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::pagination::PaginationState;
	use crate::state::StateSlice;
	use crate::url_sync::MemoryRouter;
	use rstest::*;
	use std::time::Duration;

	#[fixture]
	fn router() -> Arc<MemoryRouter> {
		Arc::new(MemoryRouter::new("/list?tab=all").unwrap())
	}

	fn on_page(index: usize) -> TableState {
		TableState::new(vec!["id".to_string()], 10)
			.with(StateSlice::Pagination(PaginationState::new(10).with_page_index(index)))
	}

	#[rstest]
	fn test_writes_synchronously_without_runtime(router: Arc<MemoryRouter>) {
		let mut writer = DebouncedWriter::new(router.clone(), UrlSyncConfig::default());
		writer.schedule(|| on_page(4));

		assert!(!writer.is_pending());
		assert_eq!(router.href(), "/list?tab=all&page=4");
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_burst_collapses_into_last_write(router: Arc<MemoryRouter>) {
		let mut writer = DebouncedWriter::new(router.clone(), UrlSyncConfig::default());

		writer.schedule(|| on_page(1));
		tokio::time::sleep(Duration::from_millis(100)).await;
		writer.schedule(|| on_page(2));
		tokio::time::sleep(Duration::from_millis(100)).await;
		writer.schedule(|| on_page(3));
		assert!(writer.is_pending());
		assert_eq!(router.href(), "/list?tab=all");

		tokio::time::sleep(Duration::from_millis(301)).await;
		assert_eq!(router.href(), "/list?tab=all&page=3");
		assert_eq!(router.history_len(), 1);
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_state_is_read_when_write_fires(router: Arc<MemoryRouter>) {
		let mut writer = DebouncedWriter::new(router.clone(), UrlSyncConfig::default());
		let current = Arc::new(parking_lot::Mutex::new(on_page(1)));
		let read = Arc::clone(&current);
		writer.schedule(move || read.lock().clone());

		tokio::time::sleep(Duration::from_millis(10)).await;
		*current.lock() = on_page(7);
		tokio::time::sleep(Duration::from_millis(300)).await;
		assert_eq!(router.href(), "/list?tab=all&page=7");
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_drop_aborts_pending_write(router: Arc<MemoryRouter>) {
		let mut writer = DebouncedWriter::new(router.clone(), UrlSyncConfig::default());
		writer.schedule(|| on_page(5));
		drop(writer);

		tokio::time::sleep(Duration::from_secs(1)).await;
		assert_eq!(router.href(), "/list?tab=all");
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_flush_writes_immediately(router: Arc<MemoryRouter>) {
		let mut writer = DebouncedWriter::new(router.clone(), UrlSyncConfig::default());
		writer.schedule(|| on_page(1));
		writer.flush(&on_page(2));

		assert!(!writer.is_pending());
		assert_eq!(router.href(), "/list?tab=all&page=2");

		tokio::time::sleep(Duration::from_secs(1)).await;
		assert_eq!(router.href(), "/list?tab=all&page=2");
	}
}
