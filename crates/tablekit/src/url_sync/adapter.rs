//! Router adapters
//!
//! A [`RouterAdapter`] is the only way the table touches a location. Hosts
//! plug in their own router; [`MemoryRouter`] keeps an in-process history and
//! [`ServerRouter`] stands in during non-interactive rendering.

use parking_lot::Mutex;
use url::Url;

use super::codec::QueryParams;
use crate::error::UrlSyncError;

const MEMORY_BASE: &str = "http://localhost/";

/// How a location update is recorded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
	/// Replace the current history entry instead of pushing a new one
	pub replace: bool,
}

impl NavigateOptions {
	/// Replace the current entry
	pub fn replace() -> Self {
		Self { replace: true }
	}

	/// Push a new entry
	pub fn push() -> Self {
		Self { replace: false }
	}
}

/// Access to the host's current query string
pub trait RouterAdapter: Send + Sync {
	/// Returns true when a live, navigable location exists
	fn is_client(&self) -> bool;

	/// Reads the current query parameters
	fn search_params(&self) -> Result<QueryParams, UrlSyncError>;

	/// Replaces the current query parameters
	fn set_search_params(
		&self,
		params: &QueryParams,
		options: NavigateOptions,
	) -> Result<(), UrlSyncError>;
}

#[derive(Debug)]
struct MemoryHistory {
	path: String,
	entries: Vec<QueryParams>,
}

impl MemoryHistory {
	fn current(&self) -> QueryParams {
		self.entries.last().cloned().unwrap_or_default()
	}
}

/// In-process router with a linear history
///
/// # Example
///
/// ```rust
/// use tablekit::url_sync::{MemoryRouter, NavigateOptions, QueryParams, RouterAdapter};
///
/// let router = MemoryRouter::new("/users?page=2").unwrap();
/// assert_eq!(router.search_params().unwrap().get("page"), Some("2"));
///
/// router
///     .set_search_params(&QueryParams::parse("page=3"), NavigateOptions::replace())
///     .unwrap();
/// assert_eq!(router.href(), "/users?page=3");
/// assert_eq!(router.history_len(), 1);
/// ```
#[derive(Debug)]
pub struct MemoryRouter {
	history: Mutex<MemoryHistory>,
}

impl MemoryRouter {
	/// Starts at `location`, a path with an optional query string
	pub fn new(location: &str) -> Result<Self, UrlSyncError> {
		let base = Url::parse(MEMORY_BASE).map_err(|e| UrlSyncError::Parse(e.to_string()))?;
		let url = base
			.join(location)
			.map_err(|e| UrlSyncError::Parse(format!("{location}: {e}")))?;

		Ok(Self {
			history: Mutex::new(MemoryHistory {
				path: url.path().to_string(),
				entries: vec![QueryParams::parse(url.query().unwrap_or(""))],
			}),
		})
	}

	/// Current path and query, e.g. `/users?page=3`
	pub fn href(&self) -> String {
		let history = self.history.lock();
		let query = history.current().to_query_string();
		if query.is_empty() {
			history.path.clone()
		} else {
			format!("{}?{}", history.path, query)
		}
	}

	/// Number of history entries
	pub fn history_len(&self) -> usize {
		self.history.lock().entries.len()
	}
}

impl Default for MemoryRouter {
	fn default() -> Self {
		Self {
			history: Mutex::new(MemoryHistory {
				path: "/".to_string(),
				entries: vec![QueryParams::new()],
			}),
		}
	}
}

impl RouterAdapter for MemoryRouter {
	fn is_client(&self) -> bool {
		true
	}

	fn search_params(&self) -> Result<QueryParams, UrlSyncError> {
		Ok(self.history.lock().current())
	}

	fn set_search_params(
		&self,
		params: &QueryParams,
		options: NavigateOptions,
	) -> Result<(), UrlSyncError> {
		let mut history = self.history.lock();
		if options.replace {
			history.entries.pop();
		}
		history.entries.push(params.clone());
		Ok(())
	}
}

/// Router for non-interactive rendering
///
/// Reports no client, so the table neither reads nor writes the location.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerRouter;

impl RouterAdapter for ServerRouter {
	fn is_client(&self) -> bool {
		false
	}

	fn search_params(&self) -> Result<QueryParams, UrlSyncError> {
		Err(UrlSyncError::NotClient)
	}

	fn set_search_params(
		&self,
		_params: &QueryParams,
		_options: NavigateOptions,
	) -> Result<(), UrlSyncError> {
		Err(UrlSyncError::NotClient)
	}
}
