//! URL query-string synchronization
//!
//! The navigational part of [`TableState`](crate::state::TableState)
//! (pagination, sorting, filtering) round-trips through a query string:
//!
//! ```text
//! ?page=2&pageSize=25&sort=age&sortDir=desc&q=smith&filter_role=admin
//! ```
//!
//! Parsing never fails: malformed values are simply left out of the
//! resulting [`UrlStatePatch`]. Writes go through a [`RouterAdapter`] and are
//! debounced by a [`DebouncedWriter`].

pub mod adapter;
pub mod codec;
pub mod debounce;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use adapter::{MemoryRouter, NavigateOptions, RouterAdapter, ServerRouter};
pub use codec::{QueryParams, UrlStatePatch, parse_state_from_url, serialize_state_to_url};
pub use debounce::DebouncedWriter;

/// Debounce interval used when none is configured
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Query-string key for each synchronized field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UrlParamNames {
	/// Page index key
	pub page: String,
	/// Page size key
	pub page_size: String,
	/// Sort column key
	pub sort: String,
	/// Sort direction key
	pub sort_dir: String,
	/// Global filter key
	pub global_filter: String,
	/// Prefix of per-column filter keys
	pub filter_prefix: String,
}

impl Default for UrlParamNames {
	fn default() -> Self {
		Self {
			page: "page".to_string(),
			page_size: "pageSize".to_string(),
			sort: "sort".to_string(),
			sort_dir: "sortDir".to_string(),
			global_filter: "q".to_string(),
			filter_prefix: "filter_".to_string(),
		}
	}
}

impl UrlParamNames {
	/// Query key for the filter of `column_id`
	pub fn column_filter(&self, column_id: &str) -> String {
		format!("{}{}", self.filter_prefix, column_id)
	}
}

/// Which state slices are synchronized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlSyncFeatures {
	/// Sync page index and size
	pub pagination: bool,
	/// Sync sort column and direction
	pub sorting: bool,
	/// Sync global and column filters
	pub filtering: bool,
}

impl Default for UrlSyncFeatures {
	fn default() -> Self {
		Self {
			pagination: true,
			sorting: true,
			filtering: true,
		}
	}
}

/// URL synchronization settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UrlSyncConfig {
	/// Whether synchronization runs at all
	pub enabled: bool,
	/// Query-string keys
	pub param_names: UrlParamNames,
	/// Quiet interval before a write, in milliseconds
	pub debounce_ms: u64,
	/// Synchronized slices
	pub features: UrlSyncFeatures,
}

impl Default for UrlSyncConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			param_names: UrlParamNames::default(),
			debounce_ms: DEFAULT_DEBOUNCE_MS,
			features: UrlSyncFeatures::default(),
		}
	}
}

impl UrlSyncConfig {
	/// Returns the debounce interval
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}
}
