//! Serializable table configuration
//!
//! [`TableConfig`] is the data-only part of
//! [`TableOptions`](crate::table::TableOptions): everything except closures and
//! router handles. It can be embedded in application settings and loaded from
//! JSON.
//!
//! ```rust
//! use tablekit::config::TableConfig;
//!
//! let config = TableConfig::from_json(r#"{
//!     "pageSize": 25,
//!     "serverMode": { "sorting": true },
//!     "urlSync": { "debounceMs": 150 }
//! }"#).unwrap();
//!
//! assert_eq!(config.page_size, 25);
//! assert!(config.server_mode.sorting);
//! assert_eq!(config.url_sync.unwrap().debounce_ms, 150);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::selection::SelectionMode;
use crate::state::ServerModeConfig;
use crate::url_sync::UrlSyncConfig;
use crate::value::RowId;

/// Row selection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionConfig {
	/// Selection mutators are no-ops when false
	pub enabled: bool,
	/// Single or multi selection
	pub mode: SelectionMode,
	/// Rows selected when the table is created
	pub initial_selected_row_ids: Vec<RowId>,
}

impl Default for SelectionConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			mode: SelectionMode::Multi,
			initial_selected_row_ids: Vec::new(),
		}
	}
}

/// Data-only table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
	/// Rows per page
	pub page_size: usize,
	/// Stages delegated to a server
	pub server_mode: ServerModeConfig,
	/// Row selection
	pub selection: SelectionConfig,
	/// URL synchronization; disabled when absent
	pub url_sync: Option<UrlSyncConfig>,
}

impl Default for TableConfig {
	fn default() -> Self {
		Self {
			page_size: DEFAULT_PAGE_SIZE,
			server_mode: ServerModeConfig::default(),
			selection: SelectionConfig::default(),
			url_sync: None,
		}
	}
}

impl TableConfig {
	/// Parses and validates a JSON configuration
	pub fn from_json(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// Rejects settings the table cannot work with
	pub fn validate(&self) -> Result<()> {
		if self.page_size == 0 {
			return Err(TableError::Config("pageSize must be greater than 0".to_string()));
		}
		if let Some(url_sync) = &self.url_sync {
			let names = &url_sync.param_names;
			let keys = [
				&names.page,
				&names.page_size,
				&names.sort,
				&names.sort_dir,
				&names.global_filter,
			];
			if keys.iter().any(|k| k.is_empty()) {
				return Err(TableError::Config("URL parameter names must not be empty".to_string()));
			}
			if names.filter_prefix.is_empty() {
				return Err(TableError::Config("URL filter prefix must not be empty".to_string()));
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_empty_json_gives_defaults() {
		let config = TableConfig::from_json("{}").unwrap();
		assert_eq!(config, TableConfig::default());
		assert_eq!(config.page_size, 10);
		assert!(config.selection.enabled);
		assert!(config.url_sync.is_none());
	}

	#[rstest]
	fn test_selection_config_parses() {
		let config = TableConfig::from_json(
			r#"{ "selection": { "mode": "single", "initialSelectedRowIds": [3, "x"] } }"#,
		)
		.unwrap();
		assert_eq!(config.selection.mode, SelectionMode::Single);
		assert_eq!(
			config.selection.initial_selected_row_ids,
			vec![RowId::from(3), RowId::from("x")]
		);
	}

	#[rstest]
	#[case(r#"{ "pageSize": 0 }"#)]
	#[case(r#"{ "urlSync": { "paramNames": { "sort": "" } } }"#)]
	#[case(r#"{ "urlSync": { "paramNames": { "filterPrefix": "" } } }"#)]
	fn test_invalid_config_is_rejected(#[case] json: &str) {
		assert!(matches!(TableConfig::from_json(json), Err(TableError::Config(_))));
	}

	#[rstest]
	fn test_malformed_json_is_json_error() {
		assert!(matches!(TableConfig::from_json("{ nope"), Err(TableError::Json(_))));
	}
}
