//! Error types for table operations

use thiserror::Error;

/// Errors raised by fallible table operations
///
/// Most of the engine clamps or ignores bad input instead of failing; these
/// variants cover configuration loading and export.
#[derive(Debug, Error)]
pub enum TableError {
	/// Configuration could not be parsed
	#[error("Invalid table configuration: {0}")]
	Config(String),

	/// Export of the current view failed
	#[error("Export failed: {0}")]
	Export(String),

	/// JSON (de)serialization error
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// CSV writer error
	#[cfg(feature = "export")]
	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),
}

/// Result type for table operations
pub type Result<T> = std::result::Result<T, TableError>;

/// A single problem found while validating column definitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnValidationError {
	/// Column id is empty or whitespace
	#[error("Column at index {index} has an empty id")]
	EmptyId {
		/// Position of the offending column
		index: usize,
	},

	/// Column id is declared more than once
	#[error("Duplicate column id: \"{id}\"")]
	DuplicateId {
		/// The repeated id
		id: String,
	},
}

/// Errors raised by router adapters during URL synchronization
///
/// These never escape the table: they are logged and the sync is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlSyncError {
	/// No interactive location is available (e.g. server-side rendering)
	#[error("Location is not available outside an interactive client")]
	NotClient,

	/// Reading or replacing the location failed
	#[error("Navigation failed: {0}")]
	Navigation(String),

	/// The current location could not be parsed
	#[error("Failed to parse location: {0}")]
	Parse(String),
}
