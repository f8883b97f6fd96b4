//! Headless data-table engine
//!
//! `tablekit` turns a collection of records and a set of column definitions
//! into a paginated, sorted, filtered and selectable view. It renders nothing:
//! hosts read the derived rows and columns and drive changes through typed
//! mutators.
//!
//! # Features
//!
//! - **Column model**: Key-path or function accessors, per-column comparators
//! - **Filtering**: Global and per-column case-insensitive substring filters
//! - **Sorting**: Stable single-column sort with nulls last
//! - **Pagination**: Clamped page navigation, server-side totals
//! - **Selection**: Copy-on-write row id sets, page-scoped bulk selection
//! - **State ownership**: Controlled, uncontrolled, or per-field control
//! - **URL sync**: Debounced query-string round-trip through a router adapter
//! - **Export**: CSV and JSON export (requires `export` feature)
//!
//! # Architecture
//!
//! ```mermaid
//! graph TD
//!     A[Table] --> B[Columns]
//!     A --> C[StateStrategy]
//!     C --> D[Controlled]
//!     C --> E[Uncontrolled]
//!     C --> F[PerField]
//!     A --> G[Pipeline]
//!     G --> H[Filter]
//!     H --> I[Sort]
//!     I --> J[Paginate]
//!     A --> K[DebouncedWriter]
//!     K --> L[RouterAdapter]
//!     A --> M[Export]
//! ```
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tablekit::{Table, TableOptions, col, ColumnOptions};
//!
//! let rows = vec![
//!     json!({ "name": "Alice", "role": "Admin" }),
//!     json!({ "name": "Bob", "role": "User" }),
//! ];
//! let columns = vec![
//!     col("name", ColumnOptions::new().header("Name")),
//!     col("role", ColumnOptions::new().header("Role")),
//! ];
//!
//! let mut table = Table::new(rows, columns, TableOptions::new());
//! table.filtering().set_column_filter("role", "admin");
//!
//! assert_eq!(table.filtered_row_count(), 1);
//! assert_eq!(table.page_rows()[0].record["name"], "Alice");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod column;
pub mod config;
pub mod error;
#[cfg(feature = "export")]
pub mod export;
pub mod filter;
pub mod pagination;
pub mod selection;
pub mod sort;
pub mod state;
pub mod table;
pub mod url_sync;
pub mod value;

// Re-exports for convenience
pub use column::{ColumnDefinition, ColumnOptions, RuntimeColumn, col, col_with_accessor};
pub use config::TableConfig;
pub use error::{Result, TableError};
pub use state::{StateOptions, TableState};
pub use table::{Row, Table, TableOptions, TableView};
pub use value::{Record, RowId, Value};
