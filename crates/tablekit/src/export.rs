//! CSV and JSON export of the current view
//!
//! Exports cover every filtered and sorted row, across all pages, restricted
//! to the visible columns in display order.

use std::io::Write;

use crate::error::{Result, TableError};
use crate::table::Table;
use crate::value::Record;

/// Writes the view as CSV into `writer`
///
/// The first record holds the column headers.
pub fn write_csv<R, W>(table: &Table<R>, writer: W) -> Result<()>
where
	R: Record + 'static,
	W: Write,
{
	let columns = table.visible_columns();
	let rows = table.sorted_rows();
	let mut csv = csv::Writer::from_writer(writer);

	csv.write_record(columns.iter().map(|c| c.header()))?;
	for row in &rows {
		csv.write_record(
			columns
				.iter()
				.map(|c| c.value(row.record).to_display_string()),
		)?;
	}
	csv.flush().map_err(|e| TableError::Export(e.to_string()))?;

	tracing::debug!(rows = rows.len(), columns = columns.len(), "exported csv");
	Ok(())
}

/// Renders the view as a CSV string
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tablekit::column::{col, ColumnOptions};
/// use tablekit::export::export_csv;
/// use tablekit::table::{Table, TableOptions};
///
/// let table = Table::new(
///     vec![json!({ "name": "Alice", "city": "Paris, FR" })],
///     vec![
///         col("name", ColumnOptions::new().header("Name")),
///         col("city", ColumnOptions::new().header("City")),
///     ],
///     TableOptions::new(),
/// );
/// assert_eq!(export_csv(&table).unwrap(), "Name,City\nAlice,\"Paris, FR\"\n");
/// ```
pub fn export_csv<R: Record + 'static>(table: &Table<R>) -> Result<String> {
	let mut buffer = Vec::new();
	write_csv(table, &mut buffer)?;
	String::from_utf8(buffer).map_err(|e| TableError::Export(e.to_string()))
}

/// Builds the view as a JSON array of objects keyed by column id
pub fn export_json_value<R: Record + 'static>(table: &Table<R>) -> serde_json::Value {
	let columns = table.visible_columns();
	let rows: Vec<serde_json::Value> = table
		.sorted_rows()
		.iter()
		.map(|row| {
			let object = columns
				.iter()
				.map(|c| (c.id().to_string(), serde_json::Value::from(&c.value(row.record))))
				.collect();
			serde_json::Value::Object(object)
		})
		.collect();

	tracing::debug!(rows = rows.len(), columns = columns.len(), "exported json");
	serde_json::Value::Array(rows)
}

/// Renders the view as a pretty-printed JSON string
pub fn export_json<R: Record + 'static>(table: &Table<R>) -> Result<String> {
	Ok(serde_json::to_string_pretty(&export_json_value(table))?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::column::{ColumnOptions, col};
	use crate::sort::SortDirection;
	use crate::table::TableOptions;
	use rstest::*;
	use serde_json::{Value as Json, json};

	#[fixture]
	fn table() -> Table<Json> {
		let rows = vec![
			json!({ "name": "Alice", "role": "Admin", "age": 31 }),
			json!({ "name": "Bob", "role": "User", "age": null }),
			json!({ "name": "Carol", "role": "Admin", "age": 27 }),
		];
		let columns = vec![
			col("name", ColumnOptions::new().header("Name")),
			col("role", ColumnOptions::new().header("Role")),
			col("age", ColumnOptions::new().header("Age")),
		];
		Table::new(rows, columns, TableOptions::new().page_size(1))
	}

	#[rstest]
	fn test_csv_covers_all_pages_in_sort_order(mut table: Table<Json>) {
		table.sorting().set("age", SortDirection::Asc);
		table.column_management().set_visibility("role", false);

		let csv = export_csv(&table).unwrap();
		assert_eq!(csv, "Name,Age\nCarol,27\nAlice,31\nBob,\n");
	}

	#[rstest]
	fn test_csv_respects_column_order_and_filters(mut table: Table<Json>) {
		table.filtering().set_column_filter("role", "admin");
		table
			.column_management()
			.set_order(vec!["role".to_string(), "name".to_string()]);

		let csv = export_csv(&table).unwrap();
		assert_eq!(csv, "Role,Name,Age\nAdmin,Alice,31\nAdmin,Carol,27\n");
	}

	#[rstest]
	fn test_json_is_keyed_by_column_id(mut table: Table<Json>) {
		table.column_management().set_visibility("age", false);

		let value = export_json_value(&table);
		assert_eq!(
			value,
			json!([
				{ "name": "Alice", "role": "Admin" },
				{ "name": "Bob", "role": "User" },
				{ "name": "Carol", "role": "Admin" },
			])
		);

		let text = export_json(&table).unwrap();
		assert_eq!(serde_json::from_str::<Json>(&text).unwrap(), value);
	}
}
