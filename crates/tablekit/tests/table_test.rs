//! Table coordinator scenarios


use std::sync::Arc;

use fixtures::{TestUser, keyed_options, names, user_columns, user_table, users};
use rstest::*;
use tablekit::column::{ColumnDefinition, ColumnOptions, col};
use tablekit::config::SelectionConfig;
use tablekit::pagination::PaginationState;
use tablekit::selection::SelectionMode;
use tablekit::sort::{SortDirection, SortState};
use tablekit::state::{InitialState, ServerModeConfig, StateOptions};
use tablekit::table::{Table, TableOptions};
use tablekit::value::{RowId, Value};

fn ids(table: &Table<TestUser>) -> Vec<i64> {
	table.page_rows().iter().map(|row| row.record.id).collect()
}

#[rstest]
fn test_admins_by_age_desc_two_per_page(
	users: Vec<TestUser>,
	user_columns: Vec<ColumnDefinition<TestUser>>,
) {
	let mut table = Table::new(users, user_columns, keyed_options().page_size(2));

	table.filtering().set_column_filter("role", "Admin");
	table.sorting().set("age", SortDirection::Desc);

	assert_eq!(table.filtered_row_count(), 4);
	assert_eq!(table.page_count(), 2);
	assert_eq!(names(table.page_rows()), ["Ivan", "Dave"]);
	assert!(table.has_next_page());
	assert!(!table.has_previous_page());

	table.pagination().next_page();
	assert_eq!(names(table.page_rows()), ["Alice", "Frank"]);
	assert!(!table.has_next_page());
	assert!(table.has_previous_page());
}

#[rstest]
fn test_page_size_five_over_twelve(
	users: Vec<TestUser>,
	user_columns: Vec<ColumnDefinition<TestUser>>,
) {
	let mut table = Table::new(users, user_columns, keyed_options().page_size(5));
	assert_eq!(table.page_count(), 3);

	table.pagination().go_to_page(5);
	assert_eq!(table.state().pagination().page_index, 2);
	assert_eq!(ids(&table), [11, 12]);

	table.pagination().next_page();
	assert_eq!(table.state().pagination().page_index, 2);

	table.pagination().first_page();
	table.pagination().previous_page();
	assert_eq!(table.state().pagination().page_index, 0);

	table.pagination().last_page();
	assert_eq!(table.state().pagination().page_index, 2);
}

#[rstest]
fn test_set_page_size_reclamps(mut user_table: Table<TestUser>) {
	user_table.pagination().last_page();
	assert_eq!(user_table.state().pagination().page_index, 1);

	user_table.pagination().set_page_size(20);
	let pagination = user_table.state().pagination().clone();
	assert_eq!(pagination.page_size, 20);
	assert_eq!(pagination.page_index, 0);
	assert_eq!(user_table.page_rows().len(), 12);

	user_table.pagination().set_page_size(0);
	assert_eq!(user_table.state().pagination().page_size, 20);
}

#[rstest]
fn test_filter_change_returns_to_first_page(mut user_table: Table<TestUser>) {
	user_table.pagination().go_to_page(1);
	user_table.filtering().set_global_filter("paris");

	assert_eq!(user_table.state().pagination().page_index, 0);
	assert_eq!(names(user_table.page_rows()), ["Alice", "Carol", "Heidi"]);
}

#[rstest]
fn test_column_filter_suppresses_global_filter(mut user_table: Table<TestUser>) {
	user_table.filtering().set_global_filter("berlin");
	assert_eq!(user_table.filtered_row_count(), 3);

	user_table.filtering().set_column_filter("role", "manager");
	assert_eq!(names(user_table.filtered_rows()), ["Carol", "Grace", "Mallory"]);

	user_table.filtering().clear_column_filter("role");
	assert_eq!(user_table.filtered_row_count(), 3);

	user_table.filtering().clear_all();
	assert_eq!(user_table.filtered_row_count(), 12);
	assert!(!user_table.state().filtering().is_active());
}

#[rstest]
fn test_toggle_sort_cycles(mut user_table: Table<TestUser>) {
	user_table.sorting().toggle("age");
	assert_eq!(user_table.state().sorting(), &SortState::by("age", SortDirection::Asc));
	assert_eq!(names(user_table.page_rows())[0], "Eve");

	user_table.sorting().toggle("age");
	assert_eq!(user_table.state().sorting(), &SortState::by("age", SortDirection::Desc));
	assert_eq!(names(user_table.page_rows())[0], "Ivan");

	user_table.sorting().toggle("age");
	assert!(!user_table.state().sorting().is_active());
	assert_eq!(ids(&user_table)[0], 1);
}

#[rstest]
fn test_non_sortable_column_is_ignored(mut user_table: Table<TestUser>) {
	user_table.sorting().toggle("label");
	assert!(!user_table.state().sorting().is_active());

	user_table.sorting().set("name", SortDirection::Desc);
	user_table.sorting().clear();
	assert!(!user_table.state().sorting().is_active());
}

#[rstest]
fn test_sorted_rows_span_all_pages(mut user_table: Table<TestUser>) {
	user_table.sorting().set("name", SortDirection::Desc);

	let sorted = names(user_table.sorted_rows());
	assert_eq!(sorted.len(), 12);
	assert_eq!(sorted[0], "Oscar");
	assert_eq!(sorted[11], "Alice");
}

#[rstest]
fn test_nulls_sort_last_both_ways(
	users: Vec<TestUser>,
	user_columns: Vec<ColumnDefinition<TestUser>>,
) {
	let mut users = users;
	users[0].age = None;
	let mut table = Table::new(users, user_columns, keyed_options().page_size(20));

	table.sorting().set("age", SortDirection::Asc);
	assert_eq!(names(table.page_rows()).last().map(String::as_str), Some("Alice"));

	table.sorting().set("age", SortDirection::Desc);
	assert_eq!(names(table.page_rows()).last().map(String::as_str), Some("Alice"));
}

#[rstest]
fn test_custom_compare_fn(users: Vec<TestUser>) {
	let by_length = Arc::new(|a: &Value, b: &Value| {
		a.to_display_string()
			.len()
			.cmp(&b.to_display_string().len())
	});
	let columns = vec![col("name", ColumnOptions::new().compare(by_length))];
	let mut table = Table::new(users, columns, keyed_options().page_size(3));

	table.sorting().set("name", SortDirection::Asc);
	assert_eq!(names(table.page_rows()), ["Bob", "Eve", "Dave"]);
}

#[rstest]
fn test_visible_columns_and_order(mut user_table: Table<TestUser>) {
	let visible: Vec<_> = user_table.visible_columns().iter().map(|c| c.id().to_string()).collect();
	assert_eq!(visible, ["id", "name", "role", "age", "label"]);

	user_table.column_management().toggle_visibility("id");
	user_table.column_management().set_order(vec!["age".to_string(), "name".to_string()]);
	let visible: Vec<_> = user_table.visible_columns().iter().map(|c| c.id().to_string()).collect();
	assert_eq!(visible, ["age", "name", "role", "label"]);

	user_table.column_management().move_column("label", 0);
	user_table.column_management().move_column("missing", 0);
	let order = user_table.state().column_order().clone();
	assert_eq!(order, ["label", "age", "name", "id", "email", "role"]);

	user_table.column_management().show_all();
	user_table.column_management().reset_order();
	let visible: Vec<_> = user_table.visible_columns().iter().map(|c| c.id().to_string()).collect();
	assert_eq!(visible, ["id", "name", "email", "role", "age", "label"]);
}

#[rstest]
fn test_view_is_consistent(mut user_table: Table<TestUser>) {
	user_table.filtering().set_column_filter("city", "paris");
	user_table.pagination().go_to_page(3);

	let view = user_table.view();
	assert_eq!(view.filtered_row_count, 3);
	assert_eq!(view.page_count, 1);
	assert_eq!(view.pagination.page_index, 0);
	assert_eq!(view.rows.len(), 3);
	assert_eq!(view.columns.len(), 5);
}

#[rstest]
fn test_set_records_clamps_on_read(mut user_table: Table<TestUser>) {
	user_table.pagination().go_to_page(1);
	assert_eq!(user_table.state().pagination().page_index, 1);

	user_table.set_records(vec![TestUser::new(100, "Zed", "User", 40, "Lima")]);
	assert_eq!(user_table.page_count(), 1);
	assert_eq!(names(user_table.page_rows()), ["Zed"]);
	assert!(!user_table.has_next_page());
	assert!(!user_table.has_previous_page());
}

#[rstest]
fn test_unknown_column_reads_as_null(mut user_table: Table<TestUser>) {
	user_table.filtering().set_column_filter("nope", "x");
	assert_eq!(user_table.filtered_row_count(), 0);

	user_table.filtering().clear_all();
	user_table.sorting().set("nope", SortDirection::Asc);
	assert_eq!(ids(&user_table)[0], 1);
}

#[rstest]
fn test_column_validation_reports_problems(users: Vec<TestUser>) {
	let columns = vec![
		col("name", ColumnOptions::new()),
		col("name", ColumnOptions::new()),
		col(" ", ColumnOptions::new()),
	];
	let table = Table::new(users, columns, TableOptions::new());

	let validation = table.column_validation();
	assert!(!validation.valid);
	assert_eq!(validation.errors.len(), 2);
	assert_eq!(table.page_rows().len(), 10);
}

#[rstest]
fn test_selection_is_page_scoped(mut user_table: Table<TestUser>) {
	user_table.selection().select(12);
	user_table.selection().select_all();
	assert!(user_table.selection().is_all_selected());
	assert_eq!(user_table.selection().len(), 11);

	user_table.selection().deselect(3);
	assert!(user_table.selection().is_indeterminate());

	user_table.selection().deselect_all();
	assert_eq!(user_table.selection().len(), 1);
	assert!(user_table.selection().is_selected(12));

	let selected: Vec<_> = user_table.selected_rows().iter().map(|r| r.record.id).collect();
	assert_eq!(selected, [12]);

	user_table.selection().clear();
	assert!(user_table.selection().is_empty());
}

#[rstest]
fn test_single_selection_mode(users: Vec<TestUser>, user_columns: Vec<ColumnDefinition<TestUser>>) {
	let options = keyed_options().selection(SelectionConfig {
		mode: SelectionMode::Single,
		initial_selected_row_ids: vec![RowId::from(2), RowId::from(3)],
		..SelectionConfig::default()
	});
	let mut table = Table::new(users, user_columns, options);
	assert_eq!(table.selection().len(), 1);
	assert!(table.selection().is_selected(2));

	table.selection().toggle(5);
	assert!(table.selection().is_selected(5));
	assert_eq!(table.selection().len(), 1);

	table.selection().select_all();
	assert_eq!(table.selection().len(), 1);
}

#[rstest]
fn test_disabled_selection_is_inert(
	users: Vec<TestUser>,
	user_columns: Vec<ColumnDefinition<TestUser>>,
) {
	let options = keyed_options().selection(SelectionConfig {
		enabled: false,
		initial_selected_row_ids: vec![RowId::from(1)],
		..SelectionConfig::default()
	});
	let mut table = Table::new(users, user_columns, options);

	assert!(table.selection().is_empty());
	table.selection().select(1);
	table.selection().select_all();
	assert!(table.selection().is_empty());
}

#[rstest]
fn test_default_row_key_is_index(
	users: Vec<TestUser>,
	user_columns: Vec<ColumnDefinition<TestUser>>,
) {
	let mut table = Table::new(users, user_columns, TableOptions::new());
	table.selection().select(0);

	let selected = table.selected_rows();
	assert_eq!(selected.len(), 1);
	assert_eq!(selected[0].record.name, "Alice");
	assert_eq!(selected[0].id, RowId::from(0));
}

#[rstest]
fn test_server_mode_passes_rows_through(
	users: Vec<TestUser>,
	user_columns: Vec<ColumnDefinition<TestUser>>,
) {
	let page: Vec<TestUser> = users.into_iter().take(5).collect();
	let options = keyed_options()
		.page_size(5)
		.server_mode(ServerModeConfig {
			pagination: true,
			sorting: true,
			filtering: true,
		})
		.state(StateOptions::new().initial_state(InitialState {
			pagination: Some(PaginationState {
				total_count: Some(42),
				..PaginationState::new(5)
			}),
			..InitialState::default()
		}));
	let mut table = Table::new(page, user_columns, options);

	table.sorting().set("age", SortDirection::Desc);
	table.filtering().set_column_filter("role", "Admin");

	assert_eq!(ids(&table), [1, 2, 3, 4, 5]);
	assert_eq!(table.page_count(), 9);

	table.pagination().go_to_page(4);
	assert_eq!(table.state().pagination().page_index, 4);
	assert_eq!(table.page_rows().len(), 5);
}

#[rstest]
fn test_server_page_count_wins(
	users: Vec<TestUser>,
	user_columns: Vec<ColumnDefinition<TestUser>>,
) {
	let options = keyed_options().state(StateOptions::new().initial_state(InitialState {
		pagination: Some(PaginationState {
			total_count: Some(42),
			page_count: Some(7),
			..PaginationState::new(10)
		}),
		..InitialState::default()
	}));
	let table = Table::new(users, user_columns, options);
	assert_eq!(table.page_count(), 7);
}
