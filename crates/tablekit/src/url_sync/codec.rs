//! Query-string encoding of table state

use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

use super::UrlSyncConfig;
use crate::filter::FilterState;
use crate::pagination::{DEFAULT_PAGE_SIZE, PaginationState};
use crate::sort::{SortDirection, SortState};
use crate::state::{StateSlice, TableState};

/// Ordered query-string parameters
///
/// Keeps unrelated parameters, and their order, intact across updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
	pairs: Vec<(String, String)>,
}

impl QueryParams {
	/// Creates an empty parameter list
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a query string, with or without its leading `?`
	pub fn parse(query: &str) -> Self {
		let query = query.strip_prefix('?').unwrap_or(query);
		Self {
			pairs: form_urlencoded::parse(query.as_bytes())
				.map(|(k, v)| (k.into_owned(), v.into_owned()))
				.collect(),
		}
	}

	/// Returns the first value for `key`
	pub fn get(&self, key: &str) -> Option<&str> {
		self.pairs
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Returns true if `key` is present
	pub fn contains(&self, key: &str) -> bool {
		self.pairs.iter().any(|(k, _)| k == key)
	}

	/// Sets `key` to `value`
	///
	/// The first occurrence is replaced in place and duplicates are dropped;
	/// a new key is appended.
	pub fn set(&mut self, key: &str, value: impl Into<String>) {
		let value = value.into();
		match self.pairs.iter().position(|(k, _)| k == key) {
			Some(index) => {
				self.pairs[index].1 = value;
				let mut seen = false;
				self.pairs.retain(|(k, _)| {
					if k != key {
						return true;
					}
					let keep = !seen;
					seen = true;
					keep
				});
			}
			None => self.pairs.push((key.to_string(), value)),
		}
	}

	/// Appends a pair without touching existing ones
	pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.pairs.push((key.into(), value.into()));
	}

	/// Removes every occurrence of `key`
	pub fn delete(&mut self, key: &str) {
		self.pairs.retain(|(k, _)| k != key);
	}

	/// Removes every key starting with `prefix`
	pub fn delete_prefixed(&mut self, prefix: &str) {
		self.pairs.retain(|(k, _)| !k.starts_with(prefix));
	}

	/// Iterates the pairs in order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Returns true when there are no parameters
	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}

	/// Encodes the parameters, without a leading `?`
	pub fn to_query_string(&self) -> String {
		form_urlencoded::Serializer::new(String::new())
			.extend_pairs(self.pairs.iter())
			.finish()
	}
}

impl fmt::Display for QueryParams {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_query_string())
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
		}
	}
}

/// State recovered from a query string
///
/// Only fields present and well-formed in the URL are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlStatePatch {
	/// Page index
	pub page_index: Option<usize>,
	/// Page size
	pub page_size: Option<usize>,
	/// Sort column and direction
	pub sorting: Option<SortState>,
	/// Global filter
	pub global_filter: Option<String>,
	/// Column filters
	pub column_filters: Option<BTreeMap<String, String>>,
}

impl UrlStatePatch {
	/// Returns true when the URL carried nothing usable
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}

	/// Applies the patch on top of `state`
	pub fn apply(&self, state: TableState) -> TableState {
		let mut state = state;

		if self.page_index.is_some() || self.page_size.is_some() {
			let current = state.pagination();
			let pagination = PaginationState {
				page_index: self.page_index.unwrap_or(current.page_index),
				page_size: self.page_size.unwrap_or(current.page_size),
				..current.clone()
			};
			state = state.with(StateSlice::Pagination(pagination));
		}

		if let Some(sorting) = &self.sorting {
			state = state.with(StateSlice::Sorting(sorting.clone()));
		}

		if self.global_filter.is_some() || self.column_filters.is_some() {
			let current = state.filtering();
			let filtering = FilterState {
				global_filter: self
					.global_filter
					.clone()
					.unwrap_or_else(|| current.global_filter.clone()),
				column_filters: self
					.column_filters
					.clone()
					.unwrap_or_else(|| current.column_filters.clone()),
			};
			state = state.with(StateSlice::Filtering(filtering));
		}

		state
	}
}

/// Reads table state from query parameters
///
/// Malformed numbers and unknown sort directions are ignored. A sort is only
/// recovered when both its column and a valid direction are present.
pub fn parse_state_from_url(params: &QueryParams, config: &UrlSyncConfig) -> UrlStatePatch {
	let names = &config.param_names;
	let mut patch = UrlStatePatch::default();

	if config.features.pagination {
		patch.page_index = params
			.get(&names.page)
			.and_then(|v| v.trim().parse::<usize>().ok());
		patch.page_size = params
			.get(&names.page_size)
			.and_then(|v| v.trim().parse::<usize>().ok())
			.filter(|size| *size > 0);
	}

	if config.features.sorting {
		let column = params.get(&names.sort).filter(|c| !c.is_empty());
		let direction = params.get(&names.sort_dir).and_then(SortDirection::parse);
		if let (Some(column), Some(direction)) = (column, direction) {
			patch.sorting = Some(SortState::by(column, direction));
		}
	}

	if config.features.filtering {
		patch.global_filter = params
			.get(&names.global_filter)
			.filter(|q| !q.is_empty())
			.map(str::to_string);

		// Without a prefix every key would read as a column filter
		let prefix = names.filter_prefix.as_str();
		let column_filters: BTreeMap<String, String> = params
			.iter()
			.filter(|_| !prefix.is_empty())
			.filter_map(|(key, value)| {
				let column_id = key.strip_prefix(prefix)?;
				(!column_id.is_empty() && !value.is_empty())
					.then(|| (column_id.to_string(), value.to_string()))
			})
			.collect();
		if !column_filters.is_empty() {
			patch.column_filters = Some(column_filters);
		}
	}

	patch
}

/// Writes table state into `params`, returning the updated copy
///
/// Only non-default values are written: page 0, the default page size, an
/// inactive sort and blank filters leave no key behind. Column filter keys are
/// always rewritten from scratch, and not written at all under an empty
/// prefix. Unrelated parameters survive untouched.
pub fn serialize_state_to_url(
	state: &TableState,
	params: &QueryParams,
	config: &UrlSyncConfig,
) -> QueryParams {
	let names = &config.param_names;
	let mut next = params.clone();

	if config.features.pagination {
		let pagination = state.pagination();
		if pagination.page_index > 0 {
			next.set(&names.page, pagination.page_index.to_string());
		} else {
			next.delete(&names.page);
		}
		if pagination.page_size != DEFAULT_PAGE_SIZE {
			next.set(&names.page_size, pagination.page_size.to_string());
		} else {
			next.delete(&names.page_size);
		}
	}

	if config.features.sorting {
		let sorting = state.sorting();
		match (&sorting.column_id, sorting.direction) {
			(Some(column), Some(direction)) => {
				next.set(&names.sort, column.as_str());
				next.set(&names.sort_dir, direction.as_str());
			}
			_ => {
				next.delete(&names.sort);
				next.delete(&names.sort_dir);
			}
		}
	}

	if config.features.filtering {
		let filtering = state.filtering();
		if filtering.global_filter.is_empty() {
			next.delete(&names.global_filter);
		} else {
			next.set(&names.global_filter, filtering.global_filter.as_str());
		}

		if !names.filter_prefix.is_empty() {
			next.delete_prefixed(&names.filter_prefix);
			for (column_id, value) in &filtering.column_filters {
				if !value.is_empty() {
					next.append(names.column_filter(column_id), value.as_str());
				}
			}
		}
	}

	next
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::url_sync::{UrlParamNames, UrlSyncFeatures};
	use rstest::*;

	#[fixture]
	fn config() -> UrlSyncConfig {
		UrlSyncConfig::default()
	}

	fn state() -> TableState {
		TableState::new(vec!["name".to_string(), "role".to_string()], 10)
	}

	#[rstest]
	fn test_query_params_parse_and_encode() {
		let params = QueryParams::parse("?a=1&q=hello%20world&a=2");
		assert_eq!(params.get("a"), Some("1"));
		assert_eq!(params.get("q"), Some("hello world"));
		assert_eq!(params.to_query_string(), "a=1&q=hello+world&a=2");
	}

	#[rstest]
	fn test_query_params_set_replaces_first_and_drops_duplicates() {
		let mut params = QueryParams::parse("x=1&a=1&y=2&a=2");
		params.set("a", "9");
		assert_eq!(params.to_query_string(), "x=1&a=9&y=2");
		params.set("b", "3");
		assert_eq!(params.to_query_string(), "x=1&a=9&y=2&b=3");
	}

	#[rstest]
	fn test_parse_full_query(config: UrlSyncConfig) {
		let params = QueryParams::parse(
			"page=2&pageSize=25&sort=age&sortDir=DESC&q=smith&filter_role=admin&other=1",
		);
		let patch = parse_state_from_url(&params, &config);

		assert_eq!(patch.page_index, Some(2));
		assert_eq!(patch.page_size, Some(25));
		assert_eq!(patch.sorting, Some(SortState::by("age", SortDirection::Desc)));
		assert_eq!(patch.global_filter.as_deref(), Some("smith"));
		let filters = patch.column_filters.unwrap();
		assert_eq!(filters.len(), 1);
		assert_eq!(filters.get("role").map(String::as_str), Some("admin"));
	}

	#[rstest]
	#[case("page=abc&pageSize=-3")]
	#[case("page=&pageSize=0")]
	#[case("sort=age&sortDir=sideways")]
	#[case("sortDir=asc")]
	#[case("filter_=x&q=")]
	fn test_parse_ignores_malformed(config: UrlSyncConfig, #[case] query: &str) {
		let patch = parse_state_from_url(&QueryParams::parse(query), &config);
		assert!(patch.is_empty(), "expected empty patch for {query}: {patch:?}");
	}

	#[rstest]
	fn test_serialize_omits_defaults(config: UrlSyncConfig) {
		let existing = QueryParams::parse("tab=users&page=4&sort=x&sortDir=asc&filter_old=1");
		let params = serialize_state_to_url(&state(), &existing, &config);
		assert_eq!(params.to_query_string(), "tab=users");
	}

	#[rstest]
	fn test_serialize_rewrites_column_filters(config: UrlSyncConfig) {
		let filtering = FilterState::default()
			.with_column_filter("role", "admin")
			.with_column_filter("name", "al");
		let state = state()
			.with(StateSlice::Filtering(filtering))
			.with(StateSlice::Sorting(SortState::by("name", SortDirection::Asc)))
			.with(StateSlice::Pagination(PaginationState::new(25).with_page_index(3)));
		let existing = QueryParams::parse("filter_stale=1&keep=yes");

		let params = serialize_state_to_url(&state, &existing, &config);

		assert_eq!(params.get("keep"), Some("yes"));
		assert!(!params.contains("filter_stale"));
		assert_eq!(params.get("filter_role"), Some("admin"));
		assert_eq!(params.get("filter_name"), Some("al"));
		assert_eq!(params.get("page"), Some("3"));
		assert_eq!(params.get("pageSize"), Some("25"));
		assert_eq!(params.get("sort"), Some("name"));
		assert_eq!(params.get("sortDir"), Some("asc"));
	}

	#[rstest]
	fn test_round_trip_with_custom_names() {
		let config = UrlSyncConfig {
			param_names: UrlParamNames {
				page: "p".to_string(),
				page_size: "n".to_string(),
				sort: "o".to_string(),
				sort_dir: "d".to_string(),
				global_filter: "search".to_string(),
				filter_prefix: "f.".to_string(),
			},
			..UrlSyncConfig::default()
		};
		let mut filtering = FilterState::default().with_column_filter("role", "Manager");
		filtering.global_filter = "lyon".to_string();
		let original = state()
			.with(StateSlice::Filtering(filtering))
			.with(StateSlice::Sorting(SortState::by("role", SortDirection::Desc)))
			.with(StateSlice::Pagination(PaginationState::new(5).with_page_index(1)));

		let params = serialize_state_to_url(&original, &QueryParams::new(), &config);
		assert_eq!(params.get("f.role"), Some("Manager"));

		let restored = parse_state_from_url(&params, &config).apply(state());
		assert_eq!(restored, original);
	}

	#[rstest]
	fn test_disabled_features_are_left_alone() {
		let config = UrlSyncConfig {
			features: UrlSyncFeatures {
				pagination: false,
				sorting: true,
				filtering: false,
			},
			..UrlSyncConfig::default()
		};
		let existing = QueryParams::parse("page=7&q=keep");

		let params = serialize_state_to_url(&state(), &existing, &config);
		assert_eq!(params.get("page"), Some("7"));
		assert_eq!(params.get("q"), Some("keep"));

		let patch = parse_state_from_url(&existing, &config);
		assert!(patch.is_empty());
	}

	#[rstest]
	fn test_empty_filter_prefix_skips_column_filters() {
		let mut config = UrlSyncConfig::default();
		config.param_names.filter_prefix = String::new();
		let existing = QueryParams::parse("page=2&tab=team&role=Admin");

		let patch = parse_state_from_url(&existing, &config);
		assert_eq!(patch.page_index, Some(2));
		assert_eq!(patch.column_filters, None);

		let filtered = state().with(StateSlice::Filtering(
			FilterState::default().with_column_filter("city", "Oslo"),
		));
		let params = serialize_state_to_url(&filtered, &existing, &config);
		assert_eq!(params.get("tab"), Some("team"));
		assert_eq!(params.get("role"), Some("Admin"));
		assert!(!params.contains("city"));
	}
}
