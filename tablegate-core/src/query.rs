//! Query parameters for the list endpoint.

use crate::filter::FilterSpec;
use crate::scalar::Scalar;
use serde::Serialize;
use std::collections::btree_map;
use std::collections::BTreeMap;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Flat parameter-name to value mapping produced by filter compilation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QueryParamSet {
    params: BTreeMap<String, Scalar>,
}

impl QueryParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: Scalar) -> Option<Scalar> {
        self.params.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.params.get(name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Scalar> {
        self.params.iter()
    }

    /// Render as string pairs for a URL query.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

impl IntoIterator for QueryParamSet {
    type Item = (String, Scalar);
    type IntoIter = btree_map::IntoIter<String, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryParamSet {
    type Item = (&'a String, &'a Scalar);
    type IntoIter = btree_map::Iter<'a, String, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

impl FromIterator<(String, Scalar)> for QueryParamSet {
    fn from_iter<I: IntoIterator<Item = (String, Scalar)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

/// One page request against `GET /api/{table}/`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub filters: FilterSpec,
    pub order_by: Option<String>,
    pub order_desc: bool,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            filters: FilterSpec::new(),
            order_by: None,
            order_desc: false,
        }
    }
}

impl ListQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            ..Self::default()
        }
    }

    /// The single-row probe used to sample a table.
    pub fn sample() -> Self {
        Self::new(1, 1)
    }

    pub fn with_filters(mut self, filters: FilterSpec) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_order(mut self, field: impl Into<String>, descending: bool) -> Self {
        self.order_by = Some(field.into());
        self.order_desc = descending;
        self
    }

    /// Render the full query string as ordered pairs: pagination, compiled
    /// filters, then ordering when a non-empty `order_by` is set.
    ///
    /// A later pair replaces an earlier one with the same name, so a filter
    /// compiled to `page` overrides pagination.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        upsert(&mut pairs, "page", self.page.to_string());
        upsert(&mut pairs, "page_size", self.page_size.to_string());
        for (name, value) in self.filters.compile() {
            upsert(&mut pairs, &name, value.to_string());
        }
        if let Some(order_by) = self.order_by.as_deref().filter(|s| !s.is_empty()) {
            upsert(&mut pairs, "order_by", order_by.to_string());
            upsert(&mut pairs, "order_desc", self.order_desc.to_string());
        }
        pairs
    }
}

fn upsert(pairs: &mut Vec<(String, String)>, name: &str, value: String) {
    match pairs.iter_mut().find(|(k, _)| k == name) {
        Some(slot) => slot.1 = value,
        None => pairs.push((name.to_string(), value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{NumericKind, NumericOperator};

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_default_query_is_first_page_of_ten() {
        assert_eq!(
            ListQuery::default().to_query_pairs(),
            vec![pair("page", "1"), pair("page_size", "10")]
        );
    }

    #[test]
    fn test_query_pairs_include_filters_and_order() {
        let query = ListQuery::new(2, 25)
            .with_filters(
                FilterSpec::new()
                    .numeric("age", NumericKind::Int, NumericOperator::Gte, 18)
                    .text("name", "bo"),
            )
            .with_order("created_at", true);
        assert_eq!(
            query.to_query_pairs(),
            vec![
                pair("page", "2"),
                pair("page_size", "25"),
                pair("age_gte", "18"),
                pair("name", "bo"),
                pair("order_by", "created_at"),
                pair("order_desc", "true"),
            ]
        );
    }

    #[test]
    fn test_empty_order_by_is_omitted() {
        let query = ListQuery::default().with_order("", true);
        assert_eq!(query.to_query_pairs().len(), 2);
    }

    #[test]
    fn test_filter_named_page_overrides_pagination() {
        let query = ListQuery::default().with_filters(FilterSpec::new().text("page", "x"));
        assert_eq!(
            query.to_query_pairs(),
            vec![pair("page", "x"), pair("page_size", "10")]
        );
    }

    #[test]
    fn test_param_set_serializes_as_flat_map() {
        let params: QueryParamSet = vec![
            ("a_gt".to_string(), Scalar::Integer(1)),
            ("b".to_string(), Scalar::from("x")),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({"a_gt": 1, "b": "x"}));
    }
}
