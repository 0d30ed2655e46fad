//! Property tests for list query rendering over generated filter specs.

use proptest::prelude::*;
use std::collections::HashSet;
use tablegate_core::{FilterSpec, ListQuery, RawCondition};
use tablegate_test_utils::generators::{arb_field_name, arb_filter_spec, arb_raw_condition};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Query pairs never repeat a parameter name, and every compiled
    /// filter parameter reaches the query string.
    #[test]
    fn prop_query_pairs_are_unique_and_complete(
        spec in arb_filter_spec(),
        page in 1u32..50,
        page_size in 1u32..100,
    ) {
        let compiled = spec.compile();
        let pairs = ListQuery::new(page, page_size).with_filters(spec).to_query_pairs();

        let names: HashSet<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        prop_assert_eq!(names.len(), pairs.len());
        for (name, value) in compiled.to_pairs() {
            prop_assert!(pairs.contains(&(name, value)));
        }
    }

    /// Pagination always leads the query string unless a filter
    /// parameter shares its name.
    #[test]
    fn prop_pagination_leads(spec in arb_filter_spec()) {
        let compiled = spec.compile();
        let pairs = ListQuery::new(3, 7).with_filters(spec).to_query_pairs();

        prop_assert_eq!(&pairs[0].0, "page");
        prop_assert_eq!(&pairs[1].0, "page_size");
        if compiled.get("page").is_none() {
            prop_assert_eq!(&pairs[0].1, "3");
        }
        if compiled.get("page_size").is_none() {
            prop_assert_eq!(&pairs[1].1, "7");
        }
    }

    /// Wire conditions never panic the compiler; each either compiles or
    /// reports a typed error.
    #[test]
    fn prop_raw_conditions_compile_or_error(
        field in arb_field_name(),
        raw in arb_raw_condition(),
    ) {
        let value = serde_json::to_value(&raw).unwrap();
        let mut map = serde_json::Map::new();
        map.insert(field.clone(), value);

        match FilterSpec::from_json(&serde_json::Value::Object(map)) {
            Ok(spec) => {
                let emitted = spec.compile();
                if raw == RawCondition::default() {
                    prop_assert!(emitted.is_empty());
                }
                for (name, _) in emitted.iter() {
                    prop_assert!(name.starts_with(&field));
                }
            }
            Err(err) => prop_assert!(err.to_string().contains(&field)),
        }
    }
}
