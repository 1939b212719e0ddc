//! Property-based tests for flylab-data
//!
//! - Normalization invariants
//! - Series numbering invariants
//! - Run with ProptestConfig::with_cases(100), except the file-backed
//!   properties which use fewer cases

use flylab_data::counter::{ScanMode, SeriesCounter};
use flylab_data::params::{normalize, AttrValue, ParamMap, ParamValue};
use flylab_data::session::ExperimentSession;
use flylab_data::Error;
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// Strategies
// ============================================================================

/// Caller values as they arrive from protocol code: scalars, flat arrays,
/// nested mappings, nulls.
fn arb_param_value() -> impl Strategy<Value = ParamValue> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e9f64..1.0e9).prop_map(Value::from),
        "[a-zA-Z0-9 _]{0,12}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            proptest::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn arb_fly_ids() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("fly[0-9]{1,2}", 1..8)
}

fn fly(id: &str) -> ParamMap {
    let mut map = ParamMap::new();
    map.insert("fly_id".to_string(), json!(id));
    map
}

// ============================================================================
// Normalization
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: normalizing an already normalized value changes nothing
    #[test]
    fn prop_normalize_idempotent(value in arb_param_value()) {
        let once = normalize(&value);
        let twice = normalize(&Value::from(once.clone()));
        prop_assert_eq!(once, twice);
    }

    /// Property: integer arrays stay integer arrays, element for element
    #[test]
    fn prop_int_arrays_preserved(items in proptest::collection::vec(any::<i64>(), 1..20)) {
        let value = Value::from(items.clone());
        prop_assert_eq!(normalize(&value), AttrValue::IntArray(items));
    }

    /// Property: strings pass through untouched
    #[test]
    fn prop_strings_pass_through(s in ".*") {
        prop_assert_eq!(normalize(&Value::from(s.clone())), AttrValue::Str(s));
    }

    /// Property: mappings always degrade to a string
    #[test]
    fn prop_mappings_become_strings(value in arb_param_value()) {
        if value.is_object() {
            prop_assert!(matches!(normalize(&value), AttrValue::Str(_)));
        }
    }
}

#[test]
fn test_normalize_null() {
    assert_eq!(normalize(&Value::Null), AttrValue::Str("None".to_string()));
}

// ============================================================================
// Series numbering
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: the single counter hands out consecutive ids
    #[test]
    fn prop_single_counter_monotonic(start in 1u32..500, steps in 1usize..50) {
        let mut counter = SeriesCounter::single();
        counter.set(start);
        let mut previous = counter.next_id();
        for _ in 0..steps {
            counter.advance();
            prop_assert_eq!(counter.next_id(), previous + 1);
            previous = counter.next_id();
        }
    }

    /// Property: the dual counter's node ordinal counts every series while
    /// each mode counts only its own
    #[test]
    fn prop_dual_counter_partitions(modes in proptest::collection::vec(any::<bool>(), 0..40)) {
        let mut counter = SeriesCounter::dual();
        let mut poi = 0u32;
        let mut xyt = 0u32;
        for &flag in &modes {
            let mode = ScanMode::from_flag(flag);
            counter.set_scan_mode(mode).unwrap();
            counter.advance();
            match mode {
                ScanMode::Poi => poi += 1,
                ScanMode::Xyt => xyt += 1,
            }
        }
        let total = u32::try_from(modes.len()).unwrap();
        prop_assert_eq!(counter.node_ordinal(), total + 1);
        counter.set_scan_mode(ScanMode::Poi).unwrap();
        prop_assert_eq!(counter.next_id(), poi + 1);
        counter.set_scan_mode(ScanMode::Xyt).unwrap();
        prop_assert_eq!(counter.next_id(), xyt + 1);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Property: the fly count equals the number of distinct ids offered;
    /// duplicates are rejected without side effects
    #[test]
    fn prop_duplicate_flies_rejected(ids in arb_fly_ids()) {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ExperimentSession::new(SeriesCounter::single());
        session.initialize_experiment_file(dir.path().join("exp.json")).unwrap();

        let mut seen = std::collections::BTreeSet::new();
        for id in &ids {
            let result = session.create_fly(&fly(id));
            if seen.insert(id.clone()) {
                prop_assert!(result.is_ok());
            } else {
                let is_duplicate = matches!(result, Err(Error::AlreadyExists { .. }));
                prop_assert!(is_duplicate);
            }
        }
        prop_assert_eq!(session.list_flies().unwrap().len(), seen.len());
    }

    /// Property: series ordinals within a fly are strictly increasing by one,
    /// however the session hops between flies
    #[test]
    fn prop_series_ordinals_per_fly(choices in proptest::collection::vec(0usize..3, 1..15)) {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ExperimentSession::new(SeriesCounter::single());
        session.initialize_experiment_file(dir.path().join("exp.json")).unwrap();
        let flies = ["fly1", "fly2", "fly3"];
        for id in flies {
            session.create_fly(&fly(id)).unwrap();
        }

        let mut expected = [0u32; 3];
        for &choice in &choices {
            session.select_fly(flies[choice]);
            let ordinal = session.create_series(&ParamMap::new(), &ParamMap::new()).unwrap();
            expected[choice] += 1;
            prop_assert_eq!(ordinal, expected[choice]);
        }
        prop_assert_eq!(
            session.highest_series_ordinal().unwrap(),
            expected.iter().copied().max().unwrap_or(0)
        );
    }
}
