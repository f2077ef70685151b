//! Property-based tests using proptest
//!
//! These tests verify the reconciliation helpers (default environment selection,
//! field-presence diff, region extraction) and the variable collection update built
//! on them, using randomized inputs.

mod common;

use chrono::{TimeZone, Utc};
use common::{MockClient, ENVIRONMENT_ID, PROJECT_ID, SERVICE_ID};
use proptest::prelude::*;
use railway_provider::provider::ConfiguredProvider;
use railway_provider::railway::environments::EnvironmentSummary;
use railway_provider::reconcile::{default_environment, diff_fields, extract_regions};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Generate an environment list with colliding timestamps
fn arb_environments() -> impl Strategy<Value = Vec<EnvironmentSummary>> {
    prop::collection::vec(("[a-z]{1,12}", 0i64..50), 1..20).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (name, ts))| EnvironmentSummary {
                id: format!("env-{}", i),
                name,
                created_at: Utc.timestamp_opt(1_700_000_000 + ts, 0).unwrap(),
            })
            .collect()
    })
}

/// Generate a variable mapping
fn arb_vars() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[A-Z][A-Z0-9_]{0,8}", "[a-z0-9]{0,6}", 0..16)
}

mod default_environment_tests {
    use super::*;

    proptest! {
        #[test]
        fn picks_an_oldest_environment(envs in arb_environments()) {
            let chosen = default_environment(&envs).unwrap();
            let oldest = envs.iter().map(|e| e.created_at).min().unwrap();
            prop_assert_eq!(chosen.created_at, oldest);
        }

        #[test]
        fn ties_keep_listing_order(envs in arb_environments()) {
            let chosen = default_environment(&envs).unwrap();
            let first_oldest = envs
                .iter()
                .find(|e| e.created_at == chosen.created_at)
                .unwrap();
            prop_assert_eq!(&chosen.id, &first_oldest.id);
        }

        #[test]
        fn deterministic_over_repeated_calls(envs in arb_environments()) {
            let a = default_environment(&envs).unwrap().id.clone();
            let b = default_environment(&envs).unwrap().id.clone();
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn empty_list_is_not_found() {
        assert!(default_environment(&[]).is_err());
    }
}

mod diff_tests {
    use super::*;

    proptest! {
        #[test]
        fn diff_against_itself_is_empty(vars in arb_vars()) {
            let diff = diff_fields(&vars, &vars);
            prop_assert!(diff.is_empty());
        }

        #[test]
        fn diff_is_complete(desired in arb_vars(), previous in arb_vars()) {
            let diff = diff_fields(&desired, &previous);

            // Every desired key is either upserted or unchanged
            for (key, value) in &desired {
                match diff.to_upsert.get(key) {
                    Some(v) => prop_assert_eq!(v, value),
                    None => prop_assert_eq!(previous.get(key), Some(value)),
                }
            }

            let expected_deletes: BTreeSet<String> = previous
                .keys()
                .filter(|k| !desired.contains_key(*k))
                .cloned()
                .collect();
            prop_assert_eq!(&diff.to_delete, &expected_deletes);
        }

        #[test]
        fn upserts_and_deletes_are_disjoint(desired in arb_vars(), previous in arb_vars()) {
            let diff = diff_fields(&desired, &previous);
            for key in &diff.to_delete {
                prop_assert!(!diff.to_upsert.contains_key(key));
            }
        }
    }
}

mod region_tests {
    use super::*;

    fn meta_for(regions: &BTreeMap<String, u8>) -> Value {
        let config: Map<String, Value> = regions
            .iter()
            .map(|(region, n)| (region.clone(), json!({ "numReplicas": *n as f64 })))
            .collect();

        json!({ "serviceManifest": { "deploy": { "multiRegionConfig": config } } })
    }

    proptest! {
        #[test]
        fn extraction_is_sorted_and_complete(
            regions in prop::collection::btree_map("[a-z]{2,8}-[a-z]{2,6}[0-9]", 1u8..10, 0..8)
        ) {
            let extracted = extract_regions(&meta_for(&regions)).unwrap();

            let names: Vec<&String> = extracted.iter().map(|(r, _)| r).collect();
            let mut sorted = names.clone();
            sorted.sort();
            prop_assert_eq!(&names, &sorted);

            prop_assert_eq!(extracted.len(), regions.len());
            for (region, replicas) in &extracted {
                prop_assert_eq!(*replicas, regions[region] as i64);
            }
        }

        #[test]
        fn missing_levels_are_malformed(key in "[a-zA-Z]{1,12}") {
            prop_assume!(key != "serviceManifest");
            let meta = json!({ key: {} });
            prop_assert!(extract_regions(&meta).is_err());
        }
    }
}

mod variable_collection_tests {
    use super::*;

    fn record(vars: &BTreeMap<String, String>) -> Value {
        json!({
            "variables": vars,
            "environment_id": ENVIRONMENT_ID,
            "service_id": SERVICE_ID
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn update_sends_exactly_the_diff(previous in arb_vars(), desired in arb_vars()) {
            prop_assume!(!desired.is_empty());

            let mock = MockClient::new();
            mock.respond("getService", json!({
                    "service": { "id": SERVICE_ID, "name": "todo-app", "projectId": PROJECT_ID }
                }))
                .respond("upsertVariableCollection", json!({ "variableCollectionUpsert": true }))
                .respond("deleteVariable", json!({ "variableDelete": true }))
                .respond("getVariables", json!({ "variables": desired }))
                .respond("redeployServiceInstance", json!({ "serviceInstanceRedeploy": true }));

            let provider = ConfiguredProvider::with_client(mock.clone());
            let collection = provider.resource("railway_variable_collection").unwrap();

            let updated = tokio_test::block_on(collection.update_record(record(&desired), record(&previous)))
                .unwrap();

            let diff = diff_fields(&desired, &previous);

            let upserts = mock.calls_to("upsertVariableCollection");
            if diff.to_upsert.is_empty() {
                prop_assert!(upserts.is_empty());
            } else {
                prop_assert_eq!(upserts.len(), 1);
                prop_assert_eq!(&upserts[0]["input"]["variables"], &json!(diff.to_upsert));
            }

            let deleted: BTreeSet<String> = mock
                .calls_to("deleteVariable")
                .iter()
                .map(|v| v["input"]["name"].as_str().unwrap().to_string())
                .collect();
            let expected: BTreeSet<String> = diff.to_delete.iter().cloned().collect();
            prop_assert_eq!(deleted, expected);

            prop_assert_eq!(mock.count("redeployServiceInstance"), 1);
            prop_assert_eq!(&updated["variables"], &json!(desired));
        }
    }
}
