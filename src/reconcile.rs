//! Reconciliation helpers
//!
//! Small, pure building blocks used by the composite resources:
//! default environment selection, the field-presence diff and the
//! region/replica extraction from deployment metadata.

use crate::error::{ProviderError, ProviderResult};
use crate::railway::environments::EnvironmentSummary;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Pick the default environment of a project: the oldest one.
///
/// Ties on `created_at` keep the order the API listed them in.
pub fn default_environment(environments: &[EnvironmentSummary]) -> ProviderResult<&EnvironmentSummary> {
    let mut sorted: Vec<&EnvironmentSummary> = environments.iter().collect();
    sorted.sort_by_key(|env| env.created_at);

    sorted
        .first()
        .copied()
        .ok_or_else(|| ProviderError::NotFound("default environment".to_string()))
}

/// Result of comparing a desired mapping against the previous one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiff<K, V> {
    /// Keys that are new or whose value changed, with their desired value
    pub to_upsert: BTreeMap<K, V>,
    /// Keys present before and absent now
    pub to_delete: BTreeSet<K>,
}

impl<K, V> Default for FieldDiff<K, V> {
    fn default() -> Self {
        Self {
            to_upsert: BTreeMap::new(),
            to_delete: BTreeSet::new(),
        }
    }
}

impl<K, V> FieldDiff<K, V> {
    pub fn is_empty(&self) -> bool {
        self.to_upsert.is_empty() && self.to_delete.is_empty()
    }
}

/// Compute the field-presence diff of `desired` against `previous`.
///
/// Keys present in both with equal values appear in neither set.
pub fn diff_fields<K, V>(desired: &BTreeMap<K, V>, previous: &BTreeMap<K, V>) -> FieldDiff<K, V>
where
    K: Ord + Clone,
    V: PartialEq + Clone,
{
    let to_upsert = desired
        .iter()
        .filter(|(key, value)| previous.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let to_delete = previous
        .keys()
        .filter(|key| !desired.contains_key(*key))
        .cloned()
        .collect();

    FieldDiff { to_upsert, to_delete }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentMeta {
    service_manifest: ServiceManifest,
}

#[derive(Deserialize)]
struct ServiceManifest {
    deploy: DeployManifest,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeployManifest {
    multi_region_config: BTreeMap<String, ReplicaConfig>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplicaConfig {
    num_replicas: f64,
}

/// Whether a deployment carries metadata worth decoding
pub fn has_metadata(meta: Option<&Value>) -> bool {
    match meta {
        None | Some(Value::Null) => false,
        Some(Value::Object(map)) => !map.is_empty(),
        Some(_) => true,
    }
}

/// Decode `serviceManifest.deploy.multiRegionConfig` into `(region, replicas)` pairs
/// sorted by region name.
pub fn extract_regions(meta: &Value) -> ProviderResult<Vec<(String, i64)>> {
    let decoded = DeploymentMeta::deserialize(meta)
        .map_err(|e| ProviderError::MalformedMetadata(e.to_string()))?;

    Ok(decoded
        .service_manifest
        .deploy
        .multi_region_config
        .into_iter()
        .map(|(region, config)| (region, config.num_replicas as i64))
        .collect())
}
