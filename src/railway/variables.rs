//! Railway Variables
//!
//! Variables are scoped to (project, environment) and optionally a service or plugin.
//! The list query returns a flat JSON object of name to value.

use super::client::{run, GraphQlClient, Operation};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableUpsertInput {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    pub environment_id: String,
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeleteInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    pub environment_id: String,
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCollectionUpsertInput {
    pub service_id: Option<String>,
    pub environment_id: String,
    pub project_id: String,
    pub variables: BTreeMap<String, String>,
}

pub const GET_VARIABLES: Operation = Operation {
    name: "getVariables",
    document: r#"query getVariables($projectId: String!, $environmentId: String!, $serviceId: String) {
  variables(projectId: $projectId, environmentId: $environmentId, serviceId: $serviceId, unrendered: true)
}"#,
};

pub const GET_PLUGIN_VARIABLES: Operation = Operation {
    name: "getPluginVariables",
    document: r#"query getPluginVariables($projectId: String!, $environmentId: String!, $pluginId: String!) {
  variables(projectId: $projectId, environmentId: $environmentId, pluginId: $pluginId)
}"#,
};

pub const UPSERT_VARIABLE: Operation = Operation {
    name: "upsertVariable",
    document: r#"mutation upsertVariable($input: VariableUpsertInput!) {
  variableUpsert(input: $input)
}"#,
};

pub const DELETE_VARIABLE: Operation = Operation {
    name: "deleteVariable",
    document: r#"mutation deleteVariable($input: VariableDeleteInput!) {
  variableDelete(input: $input)
}"#,
};

pub const UPSERT_VARIABLE_COLLECTION: Operation = Operation {
    name: "upsertVariableCollection",
    document: r#"mutation upsertVariableCollection($input: VariableCollectionUpsertInput!) {
  variableCollectionUpsert(input: $input)
}"#,
};

#[derive(Deserialize)]
struct VariablesData {
    #[serde(default)]
    variables: Map<String, Value>,
}

/// Render a variable value the way it is stored in state
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Variables of a project environment, optionally narrowed to a service
pub async fn get_variables(
    client: &dyn GraphQlClient,
    project_id: &str,
    environment_id: &str,
    service_id: Option<&str>,
) -> Result<Map<String, Value>> {
    let data: VariablesData = run(
        client,
        &GET_VARIABLES,
        &json!({
            "projectId": project_id,
            "environmentId": environment_id,
            "serviceId": service_id,
        }),
    )
    .await?;
    Ok(data.variables)
}

pub async fn get_plugin_variables(
    client: &dyn GraphQlClient,
    project_id: &str,
    environment_id: &str,
    plugin_id: &str,
) -> Result<Map<String, Value>> {
    let data: VariablesData = run(
        client,
        &GET_PLUGIN_VARIABLES,
        &json!({
            "projectId": project_id,
            "environmentId": environment_id,
            "pluginId": plugin_id,
        }),
    )
    .await?;
    Ok(data.variables)
}

pub async fn upsert_variable(client: &dyn GraphQlClient, input: &VariableUpsertInput) -> Result<()> {
    let _: Value = run(client, &UPSERT_VARIABLE, &json!({ "input": input })).await?;
    Ok(())
}

pub async fn delete_variable(client: &dyn GraphQlClient, input: &VariableDeleteInput) -> Result<()> {
    let _: Value = run(client, &DELETE_VARIABLE, &json!({ "input": input })).await?;
    Ok(())
}

pub async fn upsert_variable_collection(
    client: &dyn GraphQlClient,
    input: &VariableCollectionUpsertInput,
) -> Result<()> {
    let _: Value = run(client, &UPSERT_VARIABLE_COLLECTION, &json!({ "input": input })).await?;
    Ok(())
}
