//! Railway Environments

use super::client::{run, GraphQlClient, Operation};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Environment as listed under a project
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSummary {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: String,
    pub name: String,
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentCreateInput {
    pub name: String,
    pub project_id: String,
}

pub const GET_ENVIRONMENT: Operation = Operation {
    name: "getEnvironment",
    document: r#"query getEnvironment($id: String!) {
  environment(id: $id) { id name projectId }
}"#,
};

pub const CREATE_ENVIRONMENT: Operation = Operation {
    name: "createEnvironment",
    document: r#"mutation createEnvironment($input: EnvironmentCreateInput!) {
  environmentCreate(input: $input) { id name projectId }
}"#,
};

pub const DELETE_ENVIRONMENT: Operation = Operation {
    name: "deleteEnvironment",
    document: r#"mutation deleteEnvironment($id: String!) {
  environmentDelete(id: $id)
}"#,
};

#[derive(Deserialize)]
struct EnvironmentData {
    environment: Environment,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvironmentCreateData {
    environment_create: Environment,
}

pub async fn get_environment(client: &dyn GraphQlClient, id: &str) -> Result<Environment> {
    let data: EnvironmentData = run(client, &GET_ENVIRONMENT, &json!({ "id": id })).await?;
    Ok(data.environment)
}

pub async fn create_environment(
    client: &dyn GraphQlClient,
    input: &EnvironmentCreateInput,
) -> Result<Environment> {
    let data: EnvironmentCreateData =
        run(client, &CREATE_ENVIRONMENT, &json!({ "input": input })).await?;
    Ok(data.environment_create)
}

pub async fn delete_environment(client: &dyn GraphQlClient, id: &str) -> Result<()> {
    let _: serde_json::Value = run(client, &DELETE_ENVIRONMENT, &json!({ "id": id })).await?;
    Ok(())
}
