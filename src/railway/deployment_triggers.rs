//! Railway Deployment triggers
//!
//! A trigger links a repository branch to a service instance. The service read path
//! also uses the first trigger to resolve the branch a repo source deploys from.

use super::client::{run, GraphQlClient, Operation};
use super::Connection;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTrigger {
    pub id: String,
    pub repository: String,
    pub branch: String,
    pub check_suites: bool,
    pub environment_id: String,
    pub service_id: String,
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTriggerCreateInput {
    pub provider: String,
    pub repository: String,
    pub branch: String,
    pub check_suites: bool,
    pub environment_id: String,
    pub service_id: String,
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTriggerUpdateInput {
    pub repository: String,
    pub branch: String,
    pub check_suites: bool,
}

pub const CREATE_DEPLOYMENT_TRIGGER: Operation = Operation {
    name: "createDeploymentTrigger",
    document: r#"mutation createDeploymentTrigger($input: DeploymentTriggerCreateInput!) {
  deploymentTriggerCreate(input: $input) { id repository branch checkSuites environmentId serviceId projectId }
}"#,
};

pub const LIST_DEPLOYMENT_TRIGGERS: Operation = Operation {
    name: "listDeploymentTriggers",
    document: r#"query listDeploymentTriggers($projectId: String!, $environmentId: String!, $serviceId: String!) {
  deploymentTriggers(projectId: $projectId, environmentId: $environmentId, serviceId: $serviceId) {
    edges { node { id repository branch checkSuites environmentId serviceId projectId } }
  }
}"#,
};

pub const UPDATE_DEPLOYMENT_TRIGGER: Operation = Operation {
    name: "updateDeploymentTrigger",
    document: r#"mutation updateDeploymentTrigger($id: String!, $input: DeploymentTriggerUpdateInput!) {
  deploymentTriggerUpdate(id: $id, input: $input) { id repository branch checkSuites environmentId serviceId projectId }
}"#,
};

pub const DELETE_DEPLOYMENT_TRIGGER: Operation = Operation {
    name: "deleteDeploymentTrigger",
    document: r#"mutation deleteDeploymentTrigger($id: String!) {
  deploymentTriggerDelete(id: $id)
}"#,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TriggerCreateData {
    deployment_trigger_create: DeploymentTrigger,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TriggerUpdateData {
    deployment_trigger_update: DeploymentTrigger,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TriggersData {
    deployment_triggers: Connection<DeploymentTrigger>,
}

pub async fn create_deployment_trigger(
    client: &dyn GraphQlClient,
    input: &DeploymentTriggerCreateInput,
) -> Result<DeploymentTrigger> {
    let data: TriggerCreateData =
        run(client, &CREATE_DEPLOYMENT_TRIGGER, &json!({ "input": input })).await?;
    Ok(data.deployment_trigger_create)
}

pub async fn list_deployment_triggers(
    client: &dyn GraphQlClient,
    project_id: &str,
    environment_id: &str,
    service_id: &str,
) -> Result<Vec<DeploymentTrigger>> {
    let data: TriggersData = run(
        client,
        &LIST_DEPLOYMENT_TRIGGERS,
        &json!({
            "projectId": project_id,
            "environmentId": environment_id,
            "serviceId": service_id,
        }),
    )
    .await?;
    Ok(data.deployment_triggers.into_nodes())
}

pub async fn update_deployment_trigger(
    client: &dyn GraphQlClient,
    id: &str,
    input: &DeploymentTriggerUpdateInput,
) -> Result<DeploymentTrigger> {
    let data: TriggerUpdateData = run(
        client,
        &UPDATE_DEPLOYMENT_TRIGGER,
        &json!({ "id": id, "input": input }),
    )
    .await?;
    Ok(data.deployment_trigger_update)
}

pub async fn delete_deployment_trigger(client: &dyn GraphQlClient, id: &str) -> Result<()> {
    let _: Value = run(client, &DELETE_DEPLOYMENT_TRIGGER, &json!({ "id": id })).await?;
    Ok(())
}
