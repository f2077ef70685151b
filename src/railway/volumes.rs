//! Railway Volumes

use super::client::{run, GraphQlClient, Operation};
use super::Connection;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Volume {
    pub id: String,
    pub name: String,
}

/// Volume attachment of a service in one environment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInstance {
    pub service_id: Option<String>,
    pub environment_id: String,
    pub mount_path: String,
    #[serde(rename = "sizeMB")]
    pub size_mb: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectVolume {
    pub id: String,
    pub name: String,
    pub volume_instances: Connection<VolumeInstance>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeCreateInput {
    pub mount_path: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolumeUpdateInput {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInstanceUpdateInput {
    pub mount_path: String,
    pub service_id: String,
}

pub const CREATE_VOLUME: Operation = Operation {
    name: "createVolume",
    document: r#"mutation createVolume($input: VolumeCreateInput!) {
  volumeCreate(input: $input) { id name }
}"#,
};

pub const UPDATE_VOLUME: Operation = Operation {
    name: "updateVolume",
    document: r#"mutation updateVolume($volumeId: String!, $input: VolumeUpdateInput!) {
  volumeUpdate(volumeId: $volumeId, input: $input) { id name }
}"#,
};

pub const DELETE_VOLUME: Operation = Operation {
    name: "deleteVolume",
    document: r#"mutation deleteVolume($volumeId: String!) {
  volumeDelete(volumeId: $volumeId)
}"#,
};

pub const UPDATE_VOLUME_INSTANCE: Operation = Operation {
    name: "updateVolumeInstance",
    document: r#"mutation updateVolumeInstance($volumeId: String!, $input: VolumeInstanceUpdateInput!) {
  volumeInstanceUpdate(volumeId: $volumeId, input: $input)
}"#,
};

pub const GET_VOLUME_INSTANCES: Operation = Operation {
    name: "getVolumeInstances",
    document: r#"query getVolumeInstances($projectId: String!) {
  project(id: $projectId) {
    volumes {
      edges {
        node {
          id name
          volumeInstances { edges { node { serviceId environmentId mountPath sizeMB } } }
        }
      }
    }
  }
}"#,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeCreateData {
    volume_create: Volume,
}

#[derive(Deserialize)]
struct ProjectVolumes {
    volumes: Connection<ProjectVolume>,
}

#[derive(Deserialize)]
struct VolumeInstancesData {
    project: ProjectVolumes,
}

pub async fn create_volume(client: &dyn GraphQlClient, input: &VolumeCreateInput) -> Result<Volume> {
    let data: VolumeCreateData = run(client, &CREATE_VOLUME, &json!({ "input": input })).await?;
    Ok(data.volume_create)
}

pub async fn update_volume(
    client: &dyn GraphQlClient,
    volume_id: &str,
    input: &VolumeUpdateInput,
) -> Result<()> {
    let _: Value = run(
        client,
        &UPDATE_VOLUME,
        &json!({ "volumeId": volume_id, "input": input }),
    )
    .await?;
    Ok(())
}

pub async fn delete_volume(client: &dyn GraphQlClient, volume_id: &str) -> Result<()> {
    let _: Value = run(client, &DELETE_VOLUME, &json!({ "volumeId": volume_id })).await?;
    Ok(())
}

pub async fn update_volume_instance(
    client: &dyn GraphQlClient,
    volume_id: &str,
    input: &VolumeInstanceUpdateInput,
) -> Result<()> {
    let _: Value = run(
        client,
        &UPDATE_VOLUME_INSTANCE,
        &json!({ "volumeId": volume_id, "input": input }),
    )
    .await?;
    Ok(())
}

/// All volumes of a project with their per-environment instances
pub async fn get_volume_instances(client: &dyn GraphQlClient, project_id: &str) -> Result<Vec<ProjectVolume>> {
    let data: VolumeInstancesData =
        run(client, &GET_VOLUME_INSTANCES, &json!({ "projectId": project_id })).await?;
    Ok(data.project.volumes.into_nodes())
}
