//! Railway Services and service instances
//!
//! A service instance is the per-environment facet of a service: its settings, its
//! source connection and its latest deployment.

use super::client::{run, GraphQlClient, Operation};
use super::Connection;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCreateInput {
    pub name: String,
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceUpdateInput {
    pub name: String,
}

/// Source connection: repo+branch or image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceConnectInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionReplicas {
    pub num_replicas: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryCredentialsInput {
    pub username: String,
    pub password: String,
}

/// Settings update for a service instance. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstanceUpdateInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron_schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub railway_config_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_region_config: Option<BTreeMap<String, RegionReplicas>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_credentials: Option<RegistryCredentialsInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstanceSource {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestDeployment {
    #[serde(default)]
    pub meta: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstance {
    #[serde(default)]
    pub cron_schedule: Option<String>,
    #[serde(default)]
    pub root_directory: Option<String>,
    #[serde(default)]
    pub railway_config_file: Option<String>,
    #[serde(default)]
    pub source: Option<InstanceSource>,
    #[serde(default)]
    pub latest_deployment: Option<LatestDeployment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceRef {
    pub environment_id: String,
}

pub const GET_SERVICE: Operation = Operation {
    name: "getService",
    document: r#"query getService($id: String!) {
  service(id: $id) { id name projectId }
}"#,
};

pub const CREATE_SERVICE: Operation = Operation {
    name: "createService",
    document: r#"mutation createService($input: ServiceCreateInput!) {
  serviceCreate(input: $input) { id name projectId }
}"#,
};

pub const UPDATE_SERVICE: Operation = Operation {
    name: "updateService",
    document: r#"mutation updateService($id: String!, $input: ServiceUpdateInput!) {
  serviceUpdate(id: $id, input: $input) { id name projectId }
}"#,
};

pub const DELETE_SERVICE: Operation = Operation {
    name: "deleteService",
    document: r#"mutation deleteService($id: String!) {
  serviceDelete(id: $id)
}"#,
};

pub const CONNECT_SERVICE: Operation = Operation {
    name: "connectService",
    document: r#"mutation connectService($id: String!, $input: ServiceConnectInput!) {
  serviceConnect(id: $id, input: $input) { id }
}"#,
};

pub const DISCONNECT_SERVICE: Operation = Operation {
    name: "disconnectService",
    document: r#"mutation disconnectService($id: String!) {
  serviceDisconnect(id: $id) { id }
}"#,
};

pub const GET_SERVICE_INSTANCES: Operation = Operation {
    name: "getServiceInstances",
    document: r#"query getServiceInstances($id: String!) {
  service(id: $id) { serviceInstances { edges { node { environmentId } } } }
}"#,
};

pub const GET_SERVICE_INSTANCE: Operation = Operation {
    name: "getServiceInstance",
    document: r#"query getServiceInstance($environmentId: String!, $serviceId: String!) {
  serviceInstance(environmentId: $environmentId, serviceId: $serviceId) {
    cronSchedule rootDirectory railwayConfigFile
    source { image repo }
    latestDeployment { meta }
  }
}"#,
};

pub const UPDATE_SERVICE_INSTANCE: Operation = Operation {
    name: "updateServiceInstance",
    document: r#"mutation updateServiceInstance($serviceId: String!, $input: ServiceInstanceUpdateInput!) {
  serviceInstanceUpdate(serviceId: $serviceId, input: $input)
}"#,
};

pub const REDEPLOY_SERVICE_INSTANCE: Operation = Operation {
    name: "redeployServiceInstance",
    document: r#"mutation redeployServiceInstance($environmentId: String!, $serviceId: String!) {
  serviceInstanceRedeploy(environmentId: $environmentId, serviceId: $serviceId)
}"#,
};

#[derive(Deserialize)]
struct ServiceData {
    service: Service,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceCreateData {
    service_create: Service,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceUpdateData {
    service_update: Service,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceInstancesNode {
    service_instances: Connection<InstanceRef>,
}

#[derive(Deserialize)]
struct ServiceInstancesData {
    service: ServiceInstancesNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceInstanceData {
    service_instance: ServiceInstance,
}

pub async fn get_service(client: &dyn GraphQlClient, id: &str) -> Result<Service> {
    let data: ServiceData = run(client, &GET_SERVICE, &json!({ "id": id })).await?;
    Ok(data.service)
}

pub async fn create_service(client: &dyn GraphQlClient, input: &ServiceCreateInput) -> Result<Service> {
    let data: ServiceCreateData = run(client, &CREATE_SERVICE, &json!({ "input": input })).await?;
    Ok(data.service_create)
}

pub async fn update_service(
    client: &dyn GraphQlClient,
    id: &str,
    input: &ServiceUpdateInput,
) -> Result<Service> {
    let data: ServiceUpdateData =
        run(client, &UPDATE_SERVICE, &json!({ "id": id, "input": input })).await?;
    Ok(data.service_update)
}

pub async fn delete_service(client: &dyn GraphQlClient, id: &str) -> Result<()> {
    let _: Value = run(client, &DELETE_SERVICE, &json!({ "id": id })).await?;
    Ok(())
}

pub async fn connect_service(
    client: &dyn GraphQlClient,
    id: &str,
    input: &ServiceConnectInput,
) -> Result<()> {
    let _: Value = run(client, &CONNECT_SERVICE, &json!({ "id": id, "input": input })).await?;
    Ok(())
}

pub async fn disconnect_service(client: &dyn GraphQlClient, id: &str) -> Result<()> {
    let _: Value = run(client, &DISCONNECT_SERVICE, &json!({ "id": id })).await?;
    Ok(())
}

/// Environment ids of every instance of a service
pub async fn get_service_instances(client: &dyn GraphQlClient, service_id: &str) -> Result<Vec<String>> {
    let data: ServiceInstancesData =
        run(client, &GET_SERVICE_INSTANCES, &json!({ "id": service_id })).await?;

    Ok(data
        .service
        .service_instances
        .into_nodes()
        .into_iter()
        .map(|i| i.environment_id)
        .collect())
}

pub async fn get_service_instance(
    client: &dyn GraphQlClient,
    environment_id: &str,
    service_id: &str,
) -> Result<ServiceInstance> {
    let data: ServiceInstanceData = run(
        client,
        &GET_SERVICE_INSTANCE,
        &json!({ "environmentId": environment_id, "serviceId": service_id }),
    )
    .await?;
    Ok(data.service_instance)
}

pub async fn update_service_instance(
    client: &dyn GraphQlClient,
    service_id: &str,
    input: &ServiceInstanceUpdateInput,
) -> Result<()> {
    let _: Value = run(
        client,
        &UPDATE_SERVICE_INSTANCE,
        &json!({ "serviceId": service_id, "input": input }),
    )
    .await?;
    Ok(())
}

pub async fn redeploy_service_instance(
    client: &dyn GraphQlClient,
    environment_id: &str,
    service_id: &str,
) -> Result<()> {
    let _: Value = run(
        client,
        &REDEPLOY_SERVICE_INSTANCE,
        &json!({ "environmentId": environment_id, "serviceId": service_id }),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_update_input_omits_absent_fields() {
        let input = ServiceInstanceUpdateInput {
            cron_schedule: Some("0 0 * * *".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, json!({ "cronSchedule": "0 0 * * *" }));
    }

    #[test]
    fn test_multi_region_config_wire_shape() {
        let mut regions = BTreeMap::new();
        regions.insert("us-west2".to_string(), RegionReplicas { num_replicas: 2 });
        let input = ServiceInstanceUpdateInput {
            multi_region_config: Some(regions),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(
            value,
            json!({ "multiRegionConfig": { "us-west2": { "numReplicas": 2 } } })
        );
    }
}
