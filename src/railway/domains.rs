//! Railway custom domains and service domains

use super::client::{run, GraphQlClient, Operation};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    pub hostlabel: String,
    pub zone: String,
    pub required_value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDomainStatus {
    #[serde(default)]
    pub dns_records: Vec<DnsRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDomain {
    pub id: String,
    pub domain: String,
    pub environment_id: String,
    pub service_id: String,
    #[serde(default)]
    pub target_port: Option<i64>,
    #[serde(default)]
    pub status: CustomDomainStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDomainCreateInput {
    pub domain: String,
    pub service_id: String,
    pub environment_id: String,
    pub project_id: String,
    pub target_port: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDomain {
    pub id: String,
    pub domain: String,
    pub suffix: String,
    pub environment_id: String,
    pub service_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDomainCreateInput {
    pub service_id: String,
    pub environment_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDomainUpdateInput {
    pub domain: String,
    pub service_id: String,
    pub environment_id: String,
}

pub const CREATE_CUSTOM_DOMAIN: Operation = Operation {
    name: "createCustomDomain",
    document: r#"mutation createCustomDomain($input: CustomDomainCreateInput!) {
  customDomainCreate(input: $input) {
    id domain environmentId serviceId targetPort
    status { dnsRecords { hostlabel zone requiredValue } }
  }
}"#,
};

pub const GET_CUSTOM_DOMAIN: Operation = Operation {
    name: "getCustomDomain",
    document: r#"query getCustomDomain($id: String!, $projectId: String!) {
  customDomain(id: $id, projectId: $projectId) {
    id domain environmentId serviceId targetPort
    status { dnsRecords { hostlabel zone requiredValue } }
  }
}"#,
};

pub const DELETE_CUSTOM_DOMAIN: Operation = Operation {
    name: "deleteCustomDomain",
    document: r#"mutation deleteCustomDomain($id: String!) {
  customDomainDelete(id: $id)
}"#,
};

pub const CREATE_SERVICE_DOMAIN: Operation = Operation {
    name: "createServiceDomain",
    document: r#"mutation createServiceDomain($input: ServiceDomainCreateInput!) {
  serviceDomainCreate(input: $input) { id domain suffix environmentId serviceId }
}"#,
};

pub const UPDATE_SERVICE_DOMAIN: Operation = Operation {
    name: "updateServiceDomain",
    document: r#"mutation updateServiceDomain($input: ServiceDomainUpdateInput!) {
  serviceDomainUpdate(input: $input)
}"#,
};

pub const LIST_SERVICE_DOMAINS: Operation = Operation {
    name: "listServiceDomains",
    document: r#"query listServiceDomains($environmentId: String!, $serviceId: String!, $projectId: String!) {
  domains(environmentId: $environmentId, serviceId: $serviceId, projectId: $projectId) {
    serviceDomains { id domain suffix environmentId serviceId }
  }
}"#,
};

pub const DELETE_SERVICE_DOMAIN: Operation = Operation {
    name: "deleteServiceDomain",
    document: r#"mutation deleteServiceDomain($id: String!) {
  serviceDomainDelete(id: $id)
}"#,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomDomainCreateData {
    custom_domain_create: CustomDomain,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomDomainData {
    custom_domain: CustomDomain,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceDomainCreateData {
    service_domain_create: ServiceDomain,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceDomainUpdateData {
    service_domain_update: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DomainsNode {
    #[serde(default)]
    service_domains: Vec<ServiceDomain>,
}

#[derive(Deserialize)]
struct DomainsData {
    domains: DomainsNode,
}

pub async fn create_custom_domain(
    client: &dyn GraphQlClient,
    input: &CustomDomainCreateInput,
) -> Result<CustomDomain> {
    let data: CustomDomainCreateData =
        run(client, &CREATE_CUSTOM_DOMAIN, &json!({ "input": input })).await?;
    Ok(data.custom_domain_create)
}

pub async fn get_custom_domain(
    client: &dyn GraphQlClient,
    id: &str,
    project_id: &str,
) -> Result<CustomDomain> {
    let data: CustomDomainData = run(
        client,
        &GET_CUSTOM_DOMAIN,
        &json!({ "id": id, "projectId": project_id }),
    )
    .await?;
    Ok(data.custom_domain)
}

pub async fn delete_custom_domain(client: &dyn GraphQlClient, id: &str) -> Result<()> {
    let _: Value = run(client, &DELETE_CUSTOM_DOMAIN, &json!({ "id": id })).await?;
    Ok(())
}

pub async fn create_service_domain(
    client: &dyn GraphQlClient,
    input: &ServiceDomainCreateInput,
) -> Result<ServiceDomain> {
    let data: ServiceDomainCreateData =
        run(client, &CREATE_SERVICE_DOMAIN, &json!({ "input": input })).await?;
    Ok(data.service_domain_create)
}

/// Rename a service domain; the API answers with a plain boolean
pub async fn update_service_domain(
    client: &dyn GraphQlClient,
    input: &ServiceDomainUpdateInput,
) -> Result<bool> {
    let data: ServiceDomainUpdateData =
        run(client, &UPDATE_SERVICE_DOMAIN, &json!({ "input": input })).await?;
    Ok(data.service_domain_update)
}

pub async fn list_service_domains(
    client: &dyn GraphQlClient,
    environment_id: &str,
    service_id: &str,
    project_id: &str,
) -> Result<Vec<ServiceDomain>> {
    let data: DomainsData = run(
        client,
        &LIST_SERVICE_DOMAINS,
        &json!({
            "environmentId": environment_id,
            "serviceId": service_id,
            "projectId": project_id,
        }),
    )
    .await?;
    Ok(data.domains.service_domains)
}

pub async fn delete_service_domain(client: &dyn GraphQlClient, id: &str) -> Result<()> {
    let _: Value = run(client, &DELETE_SERVICE_DOMAIN, &json!({ "id": id })).await?;
    Ok(())
}
