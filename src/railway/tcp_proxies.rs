//! Railway TCP proxies

use super::client::{run, GraphQlClient, Operation};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcpProxy {
    pub id: String,
    pub application_port: i64,
    pub proxy_port: i64,
    pub domain: String,
    pub environment_id: String,
    pub service_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TcpProxyCreateInput {
    pub application_port: i64,
    pub service_id: String,
    pub environment_id: String,
}

pub const CREATE_TCP_PROXY: Operation = Operation {
    name: "createTcpProxy",
    document: r#"mutation createTcpProxy($input: TCPProxyCreateInput!) {
  tcpProxyCreate(input: $input) { id applicationPort proxyPort domain environmentId serviceId }
}"#,
};

pub const LIST_TCP_PROXIES: Operation = Operation {
    name: "getTcpProxy",
    document: r#"query getTcpProxy($environmentId: String!, $serviceId: String!) {
  tcpProxies(environmentId: $environmentId, serviceId: $serviceId) {
    id applicationPort proxyPort domain environmentId serviceId
  }
}"#,
};

pub const DELETE_TCP_PROXY: Operation = Operation {
    name: "deleteTcpProxy",
    document: r#"mutation deleteTcpProxy($id: String!) {
  tcpProxyDelete(id: $id)
}"#,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TcpProxyCreateData {
    tcp_proxy_create: TcpProxy,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TcpProxiesData {
    #[serde(default)]
    tcp_proxies: Vec<TcpProxy>,
}

pub async fn create_tcp_proxy(client: &dyn GraphQlClient, input: &TcpProxyCreateInput) -> Result<TcpProxy> {
    let data: TcpProxyCreateData = run(client, &CREATE_TCP_PROXY, &json!({ "input": input })).await?;
    Ok(data.tcp_proxy_create)
}

pub async fn list_tcp_proxies(
    client: &dyn GraphQlClient,
    environment_id: &str,
    service_id: &str,
) -> Result<Vec<TcpProxy>> {
    let data: TcpProxiesData = run(
        client,
        &LIST_TCP_PROXIES,
        &json!({ "environmentId": environment_id, "serviceId": service_id }),
    )
    .await?;
    Ok(data.tcp_proxies)
}

pub async fn delete_tcp_proxy(client: &dyn GraphQlClient, id: &str) -> Result<()> {
    let _: Value = run(client, &DELETE_TCP_PROXY, &json!({ "id": id })).await?;
    Ok(())
}
