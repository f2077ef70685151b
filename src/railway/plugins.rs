//! Railway Plugins (managed databases)

use super::client::{run, GraphQlClient, Operation};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRef {
    pub id: String,
}

/// `name` is the plugin type, `friendlyName` the user-facing name
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plugin {
    pub id: String,
    pub name: String,
    pub friendly_name: String,
    pub project: ProjectRef,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginCreateInput {
    pub friendly_name: String,
    pub name: String,
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginUpdateInput {
    pub friendly_name: String,
}

pub const CREATE_PLUGIN: Operation = Operation {
    name: "createPlugin",
    document: r#"mutation createPlugin($input: PluginCreateInput!) {
  pluginCreate(input: $input) { id name friendlyName project { id } }
}"#,
};

pub const GET_PLUGIN: Operation = Operation {
    name: "getPlugin",
    document: r#"query getPlugin($id: String!) {
  plugin(id: $id) { id name friendlyName project { id } }
}"#,
};

pub const UPDATE_PLUGIN: Operation = Operation {
    name: "updatePlugin",
    document: r#"mutation updatePlugin($id: String!, $input: PluginUpdateInput!) {
  pluginUpdate(id: $id, input: $input) { id name friendlyName project { id } }
}"#,
};

pub const DELETE_PLUGIN: Operation = Operation {
    name: "deletePlugin",
    document: r#"mutation deletePlugin($id: String!) {
  pluginDelete(id: $id)
}"#,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PluginCreateData {
    plugin_create: Plugin,
}

#[derive(Deserialize)]
struct PluginData {
    plugin: Plugin,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PluginUpdateData {
    plugin_update: Plugin,
}

pub async fn create_plugin(client: &dyn GraphQlClient, input: &PluginCreateInput) -> Result<Plugin> {
    let data: PluginCreateData = run(client, &CREATE_PLUGIN, &json!({ "input": input })).await?;
    Ok(data.plugin_create)
}

pub async fn get_plugin(client: &dyn GraphQlClient, id: &str) -> Result<Plugin> {
    let data: PluginData = run(client, &GET_PLUGIN, &json!({ "id": id })).await?;
    Ok(data.plugin)
}

pub async fn update_plugin(
    client: &dyn GraphQlClient,
    id: &str,
    input: &PluginUpdateInput,
) -> Result<Plugin> {
    let data: PluginUpdateData =
        run(client, &UPDATE_PLUGIN, &json!({ "id": id, "input": input })).await?;
    Ok(data.plugin_update)
}

pub async fn delete_plugin(client: &dyn GraphQlClient, id: &str) -> Result<()> {
    let _: Value = run(client, &DELETE_PLUGIN, &json!({ "id": id })).await?;
    Ok(())
}
