//! Railway Projects
//!
//! Operations for creating, reading, updating and deleting projects.

use super::client::{run, GraphQlClient, Operation};
use super::environments::EnvironmentSummary;
use super::Connection;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Project information
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_public: bool,
    pub pr_deploys: bool,
    #[serde(default)]
    pub team: Option<TeamRef>,
    #[serde(default)]
    pub environments: Connection<EnvironmentSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreateInput {
    pub name: String,
    pub description: String,
    pub is_public: bool,
    pub pr_deploys: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub default_environment_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdateInput {
    pub name: String,
    pub description: String,
    pub is_public: bool,
    pub pr_deploys: bool,
}

pub const GET_PROJECT: Operation = Operation {
    name: "getProject",
    document: r#"query getProject($id: String!) {
  project(id: $id) {
    id name description isPublic prDeploys
    team { id }
    environments { edges { node { id name createdAt } } }
  }
}"#,
};

pub const CREATE_PROJECT: Operation = Operation {
    name: "createProject",
    document: r#"mutation createProject($input: ProjectCreateInput!) {
  projectCreate(input: $input) {
    id name description isPublic prDeploys
    team { id }
    environments { edges { node { id name createdAt } } }
  }
}"#,
};

pub const UPDATE_PROJECT: Operation = Operation {
    name: "updateProject",
    document: r#"mutation updateProject($id: String!, $input: ProjectUpdateInput!) {
  projectUpdate(id: $id, input: $input) {
    id name description isPublic prDeploys
    team { id }
    environments { edges { node { id name createdAt } } }
  }
}"#,
};

pub const DELETE_PROJECT: Operation = Operation {
    name: "deleteProject",
    document: r#"mutation deleteProject($id: String!) {
  projectDelete(id: $id)
}"#,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectData {
    project: Project,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectCreateData {
    project_create: Project,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectUpdateData {
    project_update: Project,
}

/// Fetch a project together with its environments
pub async fn get_project(client: &dyn GraphQlClient, id: &str) -> Result<Project> {
    let data: ProjectData = run(client, &GET_PROJECT, &json!({ "id": id })).await?;
    Ok(data.project)
}

pub async fn create_project(client: &dyn GraphQlClient, input: &ProjectCreateInput) -> Result<Project> {
    let data: ProjectCreateData = run(client, &CREATE_PROJECT, &json!({ "input": input })).await?;
    Ok(data.project_create)
}

pub async fn update_project(
    client: &dyn GraphQlClient,
    id: &str,
    input: &ProjectUpdateInput,
) -> Result<Project> {
    let data: ProjectUpdateData =
        run(client, &UPDATE_PROJECT, &json!({ "id": id, "input": input })).await?;
    Ok(data.project_update)
}

pub async fn delete_project(client: &dyn GraphQlClient, id: &str) -> Result<()> {
    let _: serde_json::Value = run(client, &DELETE_PROJECT, &json!({ "id": id })).await?;
    Ok(())
}
