//! Identity lookups shared by resources

use crate::error::{ProviderError, ProviderResult};
use crate::railway::client::GraphQlClient;
use crate::railway::environments::EnvironmentSummary;
use crate::railway::projects::{self, Project};
use crate::railway::services;
use crate::reconcile::default_environment;

/// Fetch a project together with its default (oldest) environment
pub async fn default_environment_for_project(
    client: &dyn GraphQlClient,
    project_id: &str,
) -> ProviderResult<(Project, EnvironmentSummary)> {
    let project = projects::get_project(client, project_id)
        .await
        .map_err(ProviderError::client("read project"))?;

    let environments: Vec<EnvironmentSummary> = project.environments.nodes().cloned().collect();
    let environment = default_environment(&environments)?.clone();

    Ok((project, environment))
}

/// Resolve an environment name to its id within a project
pub async fn find_environment_id(
    client: &dyn GraphQlClient,
    project_id: &str,
    environment_name: &str,
) -> ProviderResult<String> {
    let project = projects::get_project(client, project_id)
        .await
        .map_err(ProviderError::client("read environment"))?;

    let id = project
        .environments
        .nodes()
        .find(|env| env.name == environment_name)
        .map(|env| env.id.clone());

    id.ok_or_else(|| ProviderError::NotFound(format!("environment {:?}", environment_name)))
}

/// Project a service belongs to
pub async fn project_of_service(client: &dyn GraphQlClient, service_id: &str) -> ProviderResult<String> {
    let service = services::get_service(client, service_id)
        .await
        .map_err(ProviderError::client("read service"))?;

    Ok(service.project_id)
}

/// Split an import identifier into exactly `N` non-empty parts
pub fn split_import_id<'a, const N: usize>(
    id: &'a str,
    format: &'static str,
) -> ProviderResult<[&'a str; N]> {
    let parts: Vec<&str> = id.split(':').collect();

    if parts.iter().any(|p| p.is_empty()) {
        return Err(ProviderError::ImportId {
            format,
            id: id.to_string(),
        });
    }

    parts.try_into().map_err(|_| ProviderError::ImportId {
        format,
        id: id.to_string(),
    })
}
