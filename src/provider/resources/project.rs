//! `railway_project`

use crate::error::{ProviderError, ProviderResult};
use crate::provider::lookup::default_environment_for_project;
use crate::provider::resource::Resource;
use crate::provider::schema::{Attribute, Schema, Validator};
use crate::railway::client::GraphQlClient;
use crate::railway::environments::EnvironmentSummary;
use crate::railway::projects::{self, Project, ProjectCreateInput, ProjectUpdateInput};
use crate::reconcile::default_environment;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub const DEFAULT_ENVIRONMENT_NAME: &str = "production";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultEnvironmentModel {
    pub id: String,
    pub name: String,
}

impl Default for DefaultEnvironmentModel {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: DEFAULT_ENVIRONMENT_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectModel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub private: bool,
    pub has_pr_deploys: bool,
    pub team_id: Option<String>,
    pub default_environment: DefaultEnvironmentModel,
}

impl Default for ProjectModel {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            private: true,
            has_pr_deploys: false,
            team_id: None,
            default_environment: DefaultEnvironmentModel::default(),
        }
    }
}

impl ProjectModel {
    fn apply(&mut self, project: Project, environment: &EnvironmentSummary) {
        self.id = project.id;
        self.name = project.name;
        self.description = project.description.unwrap_or_default();
        self.private = !project.is_public;
        self.has_pr_deploys = project.pr_deploys;
        if let Some(team) = project.team {
            self.team_id = Some(team.id);
        }
        self.default_environment = DefaultEnvironmentModel {
            id: environment.id.clone(),
            name: environment.name.clone(),
        };
    }
}

pub struct ProjectResource {
    client: Arc<dyn GraphQlClient>,
}

impl ProjectResource {
    pub fn new(client: Arc<dyn GraphQlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ProjectResource {
    type Model = ProjectModel;

    fn type_name(&self) -> &'static str {
        "project"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Railway project.",
            vec![
                Attribute::id("Identifier of the project."),
                Attribute::string("name")
                    .required()
                    .description("Name of the project.")
                    .validator(Validator::MinLength { min: 1 }),
                Attribute::string("description")
                    .optional()
                    .computed()
                    .default_value(json!(""))
                    .description("Description of the project."),
                Attribute::bool("private")
                    .optional()
                    .computed()
                    .default_value(json!(true))
                    .description("Privacy of the project. **Default** `true`."),
                Attribute::bool("has_pr_deploys")
                    .optional()
                    .computed()
                    .default_value(json!(false))
                    .description("Whether the project has PR deploys enabled. **Default** `false`."),
                Attribute::string("team_id")
                    .optional()
                    .requires_replace()
                    .description("Identifier of the team the project belongs to.")
                    .validator(Validator::Uuid),
                Attribute::object(
                    "default_environment",
                    vec![
                        Attribute::id("Identifier of the default environment."),
                        Attribute::string("name")
                            .optional()
                            .computed()
                            .requires_replace()
                            .default_value(json!(DEFAULT_ENVIRONMENT_NAME))
                            .description("Name of the default environment.")
                            .validator(Validator::MinLength { min: 1 }),
                    ],
                )
                .optional()
                .computed()
                .description("Default environment of the project. When multiple exist, the oldest is considered."),
            ],
        )
    }

    async fn create(&self, mut plan: ProjectModel) -> ProviderResult<ProjectModel> {
        let input = ProjectCreateInput {
            name: plan.name.clone(),
            description: plan.description.clone(),
            is_public: !plan.private,
            pr_deploys: plan.has_pr_deploys,
            team_id: plan.team_id.clone(),
            default_environment_name: plan.default_environment.name.clone(),
        };

        let project = projects::create_project(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client("create project"))?;

        tracing::trace!("created a project");

        let environments: Vec<EnvironmentSummary> = project.environments.nodes().cloned().collect();
        let [environment] = <[EnvironmentSummary; 1]>::try_from(environments).map_err(|envs| {
            ProviderError::Invariant(format!("Expected exactly one environment, got {}", envs.len()))
        })?;

        plan.apply(project, &environment);
        Ok(plan)
    }

    async fn read(&self, mut state: ProjectModel) -> ProviderResult<ProjectModel> {
        let (project, environment) = default_environment_for_project(self.client.as_ref(), &state.id).await?;

        state.apply(project, &environment);
        Ok(state)
    }

    async fn update(&self, mut plan: ProjectModel, state: ProjectModel) -> ProviderResult<ProjectModel> {
        let input = ProjectUpdateInput {
            name: plan.name.clone(),
            description: plan.description.clone(),
            is_public: !plan.private,
            pr_deploys: plan.has_pr_deploys,
        };

        let project = projects::update_project(self.client.as_ref(), &state.id, &input)
            .await
            .map_err(ProviderError::client("update project"))?;

        tracing::trace!("updated a project");

        let environments: Vec<EnvironmentSummary> = project.environments.nodes().cloned().collect();
        let environment = default_environment(&environments)?.clone();

        plan.apply(project, &environment);
        Ok(plan)
    }

    async fn delete(&self, state: ProjectModel) -> ProviderResult<()> {
        projects::delete_project(self.client.as_ref(), &state.id)
            .await
            .map_err(ProviderError::client("delete project"))?;

        tracing::trace!("deleted a project");
        Ok(())
    }
}
