//! `railway_deployment_trigger`

use crate::error::{ProviderError, ProviderResult};
use crate::provider::lookup::{find_environment_id, project_of_service, split_import_id};
use crate::provider::resource::Resource;
use crate::provider::schema::{Attribute, Schema, Validator};
use crate::provider::state::State;
use crate::railway::client::GraphQlClient;
use crate::railway::deployment_triggers::{
    self, DeploymentTrigger, DeploymentTriggerCreateInput, DeploymentTriggerUpdateInput,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

const IMPORT_FORMAT: &str = "service_id:environment_name";
const TRIGGER_PROVIDER: &str = "github";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentTriggerModel {
    pub id: String,
    pub repository: String,
    pub branch: String,
    pub check_suites: bool,
    pub environment_id: String,
    pub service_id: String,
    pub project_id: String,
}

impl From<DeploymentTrigger> for DeploymentTriggerModel {
    fn from(trigger: DeploymentTrigger) -> Self {
        Self {
            id: trigger.id,
            repository: trigger.repository,
            branch: trigger.branch,
            check_suites: trigger.check_suites,
            environment_id: trigger.environment_id,
            service_id: trigger.service_id,
            project_id: trigger.project_id,
        }
    }
}

pub struct DeploymentTriggerResource {
    client: Arc<dyn GraphQlClient>,
}

impl DeploymentTriggerResource {
    pub fn new(client: Arc<dyn GraphQlClient>) -> Self {
        Self { client }
    }

    async fn list(
        &self,
        project_id: &str,
        environment_id: &str,
        service_id: &str,
    ) -> ProviderResult<Vec<DeploymentTrigger>> {
        let triggers =
            deployment_triggers::list_deployment_triggers(self.client.as_ref(), project_id, environment_id, service_id)
                .await
                .map_err(ProviderError::client("read deployment triggers"))?;

        if triggers.is_empty() {
            return Err(ProviderError::NotFound("deployment triggers".to_string()));
        }

        Ok(triggers)
    }
}

#[async_trait]
impl Resource for DeploymentTriggerResource {
    type Model = DeploymentTriggerModel;

    fn type_name(&self) -> &'static str {
        "deployment_trigger"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Railway deployment trigger.",
            vec![
                Attribute::id("Identifier of the deployment trigger."),
                Attribute::string("repository")
                    .required()
                    .description("Repository to deploy from.")
                    .validator(Validator::MinLength { min: 3 }),
                Attribute::string("branch")
                    .required()
                    .description("Branch to deploy from.")
                    .validator(Validator::MinLength { min: 1 }),
                Attribute::bool("check_suites")
                    .optional()
                    .computed()
                    .default_value(json!(false))
                    .description("Whether to wait for check suites to pass before deploying. **Default** `false`."),
                Attribute::parent_id(
                    "environment_id",
                    "Identifier of the environment the deployment trigger belongs to.",
                ),
                Attribute::parent_id(
                    "service_id",
                    "Identifier of the service the deployment trigger belongs to.",
                ),
                Attribute::string("project_id")
                    .computed()
                    .description("Identifier of the project the deployment trigger belongs to."),
            ],
        )
    }

    async fn create(&self, plan: DeploymentTriggerModel) -> ProviderResult<DeploymentTriggerModel> {
        let project_id = project_of_service(self.client.as_ref(), &plan.service_id).await?;

        let input = DeploymentTriggerCreateInput {
            provider: TRIGGER_PROVIDER.to_string(),
            repository: plan.repository,
            branch: plan.branch,
            check_suites: plan.check_suites,
            environment_id: plan.environment_id,
            service_id: plan.service_id,
            project_id,
        };

        let trigger = deployment_triggers::create_deployment_trigger(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client("create deployment trigger"))?;

        tracing::trace!("created a deployment trigger");
        Ok(trigger.into())
    }

    async fn read(&self, state: DeploymentTriggerModel) -> ProviderResult<DeploymentTriggerModel> {
        let triggers = self
            .list(&state.project_id, &state.environment_id, &state.service_id)
            .await?;

        triggers
            .into_iter()
            .find(|trigger| trigger.id == state.id)
            .map(DeploymentTriggerModel::from)
            .ok_or_else(|| ProviderError::NotFound(format!("deployment trigger {}", state.id)))
    }

    async fn update(
        &self,
        plan: DeploymentTriggerModel,
        state: DeploymentTriggerModel,
    ) -> ProviderResult<DeploymentTriggerModel> {
        let input = DeploymentTriggerUpdateInput {
            repository: plan.repository,
            branch: plan.branch,
            check_suites: plan.check_suites,
        };

        let trigger = deployment_triggers::update_deployment_trigger(self.client.as_ref(), &state.id, &input)
            .await
            .map_err(ProviderError::client("update deployment trigger"))?;

        tracing::trace!("updated a deployment trigger");
        Ok(trigger.into())
    }

    async fn delete(&self, state: DeploymentTriggerModel) -> ProviderResult<()> {
        deployment_triggers::delete_deployment_trigger(self.client.as_ref(), &state.id)
            .await
            .map_err(ProviderError::client("delete deployment trigger"))?;

        tracing::trace!("deleted a deployment trigger");
        Ok(())
    }

    /// Adopts the first trigger of the service instance
    async fn import_state(&self, id: &str, state: &mut State) -> ProviderResult<()> {
        let [service_id, environment_name] = split_import_id::<2>(id, IMPORT_FORMAT)?;

        let project_id = project_of_service(self.client.as_ref(), service_id).await?;
        let environment_id = find_environment_id(self.client.as_ref(), &project_id, environment_name).await?;

        let triggers = self.list(&project_id, &environment_id, service_id).await?;
        let trigger = triggers
            .first()
            .ok_or_else(|| ProviderError::NotFound("deployment triggers".to_string()))?;

        state.set_attribute("id", &trigger.id)?;
        state.set_attribute("service_id", service_id)?;
        state.set_attribute("environment_id", environment_id)?;
        state.set_attribute("project_id", project_id)
    }
}
