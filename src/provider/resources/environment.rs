//! `railway_environment`

use crate::error::{ProviderError, ProviderResult};
use crate::provider::resource::Resource;
use crate::provider::schema::{Attribute, Schema, Validator};
use crate::railway::client::GraphQlClient;
use crate::railway::environments::{self, Environment, EnvironmentCreateInput};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentModel {
    pub id: String,
    pub name: String,
    pub project_id: String,
}

impl From<Environment> for EnvironmentModel {
    fn from(env: Environment) -> Self {
        Self {
            id: env.id,
            name: env.name,
            project_id: env.project_id,
        }
    }
}

pub struct EnvironmentResource {
    client: Arc<dyn GraphQlClient>,
}

impl EnvironmentResource {
    pub fn new(client: Arc<dyn GraphQlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for EnvironmentResource {
    type Model = EnvironmentModel;

    fn type_name(&self) -> &'static str {
        "environment"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Railway environment.",
            vec![
                Attribute::id("Identifier of the environment."),
                Attribute::string("name")
                    .required()
                    .requires_replace()
                    .description("Name of the environment.")
                    .validator(Validator::MinLength { min: 1 }),
                Attribute::parent_id(
                    "project_id",
                    "Identifier of the project the environment belongs to.",
                ),
            ],
        )
    }

    async fn create(&self, plan: EnvironmentModel) -> ProviderResult<EnvironmentModel> {
        let input = EnvironmentCreateInput {
            name: plan.name,
            project_id: plan.project_id,
        };

        let environment = environments::create_environment(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client("create environment"))?;

        tracing::trace!("created an environment");
        Ok(environment.into())
    }

    async fn read(&self, state: EnvironmentModel) -> ProviderResult<EnvironmentModel> {
        let environment = environments::get_environment(self.client.as_ref(), &state.id)
            .await
            .map_err(ProviderError::client("read environment"))?;

        Ok(environment.into())
    }

    /// Every attribute forces replacement, so the plan is stored as is
    async fn update(&self, plan: EnvironmentModel, state: EnvironmentModel) -> ProviderResult<EnvironmentModel> {
        Ok(EnvironmentModel { id: state.id, ..plan })
    }

    async fn delete(&self, state: EnvironmentModel) -> ProviderResult<()> {
        environments::delete_environment(self.client.as_ref(), &state.id)
            .await
            .map_err(ProviderError::client("delete environment"))?;

        tracing::trace!("deleted an environment");
        Ok(())
    }
}
