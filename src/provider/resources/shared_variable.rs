//! `railway_shared_variable`
//!
//! A variable shared by every service of a project environment. The id is
//! `project_id:environment_id:name`.

use crate::error::{ProviderError, ProviderResult};
use crate::provider::lookup::{find_environment_id, split_import_id};
use crate::provider::resource::Resource;
use crate::provider::schema::{Attribute, Schema, Validator};
use crate::provider::state::State;
use crate::railway::client::GraphQlClient;
use crate::railway::variables::{self, value_to_string, VariableDeleteInput, VariableUpsertInput};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const IMPORT_FORMAT: &str = "project_id:environment_name:name";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedVariableModel {
    pub id: String,
    pub name: String,
    pub value: String,
    pub environment_id: String,
    pub project_id: String,
}

pub struct SharedVariableResource {
    client: Arc<dyn GraphQlClient>,
}

impl SharedVariableResource {
    pub fn new(client: Arc<dyn GraphQlClient>) -> Self {
        Self { client }
    }

    async fn upsert(&self, plan: &SharedVariableModel, action: &'static str) -> ProviderResult<()> {
        let input = VariableUpsertInput {
            name: plan.name.clone(),
            value: plan.value.clone(),
            service_id: None,
            environment_id: plan.environment_id.clone(),
            project_id: plan.project_id.clone(),
        };

        variables::upsert_variable(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client(action))
    }

    async fn refresh(&self, data: &mut SharedVariableModel, action: &str) -> ProviderResult<()> {
        let vars = variables::get_variables(self.client.as_ref(), &data.project_id, &data.environment_id, None)
            .await
            .map_err(ProviderError::client(action))?;

        match vars.get(&data.name) {
            Some(value) => {
                data.id = format!("{}:{}:{}", data.project_id, data.environment_id, data.name);
                data.value = value_to_string(value);
            }
            None => tracing::warn!(name = %data.name, "shared variable not found in its scope"),
        }

        Ok(())
    }
}

#[async_trait]
impl Resource for SharedVariableResource {
    type Model = SharedVariableModel;

    fn type_name(&self) -> &'static str {
        "shared_variable"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Railway shared variable.",
            vec![
                Attribute::id("Identifier of the shared variable."),
                Attribute::string("name")
                    .required()
                    .requires_replace()
                    .description("Name of the shared variable.")
                    .validator(Validator::MinLength { min: 1 }),
                Attribute::string("value")
                    .required()
                    .sensitive()
                    .description("Value of the shared variable."),
                Attribute::parent_id(
                    "environment_id",
                    "Identifier of the environment the shared variable belongs to.",
                ),
                Attribute::parent_id(
                    "project_id",
                    "Identifier of the project the shared variable belongs to.",
                ),
            ],
        )
    }

    async fn create(&self, mut plan: SharedVariableModel) -> ProviderResult<SharedVariableModel> {
        self.upsert(&plan, "create shared variable").await?;
        tracing::trace!("created a shared variable");

        self.refresh(&mut plan, "read shared variable after creating it")
            .await?;
        Ok(plan)
    }

    async fn read(&self, mut state: SharedVariableModel) -> ProviderResult<SharedVariableModel> {
        self.refresh(&mut state, "read shared variable").await?;
        Ok(state)
    }

    async fn update(
        &self,
        mut plan: SharedVariableModel,
        _state: SharedVariableModel,
    ) -> ProviderResult<SharedVariableModel> {
        self.upsert(&plan, "update shared variable").await?;
        tracing::trace!("updated a shared variable");

        self.refresh(&mut plan, "read shared variable after updating it")
            .await?;
        Ok(plan)
    }

    async fn delete(&self, state: SharedVariableModel) -> ProviderResult<()> {
        let input = VariableDeleteInput {
            name: state.name,
            service_id: None,
            environment_id: state.environment_id,
            project_id: state.project_id,
        };

        variables::delete_variable(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client("delete shared variable"))?;

        tracing::trace!("deleted a shared variable");
        Ok(())
    }

    async fn import_state(&self, id: &str, state: &mut State) -> ProviderResult<()> {
        let [project_id, environment_name, name] = split_import_id::<3>(id, IMPORT_FORMAT)?;

        let environment_id = find_environment_id(self.client.as_ref(), project_id, environment_name).await?;

        state.set_attribute("name", name)?;
        state.set_attribute("environment_id", environment_id)?;
        state.set_attribute("project_id", project_id)
    }
}
