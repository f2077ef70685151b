//! `railway_variable`
//!
//! A service variable. The id is `service_id:environment_id:name`.

use crate::error::{ProviderError, ProviderResult};
use crate::provider::lookup::{find_environment_id, project_of_service, split_import_id};
use crate::provider::resource::Resource;
use crate::provider::schema::{Attribute, Schema, Validator};
use crate::provider::state::State;
use crate::railway::client::GraphQlClient;
use crate::railway::variables::{self, value_to_string, VariableDeleteInput, VariableUpsertInput};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const IMPORT_FORMAT: &str = "service_id:environment_name:name";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableModel {
    pub id: String,
    pub name: String,
    pub value: String,
    pub environment_id: String,
    pub service_id: String,
    pub project_id: String,
}

pub struct VariableResource {
    client: Arc<dyn GraphQlClient>,
}

impl VariableResource {
    pub fn new(client: Arc<dyn GraphQlClient>) -> Self {
        Self { client }
    }

    async fn upsert(&self, plan: &VariableModel, action: &'static str) -> ProviderResult<String> {
        let project_id = project_of_service(self.client.as_ref(), &plan.service_id).await?;

        let input = VariableUpsertInput {
            name: plan.name.clone(),
            value: plan.value.clone(),
            service_id: Some(plan.service_id.clone()),
            environment_id: plan.environment_id.clone(),
            project_id: project_id.clone(),
        };

        variables::upsert_variable(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client(action))?;

        Ok(project_id)
    }

    /// Refresh `data` from the variables of its scope. A missing variable leaves it untouched.
    async fn refresh(&self, project_id: &str, data: &mut VariableModel, action: &str) -> ProviderResult<()> {
        let vars = variables::get_variables(
            self.client.as_ref(),
            project_id,
            &data.environment_id,
            Some(&data.service_id),
        )
        .await
        .map_err(ProviderError::client(action))?;

        match vars.get(&data.name) {
            Some(value) => {
                data.id = format!("{}:{}:{}", data.service_id, data.environment_id, data.name);
                data.value = value_to_string(value);
                data.project_id = project_id.to_string();
            }
            None => tracing::warn!(name = %data.name, "variable not found in its scope"),
        }

        Ok(())
    }
}

#[async_trait]
impl Resource for VariableResource {
    type Model = VariableModel;

    fn type_name(&self) -> &'static str {
        "variable"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Railway variable.",
            vec![
                Attribute::id("Identifier of the variable."),
                Attribute::string("name")
                    .required()
                    .requires_replace()
                    .description("Name of the variable.")
                    .validator(Validator::MinLength { min: 1 }),
                Attribute::string("value")
                    .required()
                    .sensitive()
                    .description("Value of the variable."),
                Attribute::parent_id(
                    "environment_id",
                    "Identifier of the environment the variable belongs to.",
                ),
                Attribute::parent_id("service_id", "Identifier of the service the variable belongs to."),
                Attribute::string("project_id")
                    .computed()
                    .description("Identifier of the project the variable belongs to."),
            ],
        )
    }

    async fn create(&self, mut plan: VariableModel) -> ProviderResult<VariableModel> {
        let project_id = self.upsert(&plan, "create variable").await?;
        tracing::trace!("created a variable");

        self.refresh(&project_id, &mut plan, "read variable after creating it")
            .await?;
        Ok(plan)
    }

    async fn read(&self, mut state: VariableModel) -> ProviderResult<VariableModel> {
        let project_id = state.project_id.clone();
        self.refresh(&project_id, &mut state, "read variable").await?;
        Ok(state)
    }

    async fn update(&self, mut plan: VariableModel, _state: VariableModel) -> ProviderResult<VariableModel> {
        let project_id = self.upsert(&plan, "update variable").await?;
        tracing::trace!("updated a variable");

        self.refresh(&project_id, &mut plan, "read variable after updating it")
            .await?;
        Ok(plan)
    }

    async fn delete(&self, state: VariableModel) -> ProviderResult<()> {
        let input = VariableDeleteInput {
            name: state.name,
            service_id: Some(state.service_id),
            environment_id: state.environment_id,
            project_id: state.project_id,
        };

        variables::delete_variable(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client("delete variable"))?;

        tracing::trace!("deleted a variable");
        Ok(())
    }

    async fn import_state(&self, id: &str, state: &mut State) -> ProviderResult<()> {
        let [service_id, environment_name, name] = split_import_id::<3>(id, IMPORT_FORMAT)?;

        let project_id = project_of_service(self.client.as_ref(), service_id).await?;
        let environment_id = find_environment_id(self.client.as_ref(), &project_id, environment_name).await?;

        state.set_attribute("name", name)?;
        state.set_attribute("service_id", service_id)?;
        state.set_attribute("environment_id", environment_id)?;
        state.set_attribute("project_id", project_id)
    }
}
