//! `railway_variable_collection`
//!
//! A group of service variables managed as a whole. Any change to the collection
//! redeploys the service instance it belongs to.

use crate::error::{ProviderError, ProviderResult};
use crate::provider::lookup::{find_environment_id, project_of_service};
use crate::provider::resource::Resource;
use crate::provider::schema::{Attribute, Schema};
use crate::provider::state::State;
use crate::railway::client::GraphQlClient;
use crate::railway::services;
use crate::railway::variables::{self, VariableCollectionUpsertInput, VariableDeleteInput};
use crate::reconcile::diff_fields;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

const IMPORT_FORMAT: &str = "service_id:environment_name:name1:name2:name3:...";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableCollectionModel {
    pub id: String,
    /// Values are null right after an import, until the first read
    pub variables: BTreeMap<String, Option<String>>,
    pub environment_id: String,
    pub service_id: String,
}

/// Stable identifier: `service_id:environment_id:` followed by the sorted names
pub fn collection_id<'a>(
    service_id: &str,
    environment_id: &str,
    names: impl IntoIterator<Item = &'a String>,
) -> String {
    let mut names: Vec<&str> = names.into_iter().map(String::as_str).collect();
    names.sort_unstable();

    format!("{}:{}:{}", service_id, environment_id, names.join(":"))
}

fn upsert_values(vars: &BTreeMap<String, Option<String>>) -> BTreeMap<String, String> {
    vars.iter()
        .map(|(name, value)| (name.clone(), value.clone().unwrap_or_default()))
        .collect()
}

pub struct VariableCollectionResource {
    client: Arc<dyn GraphQlClient>,
}

impl VariableCollectionResource {
    pub fn new(client: Arc<dyn GraphQlClient>) -> Self {
        Self { client }
    }

    async fn upsert(
        &self,
        data: &VariableCollectionModel,
        project_id: &str,
        vars: BTreeMap<String, String>,
        action: &'static str,
    ) -> ProviderResult<()> {
        let input = VariableCollectionUpsertInput {
            service_id: Some(data.service_id.clone()),
            environment_id: data.environment_id.clone(),
            project_id: project_id.to_string(),
            variables: vars,
        };

        variables::upsert_variable_collection(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client(action))
    }

    async fn delete_many<'a>(
        &self,
        data: &VariableCollectionModel,
        project_id: &str,
        names: impl IntoIterator<Item = &'a String>,
        action: &'static str,
    ) -> ProviderResult<()> {
        for name in names {
            let input = VariableDeleteInput {
                name: name.clone(),
                service_id: Some(data.service_id.clone()),
                environment_id: data.environment_id.clone(),
                project_id: project_id.to_string(),
            };

            variables::delete_variable(self.client.as_ref(), &input)
                .await
                .map_err(ProviderError::client(action))?;
        }

        Ok(())
    }

    /// Read back the collection members named in `data`. Names missing remotely are dropped.
    async fn refresh(&self, project_id: &str, data: &mut VariableCollectionModel, action: &str) -> ProviderResult<()> {
        if data.variables.is_empty() {
            return Err(ProviderError::Invariant(
                "cannot get variable collection with no variable names".to_string(),
            ));
        }

        let remote = variables::get_variables(
            self.client.as_ref(),
            project_id,
            &data.environment_id,
            Some(&data.service_id),
        )
        .await
        .map_err(ProviderError::client(action))?;

        let mut found = BTreeMap::new();
        for name in data.variables.keys() {
            match remote.get(name) {
                Some(Value::String(value)) => {
                    found.insert(name.clone(), Some(value.clone()));
                }
                Some(_) => {
                    return Err(ProviderError::Invariant(format!(
                        "cannot convert variable {} to string",
                        name
                    )))
                }
                None => {}
            }
        }

        data.id = collection_id(&data.service_id, &data.environment_id, data.variables.keys());
        data.variables = found;
        Ok(())
    }

    async fn redeploy(&self, data: &VariableCollectionModel, action: &'static str) -> ProviderResult<()> {
        services::redeploy_service_instance(self.client.as_ref(), &data.environment_id, &data.service_id)
            .await
            .map_err(ProviderError::client(action))
    }
}

#[async_trait]
impl Resource for VariableCollectionResource {
    type Model = VariableCollectionModel;

    fn type_name(&self) -> &'static str {
        "variable_collection"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Railway variable collection. Group of variables managed as a whole. Any changes in collection are triggering service redeployment",
            vec![
                Attribute::id("Identifier of the variable collection."),
                Attribute::string_map("variables")
                    .required()
                    .description("Collection of variables."),
                Attribute::parent_id(
                    "environment_id",
                    "Identifier of the environment the variable collection belongs to.",
                ),
                Attribute::parent_id(
                    "service_id",
                    "Identifier of the service the variable collection belongs to.",
                ),
            ],
        )
    }

    async fn create(&self, mut plan: VariableCollectionModel) -> ProviderResult<VariableCollectionModel> {
        let project_id = project_of_service(self.client.as_ref(), &plan.service_id).await?;

        self.upsert(&plan, &project_id, upsert_values(&plan.variables), "create variable collection")
            .await?;
        tracing::trace!("created a variable collection");

        self.refresh(&project_id, &mut plan, "read variable collection after creating it")
            .await?;
        self.redeploy(&plan, "redeploy service after variable collection created")
            .await?;

        Ok(plan)
    }

    async fn read(&self, mut state: VariableCollectionModel) -> ProviderResult<VariableCollectionModel> {
        let project_id = project_of_service(self.client.as_ref(), &state.service_id).await?;

        self.refresh(&project_id, &mut state, "read variable collection")
            .await?;
        Ok(state)
    }

    async fn update(
        &self,
        mut plan: VariableCollectionModel,
        state: VariableCollectionModel,
    ) -> ProviderResult<VariableCollectionModel> {
        let project_id = project_of_service(self.client.as_ref(), &plan.service_id).await?;

        let diff = diff_fields(&plan.variables, &state.variables);

        if !diff.to_upsert.is_empty() {
            self.upsert(
                &plan,
                &project_id,
                upsert_values(&diff.to_upsert),
                "upsert variables of variable collection",
            )
            .await?;
        }

        if !diff.to_delete.is_empty() {
            self.delete_many(&plan, &project_id, &diff.to_delete, "delete variables of variable collection")
                .await?;
        }

        tracing::trace!(
            upserted = diff.to_upsert.len(),
            deleted = diff.to_delete.len(),
            "updated a variable collection"
        );

        self.refresh(&project_id, &mut plan, "read variable collection after updating it")
            .await?;
        self.redeploy(&plan, "redeploy service after variable collection updated")
            .await?;

        Ok(plan)
    }

    async fn delete(&self, state: VariableCollectionModel) -> ProviderResult<()> {
        let project_id = project_of_service(self.client.as_ref(), &state.service_id).await?;

        self.delete_many(&state, &project_id, state.variables.keys(), "delete variable collection")
            .await?;
        self.redeploy(&state, "redeploy service after variable collection deleted")
            .await?;

        tracing::trace!("deleted a variable collection");
        Ok(())
    }

    async fn import_state(&self, id: &str, state: &mut State) -> ProviderResult<()> {
        let parts: Vec<&str> = id.split(':').collect();

        if parts.len() < 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(ProviderError::ImportId {
                format: IMPORT_FORMAT,
                id: id.to_string(),
            });
        }

        let (service_id, environment_name, names) = (parts[0], parts[1], &parts[2..]);

        let project_id = project_of_service(self.client.as_ref(), service_id).await?;
        let environment_id = find_environment_id(self.client.as_ref(), &project_id, environment_name).await?;

        let variables: BTreeMap<&str, Option<String>> = names.iter().map(|name| (*name, None)).collect();

        state.set_attribute("service_id", service_id)?;
        state.set_attribute("environment_id", environment_id)?;
        state.set_attribute("variables", variables)
    }
}
