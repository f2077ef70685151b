//! `railway_plugin`

use crate::error::{ProviderError, ProviderResult};
use crate::provider::resource::Resource;
use crate::provider::schema::{Attribute, Schema, Validator};
use crate::railway::client::GraphQlClient;
use crate::railway::plugins::{self, Plugin, PluginCreateInput, PluginUpdateInput};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const PLUGIN_TYPES: &[&str] = &["redis", "mongodb", "mysql", "postgresql"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginModel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub project_id: String,
}

impl From<Plugin> for PluginModel {
    fn from(plugin: Plugin) -> Self {
        Self {
            id: plugin.id,
            name: plugin.friendly_name,
            kind: plugin.name,
            project_id: plugin.project.id,
        }
    }
}

pub struct PluginResource {
    client: Arc<dyn GraphQlClient>,
}

impl PluginResource {
    pub fn new(client: Arc<dyn GraphQlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for PluginResource {
    type Model = PluginModel;

    fn type_name(&self) -> &'static str {
        "plugin"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Railway plugin.",
            vec![
                Attribute::id("Identifier of the plugin."),
                Attribute::string("name")
                    .required()
                    .description("Name of the plugin.")
                    .validator(Validator::MinLength { min: 1 }),
                Attribute::string("type")
                    .required()
                    .requires_replace()
                    .description("Type of the plugin.")
                    .validator(Validator::OneOf { values: PLUGIN_TYPES }),
                Attribute::parent_id("project_id", "Identifier of the project the plugin belongs to."),
            ],
        )
    }

    async fn create(&self, plan: PluginModel) -> ProviderResult<PluginModel> {
        let input = PluginCreateInput {
            friendly_name: plan.name,
            name: plan.kind,
            project_id: plan.project_id,
        };

        let plugin = plugins::create_plugin(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client("create plugin"))?;

        tracing::trace!("created a plugin");
        Ok(plugin.into())
    }

    async fn read(&self, state: PluginModel) -> ProviderResult<PluginModel> {
        let plugin = plugins::get_plugin(self.client.as_ref(), &state.id)
            .await
            .map_err(ProviderError::client("read plugin"))?;

        Ok(plugin.into())
    }

    async fn update(&self, plan: PluginModel, state: PluginModel) -> ProviderResult<PluginModel> {
        let input = PluginUpdateInput {
            friendly_name: plan.name,
        };

        let plugin = plugins::update_plugin(self.client.as_ref(), &state.id, &input)
            .await
            .map_err(ProviderError::client("update plugin"))?;

        tracing::trace!("updated a plugin");
        Ok(plugin.into())
    }

    async fn delete(&self, state: PluginModel) -> ProviderResult<()> {
        plugins::delete_plugin(self.client.as_ref(), &state.id)
            .await
            .map_err(ProviderError::client("delete plugin"))?;

        tracing::trace!("deleted a plugin");
        Ok(())
    }
}
