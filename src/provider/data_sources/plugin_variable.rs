//! Data source `railway_plugin_variable`

use crate::error::{ProviderError, ProviderResult};
use crate::provider::resource::DataSource;
use crate::provider::schema::{Attribute, Schema, Validator};
use crate::railway::client::GraphQlClient;
use crate::railway::variables::{self, value_to_string};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginVariableModel {
    pub id: String,
    pub name: String,
    pub value: String,
    pub environment_id: String,
    pub plugin_id: String,
    pub project_id: String,
}

pub struct PluginVariableDataSource {
    client: Arc<dyn GraphQlClient>,
}

impl PluginVariableDataSource {
    pub fn new(client: Arc<dyn GraphQlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for PluginVariableDataSource {
    type Model = PluginVariableModel;

    fn type_name(&self) -> &'static str {
        "plugin_variable"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Railway plugin variable.",
            vec![
                Attribute::id("Identifier of the plugin variable."),
                Attribute::string("name")
                    .required()
                    .description("Name of the plugin variable.")
                    .validator(Validator::MinLength { min: 1 }),
                Attribute::string("value")
                    .computed()
                    .sensitive()
                    .description("Value of the plugin variable."),
                Attribute::string("environment_id")
                    .required()
                    .description("Identifier of the environment the plugin variable belongs to.")
                    .validator(Validator::Uuid),
                Attribute::string("plugin_id")
                    .required()
                    .description("Identifier of the plugin the variable belongs to.")
                    .validator(Validator::Uuid),
                Attribute::string("project_id")
                    .required()
                    .description("Identifier of the project the plugin variable belongs to.")
                    .validator(Validator::Uuid),
            ],
        )
    }

    async fn read(&self, mut config: PluginVariableModel) -> ProviderResult<PluginVariableModel> {
        let vars = variables::get_plugin_variables(
            self.client.as_ref(),
            &config.project_id,
            &config.environment_id,
            &config.plugin_id,
        )
        .await
        .map_err(ProviderError::client("read plugin variable"))?;

        let value = vars
            .get(&config.name)
            .ok_or_else(|| ProviderError::NotFound(format!("plugin variable {}", config.name)))?;

        config.id = format!("{}:{}:{}", config.plugin_id, config.environment_id, config.name);
        config.value = value_to_string(value);
        Ok(config)
    }
}
