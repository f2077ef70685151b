//! Provider surface
//!
//! [`Provider`] describes the provider block and builds a [`ConfiguredProvider`] once
//! a token is known. Every resource and data source of a configured provider shares
//! the same injected [`GraphQlClient`].

pub mod data_sources;
pub mod diagnostics;
pub mod lookup;
pub mod resource;
pub mod resources;
pub mod schema;
pub mod state;

use crate::config::ProviderConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::railway::client::{GraphQlClient, Operation, RailwayClient};
use async_trait::async_trait;
use resource::{DataSource, DynamicDataSource, DynamicResource, Erased, Resource};
use schema::{Attribute, Schema};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const TYPE_NAME: &str = "railway";

pub struct Provider {
    version: &'static str,
}

impl Provider {
    pub fn new(version: &'static str) -> Self {
        Self { version }
    }

    pub fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn schema(&self) -> Schema {
        Schema::new(
            "The Railway provider manages Railway resources through the Railway GraphQL API.",
            vec![Attribute::string("token")
                .optional()
                .sensitive()
                .description("The token used to authenticate with Railway. Can also be set with the `RAILWAY_TOKEN` environment variable.")],
        )
    }

    /// Resolve the token and endpoint and build the HTTP client
    pub fn configure(&self, config: ProviderConfig) -> ProviderResult<ConfiguredProvider> {
        let resolved = config.resolve()?;

        let client = RailwayClient::new(resolved.endpoint, &resolved.token)
            .map_err(ProviderError::client("create API client"))?;

        tracing::info!(version = self.version, endpoint = %client.endpoint(), "configured provider");
        Ok(ConfiguredProvider::with_client(Arc::new(client)))
    }
}

/// Client of a provider that has no token yet. Every call fails.
struct NotConfigured;

#[async_trait]
impl GraphQlClient for NotConfigured {
    async fn execute(&self, operation: &Operation, _variables: Value) -> anyhow::Result<Value> {
        anyhow::bail!("provider is not configured, cannot run {}", operation.name)
    }
}

/// Registered resources and data sources, keyed by full type name
pub struct ConfiguredProvider {
    resources: BTreeMap<String, Box<dyn DynamicResource>>,
    data_sources: BTreeMap<String, Box<dyn DynamicDataSource>>,
}

impl ConfiguredProvider {
    pub fn with_client(client: Arc<dyn GraphQlClient>) -> Self {
        let mut provider = Self {
            resources: BTreeMap::new(),
            data_sources: BTreeMap::new(),
        };

        provider.register_resource(resources::ProjectResource::new(client.clone()));
        provider.register_resource(resources::EnvironmentResource::new(client.clone()));
        provider.register_resource(resources::ServiceResource::new(client.clone()));
        provider.register_resource(resources::VariableResource::new(client.clone()));
        provider.register_resource(resources::SharedVariableResource::new(client.clone()));
        provider.register_resource(resources::VariableCollectionResource::new(client.clone()));
        provider.register_resource(resources::CustomDomainResource::new(client.clone()));
        provider.register_resource(resources::ServiceDomainResource::new(client.clone()));
        provider.register_resource(resources::TcpProxyResource::new(client.clone()));
        provider.register_resource(resources::PluginResource::new(client.clone()));
        provider.register_resource(resources::DeploymentTriggerResource::new(client.clone()));

        provider.register_data_source(data_sources::PluginVariableDataSource::new(client));

        provider
    }

    /// Resources and data sources usable for schemas and validation only
    pub fn offline() -> Self {
        Self::with_client(Arc::new(NotConfigured))
    }

    fn register_resource<R: Resource + 'static>(&mut self, resource: R) {
        let name = format!("{}_{}", TYPE_NAME, resource.type_name());
        self.resources.insert(name, Box::new(Erased(resource)));
    }

    fn register_data_source<D: DataSource + 'static>(&mut self, data_source: D) {
        let name = format!("{}_{}", TYPE_NAME, data_source.type_name());
        self.data_sources.insert(name, Box::new(Erased(data_source)));
    }

    pub fn resource(&self, type_name: &str) -> Option<&dyn DynamicResource> {
        self.resources.get(type_name).map(|r| r.as_ref())
    }

    pub fn data_source(&self, type_name: &str) -> Option<&dyn DynamicDataSource> {
        self.data_sources.get(type_name).map(|d| d.as_ref())
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &str> {
        self.data_sources.keys().map(String::as_str)
    }
}
