//! Resources managed by the provider

mod custom_domain;
mod deployment_trigger;
mod environment;
mod plugin;
mod project;
mod service;
mod service_domain;
mod shared_variable;
mod tcp_proxy;
mod variable;
mod variable_collection;

pub use custom_domain::{CustomDomainModel, CustomDomainResource};
pub use deployment_trigger::{DeploymentTriggerModel, DeploymentTriggerResource};
pub use environment::{EnvironmentModel, EnvironmentResource};
pub use plugin::{PluginModel, PluginResource, PLUGIN_TYPES};
pub use project::{DefaultEnvironmentModel, ProjectModel, ProjectResource, DEFAULT_ENVIRONMENT_NAME};
pub use service::{
    total_replicas, RegionModel, ServiceModel, ServiceResource, ServiceSource, VolumeChange, VolumeModel,
};
pub use service_domain::{subdomain_of, ServiceDomainModel, ServiceDomainResource};
pub use shared_variable::{SharedVariableModel, SharedVariableResource};
pub use tcp_proxy::{TcpProxyModel, TcpProxyResource};
pub use variable::{VariableModel, VariableResource};
pub use variable_collection::{collection_id, VariableCollectionModel, VariableCollectionResource};
