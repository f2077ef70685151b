//! `railway_service`
//!
//! A service plus the settings of its instance in the project's default environment:
//! source connection, instance settings, region layout and an optional volume.
//!
//! Updates touch each facet independently and stop at the first failing call. Facets
//! already applied stay applied.

use crate::error::{ProviderError, ProviderResult};
use crate::provider::diagnostics::Diagnostics;
use crate::provider::lookup::default_environment_for_project;
use crate::provider::resource::Resource;
use crate::provider::schema::{Attribute, Schema, Validator};
use crate::railway::client::GraphQlClient;
use crate::railway::deployment_triggers;
use crate::railway::environments::EnvironmentSummary;
use crate::railway::services::{
    self, RegionReplicas, RegistryCredentialsInput, Service, ServiceConnectInput, ServiceCreateInput,
    ServiceInstanceUpdateInput, ServiceUpdateInput,
};
use crate::railway::volumes::{self, VolumeCreateInput, VolumeInstanceUpdateInput, VolumeUpdateInput};
use crate::reconcile::{extract_regions, has_metadata};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

const IMAGE_ONLY: &[&str] = &["source_repo", "source_repo_branch", "root_directory", "config_path"];
const DEFAULT_REPLICAS: i64 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeModel {
    pub id: String,
    pub name: String,
    pub mount_path: String,
    pub size: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionModel {
    pub region: String,
    pub num_replicas: Option<i64>,
}

impl RegionModel {
    fn replicas(&self) -> i64 {
        self.num_replicas.unwrap_or(DEFAULT_REPLICAS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceModel {
    pub id: String,
    pub name: String,
    pub project_id: String,
    pub cron_schedule: Option<String>,
    pub source_image: Option<String>,
    pub source_image_registry_username: Option<String>,
    pub source_image_registry_password: Option<String>,
    pub source_repo: Option<String>,
    pub source_repo_branch: Option<String>,
    pub root_directory: Option<String>,
    pub config_path: Option<String>,
    pub volume: Option<VolumeModel>,
    pub regions: Option<Vec<RegionModel>>,
}

/// Where a service deploys from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceSource {
    Repo {
        repo: String,
        branch: String,
    },
    Image {
        image: String,
        credentials: Option<RegistryCredentialsInput>,
    },
}

impl From<&ServiceSource> for ServiceConnectInput {
    fn from(source: &ServiceSource) -> Self {
        match source {
            ServiceSource::Repo { repo, branch } => ServiceConnectInput {
                repo: Some(repo.clone()),
                branch: Some(branch.clone()),
                image: None,
            },
            ServiceSource::Image { image, .. } => ServiceConnectInput {
                image: Some(image.clone()),
                ..Default::default()
            },
        }
    }
}

/// Change to the volume facet between the prior state and the plan
#[derive(Debug, PartialEq)]
pub enum VolumeChange<'a> {
    Unchanged,
    Create(&'a VolumeModel),
    Delete(&'a VolumeModel),
    Update {
        prior: &'a VolumeModel,
        rename: Option<&'a str>,
        mount_path: Option<&'a str>,
    },
}

impl<'a> VolumeChange<'a> {
    pub fn between(plan: Option<&'a VolumeModel>, prior: Option<&'a VolumeModel>) -> Self {
        match (plan, prior) {
            (None, None) => VolumeChange::Unchanged,
            (Some(volume), None) => VolumeChange::Create(volume),
            (None, Some(volume)) => VolumeChange::Delete(volume),
            (Some(volume), Some(prior)) => {
                let rename = (volume.name != prior.name).then_some(volume.name.as_str());
                let mount_path = (volume.mount_path != prior.mount_path).then_some(volume.mount_path.as_str());

                if rename.is_none() && mount_path.is_none() {
                    VolumeChange::Unchanged
                } else {
                    VolumeChange::Update {
                        prior,
                        rename,
                        mount_path,
                    }
                }
            }
        }
    }
}

/// Total replicas across regions, counting unset replica counts as one. Saturates at `i64::MAX`.
pub fn total_replicas(regions: &[RegionModel]) -> i64 {
    regions
        .iter()
        .map(RegionModel::replicas)
        .fold(0, i64::saturating_add)
}

impl ServiceModel {
    /// The configured source. Registry credentials are only accepted with an image.
    pub fn source(&self) -> ProviderResult<Option<ServiceSource>> {
        let credentials = match (
            &self.source_image_registry_username,
            &self.source_image_registry_password,
        ) {
            (Some(username), Some(password)) => Some(RegistryCredentialsInput {
                username: username.clone(),
                password: password.clone(),
            }),
            (None, None) => None,
            _ => {
                return Err(ProviderError::Invariant(
                    "registry username and password must be set together".to_string(),
                ))
            }
        };

        match (&self.source_repo, &self.source_repo_branch, &self.source_image) {
            (Some(repo), Some(branch), None) if credentials.is_none() => Ok(Some(ServiceSource::Repo {
                repo: repo.clone(),
                branch: branch.clone(),
            })),
            (None, None, Some(image)) => Ok(Some(ServiceSource::Image {
                image: image.clone(),
                credentials,
            })),
            (None, None, None) if credentials.is_none() => Ok(None),
            (None, None, None) => Err(ProviderError::Invariant(
                "registry credentials require a source image".to_string(),
            )),
            (Some(_), None, _) | (None, Some(_), _) => Err(ProviderError::Invariant(
                "source repo and branch must be set together".to_string(),
            )),
            _ => Err(ProviderError::Invariant(
                "a service deploys either from a repo or from an image".to_string(),
            )),
        }
    }

    fn source_fields(&self) -> (Option<&str>, Option<&str>, Option<&str>) {
        (
            self.source_repo.as_deref(),
            self.source_repo_branch.as_deref(),
            self.source_image.as_deref(),
        )
    }

    /// Instance settings update with every set field. Unset fields are left as they are remotely.
    fn instance_input(&self, source: Option<&ServiceSource>) -> ServiceInstanceUpdateInput {
        let registry_credentials = match source {
            Some(ServiceSource::Image { credentials, .. }) => credentials.clone(),
            _ => None,
        };

        ServiceInstanceUpdateInput {
            cron_schedule: self.cron_schedule.clone(),
            root_directory: self.root_directory.clone(),
            railway_config_file: self.config_path.clone(),
            multi_region_config: self.regions.as_ref().map(|regions| {
                regions
                    .iter()
                    .map(|r| {
                        (
                            r.region.clone(),
                            RegionReplicas {
                                num_replicas: r.replicas(),
                            },
                        )
                    })
                    .collect()
            }),
            registry_credentials,
        }
    }

    fn apply_service(&mut self, service: Service) {
        self.id = service.id;
        self.name = service.name;
        self.project_id = service.project_id;
    }
}

pub struct ServiceResource {
    client: Arc<dyn GraphQlClient>,
}

impl ServiceResource {
    pub fn new(client: Arc<dyn GraphQlClient>) -> Self {
        Self { client }
    }

    async fn update_instance(&self, data: &ServiceModel, action: &'static str) -> ProviderResult<()> {
        let source = data.source()?;
        let input = data.instance_input(source.as_ref());

        services::update_service_instance(self.client.as_ref(), &data.id, &input)
            .await
            .map_err(ProviderError::client(action))
    }

    async fn connect(&self, service_id: &str, source: &ServiceSource) -> ProviderResult<()> {
        services::connect_service(self.client.as_ref(), service_id, &ServiceConnectInput::from(source))
            .await
            .map_err(ProviderError::client("connect repo or image to service"))?;

        tracing::trace!("connected a service source");
        Ok(())
    }

    async fn create_volume(&self, data: &ServiceModel, volume: &VolumeModel) -> ProviderResult<()> {
        let input = VolumeCreateInput {
            mount_path: volume.mount_path.clone(),
            project_id: data.project_id.clone(),
            service_id: Some(data.id.clone()),
        };

        let created = volumes::create_volume(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client("create volume"))?;

        tracing::trace!("created a volume");

        self.rename_volume(&created.id, &volume.name).await
    }

    async fn rename_volume(&self, volume_id: &str, name: &str) -> ProviderResult<()> {
        let input = VolumeUpdateInput { name: name.to_string() };

        volumes::update_volume(self.client.as_ref(), volume_id, &input)
            .await
            .map_err(ProviderError::client("update volume"))?;

        tracing::trace!("updated a volume");
        Ok(())
    }

    async fn delete_volume(&self, volume_id: &str) -> ProviderResult<()> {
        volumes::delete_volume(self.client.as_ref(), volume_id)
            .await
            .map_err(ProviderError::client("delete volume"))?;

        tracing::trace!("deleted a volume");
        Ok(())
    }

    async fn apply_volume_change(&self, data: &ServiceModel, change: VolumeChange<'_>) -> ProviderResult<()> {
        match change {
            VolumeChange::Unchanged => Ok(()),
            VolumeChange::Create(volume) => self.create_volume(data, volume).await,
            VolumeChange::Delete(volume) => self.delete_volume(&volume.id).await,
            VolumeChange::Update {
                prior,
                rename,
                mount_path,
            } => {
                if let Some(name) = rename {
                    self.rename_volume(&prior.id, name).await?;
                }

                if let Some(mount_path) = mount_path {
                    let input = VolumeInstanceUpdateInput {
                        mount_path: mount_path.to_string(),
                        service_id: data.id.clone(),
                    };

                    volumes::update_volume_instance(self.client.as_ref(), &prior.id, &input)
                        .await
                        .map_err(ProviderError::client("update volume instance"))?;

                    tracing::trace!("updated a volume instance");
                }

                Ok(())
            }
        }
    }

    /// Reconnect or disconnect when the repo, branch or image changed
    async fn update_connection(&self, plan: &ServiceModel, state: &ServiceModel) -> ProviderResult<()> {
        if plan.source_fields() == state.source_fields() {
            return Ok(());
        }

        match plan.source()? {
            None => {
                services::disconnect_service(self.client.as_ref(), &plan.id)
                    .await
                    .map_err(ProviderError::client("disconnect service source"))?;

                tracing::trace!("disconnected a service source");
                Ok(())
            }
            Some(source) => self.connect(&plan.id, &source).await,
        }
    }

    async fn redeploy_all_instances(&self, service_id: &str) -> ProviderResult<()> {
        let environments = services::get_service_instances(self.client.as_ref(), service_id)
            .await
            .map_err(ProviderError::client("read service instances"))?;

        for environment_id in &environments {
            services::redeploy_service_instance(self.client.as_ref(), environment_id, service_id)
                .await
                .map_err(ProviderError::client("redeploy service after update"))?;
        }

        tracing::trace!(instances = environments.len(), "redeployed all service instances");
        Ok(())
    }

    /// Overwrite instance settings and volume with what the default environment reports
    async fn refresh(&self, data: &mut ServiceModel) -> ProviderResult<()> {
        let (_, environment) = default_environment_for_project(self.client.as_ref(), &data.project_id).await?;

        self.refresh_instance(data, &environment).await?;
        self.refresh_volume(data, &environment).await
    }

    async fn refresh_instance(&self, data: &mut ServiceModel, environment: &EnvironmentSummary) -> ProviderResult<()> {
        let instance = services::get_service_instance(self.client.as_ref(), &environment.id, &data.id)
            .await
            .map_err(ProviderError::client("read service settings"))?;

        if let Some(cron) = instance.cron_schedule {
            data.cron_schedule = Some(cron);
        }
        if let Some(dir) = instance.root_directory.filter(|d| !d.is_empty()) {
            data.root_directory = Some(dir);
        }
        if let Some(path) = instance.railway_config_file.filter(|p| !p.is_empty()) {
            data.config_path = Some(path);
        }

        if let Some(source) = instance.source {
            if let Some(image) = source.image {
                data.source_image = Some(image);
            }

            if let Some(repo) = source.repo {
                data.source_repo = Some(repo);

                let triggers = deployment_triggers::list_deployment_triggers(
                    self.client.as_ref(),
                    &data.project_id,
                    &environment.id,
                    &data.id,
                )
                .await
                .map_err(ProviderError::client("read deployment triggers"))?;

                // A service instance has at most one trigger
                if let Some(trigger) = triggers.first() {
                    data.source_repo_branch = Some(trigger.branch.clone());
                }
            }
        }

        let meta = instance
            .latest_deployment
            .and_then(|d| d.meta)
            .filter(|meta| has_metadata(Some(meta)));

        if let Some(meta) = meta {
            let regions = extract_regions(&meta)?;
            data.regions = Some(
                regions
                    .into_iter()
                    .map(|(region, replicas)| RegionModel {
                        region,
                        num_replicas: Some(replicas),
                    })
                    .collect(),
            );
        }

        Ok(())
    }

    async fn refresh_volume(&self, data: &mut ServiceModel, environment: &EnvironmentSummary) -> ProviderResult<()> {
        let project_volumes = volumes::get_volume_instances(self.client.as_ref(), &data.project_id)
            .await
            .map_err(ProviderError::client("read volume settings"))?;

        data.volume = None;

        for volume in project_volumes {
            let attached = volume.volume_instances.nodes().find(|instance| {
                instance.service_id.as_deref() == Some(data.id.as_str()) && instance.environment_id == environment.id
            });

            if let Some(instance) = attached {
                data.volume = Some(VolumeModel {
                    id: volume.id.clone(),
                    name: volume.name.clone(),
                    mount_path: instance.mount_path.clone(),
                    size: instance.size_mb,
                });
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Resource for ServiceResource {
    type Model = ServiceModel;

    fn type_name(&self) -> &'static str {
        "service"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Railway service.",
            vec![
                Attribute::id("Identifier of the service."),
                Attribute::string("name")
                    .required()
                    .description("Name of the service.")
                    .validator(Validator::MinLength { min: 1 }),
                Attribute::parent_id("project_id", "Identifier of the project the service belongs to."),
                Attribute::string("cron_schedule")
                    .optional()
                    .description("Cron schedule of the service.")
                    .validator(Validator::MinLength { min: 9 }),
                Attribute::string("source_image")
                    .optional()
                    .description("Source image of the service. Conflicts with `source_repo`.")
                    .validator(Validator::MinLength { min: 1 })
                    .validator(Validator::ConflictsWith { paths: IMAGE_ONLY }),
                Attribute::string("source_image_registry_username")
                    .optional()
                    .description("Private Docker registry username.")
                    .validator(Validator::MinLength { min: 1 })
                    .validator(Validator::ConflictsWith { paths: IMAGE_ONLY })
                    .validator(Validator::AlsoRequires {
                        paths: &["source_image_registry_password"],
                    }),
                Attribute::string("source_image_registry_password")
                    .optional()
                    .sensitive()
                    .description("Private Docker registry password.")
                    .validator(Validator::MinLength { min: 1 })
                    .validator(Validator::ConflictsWith { paths: IMAGE_ONLY })
                    .validator(Validator::AlsoRequires {
                        paths: &["source_image_registry_username"],
                    }),
                Attribute::string("source_repo")
                    .optional()
                    .description("Source repository of the service. Conflicts with `source_image`.")
                    .validator(Validator::MinLength { min: 3 })
                    .validator(Validator::AlsoRequires {
                        paths: &["source_repo_branch"],
                    }),
                Attribute::string("source_repo_branch")
                    .optional()
                    .description("Source repository branch to be used with `source_repo`.")
                    .validator(Validator::MinLength { min: 1 })
                    .validator(Validator::AlsoRequires { paths: &["source_repo"] }),
                Attribute::string("root_directory")
                    .optional()
                    .description("Directory to user for the service. Conflicts with `source_image`.")
                    .validator(Validator::MinLength { min: 1 }),
                Attribute::string("config_path")
                    .optional()
                    .description("Path to a Railway config file. Conflicts with `source_image`.")
                    .validator(Validator::MinLength { min: 1 }),
                Attribute::object(
                    "volume",
                    vec![
                        Attribute::id("Identifier of the volume."),
                        Attribute::string("name")
                            .required()
                            .description("Name of the volume.")
                            .validator(Validator::MinLength { min: 1 }),
                        Attribute::string("mount_path")
                            .required()
                            .description("Mount path of the volume.")
                            .validator(Validator::MinLength { min: 1 }),
                        Attribute::float64("size")
                            .computed()
                            .description("Size of the volume in MB."),
                    ],
                )
                .optional()
                .description("Volume connected to the service."),
                Attribute::object_list(
                    "regions",
                    vec![
                        Attribute::string("region")
                            .optional()
                            .computed()
                            .description("Region to deploy service instances in."),
                        Attribute::int64("num_replicas")
                            .optional()
                            .computed()
                            .default_value(json!(DEFAULT_REPLICAS))
                            .description("Number of replicas in the region. **Default** `1`.")
                            .validator(Validator::AtLeast { min: 1 }),
                    ],
                )
                .optional()
                .computed()
                .description("Regions to deploy service instances in.")
                .validator(Validator::SizeAtLeast { min: 1 }),
            ],
        )
    }

    fn validate(&self, config: &ServiceModel) -> Diagnostics {
        let mut diags = Diagnostics::default();

        if let (Some(_), Some(regions)) = (&config.cron_schedule, &config.regions) {
            let sum = total_replicas(regions);
            if sum != 1 {
                diags.add_attribute_error(
                    "cron_schedule",
                    "Invalid `cron_schedule` with multiple replicas",
                    format!(
                        "`cron_schedule` can only be set when total number of replicas across all regions is 1. Found {} replicas.",
                        sum
                    ),
                );
            }
        }

        if let Err(err) = config.source() {
            diags.add_attribute_error("source_image", "Invalid Attribute Combination", err.to_string());
        }

        diags
    }

    async fn create(&self, mut plan: ServiceModel) -> ProviderResult<ServiceModel> {
        let source = plan.source()?;

        let input = ServiceCreateInput {
            name: plan.name.clone(),
            project_id: plan.project_id.clone(),
        };

        let service = services::create_service(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client("create service"))?;

        tracing::trace!("created a service");
        plan.apply_service(service);

        self.update_instance(&plan, "create service settings").await?;
        tracing::trace!("created service settings");

        if let Some(volume) = &plan.volume {
            self.create_volume(&plan, volume).await?;
        }

        if let Some(source) = &source {
            self.connect(&plan.id, source).await?;
        }

        self.refresh(&mut plan).await?;
        Ok(plan)
    }

    async fn read(&self, mut state: ServiceModel) -> ProviderResult<ServiceModel> {
        let service = services::get_service(self.client.as_ref(), &state.id)
            .await
            .map_err(ProviderError::client("read service"))?;

        state.apply_service(service);

        self.refresh(&mut state).await?;
        Ok(state)
    }

    async fn update(&self, mut plan: ServiceModel, state: ServiceModel) -> ProviderResult<ServiceModel> {
        plan.id = state.id.clone();

        if plan.name != state.name {
            let input = ServiceUpdateInput {
                name: plan.name.clone(),
            };

            let service = services::update_service(self.client.as_ref(), &plan.id, &input)
                .await
                .map_err(ProviderError::client("update service"))?;

            tracing::trace!("updated a service");
            plan.apply_service(service);
        }

        self.update_instance(&plan, "update service settings").await?;
        tracing::trace!("updated service settings");

        let change = VolumeChange::between(plan.volume.as_ref(), state.volume.as_ref());
        self.apply_volume_change(&plan, change).await?;

        self.update_connection(&plan, &state).await?;

        self.redeploy_all_instances(&plan.id).await?;

        self.refresh(&mut plan).await?;
        Ok(plan)
    }

    async fn delete(&self, state: ServiceModel) -> ProviderResult<()> {
        services::delete_service(self.client.as_ref(), &state.id)
            .await
            .map_err(ProviderError::client("delete service"))?;

        tracing::trace!("deleted a service");

        if let Some(volume) = &state.volume {
            self.delete_volume(&volume.id).await?;
        }

        Ok(())
    }
}
