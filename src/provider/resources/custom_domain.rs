//! `railway_custom_domain`

use crate::error::{ProviderError, ProviderResult};
use crate::provider::lookup::{project_of_service, split_import_id};
use crate::provider::resource::Resource;
use crate::provider::schema::{Attribute, Schema, Validator};
use crate::provider::state::State;
use crate::railway::client::GraphQlClient;
use crate::railway::domains::{self, CustomDomain, CustomDomainCreateInput};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const IMPORT_FORMAT: &str = "project_id:domain_id";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomDomainModel {
    pub id: String,
    pub domain: String,
    pub environment_id: String,
    pub service_id: String,
    pub project_id: String,
    pub target_port: i64,
    pub host_label: String,
    pub zone: String,
    pub dns_record_value: String,
}

impl CustomDomainModel {
    fn apply(&mut self, domain: CustomDomain, project_id: String) -> ProviderResult<()> {
        let record = domain.status.dns_records.first().ok_or_else(|| {
            ProviderError::Invariant(format!("custom domain {} has no DNS records", domain.domain))
        })?;

        self.host_label = record.hostlabel.clone();
        self.zone = record.zone.clone();
        self.dns_record_value = record.required_value.clone();
        self.id = domain.id;
        self.domain = domain.domain;
        self.environment_id = domain.environment_id;
        self.service_id = domain.service_id;
        if let Some(port) = domain.target_port {
            self.target_port = port;
        }
        self.project_id = project_id;
        Ok(())
    }
}

pub struct CustomDomainResource {
    client: Arc<dyn GraphQlClient>,
}

impl CustomDomainResource {
    pub fn new(client: Arc<dyn GraphQlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for CustomDomainResource {
    type Model = CustomDomainModel;

    fn type_name(&self) -> &'static str {
        "custom_domain"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Railway custom domain.",
            vec![
                Attribute::id("Identifier of the custom domain."),
                Attribute::string("domain")
                    .required()
                    .requires_replace()
                    .description("Custom domain.")
                    .validator(Validator::MinLength { min: 1 }),
                Attribute::parent_id(
                    "environment_id",
                    "Identifier of the environment the custom domain belongs to.",
                ),
                Attribute::parent_id("service_id", "Identifier of the service the custom domain belongs to."),
                Attribute::string("project_id")
                    .computed()
                    .description("Identifier of the project the custom domain belongs to."),
                Attribute::int64("target_port")
                    .required()
                    .requires_replace()
                    .description("Port of the service the custom domain routes to.")
                    .validator(Validator::Between { min: 0, max: 65535 }),
                Attribute::string("host_label")
                    .computed()
                    .description("Host label of the DNS record for the custom domain."),
                Attribute::string("zone")
                    .computed()
                    .description("Zone of the DNS record for the custom domain."),
                Attribute::string("dns_record_value")
                    .computed()
                    .description("Value of the DNS record for the custom domain."),
            ],
        )
    }

    async fn create(&self, mut plan: CustomDomainModel) -> ProviderResult<CustomDomainModel> {
        let project_id = project_of_service(self.client.as_ref(), &plan.service_id).await?;

        let input = CustomDomainCreateInput {
            domain: plan.domain.clone(),
            service_id: plan.service_id.clone(),
            environment_id: plan.environment_id.clone(),
            project_id: project_id.clone(),
            target_port: plan.target_port,
        };

        let domain = domains::create_custom_domain(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client("create custom domain"))?;

        tracing::trace!("created a custom domain");

        plan.apply(domain, project_id)?;
        Ok(plan)
    }

    async fn read(&self, mut state: CustomDomainModel) -> ProviderResult<CustomDomainModel> {
        let domain = domains::get_custom_domain(self.client.as_ref(), &state.id, &state.project_id)
            .await
            .map_err(ProviderError::client("read custom domain"))?;

        let project_id = project_of_service(self.client.as_ref(), &domain.service_id).await?;

        state.apply(domain, project_id)?;
        Ok(state)
    }

    /// Every configurable attribute forces replacement
    async fn update(&self, plan: CustomDomainModel, state: CustomDomainModel) -> ProviderResult<CustomDomainModel> {
        Ok(CustomDomainModel {
            id: state.id,
            project_id: state.project_id,
            host_label: state.host_label,
            zone: state.zone,
            dns_record_value: state.dns_record_value,
            ..plan
        })
    }

    async fn delete(&self, state: CustomDomainModel) -> ProviderResult<()> {
        domains::delete_custom_domain(self.client.as_ref(), &state.id)
            .await
            .map_err(ProviderError::client("delete custom domain"))?;

        tracing::trace!("deleted a custom domain");
        Ok(())
    }

    async fn import_state(&self, id: &str, state: &mut State) -> ProviderResult<()> {
        let [project_id, domain_id] = split_import_id::<2>(id, IMPORT_FORMAT)?;

        state.set_attribute("id", domain_id)?;
        state.set_attribute("project_id", project_id)
    }
}
