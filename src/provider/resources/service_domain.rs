//! `railway_service_domain`
//!
//! Railway assigns a generated domain on create; the resource then renames it to
//! `<subdomain>.<suffix>` and finds it again by that full name.

use crate::error::{ProviderError, ProviderResult};
use crate::provider::lookup::{find_environment_id, project_of_service, split_import_id};
use crate::provider::resource::Resource;
use crate::provider::schema::{Attribute, Schema, Validator};
use crate::provider::state::State;
use crate::railway::client::GraphQlClient;
use crate::railway::domains::{self, ServiceDomain, ServiceDomainCreateInput, ServiceDomainUpdateInput};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const IMPORT_FORMAT: &str = "service_id:environment_name:domain";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDomainModel {
    pub id: String,
    pub subdomain: String,
    pub environment_id: String,
    pub service_id: String,
    pub project_id: String,
    pub suffix: String,
    pub domain: String,
}

/// `api.up.railway.app` with suffix `up.railway.app` gives `api`
pub fn subdomain_of(domain: &str, suffix: &str) -> ProviderResult<String> {
    domain
        .strip_suffix(suffix)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|sub| !sub.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ProviderError::Invariant(format!("domain {} does not end with suffix {}", domain, suffix))
        })
}

impl ServiceDomainModel {
    fn apply(&mut self, domain: ServiceDomain, project_id: &str) -> ProviderResult<()> {
        self.subdomain = subdomain_of(&domain.domain, &domain.suffix)?;
        self.id = domain.id;
        self.environment_id = domain.environment_id;
        self.service_id = domain.service_id;
        self.suffix = domain.suffix;
        self.domain = domain.domain;
        self.project_id = project_id.to_string();
        Ok(())
    }
}

pub struct ServiceDomainResource {
    client: Arc<dyn GraphQlClient>,
}

impl ServiceDomainResource {
    pub fn new(client: Arc<dyn GraphQlClient>) -> Self {
        Self { client }
    }

    async fn rename(&self, data: &ServiceDomainModel, domain: &str, action: &'static str) -> ProviderResult<()> {
        let input = ServiceDomainUpdateInput {
            domain: domain.to_string(),
            service_id: data.service_id.clone(),
            environment_id: data.environment_id.clone(),
        };

        let updated = domains::update_service_domain(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client(action))?;

        if !updated {
            return Err(ProviderError::Invariant(
                "Unable to update service domain, got false as response".to_string(),
            ));
        }

        tracing::trace!("updated a service domain");
        Ok(())
    }

    /// Find `domain` among the service instance domains and copy it into `data`
    async fn refresh(&self, project_id: &str, domain: &str, data: &mut ServiceDomainModel) -> ProviderResult<()> {
        let listed = domains::list_service_domains(
            self.client.as_ref(),
            &data.environment_id,
            &data.service_id,
            project_id,
        )
        .await
        .map_err(ProviderError::client("read service domain"))?;

        let found = listed
            .into_iter()
            .find(|d| d.domain == domain)
            .ok_or_else(|| ProviderError::NotFound(format!("service domain {}", domain)))?;

        data.apply(found, project_id)
    }
}

#[async_trait]
impl Resource for ServiceDomainResource {
    type Model = ServiceDomainModel;

    fn type_name(&self) -> &'static str {
        "service_domain"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Railway service domain.",
            vec![
                Attribute::id("Identifier of the service domain."),
                Attribute::string("subdomain")
                    .required()
                    .description("Subdomain of the service domain.")
                    .validator(Validator::MinLength { min: 1 }),
                Attribute::parent_id(
                    "environment_id",
                    "Identifier of the environment the service domain belongs to.",
                ),
                Attribute::parent_id("service_id", "Identifier of the service the service domain belongs to."),
                Attribute::string("project_id")
                    .computed()
                    .description("Identifier of the project the service domain belongs to."),
                Attribute::string("suffix")
                    .computed()
                    .description("Suffix of the service domain."),
                Attribute::string("domain")
                    .computed()
                    .description("Full domain of the service domain."),
            ],
        )
    }

    async fn create(&self, mut plan: ServiceDomainModel) -> ProviderResult<ServiceDomainModel> {
        let input = ServiceDomainCreateInput {
            service_id: plan.service_id.clone(),
            environment_id: plan.environment_id.clone(),
        };

        let created = domains::create_service_domain(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client("create service domain"))?;

        tracing::trace!("created a service domain");

        let domain = format!("{}.{}", plan.subdomain, created.suffix);
        self.rename(&plan, &domain, "update service domain").await?;

        let project_id = project_of_service(self.client.as_ref(), &created.service_id).await?;

        plan.environment_id = created.environment_id;
        plan.service_id = created.service_id;
        self.refresh(&project_id, &domain, &mut plan).await?;
        Ok(plan)
    }

    async fn read(&self, mut state: ServiceDomainModel) -> ProviderResult<ServiceDomainModel> {
        let project_id = state.project_id.clone();
        let domain = state.domain.clone();

        self.refresh(&project_id, &domain, &mut state).await?;
        Ok(state)
    }

    async fn update(&self, mut plan: ServiceDomainModel, state: ServiceDomainModel) -> ProviderResult<ServiceDomainModel> {
        let domain = format!("{}.{}", plan.subdomain, state.suffix);
        self.rename(&plan, &domain, "update service domain").await?;

        self.refresh(&state.project_id, &domain, &mut plan).await?;
        Ok(plan)
    }

    async fn delete(&self, state: ServiceDomainModel) -> ProviderResult<()> {
        domains::delete_service_domain(self.client.as_ref(), &state.id)
            .await
            .map_err(ProviderError::client("delete service domain"))?;

        tracing::trace!("deleted a service domain");
        Ok(())
    }

    async fn import_state(&self, id: &str, state: &mut State) -> ProviderResult<()> {
        let [service_id, environment_name, domain] = split_import_id::<3>(id, IMPORT_FORMAT)?;

        let project_id = project_of_service(self.client.as_ref(), service_id).await?;
        let environment_id = find_environment_id(self.client.as_ref(), &project_id, environment_name).await?;

        state.set_attribute("domain", domain)?;
        state.set_attribute("service_id", service_id)?;
        state.set_attribute("environment_id", environment_id)?;
        state.set_attribute("project_id", project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdomain_of() {
        assert_eq!(subdomain_of("api.up.railway.app", "up.railway.app").unwrap(), "api");
        assert_eq!(
            subdomain_of("my.api.up.railway.app", "up.railway.app").unwrap(),
            "my.api"
        );
    }

    #[test]
    fn test_subdomain_of_rejects_foreign_suffix() {
        assert!(subdomain_of("api.example.com", "up.railway.app").is_err());
        assert!(subdomain_of("up.railway.app", "up.railway.app").is_err());
        assert!(subdomain_of("apiup.railway.app", "up.railway.app").is_err());
    }
}
