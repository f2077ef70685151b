//! `railway_tcp_proxy`

use crate::error::{ProviderError, ProviderResult};
use crate::provider::lookup::split_import_id;
use crate::provider::resource::Resource;
use crate::provider::schema::{Attribute, Schema, Validator};
use crate::provider::state::State;
use crate::railway::client::GraphQlClient;
use crate::railway::tcp_proxies::{self, TcpProxy, TcpProxyCreateInput};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const IMPORT_FORMAT: &str = "service_id:environment_id:tcp_proxy_id";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpProxyModel {
    pub id: String,
    pub application_port: i64,
    pub environment_id: String,
    pub service_id: String,
    pub proxy_port: i64,
    pub domain: String,
}

impl From<TcpProxy> for TcpProxyModel {
    fn from(proxy: TcpProxy) -> Self {
        Self {
            id: proxy.id,
            application_port: proxy.application_port,
            environment_id: proxy.environment_id,
            service_id: proxy.service_id,
            proxy_port: proxy.proxy_port,
            domain: proxy.domain,
        }
    }
}

pub struct TcpProxyResource {
    client: Arc<dyn GraphQlClient>,
}

impl TcpProxyResource {
    pub fn new(client: Arc<dyn GraphQlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for TcpProxyResource {
    type Model = TcpProxyModel;

    fn type_name(&self) -> &'static str {
        "tcp_proxy"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Railway TCP proxy.",
            vec![
                Attribute::id("Identifier of the TCP proxy."),
                Attribute::int64("application_port")
                    .required()
                    .requires_replace()
                    .description("Port of the application the TCP proxy points to.")
                    .validator(Validator::Between { min: 1, max: 65535 }),
                Attribute::parent_id(
                    "environment_id",
                    "Identifier of the environment the TCP proxy belongs to.",
                ),
                Attribute::parent_id("service_id", "Identifier of the service the TCP proxy belongs to."),
                Attribute::int64("proxy_port")
                    .computed()
                    .description("Port of the TCP proxy."),
                Attribute::string("domain")
                    .computed()
                    .description("Domain of the TCP proxy."),
            ],
        )
    }

    async fn create(&self, plan: TcpProxyModel) -> ProviderResult<TcpProxyModel> {
        let input = TcpProxyCreateInput {
            application_port: plan.application_port,
            service_id: plan.service_id,
            environment_id: plan.environment_id,
        };

        let proxy = tcp_proxies::create_tcp_proxy(self.client.as_ref(), &input)
            .await
            .map_err(ProviderError::client("create tcp proxy"))?;

        tracing::trace!("created a tcp proxy");
        Ok(proxy.into())
    }

    async fn read(&self, state: TcpProxyModel) -> ProviderResult<TcpProxyModel> {
        let proxies = tcp_proxies::list_tcp_proxies(self.client.as_ref(), &state.environment_id, &state.service_id)
            .await
            .map_err(ProviderError::client("read tcp proxy"))?;

        match proxies.into_iter().find(|proxy| proxy.id == state.id) {
            Some(proxy) => Ok(proxy.into()),
            None => {
                tracing::warn!(id = %state.id, "tcp proxy not found for its service instance");
                Ok(state)
            }
        }
    }

    async fn update(&self, plan: TcpProxyModel, state: TcpProxyModel) -> ProviderResult<TcpProxyModel> {
        Ok(TcpProxyModel {
            id: state.id,
            proxy_port: state.proxy_port,
            domain: state.domain,
            ..plan
        })
    }

    async fn delete(&self, state: TcpProxyModel) -> ProviderResult<()> {
        tcp_proxies::delete_tcp_proxy(self.client.as_ref(), &state.id)
            .await
            .map_err(ProviderError::client("delete tcp proxy"))?;

        tracing::trace!("deleted a tcp proxy");
        Ok(())
    }

    async fn import_state(&self, id: &str, state: &mut State) -> ProviderResult<()> {
        let [service_id, environment_id, proxy_id] = split_import_id::<3>(id, IMPORT_FORMAT)?;

        state.set_attribute("id", proxy_id)?;
        state.set_attribute("service_id", service_id)?;
        state.set_attribute("environment_id", environment_id)
    }
}
