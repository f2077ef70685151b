//! Railway Client
//!
//! The provider talks to Railway exclusively through [`GraphQlClient`], which executes
//! a fixed, named operation. [`RailwayClient`] is the HTTP implementation; tests plug in
//! their own implementation.

use super::http::RailwayHttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

/// Public Railway GraphQL endpoint
pub const DEFAULT_ENDPOINT: &str = "https://backboard.railway.app/graphql/v2";

/// A named GraphQL document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub document: &'static str,
}

/// Executes named GraphQL operations
#[async_trait]
pub trait GraphQlClient: Send + Sync {
    /// Run `operation` with `variables` and return the response `data` object
    async fn execute(&self, operation: &Operation, variables: Value) -> Result<Value>;
}

/// Run an operation with typed variables and decode the typed response
pub async fn run<V, R>(client: &dyn GraphQlClient, operation: &Operation, variables: &V) -> Result<R>
where
    V: Serialize + ?Sized + Sync,
    R: DeserializeOwned,
{
    let variables = serde_json::to_value(variables)
        .with_context(|| format!("Failed to encode variables for {}", operation.name))?;

    let data = client.execute(operation, variables).await?;

    serde_json::from_value(data)
        .with_context(|| format!("Failed to decode {} response", operation.name))
}

/// HTTP GraphQL client authenticated with a bearer token
#[derive(Clone)]
pub struct RailwayClient {
    http: RailwayHttpClient,
    token: String,
}

impl RailwayClient {
    /// Create a new client against `endpoint`
    pub fn new(endpoint: Url, token: &str) -> Result<Self> {
        let http = RailwayHttpClient::new(endpoint)?;

        Ok(Self {
            http,
            token: token.to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        self.http.endpoint()
    }
}

impl std::fmt::Debug for RailwayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RailwayClient")
            .field("endpoint", &self.http.endpoint().as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GraphQlClient for RailwayClient {
    async fn execute(&self, operation: &Operation, variables: Value) -> Result<Value> {
        let body = json!({
            "operationName": operation.name,
            "query": operation.document,
            "variables": variables,
        });

        self.http.post_graphql(operation.name, &self.token, &body).await
    }
}
