//! Railway API interaction module
//!
//! This module provides the GraphQL transport and the fixed, named operations the
//! provider runs against Railway.
//!
//! # Module Structure
//!
//! - [`client`] - `GraphQlClient` trait and the authenticated HTTP implementation
//! - [`http`] - HTTP utilities for GraphQL POST requests
//! - one module per entity with its operations and response types
//!
//! # Example
//!
//! ```ignore
//! use railway_provider::railway::{client::RailwayClient, projects};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = RailwayClient::new("https://backboard.railway.app/graphql/v2".parse()?, "token")?;
//!     let project = projects::get_project(&client, "0bb01547-570d-4109-a5e8-138691f6a2d1").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod deployment_triggers;
pub mod domains;
pub mod environments;
pub mod http;
pub mod plugins;
pub mod projects;
pub mod services;
pub mod tcp_proxies;
pub mod variables;
pub mod volumes;

use serde::Deserialize;

/// Relay-style connection returned by list fields
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    /// Consume the connection and return its nodes in order
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|e| e.node).collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}
