//! In-memory GraphQL client for resource tests
//!
//! Responses are scripted per operation name. The last scripted response of an
//! operation is reused for later calls. Every call is recorded in order.

#![allow(dead_code)]

use async_trait::async_trait;
use railway_provider::railway::client::{GraphQlClient, Operation};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const PROJECT_ID: &str = "0bb01547-570d-4109-a5e8-138691f6a2d1";
pub const ENVIRONMENT_ID: &str = "6e5e9d0a-8b73-4a4c-9d3b-1c6b1b2f5a11";
pub const SERVICE_ID: &str = "89fa0236-2b1b-4a8c-b12d-ae3634b30d97";
pub const VOLUME_ID: &str = "3f1c9a51-0d0e-4d53-9b8f-5f0f3c7e2a44";
pub const PLUGIN_ID: &str = "d2b7e6a4-5c1f-4e8b-a0d3-7f9e2c4b6a18";
pub const STAGING_ENVIRONMENT_ID: &str = "a41f0c3e-92d7-4b5a-8e6c-1d3f5b7a9c20";

#[derive(Debug, Clone)]
pub struct Call {
    pub operation: String,
    pub variables: Value,
}

#[derive(Default)]
pub struct MockClient {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, String>>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script a successful `data` object for `operation`
    pub fn respond(&self, operation: &str, data: Value) -> &Self {
        self.push(operation, Ok(data))
    }

    /// Script a failure for `operation`
    pub fn fail(&self, operation: &str, message: &str) -> &Self {
        self.push(operation, Err(message.to_string()))
    }

    fn push(&self, operation: &str, response: Result<Value, String>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry(operation.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Operation names in call order
    pub fn operations(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.operation).collect()
    }

    /// Variables of every call to `operation`
    pub fn calls_to(&self, operation: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|c| c.operation == operation)
            .map(|c| c.variables)
            .collect()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls_to(operation).len()
    }
}

#[async_trait]
impl GraphQlClient for MockClient {
    async fn execute(&self, operation: &Operation, variables: Value) -> anyhow::Result<Value> {
        self.calls.lock().unwrap().push(Call {
            operation: operation.name.to_string(),
            variables,
        });

        let mut responses = self.responses.lock().unwrap();
        let queue = responses
            .get_mut(operation.name)
            .ok_or_else(|| anyhow::anyhow!("unexpected operation {}", operation.name))?;

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        match response {
            Some(Ok(data)) => Ok(data),
            Some(Err(message)) => Err(anyhow::anyhow!("{}", message)),
            None => anyhow::bail!("unexpected operation {}", operation.name),
        }
    }
}
