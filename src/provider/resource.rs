//! Resource and data source traits
//!
//! Resources are written against typed models. [`DynamicResource`] and
//! [`DynamicDataSource`] are the object-safe forms the provider registers; they convert
//! JSON records to models and run configuration validation before create and update.

use super::diagnostics::Diagnostics;
use super::schema::Schema;
use super::state::State;
use crate::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A managed resource type
#[async_trait]
pub trait Resource: Send + Sync {
    type Model: Serialize + DeserializeOwned + Send + Sync;

    /// Type name suffix, e.g. `project` for `railway_project`
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Cross-attribute checks run after the schema validators pass
    fn validate(&self, _config: &Self::Model) -> Diagnostics {
        Diagnostics::default()
    }

    async fn create(&self, plan: Self::Model) -> ProviderResult<Self::Model>;

    async fn read(&self, state: Self::Model) -> ProviderResult<Self::Model>;

    async fn update(&self, plan: Self::Model, state: Self::Model) -> ProviderResult<Self::Model>;

    async fn delete(&self, state: Self::Model) -> ProviderResult<()>;

    /// Populate `state` from an import identifier. Defaults to passing the id through.
    async fn import_state(&self, id: &str, state: &mut State) -> ProviderResult<()> {
        state.set_attribute("id", id)
    }
}

/// A read-only data source type
#[async_trait]
pub trait DataSource: Send + Sync {
    type Model: Serialize + DeserializeOwned + Send + Sync;

    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn read(&self, config: Self::Model) -> ProviderResult<Self::Model>;
}

/// Object-safe resource operating on JSON records
#[async_trait]
pub trait DynamicResource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    fn validate_config(&self, config: &Value) -> Diagnostics;

    async fn create_record(&self, plan: Value) -> ProviderResult<Value>;

    async fn read_record(&self, state: Value) -> ProviderResult<Value>;

    async fn update_record(&self, plan: Value, state: Value) -> ProviderResult<Value>;

    async fn delete_record(&self, state: Value) -> ProviderResult<()>;

    /// Import by identifier, then read the resource like a refresh would
    async fn import_record(&self, id: &str) -> ProviderResult<Value>;
}

/// Object-safe data source operating on JSON records
#[async_trait]
pub trait DynamicDataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    fn validate_config(&self, config: &Value) -> Diagnostics;

    async fn read_record(&self, config: Value) -> ProviderResult<Value>;
}

/// Adapter from a typed resource or data source to its dynamic form
pub struct Erased<T>(pub T);

fn decode<M: DeserializeOwned>(record: Value) -> ProviderResult<M> {
    Ok(serde_json::from_value(record)?)
}

fn encode<M: Serialize>(model: &M) -> ProviderResult<Value> {
    Ok(serde_json::to_value(model)?)
}

impl<R: Resource> Erased<R> {
    /// Validate and decode a configuration record
    fn checked(&self, config: Value) -> ProviderResult<R::Model> {
        let diags = DynamicResource::validate_config(self, &config);
        if diags.has_error() {
            return Err(ProviderError::Validation(diags));
        }
        decode(config)
    }
}

#[async_trait]
impl<R: Resource> DynamicResource for Erased<R> {
    fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    fn schema(&self) -> Schema {
        self.0.schema()
    }

    fn validate_config(&self, config: &Value) -> Diagnostics {
        let mut diags = self.0.schema().validate(config);
        if diags.has_error() {
            return diags;
        }

        match serde_json::from_value::<R::Model>(config.clone()) {
            Ok(model) => diags.extend(self.0.validate(&model)),
            Err(e) => diags.add_error("Invalid Configuration", e.to_string()),
        }
        diags
    }

    async fn create_record(&self, plan: Value) -> ProviderResult<Value> {
        let plan = self.checked(plan)?;
        let created = self.0.create(plan).await?;
        encode(&created)
    }

    async fn read_record(&self, state: Value) -> ProviderResult<Value> {
        let read = self.0.read(decode(state)?).await?;
        encode(&read)
    }

    async fn update_record(&self, plan: Value, state: Value) -> ProviderResult<Value> {
        let plan = self.checked(plan)?;
        let updated = self.0.update(plan, decode(state)?).await?;
        encode(&updated)
    }

    async fn delete_record(&self, state: Value) -> ProviderResult<()> {
        self.0.delete(decode(state)?).await
    }

    async fn import_record(&self, id: &str) -> ProviderResult<Value> {
        let mut state = State::new();
        self.0.import_state(id, &mut state).await?;

        let read = self.0.read(state.get()?).await?;
        encode(&read)
    }
}

#[async_trait]
impl<D: DataSource> DynamicDataSource for Erased<D> {
    fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    fn schema(&self) -> Schema {
        self.0.schema()
    }

    fn validate_config(&self, config: &Value) -> Diagnostics {
        self.0.schema().validate(config)
    }

    async fn read_record(&self, config: Value) -> ProviderResult<Value> {
        let diags = DynamicDataSource::validate_config(self, &config);
        if diags.has_error() {
            return Err(ProviderError::Validation(diags));
        }

        let read = self.0.read(decode(config)?).await?;
        encode(&read)
    }
}
