//! Data sources served by the provider

mod plugin_variable;

pub use plugin_variable::{PluginVariableDataSource, PluginVariableModel};
