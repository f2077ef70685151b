//! Terraform provider for Railway
//!
//! Resources and data sources map Terraform records onto Railway's GraphQL API.

pub mod config;
pub mod error;
pub mod provider;
pub mod railway;
pub mod reconcile;

/// Version injected at compile time via RAILWAY_PROVIDER_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("RAILWAY_PROVIDER_VERSION") {
    Some(v) => v,
    None => "dev",
};
