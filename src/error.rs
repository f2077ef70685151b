//! Provider error types
//!
//! Every failure aborts the running operation and is reported to the operator as a
//! single diagnostic. Transport failures keep the underlying error text verbatim.

use crate::provider::diagnostics::{Diagnostic, Diagnostics};
use thiserror::Error;

/// Errors surfaced by resource and data source operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A GraphQL call failed (auth failure, not found, server error, decode error).
    #[error("Unable to {action}, got error: {source:#}")]
    Client {
        action: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("malformed deployment metadata: {0}")]
    MalformedMetadata(String),

    /// A locally checked invariant did not hold for data returned by the API.
    #[error("{0}")]
    Invariant(String),

    #[error("Expected import identifier with format: {format}. Got: {id:?}")]
    ImportId { format: &'static str, id: String },

    #[error("configuration is invalid: {0}")]
    Validation(Diagnostics),

    #[error(
        "Required token could not be found. Please set the token using an input variable in \
         the provider configuration block or by using the `RAILWAY_TOKEN` environment variable."
    )]
    MissingToken,

    #[error("endpoint {0:?} is not an absolute URL")]
    InvalidEndpoint(String),

    #[error("unable to decode record: {0}")]
    Decode(#[from] serde_json::Error),

    /// A local record file or stdin could not be read or parsed.
    #[error("unable to read input record: {0:#}")]
    Input(anyhow::Error),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

impl ProviderError {
    /// Build a closure wrapping a transport error with the action that failed.
    ///
    /// Used as `.map_err(ProviderError::client("create project"))`.
    pub fn client(action: &str) -> impl FnOnce(anyhow::Error) -> ProviderError + '_ {
        move |source| ProviderError::Client {
            action: action.to_string(),
            source,
        }
    }

    /// Convert into the diagnostics reported back to Terraform.
    pub fn into_diagnostics(self) -> Diagnostics {
        if let ProviderError::Validation(diags) = self {
            return diags;
        }

        let summary = match &self {
            ProviderError::ImportId { .. } => "Unexpected Import Identifier",
            ProviderError::MissingToken => "Missing API token",
            ProviderError::InvalidEndpoint(_) => "Invalid Provider Configuration",
            ProviderError::Decode(_) | ProviderError::Input(_) => "Invalid Record",
            _ => "Client Error",
        };

        let mut diags = Diagnostics::default();
        diags.push(Diagnostic::error(summary, self.to_string()));
        diags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_keeps_action_and_source() {
        let err = ProviderError::client("create project")(anyhow::anyhow!("unauthorized"));
        assert_eq!(
            err.to_string(),
            "Unable to create project, got error: unauthorized"
        );

        let diags = err.into_diagnostics();
        assert!(diags.has_error());
        assert_eq!(diags.iter().next().map(|d| d.summary.as_str()), Some("Client Error"));
    }

    #[test]
    fn test_import_id_summary() {
        let err = ProviderError::ImportId {
            format: "service_id:environment_name:name",
            id: "abc".to_string(),
        };
        let diags = err.into_diagnostics();
        let first = diags.iter().next().unwrap();
        assert_eq!(first.summary, "Unexpected Import Identifier");
        assert!(first.detail.contains("service_id:environment_name:name"));
    }

    #[test]
    fn test_input_error_is_not_a_client_error() {
        let source = anyhow::anyhow!("expected value at line 1 column 1").context("Record is not valid JSON");
        let err = ProviderError::Input(source);
        assert_eq!(
            err.to_string(),
            "unable to read input record: Record is not valid JSON: expected value at line 1 column 1"
        );

        let diags = err.into_diagnostics();
        assert_eq!(diags.iter().next().map(|d| d.summary.as_str()), Some("Invalid Record"));
    }
}
