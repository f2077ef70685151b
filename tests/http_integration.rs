//! Integration tests for the Railway GraphQL client using wiremock
//!
//! These tests verify the HTTP transport against a mocked endpoint: request shape,
//! authentication, GraphQL error envelopes and HTTP status failures.

use railway_provider::railway::client::{GraphQlClient, RailwayClient};
use railway_provider::railway::{projects, services, variables};
use serde_json::json;
use url::Url;
use wiremock::matchers::{bearer_token, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GRAPHQL_PATH: &str = "/graphql/v2";

fn client_for(server: &MockServer) -> RailwayClient {
    let endpoint = Url::parse(&format!("{}{}", server.uri(), GRAPHQL_PATH)).unwrap();
    RailwayClient::new(endpoint, "test-token").unwrap()
}

mod transport_tests {
    use super::*;

    /// Requests are POSTed as JSON with the bearer token and operation name
    #[tokio::test]
    async fn test_request_carries_token_and_operation() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(bearer_token("test-token"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "operationName": "getService",
                "variables": { "id": "svc-1" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "service": { "id": "svc-1", "name": "api", "projectId": "prj-1" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let service = services::get_service(&client, "svc-1").await.unwrap();

        assert_eq!(service.id, "svc-1");
        assert_eq!(service.name, "api");
        assert_eq!(service.project_id, "prj-1");
    }

    /// The query document is sent alongside the variables
    #[tokio::test]
    async fn test_request_includes_query_document() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({
                "query": services::GET_SERVICE.document
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "service": { "id": "svc-1", "name": "api", "projectId": "prj-1" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let data = client
            .execute(&services::GET_SERVICE, json!({ "id": "svc-1" }))
            .await
            .unwrap();

        assert_eq!(data["service"]["name"], "api");
    }

    /// GraphQL errors fail the call even with HTTP 200, keeping the server messages
    #[tokio::test]
    async fn test_graphql_errors_are_reported() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [
                    { "message": "Not Authorized" },
                    { "message": "Project not found" }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = projects::get_project(&client, "prj-1").await.unwrap_err();
        let message = format!("{:#}", err);

        assert!(message.contains("getProject"));
        assert!(message.contains("Not Authorized; Project not found"));
    }

    /// HTTP 401 is a failure naming the operation and the status
    #[tokio::test]
    async fn test_401_returns_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "errors": [{ "message": "Unauthorized" }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .execute(&services::GET_SERVICE, json!({ "id": "svc-1" }))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("getService request failed"));
        assert!(message.contains("401"));
    }

    /// HTTP 500 is a failure
    #[tokio::test]
    async fn test_500_returns_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client
            .execute(&services::GET_SERVICE, json!({ "id": "svc-1" }))
            .await;

        assert!(result.unwrap_err().to_string().contains("500"));
    }

    /// A 200 response without data and without errors is a failure
    #[tokio::test]
    async fn test_missing_data_returns_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .execute(&services::GET_SERVICE, json!({ "id": "svc-1" }))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("getService returned no data"));
    }

    /// A body that is not JSON is a failure
    #[tokio::test]
    async fn test_malformed_json_returns_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client
            .execute(&services::GET_SERVICE, json!({ "id": "svc-1" }))
            .await;

        assert!(result.is_err());
    }

    /// Data with an unexpected shape fails to decode with the operation named
    #[tokio::test]
    async fn test_unexpected_shape_fails_decode() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "service": { "id": 42 } }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = services::get_service(&client, "svc-1").await.unwrap_err();

        assert!(err.to_string().contains("Failed to decode getService response"));
    }
}

mod operation_tests {
    use super::*;

    /// Variables come back as a name to value map
    #[tokio::test]
    async fn test_get_variables_map() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({
                "operationName": "getVariables",
                "variables": {
                    "projectId": "prj-1",
                    "environmentId": "env-1",
                    "serviceId": "svc-1"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "variables": { "REDIS_URL": "1234567890", "PORT": "8080" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let vars = variables::get_variables(&client, "prj-1", "env-1", Some("svc-1"))
            .await
            .unwrap();

        assert_eq!(vars.len(), 2);
        assert_eq!(vars["REDIS_URL"], "1234567890");
    }

    /// Project environments are decoded from the connection edges
    #[tokio::test]
    async fn test_get_project_with_environments() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({ "operationName": "getProject" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "project": {
                        "id": "prj-1",
                        "name": "todo-app",
                        "description": null,
                        "isPublic": false,
                        "prDeploys": true,
                        "team": null,
                        "environments": {
                            "edges": [
                                { "node": { "id": "env-2", "name": "staging", "createdAt": "2024-03-01T10:00:00Z" } },
                                { "node": { "id": "env-1", "name": "production", "createdAt": "2024-01-01T10:00:00Z" } }
                            ]
                        }
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let project = projects::get_project(&client, "prj-1").await.unwrap();

        assert_eq!(project.name, "todo-app");
        assert!(project.pr_deploys);
        assert!(project.team.is_none());

        let names: Vec<&str> = project.environments.nodes().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["staging", "production"]);
    }
}
