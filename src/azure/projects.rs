use crate::azure::client::{API_VERSION, AzureDevOpsClient, AzureError};
use crate::azure::models::{ConnectionStatus, ProjectListResponse};
use reqwest::Method;

/// List all projects in the client's organization
pub async fn list_projects(client: &AzureDevOpsClient) -> Result<ProjectListResponse, AzureError> {
    let path = format!("projects?api-version={}", API_VERSION);
    client
        .org_request(Method::GET, &path, None::<&String>)
        .await
}

/// Probes the organization by listing its projects. Failures are reported in
/// the returned status rather than as an error.
pub async fn test_connection(client: &AzureDevOpsClient) -> ConnectionStatus {
    match list_projects(client).await {
        Ok(response) => ConnectionStatus {
            connected: true,
            project_count: Some(response.count),
            projects: Some(response.value.into_iter().map(|p| p.name).collect()),
            error: None,
        },
        Err(e) => {
            log::warn!(
                "Connection test failed for organization {}: {}",
                client.organization(),
                e
            );
            ConnectionStatus::failed(e.to_string())
        }
    }
}
