use crate::azure::client::{API_VERSION, AzureDevOpsClient, AzureError};
use crate::azure::models::{Build, BuildListResponse};

/// Lists the most recent `top` builds of the project, newest first.
pub async fn list_builds(client: &AzureDevOpsClient, top: u32) -> Result<Vec<Build>, AzureError> {
    let path = format!("build/builds?$top={}&api-version={}", top, API_VERSION);
    let response: BuildListResponse = client.get(&path).await?;
    Ok(response.value)
}
