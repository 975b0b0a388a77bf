use crate::azure::client::{API_VERSION, AzureDevOpsClient, AzureError};
use crate::azure::models::{PullRequest, PullRequestListResponse};

/// Lists pull requests across the project's repositories filtered by status
/// (`active`, `completed`, `abandoned` or `all`).
pub async fn list_pull_requests(
    client: &AzureDevOpsClient,
    status: &str,
) -> Result<Vec<PullRequest>, AzureError> {
    let path = format!(
        "git/pullrequests?searchCriteria.status={}&api-version={}",
        urlencoding::encode(status),
        API_VERSION
    );
    let response: PullRequestListResponse = client.get(&path).await?;
    Ok(response.value)
}
