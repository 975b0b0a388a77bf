use crate::azure::client::{AzureDevOpsClient, AzureError};
use crate::azure::models::{Build, ConnectionStatus, PullRequest, WorkItem, WorkItemReference};
use crate::azure::{builds, git, projects, work_items};
use async_trait::async_trait;

/// The remote operations the query pipeline needs. Implementations perform a
/// single round-trip per call and never retry.
#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
#[async_trait]
pub trait WorkTrackingGateway: Send + Sync {
    async fn test_connection(&self) -> ConnectionStatus;

    async fn run_item_query(&self, wiql: &str) -> Result<Vec<WorkItemReference>, AzureError>;

    async fn fetch_item_details(&self, ids: &[u32]) -> Result<Vec<WorkItem>, AzureError>;

    async fn list_pull_requests(&self, status: &str) -> Result<Vec<PullRequest>, AzureError>;

    async fn list_builds(&self, top: u32) -> Result<Vec<Build>, AzureError>;
}

#[async_trait]
impl WorkTrackingGateway for AzureDevOpsClient {
    async fn test_connection(&self) -> ConnectionStatus {
        projects::test_connection(self).await
    }

    async fn run_item_query(&self, wiql: &str) -> Result<Vec<WorkItemReference>, AzureError> {
        work_items::query_work_item_ids(self, wiql).await
    }

    async fn fetch_item_details(&self, ids: &[u32]) -> Result<Vec<WorkItem>, AzureError> {
        work_items::get_work_items(self, ids).await
    }

    async fn list_pull_requests(&self, status: &str) -> Result<Vec<PullRequest>, AzureError> {
        git::list_pull_requests(self, status).await
    }

    async fn list_builds(&self, top: u32) -> Result<Vec<Build>, AzureError> {
        builds::list_builds(self, top).await
    }
}
