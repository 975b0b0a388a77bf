use crate::azure::client::{API_VERSION, AzureDevOpsClient, AzureError};
use crate::azure::models::{
    WiqlQuery, WiqlResponse, WorkItem, WorkItemListResponse, WorkItemReference,
};

/// The work items endpoint accepts at most this many ids per call.
pub const MAX_IDS_PER_REQUEST: usize = 200;

/// Runs a WIQL statement and returns the matching work item ids in query order.
pub async fn query_work_item_ids(
    client: &AzureDevOpsClient,
    wiql: &str,
) -> Result<Vec<WorkItemReference>, AzureError> {
    log::debug!("Executing WIQL query: {}", wiql.trim());

    let body = WiqlQuery {
        query: wiql.to_string(),
    };
    let path = format!("wit/wiql?api-version={}", API_VERSION);
    let response: WiqlResponse = client.post(&path, &body).await?;
    Ok(response.work_items)
}

/// Fetches full field sets for the given ids. Only the first
/// [`MAX_IDS_PER_REQUEST`] ids are sent.
pub async fn get_work_items(
    client: &AzureDevOpsClient,
    ids: &[u32],
) -> Result<Vec<WorkItem>, AzureError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let ids_to_fetch = if ids.len() > MAX_IDS_PER_REQUEST {
        log::warn!(
            "Requested {} work items, limiting to {} items",
            ids.len(),
            MAX_IDS_PER_REQUEST
        );
        &ids[..MAX_IDS_PER_REQUEST]
    } else {
        ids
    };

    let ids_str = ids_to_fetch
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let path = format!(
        "wit/workitems?ids={}&$expand=all&api-version={}",
        ids_str, API_VERSION
    );
    let response: WorkItemListResponse = client.get(&path).await?;
    Ok(response.value)
}
