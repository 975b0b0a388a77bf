use crate::assistant::intent::{IntentClassifier, IntentTag, KeywordClassifier};
use crate::assistant::report;
use crate::assistant::result::QueryResult;
use crate::assistant::wiql::{self, QueryModifiers, QueryPlan};
use crate::azure::client::{AzureDevOpsClient, AzureError, ClientOptions, Credentials};
use crate::azure::gateway::WorkTrackingGateway;
use std::sync::Arc;

/// Runs one question through classify → build → gateway → render.
pub struct QueryProcessor<'a, G: WorkTrackingGateway + ?Sized> {
    gateway: &'a G,
    project: &'a str,
    classifier: Arc<dyn IntentClassifier>,
}

impl<'a, G: WorkTrackingGateway + ?Sized> QueryProcessor<'a, G> {
    pub fn new(gateway: &'a G, project: &'a str) -> Self {
        Self::with_classifier(gateway, project, Arc::new(KeywordClassifier))
    }

    pub fn with_classifier(
        gateway: &'a G,
        project: &'a str,
        classifier: Arc<dyn IntentClassifier>,
    ) -> Self {
        Self {
            gateway,
            project,
            classifier,
        }
    }

    pub async fn process_query(&self, query: &str) -> QueryResult {
        let intent = self.classifier.classify(query);
        let modifiers = QueryModifiers::from_text(query);
        log::info!("Query classified as {}", intent);

        match wiql::build_plan(intent, &modifiers, self.project) {
            QueryPlan::Wiql {
                statement,
                fetch_cap,
            } => {
                self.run_work_item_query(intent, &modifiers, &statement, fetch_cap)
                    .await
            }
            QueryPlan::PullRequests { status } => {
                match self.gateway.list_pull_requests(status).await {
                    Ok(prs) => report::render_pull_requests(&prs),
                    Err(e) => {
                        log::warn!("Pull request listing failed: {}", e);
                        report::failure(intent, &e)
                    }
                }
            }
            QueryPlan::Builds { top } => match self.gateway.list_builds(top).await {
                Ok(builds) => report::render_builds(&builds),
                Err(e) => {
                    log::warn!("Build listing failed: {}", e);
                    report::failure(intent, &e)
                }
            },
        }
    }

    async fn run_work_item_query(
        &self,
        intent: IntentTag,
        modifiers: &QueryModifiers,
        statement: &str,
        fetch_cap: usize,
    ) -> QueryResult {
        let refs = match self.gateway.run_item_query(statement).await {
            Ok(refs) => refs,
            Err(e) => {
                log::warn!("WIQL query for {} failed: {}", intent, e);
                return report::failure(intent, &e);
            }
        };

        if refs.is_empty() {
            return report::empty(intent, modifiers);
        }

        let ids: Vec<u32> = refs.iter().take(fetch_cap).map(|r| r.id).collect();
        let details = match self.gateway.fetch_item_details(&ids).await {
            Ok(details) => details,
            Err(e) => {
                log::warn!("Fetching details for {} work items failed: {}", ids.len(), e);
                Vec::new()
            }
        };

        let answer = report::render_work_items(intent, modifiers, refs.len(), &details);
        QueryResult::new(answer, intent, refs.len(), 2)
    }
}

/// Entry point for one inbound question: builds a client scoped to the
/// caller's credentials, answers the question and drops the client.
pub async fn answer_query(
    query: &str,
    credentials: Credentials,
    options: &ClientOptions,
    classifier: Arc<dyn IntentClassifier>,
) -> Result<QueryResult, AzureError> {
    let client = AzureDevOpsClient::new(credentials, options)?;
    let processor = QueryProcessor::with_classifier(&client, client.project(), classifier);
    Ok(processor.process_query(query).await)
}
