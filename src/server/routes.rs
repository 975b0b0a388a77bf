use crate::assistant::{
    EnrichedClassifier, IntentClassifier, IntentEnricher, KeywordClassifier, QueryResult,
    answer_query,
};
use crate::azure::client::{AzureDevOpsClient, ClientOptions, Credentials};
use crate::azure::gateway::WorkTrackingGateway;
use chrono::Utc;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode, header};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

/// Process-wide settings. Holds no credentials: every request brings its own.
pub struct AppState {
    pub options: ClientOptions,
    pub classifier: Arc<dyn IntentClassifier>,
    pub enrichment_available: bool,
}

impl AppState {
    pub fn new(options: ClientOptions) -> Self {
        Self {
            options,
            classifier: Arc::new(KeywordClassifier),
            enrichment_available: false,
        }
    }

    /// Classifies through `enricher` when it is available, keywords otherwise.
    pub fn with_enricher(options: ClientOptions, enricher: Arc<dyn IntentEnricher>) -> Self {
        let classifier = EnrichedClassifier::new(enricher);
        Self {
            options,
            enrichment_available: classifier.enrichment_available(),
            classifier: Arc::new(classifier),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub config: Credentials,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    #[serde(flatten)]
    pub result: QueryResult,
    pub timestamp: String,
}

pub async fn handle<B>(
    state: Arc<AppState>,
    req: Request<B>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    log::info!("{} {}", method, path);

    let response = match (method, path.as_str()) {
        (Method::GET, "/") => json_response(
            StatusCode::OK,
            &json!({
                "status": "ADO Assistant API Running",
                "enrichment_available": state.enrichment_available,
                "timestamp": Utc::now().to_rfc3339(),
            }),
        ),
        (Method::POST, "/test-connection") => match read_json::<Credentials, _>(req).await {
            Ok(credentials) => test_connection(&state, credentials).await,
            Err(response) => response,
        },
        (Method::POST, "/query") => match read_json::<QueryRequest, _>(req).await {
            Ok(request) => query(&state, request).await,
            Err(response) => response,
        },
        _ => error_response(StatusCode::NOT_FOUND, "Not Found"),
    };

    Ok(response)
}

async fn test_connection(state: &AppState, credentials: Credentials) -> Response<Full<Bytes>> {
    match AzureDevOpsClient::new(credentials, &state.options) {
        Ok(client) => json_response(StatusCode::OK, &client.test_connection().await),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e),
    }
}

async fn query(state: &AppState, request: QueryRequest) -> Response<Full<Bytes>> {
    match answer_query(
        &request.query,
        request.config,
        &state.options,
        state.classifier.clone(),
    )
    .await
    {
        Ok(result) => json_response(
            StatusCode::OK,
            &QueryResponse {
                result,
                timestamp: Utc::now().to_rfc3339(),
            },
        ),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e),
    }
}

async fn read_json<T, B>(req: Request<B>) -> Result<T, Response<Full<Bytes>>>
where
    T: serde::de::DeserializeOwned,
    B: Body,
    B::Error: Display,
{
    let bytes = req
        .into_body()
        .collect()
        .await
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e))?
        .to_bytes();

    serde_json::from_slice(&bytes).map_err(|e| {
        log::debug!("Rejected request body: {}", e);
        error_response(StatusCode::BAD_REQUEST, e)
    })
}

fn json_response(status: StatusCode, body: &impl Serialize) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(bytes) => {
            let mut response = Response::new(Full::new(Bytes::from(bytes)));
            *response.status_mut() = status;
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("application/json"),
            );
            response
        }
        Err(e) => {
            log::error!("Failed to serialize response: {}", e);
            let mut response = Response::new(Full::new(Bytes::new()));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}

fn error_response(status: StatusCode, detail: impl Display) -> Response<Full<Bytes>> {
    json_response(status, &json!({ "detail": detail.to_string() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(ClientOptions::default()))
    }

    fn request(method: Method, path: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn body_json(response: Response<Full<Bytes>>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_reports_status() {
        let response = handle(state(), request(Method::GET, "/", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ADO Assistant API Running");
        assert_eq!(body["enrichment_available"], false);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = handle(state(), request(Method::GET, "/nope", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let response = handle(state(), request(Method::POST, "/query", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["detail"].is_string());
    }

    #[tokio::test]
    async fn blank_token_is_bad_request() {
        let body = r#"{"query": "bugs", "config": {"organization": "contoso", "project": "Fabrikam", "pat": "  "}}"#;
        let response = handle(state(), request(Method::POST, "/query", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_project_is_rejected_without_remote_calls() {
        let body = r#"{"organization": "contoso", "project": "a'b", "pat": "secret"}"#;
        let response = handle(state(), request(Method::POST, "/test-connection", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let detail = body_json(response).await["detail"].as_str().unwrap().to_string();
        assert!(detail.starts_with("Invalid project name"));
    }

    struct OfflineModel;

    impl IntentEnricher for OfflineModel {
        fn is_available(&self) -> bool {
            false
        }

        fn suggest(&self, _text: &str) -> Option<crate::assistant::IntentTag> {
            None
        }
    }

    #[tokio::test]
    async fn root_reports_unavailable_enricher() {
        let state = Arc::new(AppState::with_enricher(
            ClientOptions::default(),
            Arc::new(OfflineModel),
        ));
        let response = handle(state, request(Method::GET, "/", "")).await.unwrap();
        assert_eq!(body_json(response).await["enrichment_available"], false);
    }

    #[test]
    fn query_response_flattens_result() {
        let response = QueryResponse {
            result: QueryResult::new("ok", crate::assistant::IntentTag::All, 3, 2),
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["answer"], "ok");
        assert_eq!(value["query_type"], "all");
        assert_eq!(value["items_found"], 3);
        assert_eq!(value["api_calls"], 2);
        assert_eq!(value["timestamp"], "2024-01-01T00:00:00+00:00");
    }
}
