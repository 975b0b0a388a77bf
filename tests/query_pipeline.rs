use ado_query_assistant::assistant::{IntentTag, KeywordClassifier, answer_query};
use ado_query_assistant::azure::client::{ClientOptions, Credentials};
use ado_query_assistant::server::{http, routes::AppState};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn options(server: &MockServer) -> ClientOptions {
    ClientOptions {
        timeout: Duration::from_secs(10),
        base_url: Some(server.uri()),
    }
}

fn credentials() -> Credentials {
    Credentials::new("contoso", "Fabrikam", "secret")
}

async fn mount_open_bugs(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/Fabrikam/_apis/wit/wiql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workItems": [{ "id": 101 }, { "id": 102 }]
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Fabrikam/_apis/wit/workitems"))
        .and(query_param("ids", "101,102"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {
                    "id": 101,
                    "fields": {
                        "System.WorkItemType": "Bug",
                        "System.Title": "Crash on save",
                        "System.State": "Active",
                        "Microsoft.VSTS.Common.Priority": 1,
                        "System.AssignedTo": { "displayName": "Ada Lovelace" }
                    }
                },
                {
                    "id": 102,
                    "fields": {
                        "System.WorkItemType": "Bug",
                        "System.Title": "Typo in label",
                        "System.State": "New",
                        "Microsoft.VSTS.Common.Priority": 3
                    }
                }
            ]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn open_bugs_are_listed_in_query_order() {
    let server = MockServer::start().await;
    mount_open_bugs(&server).await;

    let result = answer_query(
        "show me open bugs",
        credentials(),
        &options(&server),
        Arc::new(KeywordClassifier),
    )
    .await
    .unwrap();

    assert_eq!(result.query_type, IntentTag::Bugs);
    assert_eq!(result.items_found, 2);
    assert_eq!(result.api_calls, 2);
    assert_eq!(
        result.answer,
        "Found 2 bug(s):\n\n\
         • #101: Crash on save\n  State: Active | Priority: 1 | Assigned to: Ada Lovelace\n\n\
         • #102: Typo in label\n  State: New | Priority: 3 | Assigned to: Unassigned\n\n"
    );
}

#[tokio::test]
async fn unauthorized_query_renders_failure_template() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Fabrikam/_apis/wit/wiql"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Fabrikam/_apis/wit/workitems"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = answer_query(
        "any bugs?",
        credentials(),
        &options(&server),
        Arc::new(KeywordClassifier),
    )
    .await
    .unwrap();

    assert_eq!(result.answer, "Failed to query bugs: Status 401: Unauthorized");
    assert_eq!(result.items_found, 0);
    assert_eq!(result.api_calls, 1);
}

#[tokio::test]
async fn failed_build_is_summarized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Fabrikam/_apis/build/builds"))
        .and(query_param("$top", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "value": [{
                "id": 900,
                "status": "completed",
                "result": "failed",
                "definition": { "name": "CI" },
                "requestedFor": { "displayName": "Grace Hopper" },
                "startTime": "2024-05-01T10:00:00Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = answer_query(
        "builds",
        credentials(),
        &options(&server),
        Arc::new(KeywordClassifier),
    )
    .await
    .unwrap();

    assert_eq!(result.query_type, IntentTag::Builds);
    assert!(result.answer.contains("❌ Build #900: CI"));
    assert!(result.answer.contains("Requested by: Grace Hopper"));
    assert!(result.answer.contains("Summary: 0 succeeded, 1 failed"));
    assert_eq!(result.items_found, 1);
    assert_eq!(result.api_calls, 1);
}

#[tokio::test]
async fn http_query_endpoint_returns_result_with_timestamp() {
    let server = MockServer::start().await;
    mount_open_bugs(&server).await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(AppState::new(options(&server)));
    tokio::spawn(http::serve(listener, state));

    let response = reqwest::Client::new()
        .post(format!("http://{}/query", addr))
        .json(&json!({
            "query": "show me open bugs",
            "config": { "organization": "contoso", "project": "Fabrikam", "pat": "secret" }
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["query_type"], "bugs");
    assert_eq!(body["items_found"], 2);
    assert_eq!(body["api_calls"], 2);
    assert!(body["answer"].as_str().unwrap().contains("#101: Crash on save"));
    assert!(body["timestamp"].is_string());
}
