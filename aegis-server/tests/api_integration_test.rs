//! HTTP API tests for aegis-server

use reqwest::Client;
use serde_json::{Value, json};

mod common;
use common::{ADMIN, TestServer, label_id, principal};

async fn register(client: &Client, server: &TestServer, caller: &str) -> String {
    let response = client
        .post(format!("{}/identities", server.url))
        .header("X-Principal", caller)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    body["did"].as_str().unwrap().to_string()
}

async fn register_resource(
    client: &Client,
    server: &TestServer,
    caller: &str,
    resource_id: &str,
    owner_did: &str,
) -> reqwest::Response {
    client
        .post(format!("{}/resources", server.url))
        .header("X-Principal", caller)
        .json(&json!({ "resource_id": resource_id, "owner_did": owner_did }))
        .send()
        .await
        .expect("Failed to send request")
}

async fn has_access(client: &Client, server: &TestServer, resource_id: &str, did: &str) -> bool {
    let body: Value = client
        .get(format!("{}/resources/{}/grants/{}", server.url, resource_id, did))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    body["has_access"].as_bool().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", server.url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["next_sequence"], 0);
}

#[tokio::test]
async fn test_share_scenario_over_http() {
    let server = TestServer::start().await;
    let client = Client::new();
    let a1 = principal(0xa1);
    let a2 = principal(0xa2);
    let file = label_id("fileCID-1");

    let did1 = register(&client, &server, &a1).await;
    let response = register_resource(&client, &server, &a1, &file, &did1).await;
    assert_eq!(response.status(), 201);
    let did2 = register(&client, &server, &a2).await;

    let response = client
        .post(format!("{}/resources/{}/grants", server.url, file))
        .header("X-Principal", &a1)
        .json(&json!({ "grantee_did": did2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    assert!(has_access(&client, &server, &file, &did2).await);

    // Non-owner cannot grant
    let response = client
        .post(format!("{}/resources/{}/grants", server.url, file))
        .header("X-Principal", &a2)
        .json(&json!({ "grantee_did": did1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "not_owner");

    // Duplicate grant
    let response = client
        .post(format!("{}/resources/{}/grants", server.url, file))
        .header("X-Principal", &a1)
        .json(&json!({ "grantee_did": did2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);

    let response = client
        .delete(format!("{}/resources/{}/grants/{}", server.url, file, did2))
        .header("X-Principal", &a1)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);
    assert!(!has_access(&client, &server, &file, &did2).await);

    let response = client
        .delete(format!("{}/resources/{}/grants/{}", server.url, file, did2))
        .header("X-Principal", &a1)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "not_granted");

    let body: Value = client
        .get(format!("{}/events", server.url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let kinds: Vec<&str> = body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["event"]["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "identity_registered",
            "resource_registered",
            "identity_registered",
            "access_granted",
            "access_revoked",
        ]
    );
    assert_eq!(body["next_sequence"], 5);

    let body: Value = client
        .get(format!("{}/events?since=3", server.url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["events"].as_array().unwrap().len(), 2);

    let body: Value = client
        .get(format!("{}/events?since={}", server.url, u64::MAX))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_identity_lookups() {
    let server = TestServer::start().await;
    let client = Client::new();
    let a1 = principal(0xa1);

    let did = register(&client, &server, &a1).await;

    let body: Value = client
        .get(format!("{}/identities/{}", server.url, a1))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["did"], did.as_str());
    assert_eq!(body["registered"], true);

    let body: Value = client
        .get(format!("{}/dids/{}", server.url, did))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["principal"], a1.as_str());

    // Unknown principal resolves to the zero DID
    let body: Value = client
        .get(format!("{}/identities/{}", server.url, principal(0x42)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["registered"], false);
    assert_eq!(body["did"], format!("0x{}", "0".repeat(64)));

    let response = client
        .post(format!("{}/identities", server.url))
        .header("X-Principal", &a1)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_missing_or_invalid_caller_header() {
    let server = TestServer::start().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/identities", server.url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/identities", server.url))
        .header("X-Principal", "not-an-address")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_resource_reads() {
    let server = TestServer::start().await;
    let client = Client::new();
    let a1 = principal(0xa1);
    let did1 = register(&client, &server, &a1).await;
    let file = label_id("report.pdf");

    let response = client
        .get(format!("{}/resources/{}/owner", server.url, file))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: Value = client
        .get(format!("{}/resources/{}/exists", server.url, file))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["exists"], false);

    let response = client
        .post(format!("{}/resources", server.url))
        .header("X-Principal", &a1)
        .json(&json!({
            "resource_id": file,
            "owner_did": did1,
            "name": "report.pdf",
            "content_uri": "ipfs://QmReport",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body: Value = client
        .get(format!("{}/resources/{}", server.url, file))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["owner_did"], did1.as_str());
    assert_eq!(body["index"], 0);
    assert_eq!(body["metadata"]["name"], "report.pdf");

    let body: Value = client
        .get(format!("{}/dids/{}/resources", server.url, did1))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["resources"], json!([file]));

    // Same id, different registrant
    let a2 = principal(0xa2);
    let did2 = register(&client, &server, &a2).await;
    let response = register_resource(&client, &server, &a2, &file, &did2).await;
    assert_eq!(response.status(), 409);

    // Unregistered owner DID
    let other = label_id("other");
    let bogus = format!("0x{}", "11".repeat(32));
    let response = register_resource(&client, &server, &a1, &other, &bogus).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_analysis_requires_administrator() {
    let server = TestServer::start().await;
    let client = Client::new();
    let a1 = principal(0xa1);
    let did1 = register(&client, &server, &a1).await;
    let file = label_id("scan-me");
    register_resource(&client, &server, &a1, &file, &did1).await;

    let response = client
        .put(format!("{}/resources/{}/analysis", server.url, file))
        .header("X-Principal", &a1)
        .json(&json!({ "result": "clean" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = client
        .put(format!("{}/resources/{}/analysis", server.url, file))
        .header("X-Principal", ADMIN)
        .json(&json!({ "result": "clean" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"], "clean");

    let body: Value = client
        .get(format!("{}/resources/{}", server.url, file))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["analysis"]["result"], "clean");
}

#[tokio::test]
async fn test_shared_with_listing() {
    let server = TestServer::start().await;
    let client = Client::new();
    let a1 = principal(0xa1);
    let a2 = principal(0xa2);
    let did1 = register(&client, &server, &a1).await;
    let did2 = register(&client, &server, &a2).await;
    let file = label_id("shared");
    register_resource(&client, &server, &a1, &file, &did1).await;

    client
        .post(format!("{}/resources/{}/grants", server.url, file))
        .header("X-Principal", &a1)
        .json(&json!({ "grantee_did": did2 }))
        .send()
        .await
        .unwrap();

    let body: Value = client
        .get(format!("{}/dids/{}/shared", server.url, did2))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["resources"], json!([file]));

    let body: Value = client
        .get(format!("{}/resources/{}/grants", server.url, file))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["grantees"], json!([did2]));
}
