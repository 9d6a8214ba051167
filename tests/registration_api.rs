//! End-to-end tests for the registration API and the generated artifact.

use std::time::Duration;

use devroute::client::RegistrationClient;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_register_list_and_expire() {
    let server = common::start_server(Duration::from_millis(600)).await;
    let client = common::http_client();

    let res = client
        .post(server.url("/register"))
        .json(&json!({"id": "myapp", "port": 3000}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"status": "registered", "url": "myapp.localhost"}));

    let list: Value = client.get(server.url("/clients")).send().await.unwrap().json().await.unwrap();
    let clients = list["clients"].as_array().unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0]["port"], 3000);
    assert_eq!(clients[0]["domain"], "myapp.localhost");
    assert_eq!(server.route_names().await, vec!["sub-myapp"]);

    // No heartbeats: the sweeper evicts the client
    tokio::time::sleep(Duration::from_millis(1200)).await;

    let list: Value = client.get(server.url("/clients")).send().await.unwrap().json().await.unwrap();
    assert_eq!(list["clients"].as_array().unwrap().len(), 0);
    assert_eq!(server.read_artifact().await.route_count(), 0);
}

#[tokio::test]
async fn test_heartbeats_keep_client_alive() {
    let server = common::start_server(Duration::from_millis(600)).await;
    let client = common::http_client();

    client
        .post(server.url("/register"))
        .json(&json!({"id": "steady", "port": 3100}))
        .send()
        .await
        .unwrap();

    for _ in 0..8 {
        tokio::time::sleep(Duration::from_millis(150)).await;
        let res = client.post(server.url("/heartbeat?id=steady")).send().await.unwrap();
        assert_eq!(res.status(), 200);
    }

    let status: Value = client.get(server.url("/status")).send().await.unwrap().json().await.unwrap();
    assert_eq!(status, json!({"status": "ok", "clients": 1}));
    assert_eq!(server.route_names().await, vec!["sub-steady"]);
}

#[tokio::test]
async fn test_multi_label_identifier() {
    let server = common::start_server(Duration::from_secs(30)).await;
    let client = common::http_client();

    let res = client
        .post(server.url("/register"))
        .json(&json!({"id": "prod.api.service", "port": 3001}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["url"], "prod.api.service.localhost");

    let doc = server.read_artifact().await;
    let router = &doc.http.routers["sub-prod_api_service"];
    assert_eq!(router.rule, "Host(`prod.api.service.localhost`)");
    assert_eq!(router.service, "local-prod_api_service");
    assert_eq!(
        doc.http.services["local-prod_api_service"].load_balancer.servers[0].url,
        "http://host.docker.internal:3001"
    );
}

#[tokio::test]
async fn test_rejections() {
    let server = common::start_server(Duration::from_secs(30)).await;
    let client = common::http_client();

    let res = client
        .post(server.url("/register"))
        .json(&json!({"id": "bad_id!", "port": 80}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "invalid subdomain format");

    let res = client
        .post(server.url("/register"))
        .json(&json!({"id": "ok", "port": 70000}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "invalid port");

    let res = client.post(server.url("/heartbeat")).send().await.unwrap();
    assert_eq!(res.status(), 400);

    let res = client.post(server.url("/unregister?id=ghost")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let res = client.get(server.url("/register")).send().await.unwrap();
    assert_eq!(res.status(), 405);

    // Nothing was registered, artifact stays empty
    assert_eq!(server.read_artifact().await.route_count(), 0);
}

#[tokio::test]
async fn test_artifact_tracks_live_set() {
    let server = common::start_server(Duration::from_secs(30)).await;
    let client = common::http_client();

    for (id, port) in [("web", 3000), ("api", 3001), ("docs.site", 3002)] {
        let res = client
            .post(server.url("/register"))
            .json(&json!({"id": id, "port": port}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }
    assert_eq!(server.route_names().await, vec!["sub-api", "sub-docs_site", "sub-web"]);
    let before = tokio::fs::read(&server.artifact).await.unwrap();

    // Duplicate registration changes nothing
    let res = client
        .post(server.url("/register"))
        .json(&json!({"id": "api", "port": 4000}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 409);
    assert_eq!(tokio::fs::read(&server.artifact).await.unwrap(), before);

    let res = client.post(server.url("/unregister?id=api")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(server.route_names().await, vec!["sub-docs_site", "sub-web"]);
}

#[tokio::test]
async fn test_registration_client_roundtrip() {
    let server = common::start_server(Duration::from_secs(30)).await;
    let api = RegistrationClient::new(&server.url(""), "wrapped").unwrap();

    assert_eq!(api.register(3050).await.unwrap(), "wrapped.localhost");
    api.heartbeat().await.unwrap();

    let err = api.register(3051).await.unwrap_err();
    assert!(err.to_string().contains("subdomain already in use"));

    api.unregister().await.unwrap();
    assert!(api.heartbeat().await.is_err());
    assert_eq!(server.read_artifact().await.route_count(), 0);
}

#[tokio::test]
async fn test_concurrent_registrations() {
    let server = common::start_server(Duration::from_secs(30)).await;
    let client = common::http_client();

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let client = client.clone();
            let url = server.url("/register");
            tokio::spawn(async move {
                client
                    .post(url)
                    .json(&json!({"id": format!("svc-{i}"), "port": 3000 + i}))
                    .send()
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap(), 200);
    }

    assert_eq!(server.read_artifact().await.route_count(), 20);
}
