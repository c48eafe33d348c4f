use std::time::Duration;

use stagewatch_controller::sink::{HttpSink, SinkError, StatusSink};
use stagewatch_models::{
    CompositeStatus, EnvironmentConfig, RolloutStatus, TrafficEntry,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

fn sink(server: &MockServer) -> HttpSink {
    HttpSink::new(server.uri(), "secret", Duration::from_secs(5)).unwrap()
}

fn status() -> CompositeStatus {
    CompositeStatus {
        observed_revision_number: 2,
        rollout_status: RolloutStatus::Complete,
        rollout_reason: "Successfully rolled out".into(),
        traffic: vec![TrafficEntry {
            revision_name: "myapp-00002".into(),
            percent: Some(100),
            tag: None,
        }],
        ..Default::default()
    }
}

#[tokio::test]
async fn push_status_puts_camel_case_body_with_apikey() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/deployments/myapp/status/dev"))
        .and(header("authorization", "Apikey secret"))
        .and(body_json(serde_json::json!({
            "observedRevisionNumber": 2,
            "rolloutStatus": "Complete",
            "rolloutReason": "Successfully rolled out",
            "revisions": [],
            "traffic": [{"revisionName": "myapp-00002", "percent": 100}],
            "problems": []
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    sink(&server)
        .push_status("myapp", "dev", &status())
        .await
        .unwrap();
}

#[tokio::test]
async fn push_status_conflict_is_reported_as_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/deployments/myapp/status/dev"))
        .respond_with(ResponseTemplate::new(409).set_body_string("newer revision recorded"))
        .mount(&server)
        .await;

    let err = sink(&server)
        .push_status("myapp", "dev", &status())
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert!(err.to_string().contains("newer revision recorded"));
}

#[tokio::test]
async fn push_status_server_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = sink(&server)
        .push_status("myapp", "dev", &status())
        .await
        .unwrap_err();
    assert!(!err.is_conflict());
    match err {
        SinkError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn ping_and_environment_config_use_environment_routes() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/environments/dev/ping"))
        .and(header("authorization", "Apikey secret"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/environments/dev/config"))
        .and(body_json(serde_json::json!({"publicGatewayHost": "apps.example.com"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let sink = sink(&server);
    sink.ping("dev").await.unwrap();
    sink.set_environment_config(
        "dev",
        &EnvironmentConfig::with_public_gateway_host("apps.example.com"),
    )
    .await
    .unwrap();
}

#[test]
fn rejects_base_url_without_scheme() {
    assert!(matches!(
        HttpSink::new("status.example.com", "k", Duration::from_secs(1)),
        Err(SinkError::Url(_))
    ));
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/environments/dev/ping"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = HttpSink::new(format!("{}/", server.uri()), "k", Duration::from_secs(5)).unwrap();
    sink.ping("dev").await.unwrap();
}

#[tokio::test]
async fn environment_name_is_sent_as_one_encoded_segment() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/environments/qa%20eu%2F1/ping"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    sink(&server).ping("qa eu/1").await.unwrap();
}
