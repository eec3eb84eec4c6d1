//! HttpTransport against a local mock server.

use std::time::Duration;

use critique_core::error::GENERIC_FAILURE_MESSAGE;
use critique_core::transport::REQUEST_ID_HEADER;
use critique_core::{HttpTransport, Language, Mode, Orchestrator, Session, Settings};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(endpoint: String) -> Settings {
    Settings { endpoint, timeout: Duration::from_secs(5), ..Settings::default() }
}

#[tokio::test]
async fn posts_json_body_to_review_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/review"))
        .and(header("content-type", "application/json"))
        .and(header_exists(REQUEST_ID_HEADER))
        .and(body_json(json!({"code": "puts 1", "language": "ruby", "mode": "explain"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "mode": "explain",
            "data": {"explanation": "Prints **one**."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Trailing slashes on the base must not produce `//api/review`.
    let transport = HttpTransport::new(&settings_for(format!("{}//", server.uri()))).unwrap();
    assert_eq!(transport.url(), format!("{}/api/review", server.uri()));
    let orchestrator = Orchestrator::new(transport);

    let mut session = Session::new(Language::Ruby);
    session.set_code("puts 1");
    orchestrator.run(&mut session, Mode::Explain).await.unwrap();

    assert_eq!(session.error(), None);
    assert_eq!(session.result_mode(), Some(Mode::Explain));
}

#[tokio::test]
async fn non_json_server_error_maps_to_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/review"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>Internal Server Error</html>"))
        .mount(&server)
        .await;

    let orchestrator = Orchestrator::new(HttpTransport::new(&settings_for(server.uri())).unwrap());
    let mut session = Session::new(Language::Go);
    session.set_code("package main");
    orchestrator.run(&mut session, Mode::Review).await.unwrap();

    assert!(!session.loading());
    assert_eq!(session.result(), None);
    assert_eq!(session.error(), Some(GENERIC_FAILURE_MESSAGE));
}

#[tokio::test]
async fn error_message_from_failed_status_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"success": false, "error": "Code too long"})),
        )
        .mount(&server)
        .await;

    let orchestrator = Orchestrator::new(HttpTransport::new(&settings_for(server.uri())).unwrap());
    let mut session = Session::new(Language::C);
    session.set_code("int main(){}");
    orchestrator.run(&mut session, Mode::Optimize).await.unwrap();

    assert_eq!(session.error(), Some("Code too long"));
}

#[tokio::test]
async fn slow_service_times_out_and_session_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let settings = Settings { timeout: Duration::from_millis(200), ..settings_for(server.uri()) };
    let orchestrator = Orchestrator::new(HttpTransport::new(&settings).unwrap());
    let mut session = Session::new(Language::Java);
    session.set_code("class A {}");
    orchestrator.run(&mut session, Mode::Review).await.unwrap();

    assert!(!session.loading());
    assert!(session.error().unwrap().contains("timed out"));
}
