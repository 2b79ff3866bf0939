use fanout_engine::{
    CompletionClient, CompletionSettings, OpenAiCompatibleClient, RequestErrorKind,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAiCompatibleClient {
    let settings = CompletionSettings::new(
        format!("{}/api/v1/", server.uri()),
        "secret-key",
        "test/model",
    );
    OpenAiCompatibleClient::new(settings).expect("client builds")
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "gen-1",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content } }
        ]
    })
}

#[tokio::test]
async fn sends_single_user_message_and_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header("authorization", "Bearer secret-key"))
        .and(body_partial_json(json!({
            "model": "test/model",
            "messages": [{ "role": "user", "content": "Say hi" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("hi")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.model(), "test/model");
    assert!(client.endpoint().as_str().ends_with("/api/v1/chat/completions"));

    let text = client.complete("Say hi").await.expect("completion ok");
    assert_eq!(text, "hi");
}

#[tokio::test]
async fn http_status_error_carries_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({ "error": { "message": "rate limited", "code": 429 } })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).complete("x").await.unwrap_err();
    assert_eq!(err.kind, RequestErrorKind::HttpStatus(429));
    assert_eq!(err.message, "rate limited");
    assert_eq!(err.to_string(), "http status 429: rate limited");
}

#[tokio::test]
async fn http_status_error_without_body_uses_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("x").await.unwrap_err();
    assert_eq!(err.kind, RequestErrorKind::HttpStatus(502));
    assert!(err.message.contains("502"));
}

#[tokio::test]
async fn error_in_successful_body_is_a_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "error": { "message": "model overloaded" } })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).complete("x").await.unwrap_err();
    assert_eq!(err.kind, RequestErrorKind::Service);
    assert_eq!(err.message, "model overloaded");
}

#[tokio::test]
async fn missing_choices_is_an_empty_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("x").await.unwrap_err();
    assert_eq!(err.kind, RequestErrorKind::EmptyCompletion);
    assert_eq!(err.message, "response carried no choices");
}

#[tokio::test]
async fn null_content_is_reported_separately_from_missing_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "choices": [{ "message": { "content": null } }] })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).complete("x").await.unwrap_err();
    assert_eq!(err.kind, RequestErrorKind::EmptyCompletion);
    assert_eq!(err.message, "first choice carried no message content");
}

#[tokio::test]
async fn undecodable_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("x").await.unwrap_err();
    assert_eq!(err.kind, RequestErrorKind::MalformedResponse);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let settings = CompletionSettings::new(format!("http://127.0.0.1:{port}/v1"), "k", "m");
    let client = OpenAiCompatibleClient::new(settings).unwrap();

    let err = client.complete("x").await.unwrap_err();
    assert_eq!(err.kind, RequestErrorKind::Network);
}

#[test]
fn invalid_base_url_is_rejected() {
    let settings = CompletionSettings::new("not a url", "k", "m");
    let err = OpenAiCompatibleClient::new(settings).unwrap_err();
    assert_eq!(err.kind, RequestErrorKind::InvalidEndpoint);
}
