//! Live-wire tests for the OpenRouter client.
//!
//! Each test binds a throwaway local HTTP server serving one canned
//! chat-completions response, points the client at it, and asserts that
//! `generate` maps the upstream outcome onto the right error variant.
//! Upstream failures must stay distinguishable: transport trouble, rate
//! limiting, API faults, and empty completions are different problems
//! with different remedies.

use axum::http::{header, StatusCode};
use axum::routing::post;
use axum::Router;
use dsegen::{ContentGenerator, Credentials, DsegenError, OpenRouterClient};
use std::net::SocketAddr;

/// Serve one canned `/chat/completions` response on an ephemeral port.
async fn serve_canned(status: StatusCode, body: &'static str) -> SocketAddr {
    let app = Router::new().route(
        "/chat/completions",
        post(move || async move {
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> OpenRouterClient {
    let creds = Credentials {
        api_key: "test-key".to_string(),
        model: "test/model".to_string(),
    };
    OpenRouterClient::new(creds).with_base_url(format!("http://{addr}"))
}

#[tokio::test]
async fn successful_completion_returns_first_choice() {
    let addr = serve_canned(
        StatusCode::OK,
        r##"{"choices": [{"message": {"role": "assistant", "content": "# Paper body"}}]}"##,
    )
    .await;

    let paper = client_for(addr).generate("Recycling").await.unwrap();
    assert_eq!(paper, "# Paper body");
}

#[tokio::test]
async fn http_429_maps_to_rate_limited() {
    let addr = serve_canned(
        StatusCode::TOO_MANY_REQUESTS,
        r#"{"error": {"message": "slow down"}}"#,
    )
    .await;

    let err = client_for(addr).generate("Recycling").await.unwrap_err();
    assert!(matches!(err, DsegenError::RateLimited), "{err}");
}

#[tokio::test]
async fn http_5xx_maps_to_api_error_with_status() {
    let addr = serve_canned(
        StatusCode::BAD_GATEWAY,
        r#"{"error": {"message": "upstream gone"}}"#,
    )
    .await;

    let err = client_for(addr).generate("Recycling").await.unwrap_err();
    match err {
        DsegenError::ApiError { message } => {
            assert!(message.contains("502"), "{message}");
            assert!(message.contains("upstream gone"), "{message}");
        }
        other => panic!("expected ApiError, got {other}"),
    }
}

#[tokio::test]
async fn ok_with_error_body_and_no_choices_maps_to_api_error() {
    // OpenRouter reports some upstream faults as 200 + error body.
    let addr = serve_canned(
        StatusCode::OK,
        r#"{"choices": [], "error": {"message": "model is overloaded", "code": 502}}"#,
    )
    .await;

    let err = client_for(addr).generate("Recycling").await.unwrap_err();
    match err {
        DsegenError::ApiError { message } => assert_eq!(message, "model is overloaded"),
        other => panic!("expected ApiError, got {other}"),
    }
}

#[tokio::test]
async fn ok_with_no_choices_maps_to_empty_completion() {
    let addr = serve_canned(StatusCode::OK, r#"{"choices": []}"#).await;

    let err = client_for(addr).generate("Recycling").await.unwrap_err();
    assert!(matches!(err, DsegenError::EmptyCompletion), "{err}");
}

#[tokio::test]
async fn unreachable_host_maps_to_connection_failed() {
    // Bind then drop to get a port with nothing listening on it.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr).generate("Recycling").await.unwrap_err();
    assert!(matches!(err, DsegenError::ConnectionFailed { .. }), "{err}");
}
