use std::time::Duration;

use phonetic_feedback::{
    EvaluationPolicy, FeedbackError, FeedbackRequest, FeedbackService, HttpReferences,
    MistakeKind, ReferenceError, ReferenceSource,
};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn texts_service(id: Uuid, response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/texts/{id}")))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

fn client(server: &MockServer) -> HttpReferences {
    HttpReferences::new(format!("{}/texts/", server.uri()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn fetches_transcription_field() {
    let id = Uuid::from_u128(0xa11ce);
    let record = json!({"id": id, "title": "greeting", "transcription": "p rʲ i v ʲ e t"});
    let server = texts_service(id, ResponseTemplate::new(200).set_body_json(record)).await;

    let transcription = client(&server).transcription(id).await.unwrap();

    assert_eq!(transcription, "p rʲ i v ʲ e t");
}

#[tokio::test]
async fn missing_text_is_not_found() {
    let id = Uuid::from_u128(404);
    let server = texts_service(id, ResponseTemplate::new(404)).await;

    let err = client(&server).transcription(id).await.unwrap_err();

    assert!(matches!(err, ReferenceError::NotFound(missing) if missing == id));
}

#[tokio::test]
async fn server_error_is_upstream() {
    let id = Uuid::from_u128(500);
    let server = texts_service(id, ResponseTemplate::new(500)).await;

    let err = client(&server).transcription(id).await.unwrap_err();

    match err {
        ReferenceError::Upstream { id: failed, source } => {
            assert_eq!(failed, id);
            assert_eq!(source.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn record_without_transcription_is_upstream() {
    let id = Uuid::from_u128(7);
    let body = json!({"id": id, "title": "untranscribed"});
    let server = texts_service(id, ResponseTemplate::new(200).set_body_json(body)).await;

    let err = client(&server).transcription(id).await.unwrap_err();

    assert!(matches!(err, ReferenceError::Upstream { .. }));
}

#[tokio::test]
async fn unreachable_service_is_upstream() {
    // Non-pooled server: dropping it actually shuts it down.
    let server = MockServer::builder().start().await;
    let references = client(&server);
    drop(server);

    let err = references.transcription(Uuid::from_u128(1)).await.unwrap_err();

    assert!(matches!(err, ReferenceError::Upstream { .. }));
}

#[tokio::test]
async fn service_scores_against_fetched_text() {
    let id = Uuid::from_u128(0x5eed);
    let record = json!({"transcription": "m a m a"});
    let server = texts_service(id, ResponseTemplate::new(200).set_body_json(record)).await;
    let service = FeedbackService::new(client(&server), EvaluationPolicy::default());

    let request = FeedbackRequest {
        text_id: id,
        actual_result: "m a x a".to_owned(),
    };
    let response = service.handle(&request).await.unwrap();

    assert_eq!(response.accuracy, 75.0);
    assert_eq!(response.mistakes.len(), 1);
    assert_eq!(response.mistakes[0].kind, MistakeKind::Replacement);
}

#[tokio::test]
async fn service_surfaces_missing_text() {
    let id = Uuid::from_u128(0xdead);
    let server = texts_service(id, ResponseTemplate::new(404)).await;
    let service = FeedbackService::new(client(&server), EvaluationPolicy::default());

    let request = FeedbackRequest {
        text_id: id,
        actual_result: "a".to_owned(),
    };
    let err = service.handle(&request).await.unwrap_err();

    assert!(matches!(err, FeedbackError::Reference(ReferenceError::NotFound(_))));
}
