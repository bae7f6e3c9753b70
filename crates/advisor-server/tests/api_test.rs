mod common;

use advisor_server::api::AskResponse;
use advisor_types::Tone;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{body_text, services, test_app, test_config, QueueStt, SlowPersona};
use tower::ServiceExt;

fn ask(body: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/ask")
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("authorization", format!("Bearer {}", key));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_health_reports_active_calls() {
    let (app, _state) = test_app(
        &test_config(),
        services(QueueStt::heard(&[]), SlowPersona::instant("-")),
    );

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["active_calls"], 0);
}

#[tokio::test]
async fn test_ask_requires_key_when_configured() {
    let mut config = test_config();
    config.api.key = Some("s3cret".to_string());
    let (app, _state) = test_app(
        &config,
        services(
            QueueStt::heard(&[]),
            SlowPersona::instant("Cut the bottom ten percent of your product line."),
        ),
    );
    let body = r#"{"challenge": "Should I cut products or raise prices?"}"#;

    let missing = app.clone().oneshot(ask(body, None)).await.unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    let error: serde_json::Value = serde_json::from_str(&body_text(missing).await).unwrap();
    assert_eq!(error["error"], "unauthorized");

    let wrong = app.clone().oneshot(ask(body, Some("nope"))).await.unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let ok = app.oneshot(ask(body, Some("s3cret"))).await.unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_ask_answers_with_tone_and_audio() {
    let (app, state) = test_app(
        &test_config(),
        services(
            QueueStt::heard(&[]),
            SlowPersona::instant("Cut the bottom ten percent of your product line."),
        ),
    );

    let response = app
        .clone()
        .oneshot(ask(
            r#"{"challenge": "Should I cut products or raise prices?"}"#,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let answer: AskResponse = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(
        answer.response,
        "Cut the bottom ten percent of your product line."
    );
    assert_eq!(answer.tone, Tone::Assertive);
    assert!(answer.intent.is_decision_request);

    let audio_url = answer.audio_url.expect("synthesized audio should be linked");
    assert!(audio_url.starts_with("https://advisor.test/audio/"));
    assert_eq!(state.clips.len(), 1);

    let path = audio_url.trim_start_matches("https://advisor.test");
    let clip = app
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(clip.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_ask_rejects_empty_challenge() {
    let (app, _state) = test_app(
        &test_config(),
        services(QueueStt::heard(&[]), SlowPersona::instant("-")),
    );

    let response = app
        .oneshot(ask(r#"{"challenge": "   "}"#, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(error["error"].as_str().unwrap().contains("must not be empty"));
}

#[tokio::test]
async fn test_unknown_clip_is_not_found() {
    let (app, _state) = test_app(
        &test_config(),
        services(QueueStt::heard(&[]), SlowPersona::instant("-")),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/audio/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
