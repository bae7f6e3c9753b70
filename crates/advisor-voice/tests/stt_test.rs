use advisor_voice::{DeepgramConfig, DeepgramStt, SpeechToText, VoiceError};
use axum::{
    body::Bytes,
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

/// Starts a stub server on an ephemeral port and returns its base URL.
async fn start_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind listener");
    let addr = listener.local_addr().expect("failed to get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });
    format!("http://{}", addr)
}

async fn listen_stub(
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if auth != "Token dg-key" {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if !params.iter().any(|(k, v)| k == "model" && v == "nova-2") {
        return Err(StatusCode::BAD_REQUEST);
    }
    if !params.iter().any(|(k, v)| k == "keywords" && v == "pricing") {
        return Err(StatusCode::BAD_REQUEST);
    }
    if body.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    Ok(Json(json!({
        "results": {
            "channels": [{
                "alternatives": [{
                    "transcript": "Should I raise my prices?",
                    "confidence": 0.92
                }]
            }]
        }
    })))
}

#[tokio::test]
async fn test_transcribe_success() {
    let base = start_stub(Router::new().route("/v1/listen", post(listen_stub))).await;
    let stt = DeepgramStt::new(DeepgramConfig::new("dg-key").with_base_url(base)).unwrap();

    let result = stt
        .transcribe(b"RIFF....WAVEfake")
        .await
        .expect("transcription should succeed");

    assert!(result.success);
    assert_eq!(result.transcript, "Should I raise my prices?");
    assert!((result.confidence - 0.92).abs() < 1e-6);
}

#[tokio::test]
async fn test_transcribe_empty_result() {
    let app = Router::new().route(
        "/v1/listen",
        post(|| async { Json(json!({"results": {"channels": [{"alternatives": []}]}})) }),
    );
    let base = start_stub(app).await;
    let stt = DeepgramStt::new(DeepgramConfig::new("dg-key").with_base_url(base)).unwrap();

    let result = stt.transcribe(b"audio").await.expect("request should succeed");
    assert!(!result.success);
    assert!(result.transcript.is_empty());
}

#[tokio::test]
async fn test_transcribe_provider_error() {
    let base = start_stub(Router::new().route("/v1/listen", post(listen_stub))).await;
    let stt = DeepgramStt::new(DeepgramConfig::new("wrong-key").with_base_url(base)).unwrap();

    match stt.transcribe(b"audio").await {
        Err(VoiceError::Transcription(msg)) => assert!(msg.contains("401")),
        other => panic!("Expected Transcription error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transcribe_without_key() {
    let stt = DeepgramStt::new(DeepgramConfig::default()).unwrap();
    assert!(!stt.is_configured());

    match stt.transcribe(b"audio").await {
        Err(VoiceError::Config(msg)) => assert!(msg.contains("DEEPGRAM_API_KEY")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transcribe_rejects_empty_audio() {
    let stt = DeepgramStt::new(DeepgramConfig::new("dg-key")).unwrap();
    match stt.transcribe(&[]).await {
        Err(VoiceError::Transcription(msg)) => assert!(msg.contains("empty")),
        other => panic!("Expected Transcription error, got {:?}", other),
    }
}
