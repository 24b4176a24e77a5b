use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use creovate_core::{
    BrandRequest, ChatRequest, ContentRequest, Conversation, CreovateClient, ErrorKind,
    GenerationRequest, GenerationResult, LogoRequest, RequestController, RequestState,
    SentimentRequest, TransportError, Workflow,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
struct Recorded {
    path: &'static str,
    content_type: Option<String>,
    body: Value,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

fn record(log: &Log, path: &'static str, headers: &HeaderMap, body: Value) {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    log.lock().unwrap().push(Recorded {
        path,
        content_type,
        body,
    });
}

async fn brand(State(log): State<Log>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    record(&log, "generate-brand", &headers, body);
    Json(json!({ "brands": "1. Aurelia\n2. \"Veloria\"\n3. *Lumen*" }))
}

async fn content(State(log): State<Log>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    record(&log, "generate-content", &headers, body);
    Json(json!({ "content": "Timeless.\n\nCrafted in gold." }))
}

async fn sentiment(State(log): State<Log>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    record(&log, "analyze-sentiment", &headers, body);
    Json(json!({ "sentiment": "Positive" }))
}

async fn chat(State(log): State<Log>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    record(&log, "chat", &headers, body);
    Json(json!({ "reply": "Good evening." }))
}

async fn logo(State(log): State<Log>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    record(&log, "generate-logo", &headers, body);
    Json(json!({ "image": "iVBORw0KGgo=" }))
}

async fn spawn_backend() -> anyhow::Result<(String, Log)> {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let app = Router::new()
        .route("/api/generate-brand", post(brand))
        .route("/api/generate-content", post(content))
        .route("/api/analyze-sentiment", post(sentiment))
        .route("/api/chat", post(chat))
        .route("/api/generate-logo", post(logo))
        .with_state(log.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{addr}/api"), log))
}

async fn spawn_failing_backend(status: StatusCode, body: &'static str) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().fallback(move || async move { (status, body).into_response() });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}/api"))
}

#[tokio::test]
async fn every_endpoint_posts_json_to_its_path() -> anyhow::Result<()> {
    let (base_url, log) = spawn_backend().await?;
    let client = CreovateClient::new(&base_url)?;

    client
        .generate_brand(&BrandRequest {
            industry: "Luxury Watches".into(),
            keywords: "Timeless, Gold".into(),
            ..Default::default()
        })
        .await?;
    client
        .generate_content(&ContentRequest {
            description: "A new gold watch release".into(),
            ..Default::default()
        })
        .await?;
    client
        .analyze_sentiment(&SentimentRequest {
            text: "I absolutely love this amazing product!".into(),
        })
        .await?;
    client
        .chat(&ChatRequest {
            message: "Hello, who are you?".into(),
        })
        .await?;
    client
        .generate_logo(&LogoRequest {
            brand_name: "LuxTime".into(),
            industry: "Watches".into(),
            ..Default::default()
        })
        .await?;

    let recorded = log.lock().unwrap().clone();
    let paths: Vec<_> = recorded.iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "generate-brand",
            "generate-content",
            "analyze-sentiment",
            "chat",
            "generate-logo"
        ]
    );
    for r in &recorded {
        assert_eq!(r.content_type.as_deref(), Some("application/json"), "{}", r.path);
    }
    assert_eq!(
        recorded[0].body,
        json!({ "industry": "Luxury Watches", "keywords": "Timeless, Gold", "tone": "Sophisticated" })
    );
    assert_eq!(
        recorded[1].body,
        json!({ "description": "A new gold watch release", "tone": "Sophisticated", "content_type": "Blog Post" })
    );
    assert_eq!(
        recorded[4].body,
        json!({ "brand_name": "LuxTime", "industry": "Watches", "keywords": "", "color": "gold" })
    );
    Ok(())
}

#[tokio::test]
async fn brand_round_trip_yields_clean_name_list() -> anyhow::Result<()> {
    let (base_url, _log) = spawn_backend().await?;
    let client = CreovateClient::new(&base_url)?;

    let mut controller = RequestController::new(Workflow::Brand, TIMEOUT);
    controller.submit(
        &client,
        GenerationRequest::Brand(BrandRequest {
            industry: "Haute Couture".into(),
            ..Default::default()
        }),
    )?;

    let state = controller.wait().await;
    assert_eq!(
        state,
        &RequestState::Succeeded(GenerationResult::NameList(vec![
            "Aurelia".into(),
            "Veloria".into(),
            "Lumen".into()
        ]))
    );
    Ok(())
}

#[tokio::test]
async fn logo_round_trip_decodes_png() -> anyhow::Result<()> {
    let (base_url, _log) = spawn_backend().await?;
    let client = CreovateClient::new(&base_url)?;

    let mut controller = RequestController::new(Workflow::Logo, TIMEOUT);
    controller.submit(
        &client,
        GenerationRequest::Logo(LogoRequest {
            brand_name: "Aurum".into(),
            industry: "Luxury Real Estate".into(),
            ..Default::default()
        }),
    )?;

    match controller.wait().await {
        RequestState::Succeeded(GenerationResult::ImageAsset(asset)) => {
            assert_eq!(asset.mime_type, "image/png");
            assert_eq!(&asset.bytes[..4], b"\x89PNG");
        }
        other => panic!("unexpected state: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn non_success_status_is_transport_error() -> anyhow::Result<()> {
    let base_url = spawn_failing_backend(StatusCode::INTERNAL_SERVER_ERROR, "model overloaded").await?;
    let client = CreovateClient::new(&base_url)?;

    let err = client
        .analyze_sentiment(&SentimentRequest { text: "fine".into() })
        .await
        .unwrap_err();
    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model overloaded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn non_json_body_is_malformed() -> anyhow::Result<()> {
    let base_url = spawn_failing_backend(StatusCode::OK, "<html>proxy page</html>").await?;
    let client = CreovateClient::new(&base_url)?;

    let err = client
        .chat(&ChatRequest { message: "Hello".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::MalformedBody(_)), "{err:?}");
    Ok(())
}

#[tokio::test]
async fn failed_status_surfaces_as_failed_state() -> anyhow::Result<()> {
    let base_url = spawn_failing_backend(StatusCode::UNAUTHORIZED, "invalid api key").await?;
    let client = CreovateClient::new(&base_url)?;

    let mut controller = RequestController::new(Workflow::Logo, TIMEOUT);
    controller.submit(
        &client,
        GenerationRequest::Logo(LogoRequest {
            brand_name: "Aurum".into(),
            industry: "Jewellery".into(),
            ..Default::default()
        }),
    )?;

    let info = controller.wait().await.error().cloned().expect("failed");
    assert_eq!(info.kind, ErrorKind::Transport);
    assert_eq!(
        info.message,
        "Failed to generate logo. Please check your API key and try again."
    );
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_gives_chat_apology() -> anyhow::Result<()> {
    // Bind and immediately release a port so nothing is listening on it.
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = CreovateClient::new(&format!("http://{addr}/api"))?;
    let mut conversation = Conversation::new(TIMEOUT);
    conversation.send(&client, "Hello")?;
    conversation.wait().await;

    let turns = conversation.transcript();
    assert_eq!(turns.len(), 3);
    assert_eq!(
        turns[2].content,
        "I apologize, but I am currently unable to process your request."
    );
    Ok(())
}

#[tokio::test]
async fn chat_round_trip_appends_reply() -> anyhow::Result<()> {
    let (base_url, log) = spawn_backend().await?;
    let client = CreovateClient::new(&base_url)?;

    let mut conversation = Conversation::new(TIMEOUT);
    conversation.send(&client, "Hello")?;
    conversation.wait().await;

    assert_eq!(conversation.last_reply(), Some("Good evening."));
    assert_eq!(log.lock().unwrap()[0].body, json!({ "message": "Hello" }));
    Ok(())
}
