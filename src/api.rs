use std::convert::Infallible;

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::bootstrap::Services;
use crate::generate::{GenerationRequest, GenerationResult, TextStream};
use crate::news::NewsRecord;
use crate::search::{SearchHit, DEFAULT_MAX_RESULTS};

pub type AppState = Services;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/summarize", post(summarize))
        .route("/ask", post(ask))
        .route("/compare", post(compare))
        .route("/insight", post(insight))
        .route("/generate", post(generate))
        .route("/chat/stream", post(chat_stream))
        .route("/analyze-image", post(analyze_image))
        .route("/news", get(news))
        .route("/search", get(search))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Chunked `text/plain` body fed by the fragment stream, one chunk per fragment.
fn stream_body(fragments: TextStream) -> Response {
    let body = Body::from_stream(fragments.map(|f| Ok::<_, Infallible>(Bytes::from(f))));
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

#[derive(Deserialize)]
struct SummarizeReq {
    text: String,
}

#[derive(Serialize)]
struct SummarizeResp {
    summary: String,
}

async fn summarize(State(s): State<AppState>, Json(body): Json<SummarizeReq>) -> Json<SummarizeResp> {
    Json(SummarizeResp {
        summary: s.generator.summarize(&body.text).await,
    })
}

#[derive(Deserialize)]
struct AskReq {
    #[serde(default)]
    context: Option<String>,
    question: String,
}

#[derive(Serialize)]
struct AskResp {
    answer: String,
}

async fn ask(State(s): State<AppState>, Json(body): Json<AskReq>) -> Json<AskResp> {
    Json(AskResp {
        answer: s
            .generator
            .answer(body.context.as_deref(), &body.question)
            .await,
    })
}

#[derive(Deserialize)]
struct CompareReq {
    documents: Vec<String>,
}

#[derive(Serialize)]
struct CompareResp {
    comparison: String,
}

async fn compare(State(s): State<AppState>, Json(body): Json<CompareReq>) -> Json<CompareResp> {
    Json(CompareResp {
        comparison: s.generator.compare(&body.documents).await,
    })
}

#[derive(Deserialize)]
struct InsightReq {
    topic: String,
}

#[derive(Serialize)]
struct InsightResp {
    insight: String,
}

async fn insight(State(s): State<AppState>, Json(body): Json<InsightReq>) -> Json<InsightResp> {
    Json(InsightResp {
        insight: s.generator.insight(&body.topic).await,
    })
}

#[derive(Deserialize)]
struct GenerateReq {
    #[serde(flatten)]
    request: GenerationRequest,
    #[serde(default)]
    stream: bool,
}

#[derive(Serialize)]
struct GenerateResp {
    text: String,
}

async fn generate(State(s): State<AppState>, Json(body): Json<GenerateReq>) -> Response {
    match s.generator.run(body.request, body.stream).await {
        GenerationResult::Text(text) => Json(GenerateResp { text }).into_response(),
        GenerationResult::Stream(fragments) => stream_body(fragments),
    }
}

#[derive(Deserialize)]
struct ChatReq {
    prompt: String,
}

async fn chat_stream(State(s): State<AppState>, Json(body): Json<ChatReq>) -> Response {
    stream_body(s.generator.complete_stream(&body.prompt))
}

#[derive(Deserialize)]
struct ImageReq {
    prompt: String,
    /// URL or raw base64 bytes.
    image: String,
}

async fn analyze_image(State(s): State<AppState>, Json(body): Json<ImageReq>) -> Response {
    stream_body(s.images.analyze_image_stream(&body.prompt, &body.image))
}

#[derive(Deserialize)]
struct NewsQuery {
    #[serde(default)]
    query: String,
}

#[derive(Serialize)]
struct NewsResp {
    articles: Vec<NewsRecord>,
}

async fn news(State(s): State<AppState>, Query(q): Query<NewsQuery>) -> Json<NewsResp> {
    Json(NewsResp {
        articles: s.news.get_latest_news(&q.query).await,
    })
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
    #[serde(default)]
    k: Option<usize>,
}

#[derive(Serialize)]
struct SearchResp {
    results: Vec<SearchHit>,
}

async fn search(State(s): State<AppState>, Query(q): Query<SearchQuery>) -> Json<SearchResp> {
    let finder = s.finder.clone();
    let k = q.k.unwrap_or(DEFAULT_MAX_RESULTS);
    // document extraction is blocking file IO
    let results = tokio::task::spawn_blocking(move || finder.search(&q.q, k))
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "keyword search task failed");
            Vec::new()
        });
    Json(SearchResp { results })
}
