use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use quiz_core::model::{PresentationQuestion, QuestionNumber, ThemePreference};
use quiz_core::summary::max_seen;
use quiz_core::{
    QuestionStatsRow, SESSION_SIZE, SelectionPolicy, Stats, StatsSummary, question_breakdown,
    summarize,
};
use services::{AppServices, QuestionBatch, QuizMeta, SessionError};

use crate::error::ApiError;

const META_ERROR: &str = "Failed to load meta";
const QUESTIONS_ERROR: &str = "Failed to load questions";
const BATCH_ERROR: &str = "Failed to load requested questions";
const SESSION_ERROR: &str = "Failed to start session";
const STATS_ERROR: &str = "Failed to update stats";
const THEME_ERROR: &str = "Failed to save theme";

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Build the API router over shared services.
pub fn router(services: AppServices) -> Router {
    Router::new()
        .route("/api/meta", get(meta))
        .route("/api/questions", get(random_questions))
        .route("/api/questions/batch", post(question_batch))
        .route("/api/session", post(start_session))
        .route("/api/submissions", post(submit))
        .route("/api/stats", get(stats_overview))
        .route("/api/stats/reset-seen", post(reset_seen))
        .route("/api/theme", get(theme).put(set_theme))
        .route("/api/theme/cycle", post(cycle_theme))
        .route("/health", get(health_check))
        .with_state(services)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

// ─── REQUESTS / RESPONSES ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CountQuery {
    #[serde(default = "default_count")]
    count: usize,
}

fn default_count() -> usize {
    SESSION_SIZE
}

#[derive(Debug, Deserialize)]
struct BatchRequest {
    numbers: Vec<QuestionNumber>,
}

#[derive(Debug, Serialize)]
struct BatchResponse {
    questions: Vec<PresentationQuestion>,
}

#[derive(Debug, Deserialize)]
struct SessionRequest {
    #[serde(default)]
    mode: SelectionPolicy,
}

#[derive(Debug, Deserialize)]
struct SubmissionRequest {
    numbers: Vec<QuestionNumber>,
    correctness: Vec<bool>,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    stats: Stats,
    summary: StatsSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsOverview {
    summary: StatsSummary,
    max_seen: u32,
    questions: Vec<QuestionStatsRow>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemeBody {
    theme: ThemePreference,
}

// ─── HANDLERS ──────────────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "OK"
}

async fn meta(State(app): State<AppServices>) -> ApiResult<QuizMeta> {
    app.quiz()
        .meta()
        .await
        .map(Json)
        .map_err(|e| ApiError::quiz(META_ERROR, &e))
}

async fn random_questions(
    State(app): State<AppServices>,
    query: Result<Query<CountQuery>, QueryRejection>,
) -> ApiResult<QuestionBatch> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::rejected("count must be a non-negative integer", &rejection.body_text())
    })?;
    app.quiz()
        .random_sample(query.count)
        .await
        .map(Json)
        .map_err(|e| ApiError::quiz(QUESTIONS_ERROR, &e))
}

async fn question_batch(
    State(app): State<AppServices>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> ApiResult<BatchResponse> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::rejected("numbers array required", &rejection.body_text())
    })?;
    let questions = app
        .quiz()
        .batch(&request.numbers)
        .await
        .map_err(|e| ApiError::quiz(BATCH_ERROR, &e))?;
    Ok(Json(BatchResponse { questions }))
}

async fn start_session(
    State(app): State<AppServices>,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> ApiResult<QuestionBatch> {
    let mode = payload.map(|Json(request)| request.mode).unwrap_or_default();
    match app.sessions().start(mode, SESSION_SIZE).await {
        Ok(session) => Ok(Json(QuestionBatch {
            questions: session.questions,
            total: session.total,
        })),
        Err(SessionError::Empty) => Ok(Json(QuestionBatch {
            questions: Vec::new(),
            total: 0,
        })),
        Err(e) => Err(ApiError::session(SESSION_ERROR, &e)),
    }
}

async fn submit(
    State(app): State<AppServices>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> ApiResult<StatsResponse> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::rejected("numbers and correctness arrays required", &rejection.body_text())
    })?;
    let submission = app
        .sessions()
        .record(&request.numbers, request.correctness)
        .await
        .map_err(|e| ApiError::session(STATS_ERROR, &e))?;
    Ok(Json(StatsResponse {
        stats: submission.stats,
        summary: submission.summary,
    }))
}

async fn stats_overview(State(app): State<AppServices>) -> ApiResult<StatsOverview> {
    let meta = app
        .quiz()
        .meta()
        .await
        .map_err(|e| ApiError::quiz(META_ERROR, &e))?;
    let stats = app.stats().load().await;
    Ok(Json(StatsOverview {
        summary: summarize(&stats, meta.total),
        max_seen: max_seen(&stats),
        questions: question_breakdown(&stats, meta.numbers),
    }))
}

async fn reset_seen(State(app): State<AppServices>) -> ApiResult<StatsResponse> {
    let stats = app
        .stats()
        .reset_seen()
        .await
        .map_err(|e| ApiError::stats(STATS_ERROR, &e))?;
    let total = app
        .quiz()
        .total()
        .await
        .map_err(|e| ApiError::quiz(META_ERROR, &e))?;
    Ok(Json(StatsResponse {
        summary: summarize(&stats, total),
        stats,
    }))
}

async fn theme(State(app): State<AppServices>) -> Json<ThemeBody> {
    Json(ThemeBody {
        theme: app.theme().load().await,
    })
}

async fn set_theme(
    State(app): State<AppServices>,
    payload: Result<Json<ThemeBody>, JsonRejection>,
) -> ApiResult<ThemeBody> {
    let Json(body) = payload.map_err(|rejection| {
        ApiError::rejected("theme must be system, light or dark", &rejection.body_text())
    })?;
    app.theme()
        .save(body.theme)
        .await
        .map_err(|e| ApiError::theme(THEME_ERROR, &e))?;
    Ok(Json(body))
}

async fn cycle_theme(State(app): State<AppServices>) -> ApiResult<ThemeBody> {
    let theme = app
        .theme()
        .cycle()
        .await
        .map_err(|e| ApiError::theme(THEME_ERROR, &e))?;
    Ok(Json(ThemeBody { theme }))
}
