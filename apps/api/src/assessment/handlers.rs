//! Axum route handlers for the assessment API.
//!
//! Every handler runs the same gauntlet: rate limit, body parse, schema
//! validation, then the model call. Streaming handlers hand the upstream
//! event stream to `relay` and return immediately; the score handler
//! buffers a full completion before responding.

use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::assessment::prompts::{
    self, ASSESS_SYSTEM_PROMPT, EVALUATE_SYSTEM_PROMPT, ROADMAP_SYSTEM_PROMPT,
};
use crate::assessment::scenarios::{self, Scenario};
use crate::assessment::schemas;
use crate::assessment::scoring;
use crate::errors::{AppError, FieldErrors};
use crate::llm_client::{GenerationRequest, ModelTier};
use crate::rate_limit::{identity_from_headers, LimitMode};
use crate::relay;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Generation budgets
// ────────────────────────────────────────────────────────────────────────────

/// Output budget for a single scenario evaluation.
pub const EVALUATE_MAX_TOKENS: u32 = 2048;
/// Roadmaps and readiness assessments return large structured JSON documents.
pub const ROADMAP_MAX_TOKENS: u32 = 4096;
pub const ASSESS_MAX_TOKENS: u32 = 4096;

// ────────────────────────────────────────────────────────────────────────────
// Shared request plumbing
// ────────────────────────────────────────────────────────────────────────────

/// Applies the per-caller budget. Runs before body parsing so rejected
/// requests do as little work as possible.
fn check_rate_limit(state: &AppState, headers: &HeaderMap, route: &str) -> Result<(), AppError> {
    let mode = LimitMode::from_headers(headers);
    let identity = identity_from_headers(headers);
    if !state.limiter.check(&identity, mode) {
        warn!("{route} rate limited: identity={identity} mode={mode:?}");
        return Err(AppError::RateLimited);
    }
    Ok(())
}

fn parse_body(body: &Bytes) -> Result<Value, AppError> {
    serde_json::from_slice(body).map_err(|_| AppError::InvalidBody)
}

fn validated<T>(route: &str, result: Result<T, FieldErrors>) -> Result<T, AppError> {
    result.map_err(|errors| {
        warn!("{route} validation failed: {errors:?}");
        AppError::Validation(errors)
    })
}

/// Streamed bodies are plain text chunks; the sniffing guard stops browsers
/// from reinterpreting partial JSON output.
fn streaming_response(body: Body) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        body,
    )
        .into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/evaluate
///
/// Streams a scenario evaluation as plain text, then appends the metrics
/// trailer after the delimiter once the upstream stream completes.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    // Latency is measured from arrival, not from the first model byte.
    let started = Instant::now();
    check_rate_limit(&state, &headers, "/api/evaluate")?;

    let json = parse_body(&body)?;
    let request = validated("/api/evaluate", schemas::validate_evaluate(&json))?;

    let task = prompts::evaluation_task(&request.scenario, request.custom_prompt.as_deref());
    info!(
        "/api/evaluate scenario={} model={:?} prompt_chars={}",
        request.scenario,
        request.model,
        task.chars().count()
    );

    let events = state
        .llm
        .stream(GenerationRequest {
            tier: request.model,
            max_tokens: EVALUATE_MAX_TOKENS,
            system: EVALUATE_SYSTEM_PROMPT.to_string(),
            user: task,
        })
        .await?;

    Ok(streaming_response(relay::stream_with_metrics(
        events,
        request.model,
        started,
    )))
}

/// POST /api/evaluate/score
///
/// Buffered scoring pass over a prior evaluation. Every failure mode is
/// collapsed into the same generic 500; the cause is only ever logged.
pub async fn handle_score(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let started = Instant::now();
    check_rate_limit(&state, &headers, "/api/evaluate/score")?;

    let json = parse_body(&body)?;
    let request = validated("/api/evaluate/score", schemas::validate_score(&json))?;

    match scoring::score_response(state.llm.as_ref(), &request.task_prompt, &request.response).await
    {
        Ok(result) => Ok(Json(result).into_response()),
        Err(e) => {
            error!(
                "/api/evaluate/score failed after {}ms: {}",
                started.elapsed().as_millis(),
                e
            );
            Err(AppError::ScoringFailed)
        }
    }
}

/// POST /api/roadmap
///
/// Streams a roadmap document as raw JSON text. No metrics trailer: the
/// client parses the body as a single JSON value once the stream ends.
pub async fn handle_roadmap(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let started = Instant::now();
    check_rate_limit(&state, &headers, "/api/roadmap")?;

    let json = parse_body(&body)?;
    let request = validated("/api/roadmap", schemas::validate_roadmap(&json))?;

    info!(
        "/api/roadmap agency={} has_architecture={} has_evaluation={}",
        request.intake.agency_type,
        request.architecture.is_some(),
        request.evaluation.is_some()
    );

    let context = prompts::roadmap_context(
        &request.intake,
        request.architecture.as_ref(),
        request.evaluation.as_ref(),
    );

    let events = state
        .llm
        .stream(GenerationRequest {
            tier: ModelTier::Sonnet,
            max_tokens: ROADMAP_MAX_TOKENS,
            system: ROADMAP_SYSTEM_PROMPT.to_string(),
            user: context,
        })
        .await?;

    Ok(streaming_response(relay::stream_plain(
        events,
        ModelTier::Sonnet,
        started,
    )))
}

/// POST /api/assess
///
/// Streams a readiness assessment as raw JSON text, same transport shape as
/// `/api/roadmap` but driven by the intake form alone.
pub async fn handle_assess(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let started = Instant::now();
    check_rate_limit(&state, &headers, "/api/assess")?;

    let json = parse_body(&body)?;
    let request = validated("/api/assess", schemas::validate_assess(&json))?;

    info!("/api/assess agency={}", request.intake.agency_type);

    let events = state
        .llm
        .stream(GenerationRequest {
            tier: ModelTier::Sonnet,
            max_tokens: ASSESS_MAX_TOKENS,
            system: ASSESS_SYSTEM_PROMPT.to_string(),
            user: prompts::assessment_context(&request.intake),
        })
        .await?;

    Ok(streaming_response(relay::stream_plain(
        events,
        ModelTier::Sonnet,
        started,
    )))
}

/// GET /api/scenarios
///
/// Static catalog used by the client to populate the scenario picker.
pub async fn handle_scenarios() -> Json<&'static [Scenario]> {
    Json(scenarios::FEDERAL_SCENARIOS)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
