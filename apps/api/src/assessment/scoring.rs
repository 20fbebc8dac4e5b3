//! Second-stage scoring: one buffered rubric completion, parsed
//! server-side. The handler collapses every failure here into the same
//! generic 500; the cause is only ever logged.

use tracing::debug;

use crate::assessment::prompts;
use crate::llm_client::{GenerationBackend, GenerationError, GenerationRequest, ModelTier};
use crate::models::assessment::ScoreResult;
use crate::wire;

pub const SCORE_MAX_TOKENS: u32 = 1024;

/// Scores a prior (task, response) pair against the fixed rubric.
pub async fn score_response(
    backend: &dyn GenerationBackend,
    task_prompt: &str,
    response: &str,
) -> Result<ScoreResult, GenerationError> {
    let request = GenerationRequest {
        tier: ModelTier::Haiku,
        max_tokens: SCORE_MAX_TOKENS,
        system: prompts::SCORE_SYSTEM_PROMPT.to_string(),
        user: prompts::scoring_message(task_prompt, response),
    };

    let (text, usage) = backend.complete(request).await?;
    let result: ScoreResult = wire::parse_fenced_json(&text)?;

    debug!(
        "scoring complete: input_tokens={}, output_tokens={}, overall_score={}",
        usage.input_tokens, usage.output_tokens, result.overall_score
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::MockBackend;
    use crate::llm_client::Usage;

    fn verdict_json() -> String {
        serde_json::json!({
            "scores": {
                "accuracy": {"score": 88, "explanation": "Grounded in the source document."},
                "completeness": {"score": 82, "explanation": "Covers all requested items."},
                "safety": {"score": 95, "explanation": "Flags PII correctly."},
                "tone": {"score": 90, "explanation": "Appropriately formal."}
            },
            "overallScore": 88,
            "summary": "Strong response with minor gaps.",
            "strengths": ["Specific citations", "Clear structure"],
            "improvements": ["Could flag the ambiguous deadline"]
        })
        .to_string()
    }

    fn usage() -> Usage {
        Usage {
            input_tokens: 500,
            output_tokens: 200,
        }
    }

    #[tokio::test]
    async fn test_scores_bare_json_verdict() {
        let backend = MockBackend::with_completion(&verdict_json(), usage());

        let result = score_response(&backend, "Summarize X", "X is small.")
            .await
            .unwrap();

        assert_eq!(result.overall_score, 88);
        assert_eq!(result.scores.accuracy.score, 88);
        assert_eq!(result.strengths.len(), 2);
    }

    #[tokio::test]
    async fn test_scores_fenced_verdict() {
        let fenced = format!("```json\n{}\n```", verdict_json());
        let backend = MockBackend::with_completion(&fenced, usage());

        let result = score_response(&backend, "Summarize X", "Y").await.unwrap();
        assert_eq!(result.scores.safety.score, 95);
    }

    #[tokio::test]
    async fn test_unparseable_verdict_is_a_parse_error() {
        let backend = MockBackend::with_completion("I grade this an A+", usage());

        let result = score_response(&backend, "Summarize X", "Y").await;
        assert!(matches!(result, Err(GenerationError::Parse(_))));
    }

    #[tokio::test]
    async fn test_remote_failure_propagates() {
        let backend = MockBackend::with_completion_error(GenerationError::Api {
            status: Some(529),
            message: "overloaded".to_string(),
        });

        let result = score_response(&backend, "Summarize X", "Y").await;
        assert!(matches!(result, Err(GenerationError::Api { .. })));
    }

    #[tokio::test]
    async fn test_rubric_request_shape() {
        let backend = MockBackend::with_completion(&verdict_json(), usage());
        score_response(&backend, "Summarize X", "X is small.")
            .await
            .unwrap();

        let request = backend.last_request().unwrap();
        assert_eq!(request.tier, ModelTier::Haiku);
        assert_eq!(request.max_tokens, SCORE_MAX_TOKENS);
        assert_eq!(request.system, prompts::SCORE_SYSTEM_PROMPT);
        assert_eq!(request.user, "TASK:\nSummarize X\n\nCLAUDE'S RESPONSE:\nX is small.");
    }
}
