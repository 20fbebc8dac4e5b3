#![allow(dead_code)]

// Wire-format types for the assessment pipeline. Everything here crosses
// the HTTP boundary, so field names serialize as camelCase to match the
// browser client and the JSON schemas the generation prompts mandate.

use serde::{Deserialize, Serialize};

/// Telemetry for one completed generation, serialized into the metadata
/// trailer of the evaluation stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub latency_ms: u64,
    pub time_to_first_token_ms: u64,
    pub cost_usd: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring verdict
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreDimension {
    pub score: u32,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub accuracy: ScoreDimension,
    pub completeness: ScoreDimension,
    pub safety: ScoreDimension,
    pub tone: ScoreDimension,
}

/// The scoring model's verdict on an evaluation response. `overall_score`
/// is the model's own weighted average and is not recomputed server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub scores: ScoreBreakdown,
    pub overall_score: u32,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Intake and prior-stage summaries (request side)
// ────────────────────────────────────────────────────────────────────────────

/// The agency intake form, as posted by the client and embedded into the
/// roadmap/assessment user messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeForm {
    pub agency_type: String,
    pub mission_description: String,
    pub pain_points: Vec<String>,
    pub data_classification: String,
    pub compliance_requirements: Vec<String>,
    pub estimated_volume: String,
}

/// Condensed architecture result carried into the roadmap request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureSummary {
    pub recommended_model: String,
    pub deployment_pathway: String,
    pub monthly_cost: String,
}

/// Condensed evaluation result carried into the roadmap request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSummary {
    pub scenario_tested: String,
    pub overall_score: f64,
    pub model_used: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Roadmap artifact (streamed as raw JSON; decoded client-side)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPhase {
    pub name: String,
    pub duration: String,
    pub objective: String,
    pub deliverables: Vec<String>,
    pub stakeholders: Vec<String>,
    pub success_criteria: Vec<String>,
    pub risks: Vec<String>,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiProjection {
    pub current_annual_cost: String,
    pub current_cost_breakdown: String,
    pub claude_annual_cost: String,
    pub claude_cost_breakdown: String,
    pub net_annual_savings: String,
    pub efficiency_gain: String,
    pub payback_period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextStep {
    pub action: String,
    pub owner: String,
    pub timeline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationRoadmap {
    pub phases: Vec<RoadmapPhase>,
    pub roi_projection: RoiProjection,
    pub next_steps: Vec<NextStep>,
    pub executive_summary: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Architecture recommendation artifact (streamed as raw JSON)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedModel {
    pub name: String,
    pub model_id: String,
    pub reasoning: String,
    pub context_window: String,
    pub strength_for_use_case: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchitectureLayer {
    pub name: String,
    pub description: String,
    pub components: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentArchitecture {
    pub pathway: String,
    pub pathway_reasoning: String,
    pub layers: Vec<ArchitectureLayer>,
    pub security_boundary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpIntegration {
    pub name: String,
    pub purpose: String,
    pub data_flow: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCost {
    pub input_tokens: String,
    pub output_tokens: String,
    pub cost_per_query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub model_cost_per_query: QueryCost,
    pub monthly_cost: String,
    pub current_state_cost: String,
    pub annual_savings: String,
    pub roi_multiple: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConsideration {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureRecommendation {
    pub recommended_model: RecommendedModel,
    pub deployment_architecture: DeploymentArchitecture,
    pub mcp_integrations: Vec<McpIntegration>,
    pub cost_estimate: CostEstimate,
    pub key_considerations: Vec<KeyConsideration>,
    pub executive_summary: String,
}
