//! Request validation for the POST endpoints.
//!
//! Bodies are parsed in two stages so malformed JSON and shape violations
//! stay distinguishable: handlers parse bytes to a `Value` first (failure
//! is "Invalid request body."), then these validators check the shape and
//! report per-field messages keyed by the offending field's name. Error
//! messages match what the browser client already displays for its own
//! form validation, so both sides of a field error read identically.

use serde_json::{Map, Value};

use crate::errors::FieldErrors;
use crate::llm_client::ModelTier;
use crate::models::assessment::{ArchitectureSummary, EvaluationSummary, IntakeForm};

#[derive(Debug)]
pub struct EvaluateRequest {
    pub scenario: String,
    pub custom_prompt: Option<String>,
    pub model: ModelTier,
}

#[derive(Debug)]
pub struct ScoreRequest {
    pub task_prompt: String,
    pub response: String,
}

#[derive(Debug)]
pub struct RoadmapRequest {
    pub intake: IntakeForm,
    pub architecture: Option<ArchitectureSummary>,
    pub evaluation: Option<EvaluationSummary>,
}

#[derive(Debug)]
pub struct AssessRequest {
    pub intake: IntakeForm,
}

/// Which message set applies to intake fields. The standalone form gets
/// the user-facing messages; the roadmap's embedded copy was validated
/// client-side already and only keeps the structural checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntakeRules {
    Form,
    Context,
}

pub fn validate_evaluate(body: &Value) -> Result<EvaluateRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    let Some(obj) = body.as_object() else {
        return Err(errors);
    };

    let scenario = required_string(obj, "scenario", &mut errors);
    let scenario = min_chars(scenario, "scenario", 1, "Scenario is required", &mut errors);

    let custom_prompt = match obj.get("customPrompt") {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            add(
                &mut errors,
                "customPrompt",
                format!("Expected string, received {}", kind(other)),
            );
            None
        }
    };

    let model = match obj.get("model") {
        None => {
            add(&mut errors, "model", "Required");
            None
        }
        Some(Value::String(s)) => match s.as_str() {
            "sonnet" => Some(ModelTier::Sonnet),
            "haiku" => Some(ModelTier::Haiku),
            other => {
                add(
                    &mut errors,
                    "model",
                    format!("Invalid enum value. Expected 'sonnet' | 'haiku', received '{other}'"),
                );
                None
            }
        },
        Some(other) => {
            add(
                &mut errors,
                "model",
                format!("Expected 'sonnet' | 'haiku', received {}", kind(other)),
            );
            None
        }
    };

    match (scenario, model) {
        (Some(scenario), Some(model)) if errors.is_empty() => Ok(EvaluateRequest {
            scenario,
            custom_prompt,
            model,
        }),
        _ => Err(errors),
    }
}

pub fn validate_score(body: &Value) -> Result<ScoreRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    let Some(obj) = body.as_object() else {
        return Err(errors);
    };

    let task_prompt = required_string(obj, "taskPrompt", &mut errors);
    let task_prompt = min_chars(task_prompt, "taskPrompt", 1, "Task prompt is required", &mut errors);

    let response = required_string(obj, "response", &mut errors);
    let response = min_chars(response, "response", 1, "Response is required", &mut errors);

    match (task_prompt, response) {
        (Some(task_prompt), Some(response)) if errors.is_empty() => Ok(ScoreRequest {
            task_prompt,
            response,
        }),
        _ => Err(errors),
    }
}

pub fn validate_roadmap(body: &Value) -> Result<RoadmapRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    let Some(obj) = body.as_object() else {
        return Err(errors);
    };

    let intake = match obj.get("intake") {
        None => {
            add(&mut errors, "intake", "Required");
            None
        }
        Some(Value::Object(map)) => validate_intake(map, IntakeRules::Context, &mut errors),
        Some(other) => {
            add(
                &mut errors,
                "intake",
                format!("Expected object, received {}", kind(other)),
            );
            None
        }
    };

    let architecture = match obj.get("architecture") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => {
            let recommended_model = required_string(map, "recommendedModel", &mut errors);
            let deployment_pathway = required_string(map, "deploymentPathway", &mut errors);
            let monthly_cost = required_string(map, "monthlyCost", &mut errors);
            match (recommended_model, deployment_pathway, monthly_cost) {
                (Some(recommended_model), Some(deployment_pathway), Some(monthly_cost)) => {
                    Some(ArchitectureSummary {
                        recommended_model,
                        deployment_pathway,
                        monthly_cost,
                    })
                }
                _ => None,
            }
        }
        Some(other) => {
            add(
                &mut errors,
                "architecture",
                format!("Expected object, received {}", kind(other)),
            );
            None
        }
    };

    let evaluation = match obj.get("evaluation") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => {
            let scenario_tested = required_string(map, "scenarioTested", &mut errors);
            let overall_score = match map.get("overallScore") {
                None => {
                    add(&mut errors, "overallScore", "Required");
                    None
                }
                Some(Value::Number(n)) => n.as_f64(),
                Some(other) => {
                    add(
                        &mut errors,
                        "overallScore",
                        format!("Expected number, received {}", kind(other)),
                    );
                    None
                }
            };
            let model_used = required_string(map, "modelUsed", &mut errors);
            match (scenario_tested, overall_score, model_used) {
                (Some(scenario_tested), Some(overall_score), Some(model_used)) => {
                    Some(EvaluationSummary {
                        scenario_tested,
                        overall_score,
                        model_used,
                    })
                }
                _ => None,
            }
        }
        Some(other) => {
            add(
                &mut errors,
                "evaluation",
                format!("Expected object, received {}", kind(other)),
            );
            None
        }
    };

    match intake {
        Some(intake) if errors.is_empty() => Ok(RoadmapRequest {
            intake,
            architecture,
            evaluation,
        }),
        _ => Err(errors),
    }
}

pub fn validate_assess(body: &Value) -> Result<AssessRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    let Some(obj) = body.as_object() else {
        return Err(errors);
    };

    match validate_intake(obj, IntakeRules::Form, &mut errors) {
        Some(intake) if errors.is_empty() => Ok(AssessRequest { intake }),
        _ => Err(errors),
    }
}

fn validate_intake(
    map: &Map<String, Value>,
    rules: IntakeRules,
    errors: &mut FieldErrors,
) -> Option<IntakeForm> {
    let agency_type = required_string(map, "agencyType", errors);
    let agency_type = match rules {
        IntakeRules::Form => min_chars(agency_type, "agencyType", 1, "Agency type is required", errors),
        IntakeRules::Context => min_chars(
            agency_type,
            "agencyType",
            1,
            "String must contain at least 1 character(s)",
            errors,
        ),
    };

    let mission_description = required_string(map, "missionDescription", errors);
    let mission_description = match rules {
        IntakeRules::Form => min_chars(
            mission_description,
            "missionDescription",
            20,
            "Mission description must be at least 20 characters",
            errors,
        ),
        IntakeRules::Context => mission_description,
    };

    let pain_points = string_array(map, "painPoints", errors);

    let data_classification = required_string(map, "dataClassification", errors);
    let data_classification = match rules {
        IntakeRules::Form => min_chars(
            data_classification,
            "dataClassification",
            1,
            "Data classification is required",
            errors,
        ),
        IntakeRules::Context => data_classification,
    };

    let compliance_requirements = string_array(map, "complianceRequirements", errors);

    let estimated_volume = required_string(map, "estimatedVolume", errors);
    let estimated_volume = match rules {
        IntakeRules::Form => min_chars(
            estimated_volume,
            "estimatedVolume",
            1,
            "Estimated volume is required",
            errors,
        ),
        IntakeRules::Context => estimated_volume,
    };

    Some(IntakeForm {
        agency_type: agency_type?,
        mission_description: mission_description?,
        pain_points: pain_points?,
        data_classification: data_classification?,
        compliance_requirements: compliance_requirements?,
        estimated_volume: estimated_volume?,
    })
}

fn required_string(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match map.get(field) {
        None => {
            add(errors, field, "Required");
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            add(
                errors,
                field,
                format!("Expected string, received {}", kind(other)),
            );
            None
        }
    }
}

fn string_array(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<Vec<String>> {
    match map.get(field) {
        None => {
            add(errors, field, "Required");
            None
        }
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => out.push(s.clone()),
                    other => {
                        add(
                            errors,
                            field,
                            format!("Expected string, received {}", kind(other)),
                        );
                        return None;
                    }
                }
            }
            Some(out)
        }
        Some(other) => {
            add(
                errors,
                field,
                format!("Expected array, received {}", kind(other)),
            );
            None
        }
    }
}

/// Length rule applied after the type check, like the client's validator:
/// a type failure suppresses the length message.
fn min_chars(
    value: Option<String>,
    field: &str,
    min: usize,
    message: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match value {
        Some(s) if s.chars().count() < min => {
            add(errors, field, message);
            None
        }
        other => other,
    }
}

fn add(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors.entry(field.to_string()).or_default().push(message.into());
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
