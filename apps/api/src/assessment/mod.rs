// Assessment pipeline: scenario catalog, prompt templates, request
// validation, scoring, and the route handlers that stream model output.
// Every model call goes through llm_client; nothing here talks to the
// API directly.

pub mod handlers;
pub mod prompts;
pub mod scenarios;
pub mod schemas;
pub mod scoring;
