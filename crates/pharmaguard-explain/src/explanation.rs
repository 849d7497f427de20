//! Explanation generation for a single gene/drug finding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Explanation errors.
#[derive(Error, Debug)]
pub enum ExplainError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

pub type ExplainResult<T> = Result<T, ExplainError>;

/// Produces the human-readable summary attached to a risk report.
///
/// Implementations must be infallible from the caller's point of view: a
/// report always carries a summary, so a backend that cannot produce one
/// should fall back to [`TemplateExplainer`].
pub trait Explainer: Send + Sync {
    fn explain(&self, gene: &str, allele: Option<&str>, drug: &str, risk_label: &str) -> String;
}

/// Structured explanation as returned by an LLM backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplanationOutput {
    pub summary: String,
    #[serde(default)]
    pub mechanism: Option<String>,
}

/// Parse LLM output JSON into a structured explanation.
pub fn parse_explanation_output(response: &str) -> ExplainResult<ExplanationOutput> {
    // The model sometimes wraps the object in prose
    let json_start = response.find('{').ok_or_else(|| {
        ExplainError::InvalidFormat("No JSON object found in response".into())
    })?;
    let json_end = response.rfind('}').ok_or_else(|| {
        ExplainError::InvalidFormat("No closing brace found in response".into())
    })?;
    if json_end < json_start {
        return Err(ExplainError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }

    let output: ExplanationOutput = serde_json::from_str(&response[json_start..=json_end])?;
    if output.summary.trim().is_empty() {
        return Err(ExplainError::InvalidFormat("Empty summary".into()));
    }

    Ok(output)
}

/// Deterministic explainer built from fixed sentence templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateExplainer;

impl TemplateExplainer {
    pub fn new() -> Self {
        Self
    }

    fn consequence(risk_label: &str) -> &'static str {
        match risk_label {
            "Toxic" => {
                "which is associated with altered drug metabolism and a high risk of adverse reactions"
            }
            "Adjust Dosage" => {
                "which is associated with reduced or altered enzyme activity, so standard doses may need adjustment"
            }
            "Ineffective" => {
                "which is associated with poor activation of the drug, so the expected therapeutic effect may not be reached"
            }
            "Safe" => "which is not expected to change the response to standard dosing",
            _ => "whose clinical impact should be reviewed against current CPIC guidelines",
        }
    }
}

impl Explainer for TemplateExplainer {
    fn explain(&self, gene: &str, allele: Option<&str>, drug: &str, risk_label: &str) -> String {
        let variant = match allele {
            Some(allele) if !allele.trim().is_empty() => format!("the {} {} allele", gene, allele.trim()),
            _ => format!("a {} variant", gene),
        };
        format!(
            "The patient carries {}, {}. Predicted response to {}: {}.",
            variant,
            Self::consequence(risk_label),
            drug,
            risk_label
        )
    }
}

/// Explainer that prefers an LLM backend and falls back to templates.
///
/// The backend receives the full prompt and the GBNF output grammar
/// ([`JSON_GRAMMAR`](crate::prompts::JSON_GRAMMAR)) and returns the raw model
/// response.
pub struct LlmExplainer<F>
where
    F: Fn(&str, &str) -> Option<String> + Send + Sync,
{
    backend: F,
    fallback: TemplateExplainer,
}

impl<F> LlmExplainer<F>
where
    F: Fn(&str, &str) -> Option<String> + Send + Sync,
{
    pub fn new(backend: F) -> Self {
        Self {
            backend,
            fallback: TemplateExplainer,
        }
    }
}

impl<F> Explainer for LlmExplainer<F>
where
    F: Fn(&str, &str) -> Option<String> + Send + Sync,
{
    fn explain(&self, gene: &str, allele: Option<&str>, drug: &str, risk_label: &str) -> String {
        let prompt = crate::prompts::build_explanation_prompt(gene, allele, drug, risk_label);
        (self.backend)(&prompt, crate::prompts::JSON_GRAMMAR)
            .and_then(|raw| parse_explanation_output(&raw).ok())
            .map(|out| out.summary)
            .unwrap_or_else(|| self.fallback.explain(gene, allele, drug, risk_label))
    }
}
