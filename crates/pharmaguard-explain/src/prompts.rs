//! Prompts for pharmacogenomic explanation generation.
//!
//! These prompts target small instruction-tuned models with a JSON output constraint.

/// System prompt for clinical explanation.
pub const SYSTEM_PROMPT: &str = r#"You are a clinical pharmacogenomics assistant that explains drug-gene findings to clinicians.

Given a gene, a star allele, a drug and a predicted risk label, write a short explanation of:
- what the allele does to enzyme or transporter function
- how that changes exposure to the drug or its active metabolite
- why the predicted risk label follows

Risk labels:
- Safe = standard dosing acceptable
- Adjust Dosage = dose adjustment or monitoring required
- Toxic = high risk of adverse drug reaction
- Ineffective = drug unlikely to reach therapeutic effect

Be factual and concise. Do not give dosing numbers.

Output JSON with a "summary" string and an optional "mechanism" string."#;

/// User prompt template for one finding.
pub fn make_explanation_prompt(gene: &str, allele: Option<&str>, drug: &str, risk_label: &str) -> String {
    format!(
        r#"Explain this pharmacogenomic finding:

Gene: {}
Star allele: {}
Drug: {}
Predicted risk: {}

Return a JSON object with:
- summary: Two or three sentences for the clinician
- mechanism: One phrase naming the functional effect (null if unknown)"#,
        gene,
        allele.unwrap_or("unknown"),
        drug,
        risk_label
    )
}

/// JSON grammar constraint to ensure valid output format.
pub const JSON_GRAMMAR: &str = r#"
root ::= object
object ::= "{" ws "\"summary\"" ws ":" ws string ws ("," ws "\"mechanism\"" ws ":" ws (string | "null") ws)? "}"
string ::= "\"" ([^"\\] | "\\" .)* "\""
ws ::= [ \t\n]*
"#;

/// Few-shot examples for better explanation quality.
pub const FEW_SHOT_EXAMPLES: &[((&str, &str, &str, &str), &str)] = &[
    (
        ("CYP2D6", "*4", "CODEINE", "Toxic"),
        r#"{"summary":"CYP2D6 *4 is a non-functional allele. Codeine depends on CYP2D6 to form morphine, so exposure and response are unpredictable and adverse effects are likely. Avoid codeine.","mechanism":"loss of CYP2D6 function"}"#,
    ),
    (
        ("CYP2C19", "*2", "CLOPIDOGREL", "Toxic"),
        r#"{"summary":"CYP2C19 *2 abolishes activation of clopidogrel to its active metabolite. Platelet inhibition is reduced and the risk of cardiovascular events rises. Use an alternative antiplatelet agent.","mechanism":"loss of CYP2C19 function"}"#,
    ),
];

/// Build a complete prompt with system context and optional few-shot examples.
pub fn build_full_prompt(
    gene: &str,
    allele: Option<&str>,
    drug: &str,
    risk_label: &str,
    include_examples: bool,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("<|system|>\n");
    prompt.push_str(SYSTEM_PROMPT);
    prompt.push_str("\n<|end|>\n");

    if include_examples {
        for ((ex_gene, ex_allele, ex_drug, ex_risk), output) in FEW_SHOT_EXAMPLES {
            prompt.push_str("<|user|>\n");
            prompt.push_str(&make_explanation_prompt(ex_gene, Some(*ex_allele), ex_drug, ex_risk));
            prompt.push_str("\n<|end|>\n");
            prompt.push_str("<|assistant|>\n");
            prompt.push_str(output);
            prompt.push_str("\n<|end|>\n");
        }
    }

    prompt.push_str("<|user|>\n");
    prompt.push_str(&make_explanation_prompt(gene, allele, drug, risk_label));
    prompt.push_str("\n<|end|>\n");
    prompt.push_str("<|assistant|>\n");

    prompt
}

/// Prompt used by [`crate::LlmExplainer`].
pub fn build_explanation_prompt(gene: &str, allele: Option<&str>, drug: &str, risk_label: &str) -> String {
    build_full_prompt(gene, allele, drug, risk_label, true)
}
