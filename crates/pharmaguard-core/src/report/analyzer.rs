//! End-to-end analysis of one variant source.

use pharmaguard_explain::Explainer;
use thiserror::Error;

use super::{AnalysisOptions, ReportAssembler};
use crate::models::Report;
use crate::parser::{ParseOutcome, VariantParser};
use crate::tables::{DrugGeneIndex, ReferenceTables};

/// Drug input rejected before analysis.
///
/// Only boundary layers (CLI, FFI) validate drugs; the pipeline itself
/// accepts any name and reports "no markers" for unsupported ones.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrugValidationError {
    #[error("Drug name missing")]
    Missing,

    #[error("Unsupported drug: {}", unsupported_detail(.drug, .suggestion, .supported))]
    Unsupported {
        drug: String,
        suggestion: Option<String>,
        supported: Vec<String>,
    },
}

/// `DRUG (did you mean X?); supported: A, B, C`
pub(crate) fn unsupported_detail(drug: &str, suggestion: &Option<String>, supported: &[String]) -> String {
    let hint = suggestion
        .as_ref()
        .map(|s| format!(" (did you mean {}?)", s))
        .unwrap_or_default();
    format!("{}{}; supported: {}", drug, hint, supported.join(", "))
}

/// Split a comma-separated drug list into canonical names, dropping blanks.
pub fn split_drug_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(DrugGeneIndex::canonicalize)
        .filter(|drug| !drug.is_empty())
        .collect()
}

/// Check a drug against the index, returning its canonical name.
pub fn validate_drug(tables: &ReferenceTables, drug: &str) -> Result<String, DrugValidationError> {
    let canonical = DrugGeneIndex::canonicalize(drug);
    if canonical.is_empty() {
        return Err(DrugValidationError::Missing);
    }
    if !tables.drug_genes.is_supported(&canonical) {
        return Err(DrugValidationError::Unsupported {
            suggestion: tables.drug_genes.suggest(&canonical).map(str::to_string),
            supported: tables
                .drug_genes
                .supported_drugs()
                .into_iter()
                .map(str::to_string)
                .collect(),
            drug: canonical,
        });
    }
    Ok(canonical)
}

/// Parses a source once and reports on one or more drugs.
pub struct Analyzer<'a> {
    tables: &'a ReferenceTables,
    assembler: ReportAssembler<'a>,
}

impl<'a> Analyzer<'a> {
    pub fn new(tables: &'a ReferenceTables, explainer: &'a dyn Explainer) -> Self {
        Self {
            tables,
            assembler: ReportAssembler::new(tables, explainer),
        }
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.assembler = self.assembler.with_options(options);
        self
    }

    /// Parser sharing this analyzer's tables.
    pub fn parser(&self) -> VariantParser<'a> {
        VariantParser::new(&self.tables.phenotypes)
    }

    /// Parse in-memory text and report on one drug.
    pub fn analyze_text(&self, drug: &str, text: &str) -> Report {
        let outcome = self.parser().parse_text(text);
        self.analyze_outcome(drug, &outcome)
    }

    /// Report on one drug from an already parsed source.
    pub fn analyze_outcome(&self, drug: &str, outcome: &ParseOutcome) -> Report {
        self.assembler
            .assemble_with_quality(drug, &outcome.variants, outcome.read_ok)
    }

    /// One report per drug, in the order given, over a single parse.
    pub fn analyze_many<S: AsRef<str>>(&self, drugs: &[S], outcome: &ParseOutcome) -> Vec<Report> {
        drugs
            .iter()
            .map(|drug| self.analyze_outcome(drug.as_ref(), outcome))
            .collect()
    }
}
