//! PharmaGuard Core Library
//!
//! Pharmacogenomic risk reporting from annotated variant files.
//!
//! # Architecture
//!
//! ```text
//! VCF text ──► Parser ──► VariantRecord[] ──┐
//!                 │                          │
//!        [PhenotypeResolver]         Filter by drug genes
//!                                     [DrugGeneIndex]
//!                                            │
//!                                            ▼
//!                                      Risk evaluation
//!                                       [RiskEngine]
//!                                            │
//!                          ┌─────────────────┼─────────────────┐
//!                          ▼                 ▼                 ▼
//!                    Recommendation     Explanation      Quality metrics
//!                          └─────────────────┼─────────────────┘
//!                                            ▼
//!                                      Report (JSON)
//! ```
//!
//! # Core Principle
//!
//! **Analysis never fails once a drug is accepted.** Unreadable input, bad
//! lines and unknown genes all degrade to a defined default in the report.
//!
//! # Modules
//!
//! - [`models`]: Domain types (VariantRecord, Phenotype, RiskLabel, Report)
//! - [`parser`]: Best-effort line parser for annotated VCF text
//! - [`tables`]: Drug → gene, allele → phenotype and override tables
//! - [`risk`]: Risk engine and clinical recommendations
//! - [`report`]: Report assembly and the end-to-end analyzer

pub mod models;
pub mod parser;
pub mod report;
pub mod risk;
pub mod tables;

// Re-export commonly used types
pub use models::{Phenotype, Report, RiskAssessment, RiskLabel, Severity, VariantRecord};
pub use parser::{ParseOutcome, VariantParser};
pub use report::{
    split_drug_list, validate_drug, AnalysisOptions, Analyzer, DrugValidationError, ReportAssembler,
};
pub use risk::{RiskEngine, RiskStrategy};
pub use tables::{DrugGeneIndex, PhenotypeResolver, ReferenceTables, TablesConfig};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

use pharmaguard_explain::TemplateExplainer;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PharmaGuardError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported drug: {0}")]
    UnsupportedDrug(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<serde_json::Error> for PharmaGuardError {
    fn from(e: serde_json::Error) -> Self {
        PharmaGuardError::SerializationError(e.to_string())
    }
}

impl From<tables::TableError> for PharmaGuardError {
    fn from(e: tables::TableError) -> Self {
        PharmaGuardError::ConfigurationError(e.to_string())
    }
}

impl From<DrugValidationError> for PharmaGuardError {
    fn from(e: DrugValidationError) -> Self {
        match e {
            DrugValidationError::Missing => PharmaGuardError::InvalidInput(e.to_string()),
            DrugValidationError::Unsupported {
                ref drug,
                ref suggestion,
                ref supported,
            } => PharmaGuardError::UnsupportedDrug(report::unsupported_detail(
                drug, suggestion, supported,
            )),
        }
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open an analyzer over the built-in reference tables.
#[uniffi::export]
pub fn open_default() -> Arc<PharmaGuardCore> {
    Arc::new(PharmaGuardCore {
        tables: ReferenceTables::shared(),
    })
}

/// Open an analyzer over the built-in tables extended with a JSON document.
#[uniffi::export]
pub fn open_with_tables_json(json: String) -> Result<Arc<PharmaGuardCore>, PharmaGuardError> {
    let tables = ReferenceTables::from_json_str(&json)?;
    Ok(Arc::new(PharmaGuardCore {
        tables: Arc::new(tables),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe analysis handle for FFI.
#[derive(uniffi::Object)]
pub struct PharmaGuardCore {
    tables: Arc<ReferenceTables>,
}

#[uniffi::export]
impl PharmaGuardCore {
    /// Analyze in-memory VCF text for one drug.
    pub fn analyze_vcf_text(&self, drug: String, text: String) -> Result<FfiAnalysis, PharmaGuardError> {
        self.analyze_as(drug, text, None)
    }

    /// Analyze with a caller-supplied patient identifier.
    pub fn analyze_vcf_text_for_patient(
        &self,
        drug: String,
        text: String,
        patient_id: String,
    ) -> Result<FfiAnalysis, PharmaGuardError> {
        if patient_id.trim().is_empty() {
            return Err(PharmaGuardError::InvalidInput("patient id is empty".into()));
        }
        self.analyze_as(drug, text, Some(patient_id))
    }

    /// Drugs with at least one mapped gene, sorted.
    pub fn supported_drugs(&self) -> Vec<String> {
        self.tables
            .drug_genes
            .supported_drugs()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

impl PharmaGuardCore {
    fn analyze_as(
        &self,
        drug: String,
        text: String,
        patient_id: Option<String>,
    ) -> Result<FfiAnalysis, PharmaGuardError> {
        let drug = validate_drug(&self.tables, &drug)?;

        let mut options = AnalysisOptions::default();
        if let Some(id) = patient_id {
            options.patient_id = id;
        }

        let explainer = TemplateExplainer::new();
        let analyzer = Analyzer::new(&self.tables, &explainer).with_options(options);
        let report = analyzer.analyze_text(&drug, &text);

        FfiAnalysis::from_report(&report)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe analysis result. `report_json` carries the full report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnalysis {
    pub drug: String,
    pub risk_label: String,
    pub confidence_score: f64,
    pub severity: String,
    pub primary_gene: Option<String>,
    pub diplotype: Option<String>,
    pub phenotype: String,
    pub recommendation_text: String,
    pub summary: String,
    pub relevant_variants_found: u32,
    pub vcf_parsing_success: bool,
    pub report_json: String,
}

impl FfiAnalysis {
    fn from_report(report: &Report) -> Result<Self, PharmaGuardError> {
        Ok(Self {
            drug: report.drug.clone(),
            risk_label: report.risk_assessment.risk_label.as_str().to_string(),
            confidence_score: report.risk_assessment.confidence_score,
            severity: report.risk_assessment.severity.as_str().to_string(),
            primary_gene: report.pharmacogenomic_profile.primary_gene.clone(),
            diplotype: report.pharmacogenomic_profile.diplotype.clone(),
            phenotype: report.pharmacogenomic_profile.phenotype.clone(),
            recommendation_text: report.clinical_recommendation.recommendation_text.clone(),
            summary: report.llm_generated_explanation.summary.clone(),
            relevant_variants_found: report.quality_metrics.relevant_variants_found as u32,
            vcf_parsing_success: report.quality_metrics.vcf_parsing_success,
            report_json: report.to_json()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VCF: &str = "chr22\t42126611\trs3892097\tC\tT\t.\tPASS\tGENE=CYP2D6;STAR=*4\n";

    #[test]
    fn test_analyze_vcf_text() {
        let core = open_default();
        let analysis = core
            .analyze_vcf_text("codeine".into(), VCF.into())
            .unwrap();

        assert_eq!(analysis.drug, "CODEINE");
        assert_eq!(analysis.risk_label, "Toxic");
        assert_eq!(analysis.confidence_score, 0.95);
        assert_eq!(analysis.severity, "high");
        assert_eq!(analysis.diplotype.as_deref(), Some("*4/*4"));
        assert_eq!(analysis.phenotype, "PM");
        assert_eq!(analysis.relevant_variants_found, 1);

        let json: serde_json::Value = serde_json::from_str(&analysis.report_json).unwrap();
        assert_eq!(json["patient_id"], "PATIENT_001");
        assert_eq!(json["risk_assessment"]["risk_label"], "Toxic");
    }

    #[test]
    fn test_rejects_unsupported_and_missing_drug() {
        let core = open_default();

        match core.analyze_vcf_text("codiene".into(), VCF.into()) {
            Err(PharmaGuardError::UnsupportedDrug(msg)) => {
                assert!(msg.starts_with("CODIENE (did you mean CODEINE?); supported: "));
                assert!(msg.contains("CLOPIDOGREL"));
                assert!(msg.contains("WARFARIN"));
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            core.analyze_vcf_text(" ".into(), VCF.into()),
            Err(PharmaGuardError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_patient_id() {
        let core = open_default();
        let analysis = core
            .analyze_vcf_text_for_patient("CODEINE".into(), VCF.into(), "SUBJECT-9".into())
            .unwrap();
        assert!(analysis.report_json.contains("\"SUBJECT-9\""));

        assert!(matches!(
            core.analyze_vcf_text_for_patient("CODEINE".into(), VCF.into(), "".into()),
            Err(PharmaGuardError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_custom_tables() {
        let core = open_with_tables_json(r#"{ "drugs": { "TRAMADOL": ["CYP2D6"] } }"#.into()).unwrap();
        assert!(core.supported_drugs().contains(&"TRAMADOL".to_string()));

        let analysis = core
            .analyze_vcf_text("tramadol".into(), VCF.into())
            .unwrap();
        assert_eq!(analysis.risk_label, "Toxic");

        assert!(matches!(
            open_with_tables_json("{ not json".into()),
            Err(PharmaGuardError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_default_handles_share_builtin_tables() {
        let first = open_default();
        let second = open_default();

        assert!(Arc::ptr_eq(&first.tables, &second.tables));
        assert!(std::ptr::eq(&*first.tables, ReferenceTables::builtin()));
    }

    #[test]
    fn test_supported_drugs() {
        assert_eq!(
            open_default().supported_drugs(),
            vec![
                "AZATHIOPRINE",
                "CLOPIDOGREL",
                "CODEINE",
                "FLUOROURACIL",
                "SIMVASTATIN",
                "WARFARIN"
            ]
        );
    }
}
