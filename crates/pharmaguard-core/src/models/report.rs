//! Pharmacogenomic report models.
//!
//! Every field is always serialized; absent values become `null` rather than
//! being skipped, so consumers can rely on a fixed schema.

use serde::{Deserialize, Serialize};

use super::{Phenotype, RiskLabel, Severity};

/// Full risk report for one drug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub patient_id: String,
    /// Canonical (uppercase) drug name
    pub drug: String,
    /// ISO-8601 UTC timestamp ending in "Z"
    pub timestamp: String,
    pub risk_assessment: RiskSection,
    pub pharmacogenomic_profile: PharmacogenomicProfile,
    pub clinical_recommendation: ClinicalRecommendation,
    pub llm_generated_explanation: Explanation,
    pub quality_metrics: QualityMetrics,
    pub analysis_status: AnalysisStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskSection {
    pub risk_label: RiskLabel,
    pub confidence_score: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PharmacogenomicProfile {
    pub primary_gene: Option<String>,
    pub diplotype: Option<String>,
    /// Display code: PM, IM, NM, URM, RF or Unknown
    pub phenotype: String,
    pub detected_variants: Vec<DetectedVariant>,
}

/// A relevant variant as listed in the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectedVariant {
    pub rsid: String,
    pub gene: String,
    pub allele: Option<String>,
    pub phenotype: Option<Phenotype>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicalRecommendation {
    pub recommendation_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Explanation {
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityMetrics {
    pub vcf_parsing_success: bool,
    pub relevant_variants_found: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Complete,
}

impl Report {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Whether any drug-relevant variant was found.
    pub fn has_evidence(&self) -> bool {
        self.quality_metrics.relevant_variants_found > 0
    }
}
