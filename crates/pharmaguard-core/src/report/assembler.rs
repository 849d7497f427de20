//! Report assembly.
//!
//! Turns the parsed variants and a drug name into a fully-populated
//! [`Report`]. Assembly is total: every missing input has a defined default.

use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use pharmaguard_explain::Explainer;

use crate::models::{
    AnalysisStatus, ClinicalRecommendation, DetectedVariant, Explanation, PharmacogenomicProfile,
    Phenotype, QualityMetrics, Report, RiskSection, VariantRecord,
};
use crate::risk::{recommendation, RiskStrategy};
use crate::tables::{DrugGeneIndex, ReferenceTables};

/// Placeholder subject identifier.
pub const DEFAULT_PATIENT_ID: &str = "PATIENT_001";

/// Per-deployment analysis settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub patient_id: String,
    pub strategy: RiskStrategy,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            patient_id: DEFAULT_PATIENT_ID.to_string(),
            strategy: RiskStrategy::default(),
        }
    }
}

/// Builds reports from parsed variants.
pub struct ReportAssembler<'a> {
    tables: &'a ReferenceTables,
    explainer: &'a dyn Explainer,
    options: AnalysisOptions,
}

impl<'a> ReportAssembler<'a> {
    /// Create an assembler with default options.
    pub fn new(tables: &'a ReferenceTables, explainer: &'a dyn Explainer) -> Self {
        Self {
            tables,
            explainer,
            options: AnalysisOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Assemble a report, stamped now, for a successfully read source.
    pub fn assemble(&self, drug: &str, variants: &[VariantRecord]) -> Report {
        self.assemble_at(drug, variants, true, Utc::now())
    }

    /// Assemble a report, stamped now.
    pub fn assemble_with_quality(
        &self,
        drug: &str,
        variants: &[VariantRecord],
        parsing_success: bool,
    ) -> Report {
        self.assemble_at(drug, variants, parsing_success, Utc::now())
    }

    /// Assemble a report with an explicit timestamp.
    pub fn assemble_at(
        &self,
        drug: &str,
        variants: &[VariantRecord],
        parsing_success: bool,
        timestamp: DateTime<Utc>,
    ) -> Report {
        let drug = DrugGeneIndex::canonicalize(drug);
        let relevant = self.relevant_variants(&drug, variants);

        let assessment = self
            .tables
            .risk
            .evaluate_with(&relevant, &drug, self.options.strategy);
        let primary = relevant.first();

        let summary = match primary {
            Some(variant) => self.explainer.explain(
                &variant.gene,
                variant.allele.as_deref(),
                &drug,
                assessment.risk_label.as_str(),
            ),
            None => format!("No pharmacogenomic markers relevant to {} detected.", drug),
        };

        info!(
            "{}: {} relevant variant(s) -> {} ({:.2})",
            drug,
            relevant.len(),
            assessment.risk_label,
            assessment.confidence
        );

        Report {
            patient_id: self.options.patient_id.clone(),
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            risk_assessment: RiskSection {
                risk_label: assessment.risk_label,
                confidence_score: assessment.confidence,
                severity: assessment.risk_label.severity(),
            },
            pharmacogenomic_profile: PharmacogenomicProfile {
                primary_gene: primary.map(|v| v.gene.clone()),
                diplotype: primary.and_then(VariantRecord::diplotype),
                phenotype: Phenotype::code_for(primary.and_then(|v| v.phenotype)).to_string(),
                detected_variants: detected_variants(&relevant),
            },
            clinical_recommendation: ClinicalRecommendation {
                recommendation_text: recommendation(assessment.risk_label).to_string(),
            },
            llm_generated_explanation: Explanation { summary },
            quality_metrics: QualityMetrics {
                vcf_parsing_success: parsing_success,
                relevant_variants_found: relevant.len(),
            },
            analysis_status: AnalysisStatus::Complete,
            drug,
        }
    }

    /// Variants on a gene relevant to `drug`, in input order.
    pub fn relevant_variants(&self, drug: &str, variants: &[VariantRecord]) -> Vec<VariantRecord> {
        let genes = self.tables.drug_genes.genes_for(drug);
        variants
            .iter()
            .filter(|v| genes.contains(&v.gene))
            .cloned()
            .collect()
    }
}

/// Report entries; missing rsids become `rs<position>`, 1-based.
fn detected_variants(relevant: &[VariantRecord]) -> Vec<DetectedVariant> {
    relevant
        .iter()
        .enumerate()
        .map(|(i, v)| DetectedVariant {
            rsid: v.rsid.clone().unwrap_or_else(|| format!("rs{}", i + 1)),
            gene: v.gene.clone(),
            allele: v.allele.clone(),
            phenotype: v.phenotype,
        })
        .collect()
}
