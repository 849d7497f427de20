//! Drug risk evaluation.
//!
//! Two lookup tables drive the assessment:
//! - drug-specific overrides keyed by (drug, phenotype)
//! - a generic phenotype → risk table
//!
//! The default [`RiskStrategy::Composite`] consults overrides first and falls
//! back to the phenotype table.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Phenotype, RiskAssessment, RiskLabel, VariantRecord};
use crate::tables::DrugGeneIndex;

/// Assessment when no relevant variant was found.
///
/// Lower than a confirmed Safe result: it signals "no evidence", not
/// "evidence of safety".
pub const NO_EVIDENCE: RiskAssessment = RiskAssessment::new(RiskLabel::Safe, 0.5);

/// Assessment for phenotypes missing from the phenotype table.
pub const UNMAPPED_PHENOTYPE: RiskAssessment = RiskAssessment::new(RiskLabel::Safe, 0.3);

/// Assessment when the override strategy has no entry for the drug.
pub const OVERRIDE_FALLBACK: RiskAssessment = RiskAssessment::new(RiskLabel::Safe, 0.85);

/// Which lookup tables to consult.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskStrategy {
    /// Generic phenotype table only
    Phenotype,
    /// Drug-specific overrides only
    Override,
    /// Overrides, then the phenotype table
    #[default]
    Composite,
}

impl FromStr for RiskStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "phenotype" => Ok(RiskStrategy::Phenotype),
            "override" => Ok(RiskStrategy::Override),
            "composite" => Ok(RiskStrategy::Composite),
            other => Err(format!(
                "unknown risk strategy '{}' (expected phenotype, override or composite)",
                other
            )),
        }
    }
}

impl fmt::Display for RiskStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskStrategy::Phenotype => "phenotype",
            RiskStrategy::Override => "override",
            RiskStrategy::Composite => "composite",
        };
        f.write_str(name)
    }
}

/// Risk engine over fixed reference tables.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    phenotype_risk: HashMap<Phenotype, RiskAssessment>,
    /// (canonical drug, phenotype) → assessment
    overrides: HashMap<(String, Phenotype), RiskAssessment>,
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskEngine {
    /// Create an engine with the built-in tables.
    pub fn new() -> Self {
        Self {
            phenotype_risk: Self::default_phenotype_risk(),
            overrides: Self::default_overrides(),
        }
    }

    /// Evaluate with the composite strategy.
    pub fn evaluate(&self, relevant: &[VariantRecord], drug: &str) -> RiskAssessment {
        self.evaluate_with(relevant, drug, RiskStrategy::Composite)
    }

    /// Evaluate the drug risk implied by the relevant variants.
    ///
    /// Only the first variant is inspected; input order decides priority.
    pub fn evaluate_with(
        &self,
        relevant: &[VariantRecord],
        drug: &str,
        strategy: RiskStrategy,
    ) -> RiskAssessment {
        let Some(primary) = relevant.first() else {
            return NO_EVIDENCE;
        };
        let drug = DrugGeneIndex::canonicalize(drug);

        match strategy {
            RiskStrategy::Phenotype => self.phenotype_assessment(primary.phenotype),
            RiskStrategy::Override => self
                .override_assessment(&drug, primary.phenotype)
                .unwrap_or(OVERRIDE_FALLBACK),
            RiskStrategy::Composite => self
                .override_assessment(&drug, primary.phenotype)
                .unwrap_or_else(|| self.phenotype_assessment(primary.phenotype)),
        }
    }

    /// Add or replace a drug-specific override.
    pub fn add_override(&mut self, drug: &str, phenotype: Phenotype, assessment: RiskAssessment) {
        self.overrides
            .insert((DrugGeneIndex::canonicalize(drug), phenotype), assessment);
    }

    /// Add or replace a generic phenotype mapping.
    pub fn set_phenotype_risk(&mut self, phenotype: Phenotype, assessment: RiskAssessment) {
        self.phenotype_risk.insert(phenotype, assessment);
    }

    fn phenotype_assessment(&self, phenotype: Option<Phenotype>) -> RiskAssessment {
        phenotype
            .and_then(|p| self.phenotype_risk.get(&p))
            .copied()
            .unwrap_or(UNMAPPED_PHENOTYPE)
    }

    fn override_assessment(&self, drug: &str, phenotype: Option<Phenotype>) -> Option<RiskAssessment> {
        let phenotype = phenotype?;
        self.overrides.get(&(drug.to_string(), phenotype)).copied()
    }

    /// Default phenotype → risk mappings.
    fn default_phenotype_risk() -> HashMap<Phenotype, RiskAssessment> {
        let mut map = HashMap::new();

        map.insert(
            Phenotype::PoorMetabolizer,
            RiskAssessment::new(RiskLabel::Toxic, 0.95),
        );
        map.insert(
            Phenotype::ReducedFunction,
            RiskAssessment::new(RiskLabel::AdjustDosage, 0.90),
        );
        map.insert(
            Phenotype::Intermediate,
            RiskAssessment::new(RiskLabel::AdjustDosage, 0.75),
        );
        map.insert(Phenotype::Normal, RiskAssessment::new(RiskLabel::Safe, 0.85));
        map.insert(
            Phenotype::Ultrarapid,
            RiskAssessment::new(RiskLabel::Toxic, 0.90),
        );

        map
    }

    /// Default drug-specific overrides.
    fn default_overrides() -> HashMap<(String, Phenotype), RiskAssessment> {
        let mut map = HashMap::new();

        // CYP2C19 loss of function blocks clopidogrel activation
        map.insert(
            ("CLOPIDOGREL".into(), Phenotype::PoorMetabolizer),
            RiskAssessment::new(RiskLabel::Toxic, 0.98),
        );
        map.insert(
            ("CLOPIDOGREL".into(), Phenotype::Intermediate),
            RiskAssessment::new(RiskLabel::AdjustDosage, 0.90),
        );

        // DPYD deficiency
        map.insert(
            ("FLUOROURACIL".into(), Phenotype::PoorMetabolizer),
            RiskAssessment::new(RiskLabel::Toxic, 0.99),
        );

        map
    }
}
