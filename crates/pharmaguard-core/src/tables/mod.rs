//! Reference tables shared by every analysis.
//!
//! The built-in set is constructed once per process and handed out as a
//! `&'static` reference. Deployments can extend it from a JSON document:
//!
//! ```json
//! {
//!   "drugs": { "TRAMADOL": ["CYP2D6"] },
//!   "alleles": [ { "gene": "CYP2D6", "allele": "*10", "phenotype": "Intermediate" } ],
//!   "overrides": [ { "drug": "CODEINE", "phenotype": "Ultrarapid", "risk_label": "Toxic", "confidence": 0.97 } ],
//!   "phenotype_risk": [ { "phenotype": "Intermediate", "risk_label": "Adjust Dosage", "confidence": 0.8 } ]
//! }
//! ```

mod drug_genes;
mod phenotypes;

pub use drug_genes::*;
pub use phenotypes::*;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Phenotype, RiskAssessment, RiskLabel};
use crate::risk::RiskEngine;

/// Reference table errors.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid table entry: {0}")]
    Invalid(String),
}

pub type TableResult<T> = Result<T, TableError>;

static BUILTIN: Lazy<Arc<ReferenceTables>> = Lazy::new(|| Arc::new(ReferenceTables::new()));

/// All lookup tables used by the pipeline.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub drug_genes: DrugGeneIndex,
    pub phenotypes: PhenotypeResolver,
    pub risk: RiskEngine,
}

impl ReferenceTables {
    /// Fresh copy of the built-in tables.
    pub fn new() -> Self {
        Self {
            drug_genes: DrugGeneIndex::new(),
            phenotypes: PhenotypeResolver::new(),
            risk: RiskEngine::new(),
        }
    }

    /// Process-wide built-in tables.
    pub fn builtin() -> &'static ReferenceTables {
        &BUILTIN
    }

    /// Shared handle to the same built-in tables as [`builtin`](Self::builtin).
    pub fn shared() -> Arc<ReferenceTables> {
        Arc::clone(&BUILTIN)
    }

    /// Built-in tables extended with a configuration document.
    pub fn from_config(config: &TablesConfig) -> TableResult<Self> {
        let mut tables = Self::new();
        config.apply(&mut tables)?;
        Ok(tables)
    }

    pub fn from_json_str(json: &str) -> TableResult<Self> {
        let config: TablesConfig = serde_json::from_str(json)?;
        Self::from_config(&config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Promote to a process-lifetime reference.
    ///
    /// Call once at startup; the tables are never freed.
    pub fn leak(self) -> &'static ReferenceTables {
        Box::leak(Box::new(self))
    }
}

/// Extra drug → gene mappings, allele mappings and overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TablesConfig {
    #[serde(default)]
    pub drugs: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub alleles: Vec<AlleleEntry>,
    #[serde(default)]
    pub overrides: Vec<OverrideEntry>,
    /// Replacements for the generic phenotype → risk table
    #[serde(default)]
    pub phenotype_risk: Vec<PhenotypeRiskEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlleleEntry {
    pub gene: String,
    pub allele: String,
    pub phenotype: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverrideEntry {
    pub drug: String,
    pub phenotype: String,
    pub risk_label: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhenotypeRiskEntry {
    pub phenotype: String,
    pub risk_label: String,
    pub confidence: f64,
}

impl TablesConfig {
    /// Validate every entry and merge into `tables`.
    ///
    /// Nothing is applied if any entry is invalid.
    pub fn apply(&self, tables: &mut ReferenceTables) -> TableResult<()> {
        for (drug, genes) in &self.drugs {
            require_non_empty("drug", drug)?;
            for gene in genes {
                require_non_empty("gene", gene)?;
            }
        }
        let alleles = self
            .alleles
            .iter()
            .map(|entry| -> TableResult<_> {
                require_non_empty("gene", &entry.gene)?;
                require_non_empty("allele", &entry.allele)?;
                Ok((entry, known_phenotype(&entry.phenotype)?))
            })
            .collect::<TableResult<Vec<_>>>()?;
        let overrides = self
            .overrides
            .iter()
            .map(|entry| -> TableResult<_> {
                require_non_empty("drug", &entry.drug)?;
                let phenotype = known_phenotype(&entry.phenotype)?;
                let assessment = parse_assessment(&entry.risk_label, entry.confidence, &entry.drug)?;
                Ok((entry, phenotype, assessment))
            })
            .collect::<TableResult<Vec<_>>>()?;
        let phenotype_risk = self
            .phenotype_risk
            .iter()
            .map(|entry| -> TableResult<_> {
                let phenotype = known_phenotype(&entry.phenotype)?;
                let assessment = parse_assessment(&entry.risk_label, entry.confidence, &entry.phenotype)?;
                Ok((phenotype, assessment))
            })
            .collect::<TableResult<Vec<_>>>()?;

        for (drug, genes) in &self.drugs {
            for gene in genes {
                tables.drug_genes.add_gene(drug, gene);
            }
        }
        for (entry, phenotype) in alleles {
            tables
                .phenotypes
                .add_allele(&entry.gene, &entry.allele, phenotype);
        }
        for (entry, phenotype, assessment) in overrides {
            tables.risk.add_override(&entry.drug, phenotype, assessment);
        }
        for (phenotype, assessment) in phenotype_risk {
            tables.risk.set_phenotype_risk(phenotype, assessment);
        }

        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> TableResult<()> {
    if value.trim().is_empty() {
        return Err(TableError::Invalid(format!("empty {}", field)));
    }
    Ok(())
}

fn parse_assessment(risk_label: &str, confidence: f64, subject: &str) -> TableResult<RiskAssessment> {
    let label = RiskLabel::from_label(risk_label)
        .ok_or_else(|| TableError::Invalid(format!("unknown risk label '{}'", risk_label)))?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(TableError::Invalid(format!(
            "confidence {} for {} is outside [0, 1]",
            confidence, subject
        )));
    }
    Ok(RiskAssessment::new(label, confidence))
}

fn known_phenotype(label: &str) -> TableResult<Phenotype> {
    match Phenotype::from_label(label) {
        Phenotype::Unknown => Err(TableError::Invalid(format!(
            "unknown phenotype '{}'",
            label
        ))),
        phenotype => Ok(phenotype),
    }
}
