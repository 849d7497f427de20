//! Drug to gene index.
//!
//! Maps a canonical (trimmed, uppercase) drug name to the ordered list of
//! pharmacogenes relevant to it.

use std::collections::HashMap;

use strsim::jaro_winkler;

/// Minimum Jaro-Winkler similarity for a drug name suggestion.
const MIN_SUGGESTION_SIMILARITY: f64 = 0.80;

/// Index of clinically relevant genes per drug.
#[derive(Debug, Clone)]
pub struct DrugGeneIndex {
    /// Canonical drug name → genes, in priority order
    genes: HashMap<String, Vec<String>>,
}

impl Default for DrugGeneIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl DrugGeneIndex {
    /// Create an index with the built-in CPIC drug set.
    pub fn new() -> Self {
        Self {
            genes: Self::default_genes(),
        }
    }

    /// Canonical form used for every lookup.
    pub fn canonicalize(drug: &str) -> String {
        drug.trim().to_uppercase()
    }

    /// Genes relevant to a drug. Unsupported drugs yield an empty slice.
    pub fn genes_for(&self, drug: &str) -> &[String] {
        self.genes
            .get(&Self::canonicalize(drug))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check whether a drug is in the index.
    pub fn is_supported(&self, drug: &str) -> bool {
        self.genes.contains_key(&Self::canonicalize(drug))
    }

    /// Supported drug names, sorted.
    pub fn supported_drugs(&self) -> Vec<&str> {
        let mut drugs: Vec<&str> = self.genes.keys().map(String::as_str).collect();
        drugs.sort_unstable();
        drugs
    }

    /// Closest supported drug name for a misspelled input.
    pub fn suggest(&self, drug: &str) -> Option<&str> {
        let canonical = Self::canonicalize(drug);
        if canonical.is_empty() {
            return None;
        }

        self.genes
            .keys()
            .map(|known| (known.as_str(), jaro_winkler(&canonical, known)))
            .filter(|(_, score)| *score >= MIN_SUGGESTION_SIMILARITY)
            .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(known, _)| known)
    }

    /// Add a gene to a drug's list, creating the drug if needed.
    ///
    /// Duplicates are ignored so the list stays an ordered set.
    pub fn add_gene(&mut self, drug: &str, gene: &str) {
        let gene = gene.trim().to_uppercase();
        let genes = self.genes.entry(Self::canonicalize(drug)).or_default();
        if !gene.is_empty() && !genes.contains(&gene) {
            genes.push(gene);
        }
    }

    /// Number of supported drugs.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Default drug → gene mappings.
    fn default_genes() -> HashMap<String, Vec<String>> {
        let mut map = HashMap::new();

        // Opioids
        map.insert("CODEINE".into(), vec!["CYP2D6".into()]);

        // Antiplatelets
        map.insert("CLOPIDOGREL".into(), vec!["CYP2C19".into()]);

        // Anticoagulants
        map.insert("WARFARIN".into(), vec!["CYP2C9".into()]);

        // Statins
        map.insert("SIMVASTATIN".into(), vec!["SLCO1B1".into()]);

        // Thiopurines
        map.insert("AZATHIOPRINE".into(), vec!["TPMT".into()]);

        // Fluoropyrimidines
        map.insert("FLUOROURACIL".into(), vec!["DPYD".into()]);

        map
    }
}
