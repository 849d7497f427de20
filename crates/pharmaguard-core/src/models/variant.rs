//! Variant and phenotype models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Clinical metabolizer classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Phenotype {
    #[serde(rename = "Poor_Metabolizer")]
    PoorMetabolizer,
    Intermediate,
    Normal,
    Ultrarapid,
    #[serde(rename = "Reduced_Function")]
    ReducedFunction,
    Unknown,
}

impl Phenotype {
    /// Canonical label, as written in variant annotations.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phenotype::PoorMetabolizer => "Poor_Metabolizer",
            Phenotype::Intermediate => "Intermediate",
            Phenotype::Normal => "Normal",
            Phenotype::Ultrarapid => "Ultrarapid",
            Phenotype::ReducedFunction => "Reduced_Function",
            Phenotype::Unknown => "Unknown",
        }
    }

    /// Short code shown in reports.
    pub fn display_code(&self) -> &'static str {
        match self {
            Phenotype::PoorMetabolizer => "PM",
            Phenotype::Intermediate => "IM",
            Phenotype::Normal => "NM",
            Phenotype::Ultrarapid => "URM",
            Phenotype::ReducedFunction => "RF",
            Phenotype::Unknown => "Unknown",
        }
    }

    /// Parse an explicitly annotated phenotype.
    ///
    /// Accepts canonical labels, `*_Metabolizer` long forms and display codes,
    /// case-insensitively. Anything else is [`Phenotype::Unknown`].
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_uppercase().replace(&[' ', '-'][..], "_");
        match normalized.as_str() {
            "POOR_METABOLIZER" | "POOR" | "PM" => Phenotype::PoorMetabolizer,
            "INTERMEDIATE" | "INTERMEDIATE_METABOLIZER" | "IM" => Phenotype::Intermediate,
            "NORMAL" | "NORMAL_METABOLIZER" | "EXTENSIVE_METABOLIZER" | "NM" | "EM" => {
                Phenotype::Normal
            }
            "ULTRARAPID" | "ULTRARAPID_METABOLIZER" | "URM" | "UM" => Phenotype::Ultrarapid,
            "REDUCED_FUNCTION" | "DECREASED_FUNCTION" | "RF" => Phenotype::ReducedFunction,
            _ => Phenotype::Unknown,
        }
    }

    /// Display code for an optional phenotype; absent maps to "Unknown".
    pub fn code_for(phenotype: Option<Phenotype>) -> &'static str {
        phenotype.unwrap_or(Phenotype::Unknown).display_code()
    }
}

impl fmt::Display for Phenotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected pharmacogenomic variant.
///
/// `allele` and `phenotype` are both optional: sources either annotate the
/// phenotype directly or only give a star allele to derive it from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantRecord {
    /// Uppercase gene symbol (e.g., "CYP2D6")
    pub gene: String,
    /// Star-allele designation (e.g., "*4")
    pub allele: Option<String>,
    /// Reference SNP id from the source, if it carried one
    pub rsid: Option<String>,
    /// Explicit or derived phenotype
    pub phenotype: Option<Phenotype>,
}

impl VariantRecord {
    /// Create a record for a gene; the symbol is uppercased.
    pub fn new(gene: &str) -> Self {
        Self {
            gene: gene.trim().to_uppercase(),
            allele: None,
            rsid: None,
            phenotype: None,
        }
    }

    pub fn with_allele(mut self, allele: &str) -> Self {
        self.allele = Some(allele.to_string());
        self
    }

    pub fn with_rsid(mut self, rsid: &str) -> Self {
        self.rsid = Some(rsid.to_string());
        self
    }

    pub fn with_phenotype(mut self, phenotype: Phenotype) -> Self {
        self.phenotype = Some(phenotype);
        self
    }

    /// Diplotype shown in reports, assuming a homozygous call.
    pub fn diplotype(&self) -> Option<String> {
        self.allele
            .as_deref()
            .map(|allele| format!("{}/{}", allele, allele))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phenotype_from_label() {
        assert_eq!(Phenotype::from_label("Poor_Metabolizer"), Phenotype::PoorMetabolizer);
        assert_eq!(Phenotype::from_label("poor metabolizer"), Phenotype::PoorMetabolizer);
        assert_eq!(Phenotype::from_label(" Intermediate_Metabolizer "), Phenotype::Intermediate);
        assert_eq!(Phenotype::from_label("NM"), Phenotype::Normal);
        assert_eq!(Phenotype::from_label("Ultrarapid"), Phenotype::Ultrarapid);
        assert_eq!(Phenotype::from_label("Reduced_Function"), Phenotype::ReducedFunction);

        // Unrecognized labels are kept as Unknown, not guessed
        assert_eq!(Phenotype::from_label("Sluggish"), Phenotype::Unknown);
        assert_eq!(Phenotype::from_label(""), Phenotype::Unknown);
    }

    #[test]
    fn test_display_codes() {
        assert_eq!(Phenotype::PoorMetabolizer.display_code(), "PM");
        assert_eq!(Phenotype::Intermediate.display_code(), "IM");
        assert_eq!(Phenotype::Normal.display_code(), "NM");
        assert_eq!(Phenotype::Ultrarapid.display_code(), "URM");
        assert_eq!(Phenotype::ReducedFunction.display_code(), "RF");
        assert_eq!(Phenotype::code_for(None), "Unknown");
    }

    #[test]
    fn test_phenotype_serde_names() {
        let json = serde_json::to_string(&Phenotype::PoorMetabolizer).unwrap();
        assert_eq!(json, "\"Poor_Metabolizer\"");

        let parsed: Phenotype = serde_json::from_str("\"Reduced_Function\"").unwrap();
        assert_eq!(parsed, Phenotype::ReducedFunction);
    }

    #[test]
    fn test_variant_record_builder() {
        let record = VariantRecord::new(" cyp2d6 ")
            .with_allele("*4")
            .with_phenotype(Phenotype::PoorMetabolizer);

        assert_eq!(record.gene, "CYP2D6");
        assert_eq!(record.diplotype(), Some("*4/*4".to_string()));
        assert!(record.rsid.is_none());
        assert_eq!(VariantRecord::new("DPYD").diplotype(), None);
    }
}
