//! Star-allele to phenotype resolution.

use std::collections::HashMap;

use log::debug;

use crate::models::Phenotype;

/// Resolves (gene, star allele) pairs to metabolizer phenotypes.
#[derive(Debug, Clone)]
pub struct PhenotypeResolver {
    /// Gene → (star allele → phenotype)
    alleles: HashMap<String, HashMap<String, Phenotype>>,
}

impl Default for PhenotypeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PhenotypeResolver {
    /// Create a resolver with the built-in star-allele table.
    pub fn new() -> Self {
        Self {
            alleles: Self::default_alleles(),
        }
    }

    /// Resolve a star allele for a gene.
    ///
    /// Unknown genes and alleles resolve to [`Phenotype::Normal`]: absence of a
    /// known risk allele implies presumed-normal metabolism.
    pub fn resolve(&self, gene: &str, star_allele: &str) -> Phenotype {
        let phenotype = self
            .lookup(gene, star_allele)
            .unwrap_or(Phenotype::Normal);
        debug!("Resolved {} {} -> {}", gene, star_allele.trim(), phenotype);
        phenotype
    }

    /// Table lookup without the Normal fallback.
    pub fn lookup(&self, gene: &str, star_allele: &str) -> Option<Phenotype> {
        self.alleles
            .get(&gene.trim().to_uppercase())
            .and_then(|stars| stars.get(&Self::canonical_star(star_allele)))
            .copied()
    }

    /// Add or replace a star-allele mapping.
    pub fn add_allele(&mut self, gene: &str, star_allele: &str, phenotype: Phenotype) {
        self.alleles
            .entry(gene.trim().to_uppercase())
            .or_default()
            .insert(Self::canonical_star(star_allele), phenotype);
    }

    fn canonical_star(star_allele: &str) -> String {
        star_allele.trim().to_uppercase()
    }

    /// Default star-allele mappings.
    fn default_alleles() -> HashMap<String, HashMap<String, Phenotype>> {
        use Phenotype::{Intermediate, PoorMetabolizer, Ultrarapid};

        let entries: &[(&str, &[(&str, Phenotype)])] = &[
            (
                "CYP2D6",
                &[
                    ("*3", PoorMetabolizer),
                    ("*4", PoorMetabolizer),
                    ("*5", PoorMetabolizer),
                    ("*6", PoorMetabolizer),
                ],
            ),
            (
                "CYP2C19",
                &[
                    ("*2", PoorMetabolizer),
                    ("*3", PoorMetabolizer),
                    ("*17", Ultrarapid),
                ],
            ),
            ("CYP2C9", &[("*2", Intermediate), ("*3", PoorMetabolizer)]),
            ("SLCO1B1", &[("*5", PoorMetabolizer), ("*15", Intermediate)]),
            (
                "TPMT",
                &[
                    ("*2", PoorMetabolizer),
                    ("*3A", PoorMetabolizer),
                    ("*3C", Intermediate),
                ],
            ),
            ("DPYD", &[("*2A", PoorMetabolizer), ("*13", PoorMetabolizer)]),
        ];

        entries
            .iter()
            .map(|(gene, stars)| {
                let stars = stars
                    .iter()
                    .map(|(star, phenotype)| (star.to_string(), *phenotype))
                    .collect();
                (gene.to_string(), stars)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_alleles() {
        let resolver = PhenotypeResolver::new();

        assert_eq!(resolver.resolve("CYP2D6", "*4"), Phenotype::PoorMetabolizer);
        assert_eq!(resolver.resolve("cyp2c19", "*17"), Phenotype::Ultrarapid);
        assert_eq!(resolver.resolve("CYP2C9", "*2"), Phenotype::Intermediate);
        assert_eq!(resolver.resolve("SLCO1B1", " *15 "), Phenotype::Intermediate);
        assert_eq!(resolver.resolve("TPMT", "*3a"), Phenotype::PoorMetabolizer);
        assert_eq!(resolver.resolve("DPYD", "*2A"), Phenotype::PoorMetabolizer);
    }

    #[test]
    fn test_resolve_miss_is_normal() {
        let resolver = PhenotypeResolver::new();

        assert_eq!(resolver.resolve("CYP2D6", "*1"), Phenotype::Normal);
        assert_eq!(resolver.resolve("UNKNOWNGENE", "*4"), Phenotype::Normal);
        assert_eq!(resolver.lookup("CYP2D6", "*1"), None);
    }

    #[test]
    fn test_add_allele() {
        let mut resolver = PhenotypeResolver::new();
        resolver.add_allele("cyp2d6", "*10", Phenotype::Intermediate);
        resolver.add_allele("UGT1A1", "*28", Phenotype::ReducedFunction);

        assert_eq!(resolver.resolve("CYP2D6", "*10"), Phenotype::Intermediate);
        assert_eq!(resolver.resolve("UGT1A1", "*28"), Phenotype::ReducedFunction);
        assert_eq!(resolver.lookup("UGT1A1", "*1"), None);
    }
}
