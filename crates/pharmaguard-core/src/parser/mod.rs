//! Variant source parsing.
//!
//! Parsing is best-effort and line-independent: every data line yields its
//! own tagged result, and a line that fails is dropped without affecting the
//! rest of the file. A source that cannot be read at all yields no variants
//! and a failed [`ParseOutcome`], never an error.

mod line;

pub use line::*;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info, warn};

use crate::models::{Phenotype, VariantRecord};
use crate::tables::PhenotypeResolver;

/// Result of parsing a whole variant source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    /// Records in source order
    pub variants: Vec<VariantRecord>,
    /// False when the source could not be opened or read
    pub read_ok: bool,
    /// Data lines that produced no record
    pub dropped_lines: usize,
}

impl ParseOutcome {
    fn unreadable() -> Self {
        Self {
            variants: Vec::new(),
            read_ok: false,
            dropped_lines: 0,
        }
    }
}

/// Parser turning variant text into [`VariantRecord`]s.
pub struct VariantParser<'a> {
    phenotypes: &'a PhenotypeResolver,
}

impl<'a> VariantParser<'a> {
    /// Create a parser that derives missing phenotypes with `phenotypes`.
    pub fn new(phenotypes: &'a PhenotypeResolver) -> Self {
        Self { phenotypes }
    }

    /// Parse one line.
    ///
    /// Returns `Ok(None)` for blank and comment lines.
    pub fn parse_record(&self, line: &str) -> LineResult<Option<VariantRecord>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let parsed = parse_line(trimmed)?;
        Ok(Some(self.to_record(parsed)))
    }

    /// Parse a sequence of lines, dropping lines that fail.
    pub fn parse_lines<'l, I>(&self, lines: I) -> ParseOutcome
    where
        I: IntoIterator<Item = &'l str>,
    {
        let mut outcome = ParseOutcome {
            read_ok: true,
            ..ParseOutcome::default()
        };

        for (index, line) in lines.into_iter().enumerate() {
            match self.parse_record(line) {
                Ok(Some(record)) => outcome.variants.push(record),
                Ok(None) => {}
                Err(e) => {
                    debug!("Dropping line {}: {}", index + 1, e);
                    outcome.dropped_lines += 1;
                }
            }
        }

        info!(
            "Parsed {} variant(s), dropped {} line(s)",
            outcome.variants.len(),
            outcome.dropped_lines
        );
        outcome
    }

    /// Parse in-memory text.
    pub fn parse_text(&self, text: &str) -> ParseOutcome {
        self.parse_lines(text.lines())
    }

    /// Read a source fully, then parse it.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> ParseOutcome {
        let mut bytes = Vec::new();
        if let Err(e) = reader.read_to_end(&mut bytes) {
            warn!("Failed to read variant source: {}", e);
            return ParseOutcome::unreadable();
        }
        self.parse_text(&String::from_utf8_lossy(&bytes))
    }

    /// Open and parse a file.
    pub fn parse_path<P: AsRef<Path>>(&self, path: P) -> ParseOutcome {
        let path = path.as_ref();
        debug!("Opening variant file {}", path.display());
        match File::open(path) {
            Ok(file) => self.parse_reader(file),
            Err(e) => {
                warn!("Failed to open {}: {}", path.display(), e);
                ParseOutcome::unreadable()
            }
        }
    }

    /// Build a record, deriving the phenotype only when none was annotated.
    fn to_record(&self, parsed: ParsedLine) -> VariantRecord {
        let phenotype = match (&parsed.phenotype, &parsed.allele) {
            (Some(label), _) => Some(Phenotype::from_label(label)),
            (None, Some(allele)) => Some(self.phenotypes.resolve(&parsed.gene, allele)),
            (None, None) => None,
        };

        VariantRecord {
            gene: parsed.gene,
            allele: parsed.allele,
            rsid: parsed.rsid,
            phenotype,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn parser() -> VariantParser<'static> {
        VariantParser::new(&crate::tables::ReferenceTables::builtin().phenotypes)
    }

    #[test]
    fn test_explicit_phenotype_line() {
        let outcome =
            parser().parse_text("chr1\t.\t.\tA\tT\t.\t.\tGENE=CYP2D6;ALLELE=*4;PHENOTYPE=Poor_Metabolizer\n");

        assert!(outcome.read_ok);
        assert_eq!(outcome.variants.len(), 1);
        let record = &outcome.variants[0];
        assert_eq!(record.gene, "CYP2D6");
        assert_eq!(record.allele.as_deref(), Some("*4"));
        assert_eq!(record.phenotype, Some(Phenotype::PoorMetabolizer));
    }

    #[test]
    fn test_explicit_phenotype_is_not_overwritten() {
        // *4 would resolve to Poor_Metabolizer; the annotation wins
        let outcome = parser().parse_text("GENE=CYP2D6;ALLELE=*4;PHENOTYPE=Normal");
        assert_eq!(outcome.variants[0].phenotype, Some(Phenotype::Normal));

        let outcome = parser().parse_text("GENE=CYP2D6;ALLELE=*4;PHENOTYPE=Weird");
        assert_eq!(outcome.variants[0].phenotype, Some(Phenotype::Unknown));
    }

    #[test]
    fn test_multi_word_phenotype() {
        let outcome = parser().parse_text("GENE=TPMT;ALLELE=*3C;PHENOTYPE=Reduced Function\n");
        // *3C alone would resolve to Intermediate
        assert_eq!(outcome.variants[0].phenotype, Some(Phenotype::ReducedFunction));
    }

    #[test]
    fn test_phenotype_derived_from_star() {
        let text = "\
chr10\t94781859\trs4244285\tG\tA\t.\tPASS\tGENE=CYP2C19;STAR=*2
chr10\t94761900\trs12248560\tC\tT\t.\tPASS\tGENE=CYP2C19;STAR=*17
chr22\t42130692\trs1065852\tG\tA\t.\tPASS\tGENE=CYP2D6;STAR=*1
chr7\t99245974\trs0\tA\tG\t.\tPASS\tGENE=CYP3A5
";
        let outcome = parser().parse_text(text);
        let phenotypes: Vec<_> = outcome.variants.iter().map(|v| v.phenotype).collect();

        assert_eq!(
            phenotypes,
            vec![
                Some(Phenotype::PoorMetabolizer),
                Some(Phenotype::Ultrarapid),
                Some(Phenotype::Normal),
                None,
            ]
        );
        assert_eq!(outcome.variants[0].rsid.as_deref(), Some("rs4244285"));
    }

    #[test]
    fn test_comments_blanks_and_bad_lines() {
        let text = "\
##fileformat=VCFv4.2
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO

chr1\t100\t.\tA\tT\t.\t.\tDP=10
   \t
chr1\t200\t.\tA\tT\t.\t.\tGENE=;ALLELE=*4
chr22\t300\t.\tC\tT\t.\t.\tGENE=CYP2D6;ALLELE=*5
garbage
";
        let outcome = parser().parse_text(text);

        assert_eq!(outcome.variants.len(), 1);
        assert_eq!(outcome.variants[0].allele.as_deref(), Some("*5"));
        assert_eq!(outcome.dropped_lines, 3);
    }

    #[test]
    fn test_empty_and_comment_only() {
        assert!(parser().parse_text("").variants.is_empty());
        assert!(parser().parse_text("#only\n##comments\n").variants.is_empty());
        assert!(parser().parse_text("").read_ok);
    }

    #[test]
    fn test_reader_failure_is_soft() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
            }
        }

        let outcome = parser().parse_reader(Broken);
        assert!(!outcome.read_ok);
        assert!(outcome.variants.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let mut bytes = b"GENE=CYP2C9;ALLELE=*3;NOTE=".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b"\nGENE=TPMT;ALLELE=*3C\n");

        let outcome = parser().parse_reader(bytes.as_slice());
        assert!(outcome.read_ok);
        assert_eq!(outcome.variants.len(), 2);
        assert_eq!(outcome.variants[1].phenotype, Some(Phenotype::Intermediate));
    }

    #[test]
    fn test_missing_file() {
        let outcome = parser().parse_path("/nonexistent/input.vcf");
        assert!(!outcome.read_ok);
        assert!(outcome.variants.is_empty());
    }
}
