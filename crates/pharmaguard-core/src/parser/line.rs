//! Single-line annotation parsing.
//!
//! A data line carries a `KEY=VALUE;KEY=VALUE` block in one of its
//! tab-delimited columns. The column position is not fixed: the first column
//! whose block has a `GENE` key wins.

use std::collections::HashMap;

use thiserror::Error;

/// VCF `ID` column, holding the rsid.
const ID_COLUMN: usize = 2;

/// Fewest columns for a line to count as column-based (CHROM..INFO).
const MIN_VCF_COLUMNS: usize = 8;

/// Why a line produced no record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("no annotation block with a GENE key")]
    MissingGene,

    #[error("GENE key has an empty value")]
    EmptyGene,
}

pub type LineResult<T> = Result<T, LineError>;

/// Fields extracted from one data line, before phenotype resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Uppercase gene symbol
    pub gene: String,
    /// `ALLELE` or `STAR` value
    pub allele: Option<String>,
    /// Raw `PHENOTYPE` value
    pub phenotype: Option<String>,
    /// ID column of a column-based line
    pub rsid: Option<String>,
}

/// Parse one data line. Comment and blank lines must be filtered by the caller.
pub fn parse_line(line: &str) -> LineResult<ParsedLine> {
    let columns: Vec<&str> = line.trim().split('\t').collect();

    let fields = columns
        .iter()
        .map(|column| annotation_fields(column))
        .find(|fields| fields.contains_key("GENE"))
        .ok_or(LineError::MissingGene)?;

    let gene = fields
        .get("GENE")
        .map(|gene| gene.to_uppercase())
        .filter(|gene| !gene.is_empty())
        .ok_or(LineError::EmptyGene)?;

    let allele = non_empty(&fields, "ALLELE").or_else(|| non_empty(&fields, "STAR"));
    let phenotype = non_empty(&fields, "PHENOTYPE");

    let rsid = if columns.len() >= MIN_VCF_COLUMNS {
        Some(columns[ID_COLUMN].trim())
            .filter(|id| !id.is_empty() && *id != ".")
            .map(str::to_string)
    } else {
        None
    };

    Ok(ParsedLine {
        gene,
        allele,
        phenotype,
        rsid,
    })
}

/// Split a column into uppercase keys and trimmed values.
///
/// Keys keep only their last whitespace-separated token, so a block embedded
/// in a space-delimited line still parses. Values keep inner spaces
/// ("Reduced Function"). The first occurrence of a key wins.
fn annotation_fields(column: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    for item in column.split(';') {
        let Some((key, value)) = item.split_once('=') else {
            continue;
        };
        let Some(key) = key.split_whitespace().last() else {
            continue;
        };
        let value = value.trim();
        fields
            .entry(key.to_uppercase())
            .or_insert_with(|| value.to_string());
    }

    fields
}

fn non_empty(fields: &HashMap<String, String>, key: &str) -> Option<String> {
    fields.get(key).filter(|value| !value.is_empty()).cloned()
}
