//! Risk assessment models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Categorical drug-response outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RiskLabel {
    Safe,
    #[serde(rename = "Adjust Dosage")]
    AdjustDosage,
    Toxic,
    Ineffective,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Safe => "Safe",
            RiskLabel::AdjustDosage => "Adjust Dosage",
            RiskLabel::Toxic => "Toxic",
            RiskLabel::Ineffective => "Ineffective",
        }
    }

    /// Parse a label as written in reports ("Adjust Dosage", "Toxic", ...).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().replace('_', " ").as_str() {
            "SAFE" => Some(RiskLabel::Safe),
            "ADJUST DOSAGE" => Some(RiskLabel::AdjustDosage),
            "TOXIC" => Some(RiskLabel::Toxic),
            "INEFFECTIVE" => Some(RiskLabel::Ineffective),
            _ => None,
        }
    }

    /// Display severity. Derived from the label only.
    pub fn severity(&self) -> Severity {
        match self {
            RiskLabel::Toxic => Severity::High,
            RiskLabel::AdjustDosage => Severity::Moderate,
            RiskLabel::Safe => Severity::None,
            RiskLabel::Ineffective => Severity::Low,
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report severity shown next to the risk label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Moderate,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
        }
    }
}

/// Risk label with a confidence score in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub risk_label: RiskLabel,
    pub confidence: f64,
}

impl RiskAssessment {
    pub const fn new(risk_label: RiskLabel, confidence: f64) -> Self {
        Self {
            risk_label,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip_through_text() {
        for label in [
            RiskLabel::Safe,
            RiskLabel::AdjustDosage,
            RiskLabel::Toxic,
            RiskLabel::Ineffective,
        ] {
            assert_eq!(RiskLabel::from_label(label.as_str()), Some(label));
        }
        assert_eq!(RiskLabel::from_label("adjust_dosage"), Some(RiskLabel::AdjustDosage));
        assert_eq!(RiskLabel::from_label("Lethal"), None);
    }

    #[test]
    fn test_severity_map() {
        assert_eq!(RiskLabel::Toxic.severity(), Severity::High);
        assert_eq!(RiskLabel::AdjustDosage.severity(), Severity::Moderate);
        assert_eq!(RiskLabel::Safe.severity(), Severity::None);
        assert_eq!(RiskLabel::Ineffective.severity(), Severity::Low);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&RiskLabel::AdjustDosage).unwrap(),
            "\"Adjust Dosage\""
        );
        assert_eq!(serde_json::to_string(&Severity::None).unwrap(), "\"none\"");
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
    }
}
