//! Clinical recommendation text per risk label.

use crate::models::RiskLabel;

/// Fallback for labels outside the known set.
pub const DEFAULT_RECOMMENDATION: &str = "Consult CPIC guidelines for dosing.";

/// Recommendation for a risk label.
pub fn recommendation(label: RiskLabel) -> &'static str {
    match label {
        RiskLabel::Safe => "Standard dosing acceptable.",
        RiskLabel::AdjustDosage => {
            "Dose adjustment required. Monitor plasma levels or consider alternative."
        }
        RiskLabel::Toxic => "High risk of adverse drug reaction. Avoid this medication.",
        RiskLabel::Ineffective => {
            "Drug likely ineffective due to metabolic profile. Switch therapy."
        }
    }
}

/// Recommendation for a label given as text.
pub fn recommendation_for_label(label: &str) -> &'static str {
    RiskLabel::from_label(label)
        .map(recommendation)
        .unwrap_or(DEFAULT_RECOMMENDATION)
}
