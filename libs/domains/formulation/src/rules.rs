//! Static formulation rule table.
//!
//! Loaded once, immutable at runtime. Product-type percentage ranges,
//! phase/function label mappings, concern recommendations, and
//! incompatible ingredient pairs all live here so the composer itself
//! stays free of embedded domain constants.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use ts_rs::TS;
use utoipa::ToSchema;

/// Recommendation strength for a concern-driven function
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema, TS,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Default percentage an active of this priority receives before
    /// normalization
    pub fn default_percentage(&self) -> f64 {
        match self {
            Priority::High => 5.0,
            Priority::Medium => 3.0,
            Priority::Low => 1.0,
        }
    }
}

/// Percentage range one phase category must fill for a product type
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct PhaseRequirement {
    /// Abstract category key (e.g., "water_phase")
    pub category: String,
    pub min_percent: f64,
    pub max_percent: f64,
}

impl PhaseRequirement {
    fn new(category: &str, min_percent: f64, max_percent: f64) -> Self {
        Self {
            category: category.to_string(),
            min_percent,
            max_percent,
        }
    }

    /// Midpoint of the allowed range
    pub fn midpoint(&self) -> f64 {
        (self.min_percent + self.max_percent) / 2.0
    }
}

/// One function recommendation for a skin concern
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct FunctionRecommendation {
    /// Abstract function key (e.g., "humectant")
    pub function: String,
    pub priority: Priority,
}

impl FunctionRecommendation {
    fn new(function: &str, priority: Priority) -> Self {
        Self {
            function: function.to_string(),
            priority,
        }
    }
}

/// Immutable formulation rule set.
///
/// Construct with [`FormulationRules::standard`] and share by reference;
/// tests inject reduced tables the same way.
#[derive(Debug, Clone)]
pub struct FormulationRules {
    product_bases: HashMap<String, Vec<PhaseRequirement>>,
    type_aliases: HashMap<String, String>,
    phase_labels: HashMap<String, Vec<String>>,
    function_labels: HashMap<String, Vec<String>>,
    concern_recommendations: HashMap<String, Vec<FunctionRecommendation>>,
    incompatible_pairs: Vec<(String, String)>,
}

impl FormulationRules {
    /// The standard rule table
    pub fn standard() -> Self {
        use Priority::{High, Medium};

        let product_bases = HashMap::from([
            (
                "serum".to_string(),
                vec![
                    PhaseRequirement::new("water_phase", 70.0, 90.0),
                    PhaseRequirement::new("oil_phase", 5.0, 15.0),
                    PhaseRequirement::new("actives", 1.0, 10.0),
                    PhaseRequirement::new("preservatives", 0.5, 1.5),
                ],
            ),
            (
                "cream".to_string(),
                vec![
                    PhaseRequirement::new("water_phase", 60.0, 80.0),
                    PhaseRequirement::new("oil_phase", 15.0, 30.0),
                    PhaseRequirement::new("actives", 1.0, 8.0),
                    PhaseRequirement::new("preservatives", 0.5, 1.5),
                ],
            ),
            (
                "cleanser".to_string(),
                vec![
                    PhaseRequirement::new("water_phase", 50.0, 70.0),
                    PhaseRequirement::new("surfactants", 15.0, 30.0),
                    PhaseRequirement::new("oil_phase", 5.0, 15.0),
                    PhaseRequirement::new("preservatives", 0.5, 1.5),
                ],
            ),
            (
                "toner".to_string(),
                vec![
                    PhaseRequirement::new("water_phase", 85.0, 97.0),
                    PhaseRequirement::new("actives", 1.0, 10.0),
                    PhaseRequirement::new("preservatives", 0.5, 1.5),
                ],
            ),
            (
                "face_mask".to_string(),
                vec![
                    PhaseRequirement::new("water_phase", 60.0, 85.0),
                    PhaseRequirement::new("actives", 2.0, 15.0),
                    PhaseRequirement::new("clays", 5.0, 20.0),
                    PhaseRequirement::new("preservatives", 0.5, 1.5),
                ],
            ),
            (
                "shampoo".to_string(),
                vec![
                    PhaseRequirement::new("water_phase", 60.0, 75.0),
                    PhaseRequirement::new("surfactants", 15.0, 25.0),
                    PhaseRequirement::new("conditioning", 1.0, 5.0),
                    PhaseRequirement::new("preservatives", 0.5, 1.5),
                ],
            ),
            (
                "conditioner".to_string(),
                vec![
                    PhaseRequirement::new("water_phase", 70.0, 85.0),
                    PhaseRequirement::new("conditioning", 3.0, 8.0),
                    PhaseRequirement::new("emollients", 2.0, 8.0),
                    PhaseRequirement::new("preservatives", 0.5, 1.5),
                ],
            ),
            (
                "hair_mask".to_string(),
                vec![
                    PhaseRequirement::new("water_phase", 50.0, 70.0),
                    PhaseRequirement::new("conditioning", 5.0, 15.0),
                    PhaseRequirement::new("proteins", 2.0, 8.0),
                    PhaseRequirement::new("preservatives", 0.5, 1.5),
                ],
            ),
            (
                "body_lotion".to_string(),
                vec![
                    PhaseRequirement::new("water_phase", 65.0, 80.0),
                    PhaseRequirement::new("oil_phase", 10.0, 25.0),
                    PhaseRequirement::new("emulsifiers", 2.0, 6.0),
                    PhaseRequirement::new("preservatives", 0.5, 1.5),
                ],
            ),
            (
                "body_scrub".to_string(),
                vec![
                    PhaseRequirement::new("oil_phase", 30.0, 60.0),
                    PhaseRequirement::new("exfoliants", 20.0, 40.0),
                    PhaseRequirement::new("emollients", 10.0, 20.0),
                    PhaseRequirement::new("preservatives", 0.5, 1.0),
                ],
            ),
        ]);

        let type_aliases = HashMap::from([
            ("moisturizer".to_string(), "cream".to_string()),
            ("lotion".to_string(), "body_lotion".to_string()),
            ("body_butter".to_string(), "body_lotion".to_string()),
            ("shower_gel".to_string(), "cleanser".to_string()),
            ("face_wash".to_string(), "cleanser".to_string()),
            ("essence".to_string(), "toner".to_string()),
            (
                "leave_in_conditioner".to_string(),
                "conditioner".to_string(),
            ),
        ]);

        let phase_labels = HashMap::from([
            (
                "water_phase".to_string(),
                vec!["Water Phase".to_string(), "Hydrophilic".to_string()],
            ),
            (
                "oil_phase".to_string(),
                vec!["Oil Phase".to_string(), "Lipophilic".to_string()],
            ),
            (
                "actives".to_string(),
                vec!["Active".to_string(), "Cool Down Phase".to_string()],
            ),
            ("preservatives".to_string(), vec!["Preservative".to_string()]),
            ("surfactants".to_string(), vec!["Surfactant".to_string()]),
            ("emulsifiers".to_string(), vec!["Emulsifier".to_string()]),
            ("thickeners".to_string(), vec!["Thickener".to_string()]),
            (
                "conditioning".to_string(),
                vec!["Conditioning".to_string(), "Cationic".to_string()],
            ),
            (
                "clays".to_string(),
                vec!["Clay".to_string(), "Absorbent".to_string()],
            ),
            (
                "exfoliants".to_string(),
                vec!["Exfoliant".to_string(), "Abrasive".to_string()],
            ),
        ]);

        let function_labels = HashMap::from([
            ("humectant".to_string(), vec!["Humectant".to_string()]),
            ("emollient".to_string(), vec!["Emollient".to_string()]),
            ("occlusive".to_string(), vec!["Occlusive".to_string()]),
            ("antioxidant".to_string(), vec!["Antioxidant".to_string()]),
            (
                "preservative".to_string(),
                vec!["Preservative".to_string(), "Antimicrobial".to_string()],
            ),
            (
                "active".to_string(),
                vec![
                    "Active".to_string(),
                    "Exfoliant".to_string(),
                    "Brightening".to_string(),
                ],
            ),
            ("emulsifier".to_string(), vec!["Emulsifier".to_string()]),
            (
                "thickener".to_string(),
                vec!["Thickener".to_string(), "Viscosity Modifier".to_string()],
            ),
            (
                "surfactant".to_string(),
                vec!["Surfactant".to_string(), "Cleansing Agent".to_string()],
            ),
            ("ph_adjuster".to_string(), vec!["pH Adjuster".to_string()]),
            (
                "conditioning".to_string(),
                vec!["Conditioning Agent".to_string(), "Detangling".to_string()],
            ),
            (
                "soothing".to_string(),
                vec![
                    "Soothing".to_string(),
                    "Anti-inflammatory".to_string(),
                    "Calming".to_string(),
                ],
            ),
            (
                "antimicrobial".to_string(),
                vec!["Antimicrobial".to_string(), "Antibacterial".to_string()],
            ),
        ]);

        let concern_recommendations = HashMap::from([
            (
                "dryness".to_string(),
                vec![
                    FunctionRecommendation::new("humectant", High),
                    FunctionRecommendation::new("emollient", High),
                    FunctionRecommendation::new("occlusive", Medium),
                ],
            ),
            (
                "aging".to_string(),
                vec![
                    FunctionRecommendation::new("antioxidant", High),
                    FunctionRecommendation::new("active", High),
                    FunctionRecommendation::new("humectant", Medium),
                ],
            ),
            (
                "acne".to_string(),
                vec![
                    FunctionRecommendation::new("active", High),
                    FunctionRecommendation::new("oil_control", High),
                    FunctionRecommendation::new("antimicrobial", Medium),
                ],
            ),
            (
                "sensitivity".to_string(),
                vec![
                    FunctionRecommendation::new("soothing", High),
                    FunctionRecommendation::new("barrier_repair", High),
                    FunctionRecommendation::new("humectant", Medium),
                ],
            ),
            (
                "hyperpigmentation".to_string(),
                vec![
                    FunctionRecommendation::new("brightening", High),
                    FunctionRecommendation::new("exfoliant", Medium),
                    FunctionRecommendation::new("antioxidant", Medium),
                ],
            ),
        ]);

        let incompatible_pairs = vec![
            (
                "Vitamin C (L-Ascorbic Acid)".to_string(),
                "Niacinamide".to_string(),
            ),
            ("Retinol".to_string(), "AHA/BHA Acids".to_string()),
            ("Retinol".to_string(), "Benzoyl Peroxide".to_string()),
        ];

        Self {
            product_bases,
            type_aliases,
            phase_labels,
            function_labels,
            concern_recommendations,
            incompatible_pairs,
        }
    }

    /// Resolve a requested product type through the alias map.
    ///
    /// `None` means the type is unsupported; composition must fail fast
    /// before any selection work.
    pub fn resolve_product_type<'a>(&'a self, product_type: &'a str) -> Option<&'a str> {
        if self.product_bases.contains_key(product_type) {
            return Some(product_type);
        }

        self.type_aliases
            .get(product_type)
            .map(String::as_str)
            .filter(|resolved| self.product_bases.contains_key(*resolved))
    }

    /// Phase categories and percentage ranges a product type requires
    pub fn base_requirements(&self, resolved_type: &str) -> &[PhaseRequirement] {
        self.product_bases
            .get(resolved_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Concrete phase labels for an abstract category; unmapped categories
    /// fall back to the category key itself
    pub fn phase_labels(&self, category: &str) -> Vec<String> {
        self.phase_labels
            .get(category)
            .cloned()
            .unwrap_or_else(|| vec![category.to_string()])
    }

    /// Concrete function labels for an abstract function; unmapped
    /// functions fall back to the function key itself
    pub fn function_labels(&self, function: &str) -> Vec<String> {
        self.function_labels
            .get(function)
            .cloned()
            .unwrap_or_else(|| vec![function.to_string()])
    }

    /// Prioritized function recommendations for a skin concern
    pub fn recommendations(&self, concern: &str) -> Option<&[FunctionRecommendation]> {
        self.concern_recommendations
            .get(concern)
            .map(Vec::as_slice)
    }

    /// Whether two ingredient names form a known incompatible pair
    pub fn are_incompatible(&self, a: &str, b: &str) -> bool {
        self.incompatible_pairs.iter().any(|(left, right)| {
            (left.eq_ignore_ascii_case(a) && right.eq_ignore_ascii_case(b))
                || (left.eq_ignore_ascii_case(b) && right.eq_ignore_ascii_case(a))
        })
    }

    /// Target pH range for the finished product
    pub fn ideal_ph_range(&self, product_type: &str) -> &'static str {
        match product_type {
            "cleanser" | "face_wash" | "shampoo" => "4.5-5.5",
            "toner" | "essence" => "4.0-5.5",
            "face_mask" => "5.0-7.0",
            "serum" | "moisturizer" | "cream" | "lotion" | "conditioner" => "5.0-6.0",
            _ => "5.0-6.0",
        }
    }

    /// Supported product types (resolved names, sorted)
    pub fn supported_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.product_bases.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Known skin concerns (sorted)
    pub fn supported_concerns(&self) -> Vec<&str> {
        let mut concerns: Vec<&str> = self
            .concern_recommendations
            .keys()
            .map(String::as_str)
            .collect();
        concerns.sort_unstable();
        concerns
    }
}

impl Default for FormulationRules {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_direct_type() {
        let rules = FormulationRules::standard();
        assert_eq!(rules.resolve_product_type("serum"), Some("serum"));
    }

    #[test]
    fn test_resolve_alias() {
        let rules = FormulationRules::standard();
        assert_eq!(rules.resolve_product_type("moisturizer"), Some("cream"));
        assert_eq!(rules.resolve_product_type("essence"), Some("toner"));
    }

    #[test]
    fn test_resolve_unknown_type() {
        let rules = FormulationRules::standard();
        assert_eq!(rules.resolve_product_type("toothpaste"), None);
    }

    #[test]
    fn test_serum_requirements() {
        let rules = FormulationRules::standard();
        let requirements = rules.base_requirements("serum");

        assert_eq!(requirements.len(), 4);
        assert_eq!(requirements[0].category, "water_phase");
        assert!((requirements[0].midpoint() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_phase_label_fallback() {
        let rules = FormulationRules::standard();
        assert_eq!(rules.phase_labels("proteins"), vec!["proteins".to_string()]);
        assert_eq!(
            rules.phase_labels("water_phase"),
            vec!["Water Phase".to_string(), "Hydrophilic".to_string()]
        );
    }

    #[test]
    fn test_incompatibility_is_orderless() {
        let rules = FormulationRules::standard();
        assert!(rules.are_incompatible("Retinol", "Benzoyl Peroxide"));
        assert!(rules.are_incompatible("benzoyl peroxide", "retinol"));
        assert!(!rules.are_incompatible("Retinol", "Glycerin"));
    }

    #[test]
    fn test_ph_ranges() {
        let rules = FormulationRules::standard();
        assert_eq!(rules.ideal_ph_range("cleanser"), "4.5-5.5");
        assert_eq!(rules.ideal_ph_range("toner"), "4.0-5.5");
        assert_eq!(rules.ideal_ph_range("serum"), "5.0-6.0");
        assert_eq!(rules.ideal_ph_range("face_mask"), "5.0-7.0");
        assert_eq!(rules.ideal_ph_range("body_scrub"), "5.0-6.0");
    }

    #[test]
    fn test_priority_percentages() {
        assert!((Priority::High.default_percentage() - 5.0).abs() < 1e-9);
        assert!((Priority::Medium.default_percentage() - 3.0).abs() < 1e-9);
        assert!((Priority::Low.default_percentage() - 1.0).abs() < 1e-9);
    }
}
