use serde::{Deserialize, Serialize};

/// Bumped whenever veto checks change; gates idempotent re-assessment.
pub const ASSESSMENT_VERSION: u32 = 2;

/// Default veto threshold. Deliberately 2: a single veto flags a food as
/// suspect but does not disqualify it (an "Infant Formula" category food
/// with no other veto stays cookable).
pub const DEFAULT_COOKABILITY_THRESHOLD: u32 = 2;

/// Closed vocabulary of deterministic veto reasons.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VetoFlag {
    InfantCategory,
    SupplementCategory,
    MedicalWording,
    SupplementWording,
    NonCookingPortion,
    ImplausibleNutrients,
}

/// Macro profile per 100 g, as reported by the nutrient table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub energy_kcal: Option<f64>,
    pub protein_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub carbs_g: Option<f64>,
}

/// Everything the assessor reads about one food.
#[derive(Debug, Clone, Default)]
pub struct FoodFacts {
    pub fdc_id: i64,
    pub description: String,
    pub category: Option<String>,
    pub portion_units: Vec<String>,
    pub nutrients: NutrientProfile,
}

/// One cookability assessment row, keyed by fdc_id.
///
/// `veto_score` and `is_cookable` are derived in the constructor and
/// readable only through accessors, so the invariant
/// `score == flags.len() && is_cookable == (score < threshold)` holds by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    fdc_id: i64,
    veto_flags: Vec<VetoFlag>,
    cookability_threshold: u32,
    veto_score: u32,
    is_cookable: bool,
    assessment_version: u32,
}

impl Assessment {
    fn from_flags(fdc_id: i64, mut veto_flags: Vec<VetoFlag>, threshold: u32) -> Self {
        veto_flags.sort_unstable();
        veto_flags.dedup();
        let veto_score = veto_flags.len() as u32;
        Self {
            fdc_id,
            is_cookable: veto_score < threshold,
            veto_flags,
            cookability_threshold: threshold,
            veto_score,
            assessment_version: ASSESSMENT_VERSION,
        }
    }

    pub fn fdc_id(&self) -> i64 {
        self.fdc_id
    }

    pub fn veto_flags(&self) -> &[VetoFlag] {
        &self.veto_flags
    }

    pub fn cookability_threshold(&self) -> u32 {
        self.cookability_threshold
    }

    pub fn veto_score(&self) -> u32 {
        self.veto_score
    }

    pub fn is_cookable(&self) -> bool {
        self.is_cookable
    }

    pub fn assessment_version(&self) -> u32 {
        self.assessment_version
    }
}

const INFANT_CATEGORY_WORDS: &[&str] = &["infant", "baby food", "toddler"];

const SUPPLEMENT_CATEGORY_WORDS: &[&str] = &["supplement", "nutritional shake", "meal replacement"];

const MEDICAL_WORDS: &[&str] = &[
    "tube feeding",
    "enteral",
    "clinical nutrition",
    "rehydration",
    "electrolyte solution",
    "lozenge",
];

const SUPPLEMENT_WORDS: &[&str] = &[
    "supplement",
    "vitamin",
    "multivitamin",
    "capsule",
    "tablet",
    "softgel",
    "gummy vitamins",
];

const NON_COOKING_PORTIONS: &[&str] = &[
    "tablet", "capsule", "softgel", "lozenge", "gummy", "scoop", "dropper", "vial", "dose",
];

/// Veto-based cookability assessor.
///
/// Applies a fixed, ordered set of independent checks; each contributes at
/// most one flag. Deterministic and idempotent under
/// (input, ASSESSMENT_VERSION).
#[derive(Debug, Clone)]
pub struct Assessor {
    threshold: u32,
}

impl Default for Assessor {
    fn default() -> Self {
        Self::new(DEFAULT_COOKABILITY_THRESHOLD)
    }
}

impl Assessor {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    pub fn assess(&self, facts: &FoodFacts) -> Assessment {
        let mut flags = Vec::new();

        let category = facts
            .category
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        let description = facts.description.to_lowercase();

        if contains_any(&category, INFANT_CATEGORY_WORDS) {
            flags.push(VetoFlag::InfantCategory);
        }
        if contains_any(&category, SUPPLEMENT_CATEGORY_WORDS) {
            flags.push(VetoFlag::SupplementCategory);
        }
        if contains_any(&description, MEDICAL_WORDS) {
            flags.push(VetoFlag::MedicalWording);
        }
        if contains_any(&description, SUPPLEMENT_WORDS) {
            flags.push(VetoFlag::SupplementWording);
        }
        if facts.portion_units.iter().any(|unit| {
            let unit = unit.to_lowercase();
            NON_COOKING_PORTIONS.iter().any(|w| unit.contains(w))
        }) {
            flags.push(VetoFlag::NonCookingPortion);
        }
        if Self::nutrients_implausible(&facts.nutrients) {
            flags.push(VetoFlag::ImplausibleNutrients);
        }

        Assessment::from_flags(facts.fdc_id, flags, self.threshold)
    }

    /// Macro values inconsistent with any real food per 100 g: energy above
    /// pure fat (~900 kcal), or macros summing past 105 g with a small
    /// rounding allowance.
    fn nutrients_implausible(profile: &NutrientProfile) -> bool {
        if let Some(kcal) = profile.energy_kcal {
            if kcal > 900.0 || kcal < 0.0 {
                return true;
            }
        }
        let macro_sum = profile.protein_g.unwrap_or(0.0)
            + profile.fat_g.unwrap_or(0.0)
            + profile.carbs_g.unwrap_or(0.0);
        macro_sum > 105.0
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(description: &str, category: Option<&str>) -> FoodFacts {
        FoodFacts {
            fdc_id: 1,
            description: description.to_string(),
            category: category.map(str::to_string),
            portion_units: Vec::new(),
            nutrients: NutrientProfile::default(),
        }
    }

    #[test]
    fn test_plain_food_is_cookable() {
        let assessment = Assessor::default().assess(&facts("Chicken, breast, raw", Some("Poultry Products")));
        assert!(assessment.veto_flags().is_empty());
        assert_eq!(assessment.veto_score(), 0);
        assert!(assessment.is_cookable());
    }

    #[test]
    fn test_scenario_single_veto_does_not_disqualify() {
        let assessment =
            Assessor::default().assess(&facts("Formula, ready-to-feed", Some("Infant Formula")));
        assert_eq!(assessment.veto_flags(), &[VetoFlag::InfantCategory]);
        assert_eq!(assessment.veto_score(), 1);
        assert!(assessment.is_cookable());
    }

    #[test]
    fn test_two_vetos_disqualify() {
        let mut input = facts(
            "Pediatric oral supplement, vanilla",
            Some("Infant Formula"),
        );
        input.portion_units.push("scoop".to_string());
        let assessment = Assessor::default().assess(&input);
        assert!(assessment.veto_score() >= 2);
        assert!(!assessment.is_cookable());
    }

    #[test]
    fn test_medical_and_supplement_wording() {
        let assessment =
            Assessor::default().assess(&facts("Enteral formula for tube feeding", None));
        assert!(assessment.veto_flags().contains(&VetoFlag::MedicalWording));

        let assessment = Assessor::default().assess(&facts("Vitamin D3 tablet", None));
        assert!(assessment
            .veto_flags()
            .contains(&VetoFlag::SupplementWording));
    }

    #[test]
    fn test_non_cooking_portion() {
        let mut input = facts("Calcium chew", None);
        input.portion_units = vec!["1 tablet".to_string()];
        let assessment = Assessor::default().assess(&input);
        assert!(assessment
            .veto_flags()
            .contains(&VetoFlag::NonCookingPortion));
    }

    #[test]
    fn test_implausible_nutrients() {
        let mut input = facts("Mystery paste", None);
        input.nutrients = NutrientProfile {
            energy_kcal: Some(1200.0),
            ..NutrientProfile::default()
        };
        let assessment = Assessor::default().assess(&input);
        assert!(assessment
            .veto_flags()
            .contains(&VetoFlag::ImplausibleNutrients));

        input.nutrients = NutrientProfile {
            energy_kcal: Some(400.0),
            protein_g: Some(60.0),
            fat_g: Some(40.0),
            carbs_g: Some(20.0),
        };
        let assessment = Assessor::default().assess(&input);
        assert!(assessment
            .veto_flags()
            .contains(&VetoFlag::ImplausibleNutrients));
    }

    #[test]
    fn test_score_matches_flag_count_and_threshold_rule() {
        let samples = [
            facts("Chicken, raw", Some("Poultry Products")),
            facts("Formula", Some("Infant Formula")),
            facts("Pediatric oral supplement", Some("Infant Formula")),
            facts("Enteral vitamin tablet", Some("Supplements")),
        ];
        for (threshold, input) in [(1u32, &samples[0]), (2, &samples[1]), (2, &samples[2]), (3, &samples[3])] {
            let assessment = Assessor::new(threshold).assess(input);
            assert_eq!(assessment.veto_score() as usize, assessment.veto_flags().len());
            assert_eq!(
                assessment.is_cookable(),
                assessment.veto_score() < assessment.cookability_threshold()
            );
        }
    }

    #[test]
    fn test_assess_is_idempotent() {
        let input = facts("Enteral formula supplement", Some("Supplements"));
        let first = Assessor::default().assess(&input);
        let second = Assessor::default().assess(&input);
        assert_eq!(first, second);
        assert_eq!(first.assessment_version(), ASSESSMENT_VERSION);
    }

    #[test]
    fn test_flag_names_are_stable() {
        assert_eq!(VetoFlag::InfantCategory.to_string(), "infant_category");
        assert_eq!(
            VetoFlag::ImplausibleNutrients.to_string(),
            "implausible_nutrients"
        );
        assert_eq!(
            "non_cooking_portion".parse::<VetoFlag>().unwrap(),
            VetoFlag::NonCookingPortion
        );
    }
}
