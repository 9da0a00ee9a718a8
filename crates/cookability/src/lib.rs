pub mod assess;

pub use assess::{
    Assessment, Assessor, FoodFacts, NutrientProfile, VetoFlag, ASSESSMENT_VERSION,
    DEFAULT_COOKABILITY_THRESHOLD,
};
