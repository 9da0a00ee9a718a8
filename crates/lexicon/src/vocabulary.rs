use std::collections::{HashMap, HashSet};

/// Fixed keyword vocabularies driving classification and ontology cleanup.
///
/// These are static configuration, not global mutable state: build one
/// (usually via `Vocabulary::default()`), then inject it into the
/// classifier and cleaner so tests can substitute smaller sets.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Recipe-step verbs that mark a phrase as a direction, not an ingredient.
    pub instruction_verbs: HashSet<String>,
    /// Processing/preservation/prep/size/quality adjectives.
    pub form_modifiers: HashSet<String>,
    /// Inflection -> lemma map for modifiers and common plurals.
    pub lemmas: HashMap<String, String>,
    /// Measurement words that indicate quantity, not identity.
    pub unit_words: HashSet<String>,
    /// Product-type nouns flagging manufactured compound products.
    pub product_type_nouns: HashSet<String>,
    /// Single words always acceptable as a surface form on their own.
    pub allowed_single_words: HashSet<String>,
    /// Single words too generic to claim unless the slug is the word itself.
    pub generic_single_words: HashSet<String>,
}

impl Vocabulary {
    pub fn lemmatize<'a>(&'a self, word: &'a str) -> &'a str {
        self.lemmas.get(word).map(String::as_str).unwrap_or(word)
    }

    /// Naive singular/plural variant: strip or append a trailing "s".
    pub fn plural_variant(word: &str) -> String {
        match word.strip_suffix('s') {
            Some(singular) => singular.to_string(),
            None => format!("{word}s"),
        }
    }
}

fn set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        let instruction_verbs = set(&[
            "add", "bake", "beat", "blend", "boil", "bring", "broil", "brown", "chill",
            "combine", "cook", "cool", "cover", "cut", "divide", "drain", "drizzle", "fold",
            "fry", "garnish", "grease", "grill", "heat", "knead", "let", "marinate", "melt",
            "mix", "place", "pour", "preheat", "prepare", "refrigerate", "remove", "repeat",
            "rinse", "roll", "saute", "season", "serve", "set", "simmer", "spread",
            "sprinkle", "stir", "store", "strain", "toss", "transfer", "whisk",
        ]);

        let form_modifiers = set(&[
            // Processing state
            "powder", "powdered", "ground", "granulated", "granules", "flakes", "flaked",
            "minced", "chopped", "diced", "sliced", "shredded", "grated", "crushed", "whole",
            "halved", "quartered", "cubed", "mashed", "pureed",
            // Preservation
            "fresh", "dried", "dry", "frozen", "canned", "pickled", "smoked", "cured",
            "roasted", "toasted",
            // Preparation
            "raw", "cooked", "uncooked", "blanched", "peeled", "seeded", "pitted",
            "boneless", "skinless", "melted", "softened",
            // Size
            "large", "medium", "small", "baby", "mini", "jumbo", "thin", "thick",
            // Quality
            "organic", "natural", "pure", "real", "imitation", "low-fat", "nonfat",
            "unsalted", "salted", "sweetened", "unsweetened",
        ]);

        let lemmas: HashMap<String, String> = [
            // Modifier inflections
            ("powdered", "powder"),
            ("granulated", "granules"),
            ("flaked", "flakes"),
            ("dried", "dry"),
            ("roasted", "roast"),
            ("toasted", "toast"),
            ("smoked", "smoke"),
            ("minced", "mince"),
            ("chopped", "chop"),
            ("diced", "dice"),
            ("sliced", "slice"),
            ("shredded", "shred"),
            ("grated", "grate"),
            ("crushed", "crush"),
            ("peeled", "peel"),
            ("seeded", "seed"),
            ("pitted", "pit"),
            ("halved", "half"),
            ("quartered", "quarter"),
            ("cubed", "cube"),
            ("mashed", "mash"),
            ("pureed", "puree"),
            ("melted", "melt"),
            ("softened", "soften"),
            // Measurement plurals
            ("cloves", "clove"),
            ("heads", "head"),
            ("bulbs", "bulb"),
            ("stalks", "stalk"),
            ("leaves", "leaf"),
            ("sprigs", "sprig"),
            ("bunches", "bunch"),
            ("ribs", "rib"),
            ("ears", "ear"),
            ("strips", "strip"),
            ("pieces", "piece"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let unit_words = set(&[
            "clove", "cloves", "head", "heads", "bulb", "bulbs", "stalk", "stalks", "leaf",
            "leaves", "sprig", "sprigs", "bunch", "bunches", "rib", "ribs", "ear", "ears",
            "strip", "strips", "piece", "pieces", "slice", "slices", "cup", "cups",
            "tablespoon", "tablespoons", "teaspoon", "teaspoons", "pound", "pounds", "ounce",
            "ounces", "can", "cans", "package", "packages",
        ]);

        let product_type_nouns = set(&[
            "sauce", "bread", "cheese", "oil", "dressing", "soup", "broth", "seasoning",
            "paste", "spread", "syrup", "juice", "chips", "crackers", "cookies", "cake",
            "crumbs", "wine", "vinegar",
        ]);

        let allowed_single_words = set(&[
            "salt", "sugar", "flour", "butter", "milk", "egg", "eggs", "water", "honey",
            "rice", "garlic", "onion", "onions", "ginger", "cinnamon", "paprika", "cumin",
            "oregano", "basil", "parsley", "cilantro", "thyme", "rosemary", "nutmeg",
            "vanilla", "mayonnaise", "ketchup", "mustard",
        ]);

        let generic_single_words = set(&[
            "beans", "bean", "pepper", "peppers", "cheese", "sauce", "oil", "cream",
            "flakes", "powder", "seeds", "broth", "juice", "wine", "vinegar", "stock",
            "seasoning", "extract", "syrup", "paste", "mix", "chips",
        ]);

        Self {
            instruction_verbs,
            form_modifiers,
            lemmas,
            unit_words,
            product_type_nouns,
            allowed_single_words,
            generic_single_words,
        }
    }
}
