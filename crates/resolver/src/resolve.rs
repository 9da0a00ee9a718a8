use serde::Serialize;

use cookdex_lexicon::{normalize_surface, Classifier};

use crate::index::{IndexEntry, ResolverIndex};

/// How a resolution was made, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    SurfaceForm,
    ClusterKey,
    BaseName,
    Unresolved,
}

impl MatchMethod {
    pub fn confidence(self) -> f64 {
        match self {
            MatchMethod::SurfaceForm => 1.0,
            MatchMethod::ClusterKey => 0.9,
            MatchMethod::BaseName => 0.6,
            MatchMethod::Unresolved => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedEntity {
    pub slug: String,
    pub canonical_name: String,
    pub fdc_ids: Vec<i64>,
}

impl From<&IndexEntry> for MatchedEntity {
    fn from(entry: &IndexEntry) -> Self {
        Self {
            slug: entry.slug.clone(),
            canonical_name: entry.canonical_name.clone(),
            fdc_ids: entry.fdc_ids.clone(),
        }
    }
}

/// Per-item resolution outcome. Unresolved is an ordinary value, never an
/// error: one bad item cannot fail a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionResult {
    pub input_text: String,
    pub matched: Option<MatchedEntity>,
    pub method: MatchMethod,
    pub confidence: f64,
}

impl ResolutionResult {
    fn unresolved(input_text: &str) -> Self {
        Self {
            input_text: input_text.to_string(),
            matched: None,
            method: MatchMethod::Unresolved,
            confidence: MatchMethod::Unresolved.confidence(),
        }
    }

    fn matched(input_text: &str, entry: &IndexEntry, method: MatchMethod) -> Self {
        Self {
            input_text: input_text.to_string(),
            matched: Some(entry.into()),
            method,
            confidence: method.confidence(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.matched.is_some()
    }
}

impl ResolverIndex {
    /// Resolve one free-text ingredient string.
    ///
    /// Normalizes, strips any leading quantity/unit phrase, then tries the
    /// priority chain: exact surface form, cluster key, base key.
    pub fn resolve(&self, classifier: &Classifier, input_text: &str) -> ResolutionResult {
        if input_text.trim().is_empty() {
            return ResolutionResult::unresolved(input_text);
        }

        let stripped = classifier.strip_quantity_prefix(input_text);

        for candidate in [normalize_surface(stripped), normalize_surface(input_text)] {
            if let Some(entry) = self.lookup_surface(&candidate) {
                return ResolutionResult::matched(input_text, entry, MatchMethod::SurfaceForm);
            }
        }

        let classification = classifier.classify_text(stripped);
        if classification.base_tokens.is_empty() {
            return ResolutionResult::unresolved(input_text);
        }

        if let Some(entry) = self.lookup_cluster_key(&classification.cluster_key()) {
            return ResolutionResult::matched(input_text, entry, MatchMethod::ClusterKey);
        }

        if let Some(entry) = self.lookup_base_key(&classification.base_key()) {
            return ResolutionResult::matched(input_text, entry, MatchMethod::BaseName);
        }

        ResolutionResult::unresolved(input_text)
    }

    /// Resolve a batch. Items are independent, with no shared mutable
    /// state, so results line up one-to-one with inputs.
    pub fn resolve_batch(
        &self,
        classifier: &Classifier,
        items: &[String],
    ) -> Vec<ResolutionResult> {
        items
            .iter()
            .map(|item| self.resolve(classifier, item))
            .collect()
    }
}
