use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use cookdex_canonical::{CanonicalName, NameLevel};
use cookdex_clusters::SynonymCluster;
use cookdex_lexicon::{normalize_surface, slugify, Classifier};
use cookdex_ontology::OntologyEntry;

/// One resolvable entity in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub slug: String,
    pub canonical_name: String,
    pub fdc_ids: Vec<i64>,
}

/// Immutable precomputed lookup structure for runtime resolution.
///
/// Built offline from the cleaned ontology, the synonym clusters and the
/// derived canonical base names; never mutated after construction, so any
/// number of concurrent readers can share one snapshot without locking.
#[derive(Debug, Default)]
pub struct ResolverIndex {
    entities: HashMap<String, IndexEntry>,
    surface_to_slug: HashMap<String, String>,
    cluster_key_to_slug: HashMap<String, String>,
    base_key_to_slug: HashMap<String, String>,
}

impl ResolverIndex {
    /// Ontology entries are the highest-priority source: every valid
    /// surface form maps directly to its owning slug.
    pub fn add_ontology(&mut self, entries: &[OntologyEntry]) {
        for entry in entries {
            self.entity_mut(&entry.slug, &entry.display_name, entry.fdc_id);
            for form in &entry.surface_forms {
                let form = normalize_surface(form);
                self.surface_to_slug
                    .entry(form)
                    .or_insert_with(|| entry.slug.clone());
            }
        }
    }

    /// Synonym clusters back the second-priority cluster-key lookup. A
    /// cluster whose canonical form is already an ontology surface form
    /// reinforces that entry; otherwise it becomes an entity of its own.
    pub fn add_clusters(&mut self, clusters: &[SynonymCluster], classifier: &Classifier) {
        for cluster in clusters {
            let canonical_form = normalize_surface(&cluster.canonical);
            let slug = match self.surface_to_slug.get(&canonical_form) {
                Some(slug) => slug.clone(),
                None => {
                    let slug = slugify(&cluster.canonical);
                    if slug.is_empty() {
                        continue;
                    }
                    self.entity_mut(&slug, &cluster.canonical, None);
                    self.surface_to_slug
                        .entry(canonical_form)
                        .or_insert_with(|| slug.clone());
                    slug
                }
            };

            self.cluster_key_to_slug
                .entry(cluster.cluster_key())
                .or_insert_with(|| slug.clone());

            for alias in &cluster.aliases {
                let alias_form = normalize_surface(&alias.name);
                self.surface_to_slug
                    .entry(alias_form)
                    .or_insert_with(|| slug.clone());
            }

            // Recompute the key from the canonical text as well: corpus keys
            // and runtime keys must agree even if the artifact was edited.
            let recomputed = classifier.classify_text(&cluster.canonical).cluster_key();
            self.cluster_key_to_slug
                .entry(recomputed)
                .or_insert_with(|| slug.clone());
        }
    }

    /// Canonical base names back the lowest-priority base-key lookup.
    /// Only base-level rows participate; specific rows carry modifiers the
    /// base key deliberately ignores.
    pub fn add_canonical_names(&mut self, names: &[CanonicalName], classifier: &Classifier) {
        for name in names {
            if name.level != NameLevel::Base {
                continue;
            }
            let entry =
                self.entity_mut(&name.canonical_slug, &name.canonical_name, Some(name.fdc_id));
            entry.fdc_ids.sort_unstable();
            entry.fdc_ids.dedup();

            let base_key = classifier.classify_text(&name.canonical_name).base_key();
            self.base_key_to_slug
                .entry(base_key)
                .or_insert_with(|| name.canonical_slug.clone());
        }
    }

    fn entity_mut(&mut self, slug: &str, display: &str, fdc_id: Option<i64>) -> &mut IndexEntry {
        let entry = self
            .entities
            .entry(slug.to_string())
            .or_insert_with(|| IndexEntry {
                slug: slug.to_string(),
                canonical_name: display.to_string(),
                fdc_ids: Vec::new(),
            });
        if let Some(fdc_id) = fdc_id {
            if !entry.fdc_ids.contains(&fdc_id) {
                entry.fdc_ids.push(fdc_id);
            }
        }
        entry
    }

    pub fn entity(&self, slug: &str) -> Option<&IndexEntry> {
        self.entities.get(slug)
    }

    pub fn lookup_surface(&self, form: &str) -> Option<&IndexEntry> {
        self.surface_to_slug
            .get(form)
            .and_then(|slug| self.entities.get(slug))
    }

    pub fn lookup_cluster_key(&self, key: &str) -> Option<&IndexEntry> {
        self.cluster_key_to_slug
            .get(key)
            .and_then(|slug| self.entities.get(slug))
    }

    pub fn lookup_base_key(&self, key: &str) -> Option<&IndexEntry> {
        self.base_key_to_slug
            .get(key)
            .and_then(|slug| self.entities.get(slug))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Shared handle to the current index snapshot.
///
/// Readers clone an `Arc` and resolve against it lock-free; a rebuild
/// publishes a whole new index with `swap`, so no reader ever observes a
/// half-updated index.
#[derive(Clone, Default)]
pub struct SharedIndex {
    current: Arc<RwLock<Arc<ResolverIndex>>>,
}

impl SharedIndex {
    pub fn new(index: ResolverIndex) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(index))),
        }
    }

    pub fn snapshot(&self) -> Arc<ResolverIndex> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn swap(&self, index: ResolverIndex) {
        let next = Arc::new(index);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
        tracing::info!("resolver index snapshot swapped");
    }
}
