use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use cookdex_lexicon::{tokenize, Classifier};

/// A lower-frequency surface form folded into a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub count: u64,
}

/// One synonym cluster: a canonical surface form plus its aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymCluster {
    pub canonical: String,
    pub canonical_count: u64,
    pub base_key: String,
    pub form_key: String,
    pub aliases: Vec<Alias>,
    pub total_count: u64,
    /// Manufactured compound product emitted standalone, never merged into
    /// its base ingredient's cluster.
    pub compound: bool,
}

impl SynonymCluster {
    pub fn cluster_key(&self) -> String {
        format!("{}|{}", self.base_key, self.form_key)
    }
}

/// Build tallies surfaced in the run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub entries_in: u64,
    pub low_frequency_filtered: u64,
    pub instruction_filtered: u64,
    pub no_base_tokens: u64,
    pub kept: u64,
    pub groups: u64,
    pub clusters_emitted: u64,
    pub compound_clusters: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOutput {
    pub min_frequency: u64,
    pub stats: BuildStats,
    pub clusters: Vec<SynonymCluster>,
}

struct Member {
    name: String,
    count: u64,
    seq: u64,
    compound: bool,
}

/// Offline synonym cluster builder.
///
/// Groups distinct corpus phrases by (sorted base tokens, sorted form
/// tokens) and elects the highest-count member canonical. Deterministic for
/// a given corpus: ranking ties break on first-seen order.
pub struct ClusterBuilder {
    classifier: Classifier,
    min_frequency: u64,
    /// A single-member pure group is only worth emitting above this count.
    single_member_floor: u64,
    /// Compound products become standalone clusters above this count.
    compound_floor: u64,
}

impl Default for ClusterBuilder {
    fn default() -> Self {
        Self::new(Classifier::default(), 5)
    }
}

impl ClusterBuilder {
    pub fn new(classifier: Classifier, min_frequency: u64) -> Self {
        Self {
            classifier,
            min_frequency,
            single_member_floor: 100,
            compound_floor: 50,
        }
    }

    pub fn with_floors(mut self, single_member_floor: u64, compound_floor: u64) -> Self {
        self.single_member_floor = single_member_floor;
        self.compound_floor = compound_floor;
        self
    }

    /// Build ranked clusters from distinct (phrase, count) entries given in
    /// first-seen corpus order.
    pub fn build(&self, entries: Vec<(String, u64)>) -> BuildOutput {
        let mut stats = BuildStats {
            entries_in: entries.len() as u64,
            ..BuildStats::default()
        };

        // Group members by cluster key, preserving first-seen order within
        // each group via the sequence number.
        let mut groups: HashMap<String, Vec<Member>> = HashMap::new();
        for (seq, (name, count)) in entries.into_iter().enumerate() {
            if count < self.min_frequency {
                stats.low_frequency_filtered += 1;
                continue;
            }
            if self.classifier.is_instruction(&name) {
                stats.instruction_filtered += 1;
                continue;
            }

            let tokens = tokenize(&name);
            let classification = self.classifier.classify(&tokens);
            if classification.base_tokens.is_empty() {
                stats.no_base_tokens += 1;
                continue;
            }

            let compound = self.classifier.is_compound_product(&tokens);
            stats.kept += 1;
            groups
                .entry(classification.cluster_key())
                .or_default()
                .push(Member {
                    name,
                    count,
                    seq: seq as u64,
                    compound,
                });
        }
        stats.groups = groups.len() as u64;

        let mut clusters = Vec::new();
        for (key, members) in groups {
            let (base_key, form_key) = key
                .split_once('|')
                .map(|(b, f)| (b.to_string(), f.to_string()))
                .unwrap_or((key.clone(), "base".to_string()));

            let (compound_members, mut pure): (Vec<Member>, Vec<Member>) =
                members.into_iter().partition(|m| m.compound);

            // Pure members: one cluster per group, highest count canonical.
            pure.sort_by(|a, b| b.count.cmp(&a.count).then(a.seq.cmp(&b.seq)));
            if !pure.is_empty()
                && (pure.len() >= 2 || pure[0].count >= self.single_member_floor)
            {
                let total_count = pure.iter().map(|m| m.count).sum();
                let mut iter = pure.into_iter();
                let canonical = iter.next().expect("non-empty pure group");
                clusters.push(SynonymCluster {
                    canonical: canonical.name,
                    canonical_count: canonical.count,
                    base_key: base_key.clone(),
                    form_key: form_key.clone(),
                    aliases: iter
                        .map(|m| Alias {
                            name: m.name,
                            count: m.count,
                        })
                        .collect(),
                    total_count,
                    compound: false,
                });
            }

            // Compound members: standalone clusters, never merged.
            for member in compound_members {
                if member.count < self.compound_floor {
                    continue;
                }
                stats.compound_clusters += 1;
                clusters.push(SynonymCluster {
                    canonical: member.name,
                    canonical_count: member.count,
                    base_key: base_key.clone(),
                    form_key: form_key.clone(),
                    aliases: Vec::new(),
                    total_count: member.count,
                    compound: true,
                });
            }
        }

        clusters.sort_by(|a, b| {
            b.total_count
                .cmp(&a.total_count)
                .then_with(|| a.canonical.cmp(&b.canonical))
        });
        stats.clusters_emitted = clusters.len() as u64;

        tracing::info!(
            entries = stats.entries_in,
            kept = stats.kept,
            clusters = stats.clusters_emitted,
            compound = stats.compound_clusters,
            "synonym cluster build complete"
        );

        BuildOutput {
            min_frequency: self.min_frequency,
            stats,
            clusters,
        }
    }
}
