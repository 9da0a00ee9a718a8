use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use cookdex_lexicon::normalize_surface;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("failed to read corpus: {0}")]
    Io(#[from] std::io::Error),
}

/// One corpus line: a recipe's list-like ingredients field.
#[derive(Debug, Deserialize)]
struct CorpusLine {
    ingredients: Vec<String>,
}

/// Ingestion tallies surfaced in the run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CorpusStats {
    pub lines_read: u64,
    pub malformed_lines: u64,
    pub phrases_seen: u64,
    pub distinct_phrases: u64,
}

/// Frequency table over distinct normalized ingredient phrases.
///
/// Records the first-seen sequence of each phrase so downstream ranking has
/// a fixed tie order across runs. Memory is bounded by distinct-phrase
/// cardinality, not corpus size: the source is streamed line by line.
#[derive(Debug, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, (u64, u64)>,
    next_seq: u64,
    stats: CorpusStats,
}

impl FrequencyTable {
    /// Stream a JSONL corpus file (one `{"ingredients": [...]}` object per
    /// line). Malformed lines are tallied and skipped, never fatal.
    pub fn from_jsonl_path(path: &Path) -> Result<Self, CorpusError> {
        let reader = BufReader::new(File::open(path)?);
        Self::from_jsonl(reader)
    }

    pub fn from_jsonl<R: BufRead>(reader: R) -> Result<Self, CorpusError> {
        let mut table = Self::default();
        for line in reader.lines() {
            let line = line?;
            table.stats.lines_read += 1;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<CorpusLine>(&line) {
                Ok(parsed) => {
                    for phrase in &parsed.ingredients {
                        table.record(phrase);
                    }
                }
                Err(error) => {
                    table.stats.malformed_lines += 1;
                    tracing::debug!(line = table.stats.lines_read, %error, "skipping malformed corpus line");
                }
            }
        }
        table.stats.distinct_phrases = table.counts.len() as u64;
        Ok(table)
    }

    /// Count one raw phrase occurrence.
    pub fn record(&mut self, phrase: &str) {
        let normalized = normalize_surface(phrase);
        if normalized.len() < 2 {
            return;
        }
        self.stats.phrases_seen += 1;
        let next_seq = &mut self.next_seq;
        self.counts
            .entry(normalized)
            .and_modify(|(count, _)| *count += 1)
            .or_insert_with(|| {
                let seq = *next_seq;
                *next_seq += 1;
                (1, seq)
            });
    }

    pub fn stats(&self) -> &CorpusStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Distinct phrases with counts, in first-seen corpus order.
    pub fn into_entries(mut self) -> Vec<(String, u64)> {
        self.stats.distinct_phrases = self.counts.len() as u64;
        let mut entries: Vec<(String, u64, u64)> = self
            .counts
            .into_iter()
            .map(|(phrase, (count, seq))| (phrase, count, seq))
            .collect();
        entries.sort_by_key(|(_, _, seq)| *seq);
        entries
            .into_iter()
            .map(|(phrase, count, _)| (phrase, count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_counts_and_first_seen_order() {
        let mut table = FrequencyTable::default();
        table.record("Garlic, minced");
        table.record("onion");
        table.record("garlic, minced");

        let entries = table.into_entries();
        assert_eq!(
            entries,
            vec![("garlic, minced".to_string(), 2), ("onion".to_string(), 1)]
        );
    }

    #[test]
    fn test_short_phrases_dropped() {
        let mut table = FrequencyTable::default();
        table.record("x");
        table.record(" ");
        assert!(table.is_empty());
    }

    #[test]
    fn test_jsonl_ingestion_skips_malformed() {
        let corpus = concat!(
            r#"{"ingredients": ["garlic, minced", "onion"]}"#,
            "\n",
            "not json at all\n",
            "\n",
            r#"{"ingredients": ["garlic, minced"]}"#,
            "\n",
        );
        let table = FrequencyTable::from_jsonl(Cursor::new(corpus)).unwrap();
        assert_eq!(table.stats().malformed_lines, 1);
        assert_eq!(table.stats().lines_read, 4);

        let entries = table.into_entries();
        assert_eq!(
            entries,
            vec![("garlic, minced".to_string(), 2), ("onion".to_string(), 1)]
        );
    }
}
