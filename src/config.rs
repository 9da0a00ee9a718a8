use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub clusters: ClusterConfig,
    #[serde(default)]
    pub cookability: CookabilityConfig,
    #[serde(default)]
    pub backfill: BackfillConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Filesystem locations of the pipeline's offline artifacts.
#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactConfig {
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,
    #[serde(default = "default_clusters_path")]
    pub clusters_path: String,
    #[serde(default = "default_ontology_path")]
    pub ontology_path: String,
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            clusters_path: default_clusters_path(),
            ontology_path: default_ontology_path(),
            catalog_path: default_catalog_path(),
        }
    }
}

fn default_corpus_path() -> String {
    "data/recipes.jsonl".to_string()
}

fn default_clusters_path() -> String {
    "data/synonym_clusters.json".to_string()
}

fn default_ontology_path() -> String {
    "data/ontology.json".to_string()
}

fn default_catalog_path() -> String {
    "data/ingredient_catalog.json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClusterConfig {
    #[serde(default = "default_min_frequency")]
    pub min_frequency: u64,
    #[serde(default = "default_single_member_floor")]
    pub single_member_floor: u64,
    #[serde(default = "default_compound_floor")]
    pub compound_floor: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            min_frequency: default_min_frequency(),
            single_member_floor: default_single_member_floor(),
            compound_floor: default_compound_floor(),
        }
    }
}

fn default_min_frequency() -> u64 {
    5
}

fn default_single_member_floor() -> u64 {
    100
}

fn default_compound_floor() -> u64 {
    50
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookabilityConfig {
    #[serde(default = "default_threshold")]
    pub threshold: u32,
}

impl Default for CookabilityConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> u32 {
    cookdex_cookability::DEFAULT_COOKABILITY_THRESHOLD
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackfillConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    8
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (COOKDEX__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("database.url", "sqlite:cookdex.db")?
            .set_default("database.max_connections", 5)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional - ignore if not found
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("COOKDEX")
                .separator("__")
                .try_parsing(true),
        );

        // Also support the plain DATABASE_URL convention
        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.clusters.min_frequency < 1 {
            return Err("Cluster min_frequency must be at least 1".to_string());
        }
        if self.cookability.threshold < 1 {
            return Err("Cookability threshold must be at least 1".to_string());
        }
        if self.backfill.concurrency < 1 {
            return Err("Backfill concurrency must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            database: DatabaseConfig {
                url: "sqlite:test.db".to_string(),
                max_connections: 5,
            },
            artifacts: ArtifactConfig::default(),
            clusters: ClusterConfig::default(),
            cookability: CookabilityConfig::default(),
            backfill: BackfillConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = base_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.clusters.min_frequency, 5);
        assert_eq!(config.clusters.single_member_floor, 100);
        assert_eq!(config.clusters.compound_floor, 50);
        assert_eq!(config.cookability.threshold, 2);
    }

    #[test]
    fn test_validation_zero_connections() {
        let mut config = base_config();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_threshold() {
        let mut config = base_config();
        config.cookability.threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_concurrency() {
        let mut config = base_config();
        config.backfill.concurrency = 0;
        assert!(config.validate().is_err());
    }
}
