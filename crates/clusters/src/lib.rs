pub mod builder;
pub mod corpus;

pub use builder::{Alias, BuildOutput, BuildStats, ClusterBuilder, SynonymCluster};
pub use corpus::{CorpusError, CorpusStats, FrequencyTable};
