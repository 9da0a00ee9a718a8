pub mod backfill;
pub mod cluster;
pub mod export;
pub mod ontology;
pub mod resolve;

pub use backfill::{backfill_canonical, backfill_cookability, RunSummary};
pub use cluster::build_clusters;
pub use export::write_catalog;
pub use ontology::clean_ontology;
pub use resolve::{build_index, resolve_lines, ResolveSummary};
