pub mod index;
pub mod resolve;

pub use index::{IndexEntry, ResolverIndex, SharedIndex};
pub use resolve::{MatchMethod, MatchedEntity, ResolutionResult};
