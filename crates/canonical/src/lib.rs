pub mod derive;

pub use derive::{
    CanonicalName, DeriveError, Deriver, NameLevel, StripRule, CANONICAL_VERSION,
};
