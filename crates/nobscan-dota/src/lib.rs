// OpenDota ingestion: match documents and the hero catalog.

pub mod heroes;
pub mod loader;
pub mod matches;

pub use heroes::load_heroes;
pub use loader::{load_matches, Discarded, LoadError, MatchSet};
