// Robust standout scoring for 5v5 match statistics.

pub mod baseline;
pub mod catalog;
pub mod collapse;
pub mod context;
pub mod impact;
pub mod model;
pub mod outlier;
pub mod pipeline;
pub mod reference;
pub mod settings;
pub mod stats;

pub use catalog::{Hero, HeroCatalog, HeroId, RoleTag};
pub use model::{Match, MatchRecord, Metric, Player, PlayerRecord, Side, Team};
pub use pipeline::{analyze, Analysis, AnalysisError};
pub use settings::{EvidenceSources, ImpactSettings, SamplePolicy, ScoringSettings};
