// Run-wide scoring settings shared by every pipeline stage.

use serde::Deserialize;

/// Which evidence sources the score collapse consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EvidenceSources {
    pub team: bool,
    #[serde(rename = "match")]
    pub whole_match: bool,
    pub hero: bool,
    pub role: bool,
    pub global: bool,
}

impl EvidenceSources {
    pub const ALL: EvidenceSources = EvidenceSources {
        team: true,
        whole_match: true,
        hero: true,
        role: true,
        global: true,
    };

    pub fn any_enabled(&self) -> bool {
        self.team || self.whole_match || self.hero || self.role || self.global
    }

    pub fn any_local(&self) -> bool {
        self.team || self.whole_match
    }

    pub fn any_historical(&self) -> bool {
        self.hero || self.role || self.global
    }
}

impl Default for EvidenceSources {
    fn default() -> Self {
        Self::ALL
    }
}

/// What to do when a hero or role baseline has fewer than the minimum
/// number of samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplePolicy {
    /// Log and keep the baseline built from whatever data exists.
    #[default]
    Warn,
    /// Abort the run.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoringSettings {
    /// Weight of an assist in the combat efficiency metric.
    pub assist_weight: f64,
    /// Relative score magnitude at which a player counts as a standout.
    pub nob_limit: f64,
    /// Minimum samples for a hero or role baseline.
    pub min_sample: usize,
    #[serde(default)]
    pub sample_policy: SamplePolicy,
    #[serde(default)]
    pub sources: EvidenceSources,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            assist_weight: 0.1,
            nob_limit: 2.0,
            min_sample: 10,
            sample_policy: SamplePolicy::Warn,
            sources: EvidenceSources::ALL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImpactSettings {
    /// Minimum qualifying teams for a threshold row to be reported.
    pub min_teams: usize,
    /// Decimal places thresholds are rounded to.
    pub decimals: u32,
}

impl Default for ImpactSettings {
    fn default() -> Self {
        Self {
            min_teams: 10,
            decimals: 1,
        }
    }
}
