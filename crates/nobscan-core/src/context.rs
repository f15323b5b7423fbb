// Match-local baselines: the whole match and each team.

use crate::model::{Match, Side};
use crate::reference::MetricSummaries;
use crate::stats::StatsError;

/// Baselines scoped to a single match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchContext {
    pub whole: MetricSummaries,
    pub radiant: MetricSummaries,
    pub dire: MetricSummaries,
}

impl MatchContext {
    pub fn build(m: &Match) -> Result<Self, StatsError> {
        Ok(Self {
            whole: MetricSummaries::from_metrics(m.players().map(|p| &p.metrics))?,
            radiant: MetricSummaries::from_metrics(m.radiant.players.iter().map(|p| &p.metrics))?,
            dire: MetricSummaries::from_metrics(m.dire.players.iter().map(|p| &p.metrics))?,
        })
    }

    pub fn team(&self, side: Side) -> &MetricSummaries {
        match side {
            Side::Radiant => &self.radiant,
            Side::Dire => &self.dire,
        }
    }
}
