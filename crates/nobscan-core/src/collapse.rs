// Two-tier score collapse: local (in-match) and historical evidence are each
// reduced to one value, then the two tiers are reduced to the player score.

use crate::catalog::{HeroCatalog, HeroId};
use crate::context::MatchContext;
use crate::model::{Player, Side};
use crate::reference::{BaselineGroup, ReferenceTables};
use crate::settings::EvidenceSources;
use crate::stats::reduce;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    /// The collapser's catalog lacks a hero the match references. `analyze`
    /// rejects such heroes while building the reference tables, so this only
    /// surfaces when a collapser is paired with a different catalog.
    #[error("hero {0} is not in the hero catalog")]
    UnknownHero(HeroId),

    #[error("{0} has no reference baseline")]
    MissingBaseline(BaselineGroup),

    #[error("no enabled evidence source produced a value for hero {0}")]
    NoEvidence(HeroId),
}

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

/// One scalar per evidence source, `None` when the source is disabled or has
/// nothing to say about the player.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Evidence {
    pub team: Option<f64>,
    pub whole_match: Option<f64>,
    pub hero: Option<f64>,
    pub role: Option<f64>,
    pub global: Option<f64>,
}

impl Evidence {
    pub fn local(&self) -> Option<f64> {
        reduce(&present([self.team, self.whole_match]))
    }

    pub fn historical(&self) -> Option<f64> {
        reduce(&present([self.hero, self.role, self.global]))
    }

    /// Median of whichever tiers are present. Each tier weighs the same no
    /// matter how many of its sources are enabled.
    pub fn collapse(&self) -> Option<f64> {
        reduce(&present([self.local(), self.historical()]))
    }
}

fn present<const N: usize>(values: [Option<f64>; N]) -> Vec<f64> {
    values.into_iter().flatten().collect()
}

/// Collapse per-tag normalized triples: median across tags for each metric,
/// then median of the three metric values. `None` for a hero without tags.
pub(crate) fn reduce_role(per_tag: &[[f64; 3]]) -> Option<f64> {
    let per_metric = (0..3)
        .map(|i| reduce(&per_tag.iter().map(|z| z[i]).collect::<Vec<_>>()))
        .collect::<Option<Vec<f64>>>()?;
    reduce(&per_metric)
}

// ---------------------------------------------------------------------------
// ScoreCollapser
// ---------------------------------------------------------------------------

pub struct ScoreCollapser<'a> {
    sources: EvidenceSources,
    catalog: &'a HeroCatalog,
    references: &'a ReferenceTables,
}

impl<'a> ScoreCollapser<'a> {
    /// # Panics
    ///
    /// Panics when every evidence source is disabled.
    pub fn new(
        sources: EvidenceSources,
        catalog: &'a HeroCatalog,
        references: &'a ReferenceTables,
    ) -> Self {
        assert!(
            sources.any_enabled(),
            "score collapse needs at least one enabled evidence source"
        );
        Self {
            sources,
            catalog,
            references,
        }
    }

    /// Gather the per-source scalars for `player`, who played on `side` of
    /// the match described by `context`.
    pub fn evidence(
        &self,
        player: &Player,
        side: Side,
        context: &MatchContext,
    ) -> Result<Evidence, ScoreError> {
        let metrics = &player.metrics;
        let mut evidence = Evidence::default();

        if self.sources.team {
            evidence.team = reduce(&context.team(side).normalize(metrics));
        }
        if self.sources.whole_match {
            evidence.whole_match = reduce(&context.whole.normalize(metrics));
        }
        if self.sources.hero {
            let hero = self
                .references
                .hero(player.hero_id)
                .ok_or(ScoreError::MissingBaseline(BaselineGroup::Hero(player.hero_id)))?;
            evidence.hero = reduce(&hero.normalize(metrics));
        }
        if self.sources.role {
            let hero = self
                .catalog
                .get(player.hero_id)
                .ok_or(ScoreError::UnknownHero(player.hero_id))?;
            let per_tag = hero
                .roles
                .iter()
                .map(|tag| {
                    self.references
                        .role(tag)
                        .map(|baseline| baseline.normalize(metrics))
                        .ok_or_else(|| ScoreError::MissingBaseline(BaselineGroup::Role(tag.clone())))
                })
                .collect::<Result<Vec<_>, _>>()?;
            evidence.role = reduce_role(&per_tag);
        }
        if self.sources.global {
            evidence.global = reduce(&self.references.global().normalize(metrics));
        }

        Ok(evidence)
    }

    pub fn score(
        &self,
        player: &Player,
        side: Side,
        context: &MatchContext,
    ) -> Result<f64, ScoreError> {
        self.evidence(player, side, context)?
            .collapse()
            .ok_or(ScoreError::NoEvidence(player.hero_id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
