// Two-phase analysis: build immutable baselines, then score, normalize,
// classify and sweep.

use tracing::info;

use crate::baseline::normalize_match;
use crate::catalog::HeroCatalog;
use crate::collapse::{ScoreCollapser, ScoreError};
use crate::context::MatchContext;
use crate::impact::ImpactSweep;
use crate::model::{Match, MatchRecord, ModelError, Side};
use crate::outlier::OutlierReport;
use crate::reference::{ReferenceError, ReferenceTables};
use crate::settings::{ImpactSettings, ScoringSettings};
use crate::stats::StatsError;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("reference tables: {0}")]
    Reference(#[from] ReferenceError),

    #[error("match {match_id}: context: {source}")]
    Context {
        match_id: u64,
        #[source]
        source: StatsError,
    },

    #[error("match {match_id}: {source}")]
    Score {
        match_id: u64,
        #[source]
        source: ScoreError,
    },
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Everything one run produces. Matches keep input order and carry the
/// filled-in scores.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub matches: Vec<Match>,
    pub references: ReferenceTables,
    pub outliers: OutlierReport,
    pub sweep: ImpactSweep,
}

pub fn analyze(
    records: &[MatchRecord],
    catalog: &HeroCatalog,
    settings: &ScoringSettings,
    impact: &ImpactSettings,
) -> Result<Analysis, AnalysisError> {
    // ---- phase 1: model and baselines ----
    let mut matches = records
        .iter()
        .map(|r| Match::from_record(r, settings.assist_weight))
        .collect::<Result<Vec<_>, _>>()?;
    info!("Analyzing {} matches", matches.len());

    let references = ReferenceTables::build(&matches, catalog, settings)?;
    let contexts = matches
        .iter()
        .map(|m| {
            MatchContext::build(m).map_err(|source| AnalysisError::Context {
                match_id: m.match_id,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // ---- phase 2: scoring ----
    let collapser = ScoreCollapser::new(settings.sources, catalog, &references);
    for (m, context) in matches.iter_mut().zip(&contexts) {
        let match_id = m.match_id;
        for side in [Side::Radiant, Side::Dire] {
            for player in &mut m.team_mut(side).players {
                player.score = collapser
                    .score(player, side, context)
                    .map_err(|source| AnalysisError::Score { match_id, source })?;
            }
        }
    }

    for m in &mut matches {
        normalize_match(m);
    }

    let outliers = OutlierReport::build(&matches, settings.nob_limit);
    let sweep = ImpactSweep::build(&matches, impact);
    info!(
        "Scored {} players: {} standouts ({:.1}%)",
        outliers.players,
        outliers.nobs,
        outliers.rate() * 100.0
    );

    Ok(Analysis {
        matches,
        references,
        outliers,
        sweep,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
