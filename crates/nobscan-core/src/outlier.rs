// Standout (NOB) classification and population-level outlier summary.

use std::collections::BTreeMap;

use crate::model::{Match, Player, Team};
use crate::stats::RobustSummary;

/// A player is a standout when their relative score reaches `limit` in
/// either direction.
pub fn is_nob(relative_score: f64, limit: f64) -> bool {
    relative_score.abs() >= limit
}

impl Team {
    pub fn positive_nobs(&self, limit: f64) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| p.relative_score >= limit)
    }

    pub fn negative_nobs(&self, limit: f64) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| p.relative_score <= -limit)
    }

    pub fn nobs(&self, limit: f64) -> impl Iterator<Item = &Player> {
        self.players
            .iter()
            .filter(move |p| is_nob(p.relative_score, limit))
    }
}

// ---------------------------------------------------------------------------
// OutlierReport
// ---------------------------------------------------------------------------

/// Standout counts over every analyzed match.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierReport {
    pub limit: f64,
    pub matches: usize,
    pub players: usize,
    pub nobs: usize,
    pub positive: usize,
    pub negative: usize,
    /// Summary of the NOB count per match; `None` without matches.
    pub per_match: Option<RobustSummary>,
    /// Most common NOB count per match, smallest count on ties.
    pub mode: Option<usize>,
    /// Matches without a single standout.
    pub balanced: usize,
}

impl OutlierReport {
    pub fn build(matches: &[Match], limit: f64) -> Self {
        let mut report = Self {
            limit,
            matches: matches.len(),
            players: 0,
            nobs: 0,
            positive: 0,
            negative: 0,
            per_match: None,
            mode: None,
            balanced: 0,
        };

        let mut per_match = Vec::with_capacity(matches.len());
        for m in matches {
            let mut count = 0;
            for team in m.teams() {
                let positive = team.positive_nobs(limit).count();
                let negative = team.negative_nobs(limit).count();
                report.players += team.players.len();
                report.positive += positive;
                report.negative += negative;
                count += positive + negative;
            }
            if count == 0 {
                report.balanced += 1;
            }
            report.nobs += count;
            per_match.push(count);
        }

        report.per_match = RobustSummary::new(per_match.iter().map(|&c| c as f64)).ok();
        report.mode = mode(&per_match);
        report
    }

    pub fn rate(&self) -> f64 {
        ratio(self.nobs, self.players)
    }

    pub fn balanced_fraction(&self) -> f64 {
        ratio(self.balanced, self.matches)
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn mode(counts: &[usize]) -> Option<usize> {
    let mut frequency: BTreeMap<usize, usize> = BTreeMap::new();
    for &c in counts {
        *frequency.entry(c).or_default() += 1;
    }
    let mut best: Option<(usize, usize)> = None;
    // Ascending keys; only a strictly higher frequency replaces the leader.
    for (value, seen) in frequency {
        if best.map_or(true, |(_, top)| seen > top) {
            best = Some((value, seen));
        }
    }
    best.map(|(value, _)| value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
