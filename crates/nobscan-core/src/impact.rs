// Impact sweep: win rate of teams whose most extreme player reached a
// relative-score threshold.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use crate::model::Match;
use crate::settings::ImpactSettings;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRow {
    pub threshold: f64,
    /// Teams that qualify for the threshold.
    pub teams: usize,
    pub wins: usize,
    pub win_rate: f64,
    /// Qualifying teams as a fraction of all teams.
    pub coverage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpactSweep {
    pub total_teams: usize,
    /// Ascending by threshold.
    pub rows: Vec<SweepRow>,
}

/// Team extremes in fixed-point form, `value * 10^decimals` rounded.
struct TeamExtremes {
    best: i64,
    worst: i64,
    won: bool,
}

impl TeamExtremes {
    fn qualifies(&self, threshold: i64) -> bool {
        match threshold {
            t if t > 0 => self.best >= t,
            t if t < 0 => self.worst <= t,
            _ => true,
        }
    }
}

impl ImpactSweep {
    /// One row per distinct rounded team extreme. Qualification compares the
    /// rounded values, so with one decimal a team whose best is 2.26 counts
    /// for threshold 2.3 while one at 2.24 does not.
    pub fn build(matches: &[Match], settings: &ImpactSettings) -> Self {
        let scale = 10f64.powi(settings.decimals as i32);
        let to_key = |v: f64| (v * scale).round() as i64;

        let teams: Vec<TeamExtremes> = matches
            .iter()
            .flat_map(|m| m.teams())
            .map(|team| TeamExtremes {
                best: to_key(team.best),
                worst: to_key(team.worst),
                won: team.won,
            })
            .collect();

        let thresholds: BTreeSet<i64> = teams
            .iter()
            .flat_map(|t| [t.best, t.worst])
            .collect();

        let total_teams = teams.len();
        let mut rows = Vec::new();
        for key in thresholds {
            let (qualifying, wins) = teams
                .iter()
                .filter(|t| t.qualifies(key))
                .fold((0usize, 0usize), |(n, w), t| (n + 1, w + usize::from(t.won)));
            if qualifying < settings.min_teams {
                continue;
            }
            rows.push(SweepRow {
                threshold: key as f64 / scale,
                teams: qualifying,
                wins,
                win_rate: wins as f64 / qualifying as f64,
                coverage: qualifying as f64 / total_teams as f64,
            });
        }

        info!(
            "Impact sweep over {} teams: {} thresholds reported",
            total_teams,
            rows.len()
        );

        Self { total_teams, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::HeroId;
    use crate::model::{MatchRecord, PlayerRecord, Side};

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    /// A match whose teams have the given (best, worst) extremes.
    fn make_match(id: u64, radiant_win: bool, radiant: (f64, f64), dire: (f64, f64)) -> Match {
        let players = (0..10u32)
            .map(|i| PlayerRecord {
                hero_id: HeroId(i + 1),
                side: if i < 5 { Side::Radiant } else { Side::Dire },
                kills: 0,
                deaths: 0,
                assists: 0,
                gold_per_min: 0,
                xp_per_min: 0,
            })
            .collect();
        let record = MatchRecord {
            match_id: id,
            start_time: None,
            radiant_win,
            players,
        };
        let mut m = Match::from_record(&record, 0.1).unwrap();
        (m.radiant.best, m.radiant.worst) = radiant;
        (m.dire.best, m.dire.worst) = dire;
        m
    }

    fn settings(min_teams: usize) -> ImpactSettings {
        ImpactSettings {
            min_teams,
            decimals: 1,
        }
    }

    fn fixture() -> Vec<Match> {
        vec![
            make_match(1, true, (2.34, -0.5), (1.0, -2.0)),
            make_match(2, false, (0.5, -1.04), (2.3, -0.96)),
            make_match(3, true, (3.0, -0.2), (0.0, -3.0)),
        ]
    }

    fn row(sweep: &ImpactSweep, threshold: f64) -> &SweepRow {
        sweep
            .rows
            .iter()
            .find(|r| approx_eq(r.threshold, threshold, 1e-9))
            .unwrap()
    }

    #[test]
    fn thresholds_are_distinct_rounded_extremes() {
        let sweep = ImpactSweep::build(&fixture(), &settings(1));
        let thresholds: Vec<f64> = sweep.rows.iter().map(|r| r.threshold).collect();
        // 2.34 and 2.3 share a bucket, as do -1.04 and -0.96.
        let expected = [-3.0, -2.0, -1.0, -0.5, -0.2, 0.0, 0.5, 1.0, 2.3, 3.0];
        assert_eq!(thresholds.len(), expected.len());
        for (got, want) in thresholds.iter().zip(expected) {
            assert!(approx_eq(*got, want, 1e-9), "{got} != {want}");
        }
    }

    #[test]
    fn rows_count_qualifying_teams_and_wins() {
        let sweep = ImpactSweep::build(&fixture(), &settings(1));
        assert_eq!(sweep.total_teams, 6);

        let zero = row(&sweep, 0.0);
        assert_eq!(zero.teams, 6);
        assert_eq!(zero.wins, 3);
        assert!(approx_eq(zero.coverage, 1.0, 1e-12));

        // best >= 2.3: match 1 radiant (won), match 2 dire (won), match 3 radiant (won).
        let high = row(&sweep, 2.3);
        assert_eq!(high.teams, 3);
        assert_eq!(high.wins, 3);
        assert!(approx_eq(high.win_rate, 1.0, 1e-12));
        assert!(approx_eq(high.coverage, 0.5, 1e-12));

        // worst <= -1.0: match 1 dire, match 2 both teams, match 3 dire. Only match 2 dire won.
        let low = row(&sweep, -1.0);
        assert_eq!(low.teams, 4);
        assert_eq!(low.wins, 1);
        assert!(approx_eq(low.win_rate, 0.25, 1e-12));
    }

    #[test]
    fn sparse_thresholds_are_dropped() {
        let sweep = ImpactSweep::build(&fixture(), &settings(3));
        assert!(sweep.rows.iter().all(|r| r.teams >= 3));
        assert!(sweep.rows.iter().all(|r| r.threshold.abs() < 2.9));

        let sweep = ImpactSweep::build(&fixture(), &settings(10));
        assert!(sweep.rows.is_empty());
    }

    #[test]
    fn qualification_uses_rounded_extremes() {
        let matches = vec![
            make_match(1, true, (2.3, -0.1), (2.26, -0.1)),
            make_match(2, false, (2.24, -0.1), (0.0, -0.96)),
        ];
        let sweep = ImpactSweep::build(&matches, &settings(1));

        let high = row(&sweep, 2.3);
        assert_eq!(high.teams, 2);
        assert_eq!(high.wins, 1);
        assert_eq!(row(&sweep, 2.2).teams, 3);

        // -0.96 rounds to -1.0 and qualifies for it.
        let low = row(&sweep, -1.0);
        assert_eq!(low.teams, 1);
        assert_eq!(low.wins, 1);
    }

    #[test]
    fn rows_are_ascending() {
        let sweep = ImpactSweep::build(&fixture(), &settings(1));
        assert!(sweep
            .rows
            .windows(2)
            .all(|w| w[0].threshold < w[1].threshold));
    }
}
