// Plain-text run report written to stdout.

use std::fmt;

use nobscan_core::catalog::HeroCatalog;
use nobscan_core::model::{Match, Metric, Player, Team};
use nobscan_core::outlier::is_nob;
use nobscan_core::reference::MetricSummaries;
use nobscan_core::Analysis;

use crate::config::OutputConfig;

/// Display adapter over a finished analysis.
pub struct Report<'a> {
    pub analysis: &'a Analysis,
    pub catalog: &'a HeroCatalog,
    pub options: &'a OutputConfig,
    /// Match files read but left out of the analysis.
    pub discarded: usize,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.analysis;
        writeln!(
            f,
            "Matches: {} analyzed, {} discarded",
            analysis.matches.len(),
            self.discarded
        )?;
        writeln!(f)?;

        let global = analysis.references.global();
        writeln!(f, "Global baseline ({} players)", global.size())?;
        write_summaries(f, global, "  ")?;

        if self.options.print_references {
            self.write_references(f)?;
        }
        if self.options.print_matches {
            for m in &analysis.matches {
                writeln!(f)?;
                self.write_match(f, m)?;
            }
        }

        writeln!(f)?;
        self.write_outliers(f)?;
        writeln!(f)?;
        self.write_sweep(f)
    }
}

impl Report<'_> {
    fn write_references(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let references = &self.analysis.references;

        writeln!(f)?;
        writeln!(f, "Hero baselines")?;
        for (id, summaries) in references.heroes() {
            writeln!(f, "  {} (n={})", self.catalog.name(id), summaries.size())?;
            write_summaries(f, summaries, "    ")?;
        }

        writeln!(f)?;
        writeln!(f, "Role baselines")?;
        for (tag, summaries) in references.roles() {
            writeln!(f, "  {} (n={})", tag, summaries.size())?;
            write_summaries(f, summaries, "    ")?;
        }

        if !references.warnings().is_empty() {
            writeln!(f)?;
            writeln!(f, "Sample warnings")?;
            for warning in references.warnings() {
                writeln!(f, "  {warning}")?;
            }
        }
        Ok(())
    }

    fn write_match(&self, f: &mut fmt::Formatter<'_>, m: &Match) -> fmt::Result {
        match m.start_time {
            Some(t) => writeln!(f, "Match {} ({})", m.match_id, t.format("%Y-%m-%d %H:%M"))?,
            None => writeln!(f, "Match {}", m.match_id)?,
        }
        for team in m.teams() {
            self.write_team(f, team)?;
        }
        Ok(())
    }

    fn write_team(&self, f: &mut fmt::Formatter<'_>, team: &Team) -> fmt::Result {
        let winner = if team.won { " (winner)" } else { "" };
        writeln!(
            f,
            "{}{}: skill {:+.2}, best {:+.2}, worst {:+.2}",
            team.side, winner, team.skill, team.best, team.worst
        )?;
        for player in &team.players {
            self.write_player(f, player)?;
        }
        Ok(())
    }

    fn write_player(&self, f: &mut fmt::Formatter<'_>, p: &Player) -> fmt::Result {
        let marker = if is_nob(p.relative_score, self.analysis.outliers.limit) {
            "  NOB"
        } else {
            ""
        };
        writeln!(
            f,
            "  {:<20} KDA {}/{}/{}  cKPD {:.1}  GPM {:.0}  XPM {:.0}  score {:+.2}  relative {:+.2}{}",
            self.catalog.name(p.hero_id),
            p.kills,
            p.deaths,
            p.assists,
            p.metrics.combat,
            p.metrics.gold_rate,
            p.metrics.xp_rate,
            p.score,
            p.relative_score,
            marker
        )
    }

    fn write_outliers(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.analysis.outliers;
        writeln!(f, "Standouts (|relative score| >= {})", o.limit)?;
        writeln!(
            f,
            "  {} of {} players ({:.1}%): {} positive, {} negative",
            o.nobs,
            o.players,
            o.rate() * 100.0,
            o.positive,
            o.negative
        )?;
        if let Some(per_match) = &o.per_match {
            writeln!(f, "  Per match: {}", per_match.rounded(1))?;
        }
        if let Some(mode) = o.mode {
            writeln!(f, "  Most common per match: {mode}")?;
        }
        writeln!(
            f,
            "  Balanced matches: {} of {} ({:.1}%)",
            o.balanced,
            o.matches,
            o.balanced_fraction() * 100.0
        )
    }

    fn write_sweep(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sweep = &self.analysis.sweep;
        writeln!(f, "Impact sweep ({} teams)", sweep.total_teams)?;
        if sweep.rows.is_empty() {
            return writeln!(f, "  no threshold reached the minimum team count");
        }
        writeln!(
            f,
            "  {:>9}  {:>6}  {:>6}  {:>8}  {:>8}",
            "threshold", "teams", "wins", "win rate", "coverage"
        )?;
        for row in &sweep.rows {
            writeln!(
                f,
                "  {:>9.1}  {:>6}  {:>6}  {:>7.1}%  {:>7.1}%",
                row.threshold,
                row.teams,
                row.wins,
                row.win_rate * 100.0,
                row.coverage * 100.0
            )?;
        }
        Ok(())
    }
}

fn write_summaries(
    f: &mut fmt::Formatter<'_>,
    summaries: &MetricSummaries,
    indent: &str,
) -> fmt::Result {
    for metric in Metric::ALL {
        writeln!(
            f,
            "{indent}{:<5} {}",
            metric.label(),
            summaries.get(metric).rounded(metric.display_decimals())
        )?;
    }
    Ok(())
}
