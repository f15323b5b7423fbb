// CSV export of per-player scores and the impact sweep.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use nobscan_core::catalog::HeroCatalog;
use nobscan_core::model::Side;
use nobscan_core::outlier::is_nob;
use nobscan_core::Analysis;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to create {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Debug, Serialize)]
struct PlayerRow<'a> {
    match_id: u64,
    side: Side,
    won: bool,
    hero_id: u32,
    hero: &'a str,
    kills: u32,
    deaths: u32,
    assists: u32,
    combat: f64,
    gold_per_min: f64,
    xp_per_min: f64,
    score: f64,
    relative_score: f64,
    nob: bool,
}

/// One row per player, matches in analysis order, radiant first.
pub fn write_players<W: Write>(
    wtr: W,
    analysis: &Analysis,
    catalog: &HeroCatalog,
) -> Result<(), csv::Error> {
    let limit = analysis.outliers.limit;
    let mut writer = csv::Writer::from_writer(wtr);
    for m in &analysis.matches {
        for team in m.teams() {
            for p in &team.players {
                let hero = catalog.get(p.hero_id).map_or("", |h| h.name.as_str());
                writer.serialize(PlayerRow {
                    match_id: m.match_id,
                    side: team.side,
                    won: team.won,
                    hero_id: p.hero_id.0,
                    hero,
                    kills: p.kills,
                    deaths: p.deaths,
                    assists: p.assists,
                    combat: p.metrics.combat,
                    gold_per_min: p.metrics.gold_rate,
                    xp_per_min: p.metrics.xp_rate,
                    score: p.score,
                    relative_score: p.relative_score,
                    nob: is_nob(p.relative_score, limit),
                })?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn write_sweep<W: Write>(wtr: W, analysis: &Analysis) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(wtr);
    for row in &analysis.sweep.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Path-based writers
// ---------------------------------------------------------------------------

fn create(path: &Path) -> Result<std::fs::File, ExportError> {
    let io_err = |e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::File::create(path).map_err(io_err)
}

pub fn export_players(
    path: &Path,
    analysis: &Analysis,
    catalog: &HeroCatalog,
) -> Result<(), ExportError> {
    write_players(create(path)?, analysis, catalog).map_err(|e| ExportError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

pub fn export_sweep(path: &Path, analysis: &Analysis) -> Result<(), ExportError> {
    write_sweep(create(path)?, analysis).map_err(|e| ExportError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}
