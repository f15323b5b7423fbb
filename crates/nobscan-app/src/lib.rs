// Library root for the nobscan binary: configuration, report, export and
// the run sequence shared by `main` and the integration tests.

pub mod config;
pub mod export;
pub mod report;

use std::path::Path;

use anyhow::Context;
use tracing::info;

use nobscan_core::{analyze, Analysis, HeroCatalog};
use nobscan_dota::MatchSet;

use crate::config::Config;

/// Everything a run loaded and computed.
#[derive(Debug)]
pub struct RunOutput {
    pub catalog: HeroCatalog,
    pub matches: MatchSet,
    pub analysis: Analysis,
}

/// Load the inputs named by `config`, analyze them and write any configured
/// CSV files. Printing the report is left to the caller.
pub fn run(config: &Config) -> anyhow::Result<RunOutput> {
    let catalog = nobscan_dota::load_heroes(Path::new(&config.data.heroes))
        .context("failed to load hero catalog")?;
    let matches = nobscan_dota::load_matches(Path::new(&config.data.matches_dir))
        .context("failed to load matches")?;

    let analysis = analyze(&matches.records, &catalog, &config.scoring, &config.impact)
        .context("analysis failed")?;

    if let Some(path) = &config.output.players_csv {
        export::export_players(Path::new(path), &analysis, &catalog)?;
        info!("Wrote player scores to {path}");
    }
    if let Some(path) = &config.output.sweep_csv {
        export::export_sweep(Path::new(path), &analysis)?;
        info!("Wrote impact sweep to {path}");
    }

    Ok(RunOutput {
        catalog,
        matches,
        analysis,
    })
}
