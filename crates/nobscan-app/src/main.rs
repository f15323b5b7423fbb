// nobscan entry point.
//
// 1. Initialize tracing (stderr, so stdout carries only the report)
// 2. Load config, copying defaults on first run
// 3. Load heroes and matches, analyze, export
// 4. Print the report

use nobscan_app::config;
use nobscan_app::report::Report;

use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: matches from {}, heroes from {}, nob limit {}",
        config.data.matches_dir, config.data.heroes, config.scoring.nob_limit
    );

    let output = nobscan_app::run(&config)?;

    let report = Report {
        analysis: &output.analysis,
        catalog: &output.catalog,
        options: &config.output,
        discarded: output.matches.discarded.len(),
    };
    print!("{report}");

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nobscan=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
