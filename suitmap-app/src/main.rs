use anyhow::{anyhow, bail, Context};
use suitmap::prelude::*;

const PRIMARY_LAYER_ENV: &str = "SUITMAP_PRIMARY_LAYER";

/// Runs one suitability analysis without a renderer and prints the resulting view state.
///
/// Usage: `suitmap-app [config.json] [RASTER_NAME=WEIGHT ...]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.first() {
        Some(first) if !first.contains('=') => {
            let path = args.remove(0);
            ViewerConfig::from_file(&path).with_context(|| format!("loading config from {path}"))?
        }
        _ => ViewerConfig::default(),
    };

    let selection = parse_selection(&args)?;
    log::info!(
        "analysing {} criteria (total weight {})",
        selection.selection().len(),
        selection.total_weight()
    );

    let mut view = ViewOrchestrator::with_http(config);
    view.mount("headless");

    if let Ok(layer) = std::env::var(PRIMARY_LAYER_ENV) {
        view.set_primary_layer(Some(layer));
    }

    view.run_analysis(&selection);

    tokio::select! {
        _ = view.run_until_idle() => {}
        _ = tokio::signal::ctrl_c() => {
            log::warn!("interrupted; printing partial state");
        }
    }

    let snapshot = view.snapshot();
    view.teardown();
    println!("{}", snapshot.to_json()?);

    if let Some(error) = snapshot.error {
        bail!(error);
    }
    Ok(())
}

/// `NAME=WEIGHT` pairs, or every category at its default weight when none are given
fn parse_selection(args: &[String]) -> anyhow::Result<CategorySelection> {
    let mut selection = CategorySelection::default();
    if args.is_empty() {
        selection.select_all();
        return Ok(selection);
    }

    for arg in args {
        let (name, weight) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("expected RASTER_NAME=WEIGHT, got '{arg}'"))?;
        let weight: f64 = weight
            .trim()
            .parse()
            .with_context(|| format!("invalid weight for {name}"))?;
        selection
            .set_weight(name.trim(), weight)
            .ok_or_else(|| anyhow!("unknown category '{name}'"))?;
    }
    Ok(selection)
}
