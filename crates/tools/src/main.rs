use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use mapservice::{MapInstantiationResult, ServiceError};
use serde_json::json;
use sync::{ModelSync, SyncConfig, urls};
use tools::EntitiesDescription;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect how map-service responses reconcile onto client entities")]
struct Args {
    /// Protocol used to pick dataview/analysis urls (http, https, file:).
    /// Defaults to MAPSYNC_PROTOCOL, then https.
    #[arg(long)]
    protocol: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the url templates derived from an instantiation result
    Urls {
        instantiation: PathBuf,
    },

    /// Synchronize described entities against an instantiation result
    Sync {
        instantiation: PathBuf,
        entities: PathBuf,

        /// Entity whose change triggered the re-instantiation
        #[arg(long)]
        source_id: Option<String>,

        /// Ask dataviews to refetch even if their url did not change
        #[arg(long, default_value_t = false)]
        force_fetch: bool,
    },

    /// Reconcile a batch of service errors onto described entities
    Errors {
        errors: PathBuf,
        entities: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let config = SyncConfig::from_flag_or_env(args.protocol.as_deref()).map_err(|e| e.to_string())?;

    match args.command {
        Command::Urls { instantiation } => cmd_urls(&instantiation),
        Command::Sync {
            instantiation,
            entities,
            source_id,
            force_fetch,
        } => cmd_sync(config, &instantiation, &entities, source_id.as_deref(), force_fetch),
        Command::Errors { errors, entities } => cmd_errors(config, &errors, &entities),
    }
}

fn cmd_urls(instantiation: &Path) -> Result<(), String> {
    let result = load_instantiation(instantiation)?;
    let group = urls::layer_group_urls(&result).map_err(|e| e.to_string())?;
    let time_series = urls::time_series_tile_url_templates(&result).map_err(|e| e.to_string())?;

    print_json(&json!({
        "tiles": group.tiles,
        "grids": group.grids,
        "attributes": group.attributes,
        "time_series": time_series,
    }))
}

fn cmd_sync(
    config: SyncConfig,
    instantiation: &Path,
    entities: &Path,
    source_id: Option<&str>,
    force_fetch: bool,
) -> Result<(), String> {
    let result = load_instantiation(instantiation)?;
    let mut session = load_entities(entities)?.build_session().map_err(|e| e.to_string())?;

    let mut sync = ModelSync::new(config);
    info!(protocol = %config.protocol, "synchronizing {instantiation:?}");
    let outcome = sync.synchronize(&mut session.targets(), &result, source_id, force_fetch);

    print_json(&json!({
        "ok": outcome.is_ok(),
        "error": outcome.err().map(|e| e.to_string()),
        "session": session,
        "events": sync.events(),
        "metrics": sync.metrics().snapshot(),
    }))
}

fn cmd_errors(config: SyncConfig, errors: &Path, entities: &Path) -> Result<(), String> {
    let raw = fs::read_to_string(errors).map_err(|e| format!("read {errors:?}: {e}"))?;
    let batch = ServiceError::batch_from_json(&raw).map_err(|e| format!("parse {errors:?}: {e}"))?;
    let mut session = load_entities(entities)?.build_session().map_err(|e| e.to_string())?;

    let mut sync = ModelSync::new(config);
    let summary = sync.report_errors(&mut session.targets(), &batch);

    print_json(&json!({
        "summary": summary,
        "session": session,
        "events": sync.events(),
        "metrics": sync.metrics().snapshot(),
    }))
}

fn load_instantiation(path: &Path) -> Result<MapInstantiationResult, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    MapInstantiationResult::from_json(&raw).map_err(|e| format!("parse {path:?}: {e}"))
}

fn load_entities(path: &Path) -> Result<EntitiesDescription, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    EntitiesDescription::from_json(&raw).map_err(|e| format!("{path:?}: {e}"))
}

fn print_json(value: &serde_json::Value) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value).map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    Ok(())
}
