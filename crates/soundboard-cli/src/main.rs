//! Soundboard CLI - The `soundboard` command.
//!
//! Runs Rhai sound scripts against a dry-run host: a registry backed by the
//! simulated audio backend, with every lifecycle event written to the log.

mod config;
mod error;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use soundboard_core::{
    HostBindings, LogNotifier, PrefixResolver, Registries, SimulatedBackend, StartPolicy,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Soundboard - scripted sound playback
#[derive(Parser, Debug)]
#[command(name = "soundboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run sound board scripts against a dry-run host", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a script
    Run {
        /// Path to the .rhai script to execute
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Config file path (default: platform config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host identifier the registry is created for
        #[arg(long, default_value = "cli")]
        host: String,

        /// Reject every playback start, as a browser without a user gesture would
        #[arg(long)]
        reject_playback: bool,

        /// Seconds to keep fades running after the script finishes
        #[arg(long, default_value = "0")]
        settle: f64,
    },

    /// Create a default configuration file
    Init,

    /// Show the configuration file path
    ConfigPath,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Commands::Run {
            file,
            config,
            host,
            reject_playback,
            settle,
        } => run_script(file, config, &host, reject_playback, settle),
        Commands::Init => {
            let path = Config::create_default_config_file()?;
            println!("Created default config at: {}", path.display());
            Ok(())
        }
        Commands::ConfigPath => {
            let path = Config::config_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn run_script(
    file: PathBuf,
    config_path: Option<PathBuf>,
    host_id: &str,
    reject_playback: bool,
    settle: f64,
) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }

    let config = match config_path {
        Some(path) => Config::load_from(&path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::load_or_default(),
    };

    let policy = if reject_playback {
        StartPolicy::Reject("playback requires a user gesture".to_string())
    } else {
        StartPolicy::Confirm
    };
    let backend = SimulatedBackend::with_policy(policy);
    let registries = Registries::new(move || Box::new(backend.clone()));

    let resource_base = config.resource_base.clone();
    let handle = registries.get_or_create(host_id, move || {
        HostBindings::new(
            Arc::new(PrefixResolver::new(resource_base)),
            Arc::new(LogNotifier),
        )
        .with_refresh(|| log::trace!("Sound state changed"))
    });

    handle.with(|registry| {
        config.apply_defaults(registry.defaults());
        config.preload_into(registry);
    });

    soundboard_core::api::init_api(handle.clone());
    let engine = soundboard_core::api::create_engine();

    log::info!("Loading: {}", file.display());
    let script = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    let mut scope = rhai::Scope::new();
    scope.push_constant("HOST", host_id.to_string());

    match engine.run_with_scope(&mut scope, &script) {
        Ok(()) => log::info!("Script executed successfully"),
        Err(e) => log::error!("Script error: {}", e),
    }

    handle.with(|registry| {
        registry.update(soundboard_core::options::seconds(settle));
        for alias in registry.get_loaded_sounds() {
            let state = if registry.is_sound_playing(&alias) {
                "playing"
            } else {
                "idle"
            };
            println!("{:<24} {:<8} {} instance(s)", alias, state, registry.instance_count(&alias));
        }
    });

    registries.teardown(host_id);
    Ok(())
}
