//! Rebalancer CLI - inspect temperament settings and run planning cycles.
//!
//! Every command prints one JSON `ApiResponse` on stdout. Logs go to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rebalancer_core::{
    all_mappings, default_calculators, get_temperament_mapping, plan, AllowAllTagFilter,
    ApiResponse, CalculatorConfig, HoldSettings, PlanningContext, SettingsStore, SliderState,
    StaticSecurityRepository, TransactionCosts,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "rebalancer")]
#[command(about = "Temperament-driven portfolio rebalancing CLI")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to ~/.config/rebalancer/settings.toml)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Temperament slider commands
    Sliders {
        #[command(subcommand)]
        action: SliderAction,
    },
    /// Resolved parameter commands
    Param {
        #[command(subcommand)]
        action: ParamAction,
    },
    /// Run one planning cycle against a context snapshot
    Plan {
        /// Planning context JSON file
        #[arg(short, long)]
        context: PathBuf,
        /// Only print the merged, ranked candidate list
        #[arg(long)]
        ranked: bool,
    },
}

#[derive(Subcommand)]
enum SliderAction {
    /// Show sliders and hold settings
    Show,
    /// Update one or more sliders
    Set {
        #[arg(short, long)]
        risk_tolerance: Option<f64>,
        #[arg(short, long)]
        aggression: Option<f64>,
        #[arg(short, long)]
        patience: Option<f64>,
    },
}

#[derive(Subcommand)]
enum ParamAction {
    /// Resolve one parameter at the current sliders
    Get {
        /// Parameter name
        name: String,
    },
    /// Resolve every parameter, optionally filtered by name prefix
    List {
        /// Name prefix such as "kelly" or "profit_taking"
        #[arg(short, long)]
        group: Option<String>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let store = match open_store(cli.settings) {
        Ok(store) => store,
        Err(e) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ApiResponse::<()>::err(format!("{:#}", e))).unwrap()
            );
            return;
        }
    };

    let result = match cli.command {
        Commands::Sliders { action } => handle_sliders(store, action),
        Commands::Param { action } => handle_param(&store, action),
        Commands::Plan { context, ranked } => handle_plan(&store, &context, ranked),
    };

    let output = match result {
        Ok(data) => serde_json::to_string_pretty(&ApiResponse::ok(data)).unwrap(),
        Err(e) => {
            tracing::warn!("Command failed: {:#}", e);
            serde_json::to_string_pretty(&ApiResponse::<()>::err(format!("{:#}", e))).unwrap()
        }
    };
    println!("{}", output);
}

fn open_store(path: Option<PathBuf>) -> anyhow::Result<SettingsStore> {
    let path = path.unwrap_or_else(SettingsStore::default_path);
    SettingsStore::with_path(path.clone())
        .with_context(|| format!("Failed to load settings from {}", path.display()))
}

fn handle_sliders(
    mut store: SettingsStore,
    action: SliderAction,
) -> anyhow::Result<serde_json::Value> {
    if let SliderAction::Set {
        risk_tolerance,
        aggression,
        patience,
    } = action
    {
        let updates = [
            ("risk_tolerance", risk_tolerance),
            ("aggression", aggression),
            ("patience", patience),
        ];
        for (key, value) in updates {
            if let Some(value) = value {
                store.settings_mut().set(key, value)?;
            }
        }
        store.save().context("Failed to save settings")?;
    }

    let sliders = SliderState::load(&store)?;
    let hold = HoldSettings::load(&store)?;
    Ok(json!({
        "sliders": sliders,
        "hold": hold,
        "transaction_costs": TransactionCosts::load(&store)?,
        "path": store.path().display().to_string(),
    }))
}

fn handle_param(store: &SettingsStore, action: ParamAction) -> anyhow::Result<serde_json::Value> {
    let sliders = SliderState::load(store)?;
    match action {
        ParamAction::Get { name } => {
            let mapping = get_temperament_mapping(&name)
                .with_context(|| format!("Unknown parameter: {}", name))?;
            Ok(json!({
                "parameter": mapping.parameter,
                "value": sliders.adjusted_value(mapping),
                "mapping": mapping,
            }))
        }
        ParamAction::List { group } => {
            let params: Vec<_> = all_mappings()
                .iter()
                .filter(|m| group.as_deref().is_none_or(|g| m.parameter.starts_with(g)))
                .map(|m| {
                    json!({
                        "parameter": m.parameter,
                        "temperament": m.temperament,
                        "value": sliders.adjusted_value(m),
                    })
                })
                .collect();
            Ok(json!({
                "sliders": sliders,
                "count": params.len(),
                "parameters": params,
            }))
        }
    }
}

fn handle_plan(
    store: &SettingsStore,
    path: &Path,
    ranked: bool,
) -> anyhow::Result<serde_json::Value> {
    let mut ctx = PlanningContext::load(path)
        .with_context(|| format!("Failed to read context {}", path.display()))?;
    ctx.transaction_costs = TransactionCosts::load(store)?;

    let config = CalculatorConfig::from_settings(store)?;
    let securities = Arc::new(StaticSecurityRepository::from_context(
        &ctx,
        &config.tag_thresholds,
        &config.quality_gates,
    ));
    let calculators = default_calculators(Arc::new(AllowAllTagFilter), securities);

    let outcome = match plan(&ctx, &config, &calculators) {
        Ok(outcome) => outcome,
        Err(e) => {
            return Err(anyhow::anyhow!(
                "{} ({} securities excluded before the failure)",
                e,
                e.exclusions.len()
            ))
        }
    };

    if ranked {
        return Ok(json!({ "candidates": outcome.ranked() }));
    }
    Ok(json!({
        "sliders": config.sliders,
        "candidate_count": outcome.candidate_count(),
        "exclusion_count": outcome.exclusion_count(),
        "net_cash_flow": outcome.net_cash_flow(),
        "calculators": outcome.calculators,
    }))
}
