// SPDX-License-Identifier: Apache-2.0
mod applier;
mod cli;
mod resources;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use actl_config::{AgentType, Config, ResourceBundle};
use actl_discovery::RmcpTransport;
use actl_reconciler::{AgentReconcileOutcome, ModelConfigReconcileOutcome, Reconciler, ToolServerReconcileOutcome};
use actl_store::{InMemoryStore, Store};

use applier::{LoggingApplier, LoggingRegistrar};
use cli::{Cli, Commands};
use resources::{EnvSecretResolver, StaticResolver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Completions { shell } => {
            cli::print_completions(shell);
            Ok(())
        }
        Commands::ShowConfig => {
            let config = actl_config::load(cli.config.as_deref())?;
            println!("{}", serde_yaml::to_string(&config).unwrap_or_default());
            Ok(())
        }
        Commands::Validate { file } => validate_resource_file(&file).await,
        Commands::Reconcile { watch } => {
            let config = actl_config::load(cli.config.as_deref())?;
            run_reconcile(config, watch).await
        }
    }
}

/// Run the reconcile loop once (or forever, with `--watch`) over the
/// declarative resources embedded in the config file.
async fn run_reconcile(config: Config, watch: bool) -> anyhow::Result<()> {
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let resolver = Arc::new(StaticResolver::from_bundle(&config.resources));
    let secrets = Arc::new(EnvSecretResolver);
    let applier = Arc::new(LoggingApplier);
    let registrar = Arc::new(LoggingRegistrar);

    let transport = Arc::new(RmcpTransport::new());

    let reconciler = Reconciler::new(
        store,
        resolver,
        secrets,
        applier,
        registrar,
        transport,
        config.watch_namespaces.clone(),
    );

    loop {
        for entry in &config.resources.tool_servers {
            match reconciler
                .reconcile_tool_server(&entry.reference, Some(entry.source.clone()))
                .await
            {
                Ok(ToolServerReconcileOutcome::Reconciled { accepted }) => {
                    println!(
                        "ToolServer {}: Accepted={:?} reason={}",
                        entry.reference, accepted.status, accepted.reason
                    );
                }
                Ok(ToolServerReconcileOutcome::Deleted) => {}
                Err(err) => {
                    tracing::warn!(%err, tool_server = %entry.reference, "tool server reconcile failed");
                }
            }
        }

        for mc in &config.resources.model_configs {
            match reconciler.reconcile_model_config(&mc.reference, Some(mc.clone())).await {
                Ok(ModelConfigReconcileOutcome::Reconciled { accepted }) => {
                    println!(
                        "ModelConfig {}: Accepted={:?} reason={}",
                        mc.reference, accepted.status, accepted.reason
                    );
                }
                Ok(ModelConfigReconcileOutcome::Deleted) => {}
                Err(err) => {
                    tracing::warn!(%err, model_config = %mc.reference, "model config reconcile failed");
                }
            }
        }

        for agent in &config.resources.agents {
            match reconciler.reconcile_agent(&agent.reference, Some(agent.clone())).await {
                AgentReconcileOutcome::Reconciled { accepted, ready } => {
                    println!(
                        "Agent {}: Accepted={:?} reason={}  Ready={:?} reason={}",
                        agent.reference, accepted.status, accepted.reason, ready.status, ready.reason
                    );
                }
                AgentReconcileOutcome::Deleted => {}
            }
        }

        if !watch {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(config.reconciler.tick_interval_secs)) => {}
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

/// Parse a standalone resource file, validate schema invariants, and
/// dry-run translate every inline/workflow Agent against the rest of the
/// file's resources.
async fn validate_resource_file(file: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("reading resource file {}", file.display()))?;
    let bundle: ResourceBundle = serde_yaml::from_str(&content)
        .with_context(|| format!("parsing resource file {}", file.display()))?;

    let mut failures = 0usize;

    println!("Model configs: {}", bundle.model_configs.len());
    for mc in &bundle.model_configs {
        match mc.validate() {
            Ok(()) => println!("  {} OK", mc.reference),
            Err(err) => {
                failures += 1;
                println!("  {} INVALID: {err}", mc.reference);
            }
        }
    }

    println!("Agents: {}", bundle.agents.len());
    for agent in &bundle.agents {
        if let Err(err) = agent.validate() {
            failures += 1;
            println!("  {} INVALID: {err}", agent.reference);
        }
    }

    println!("Tool servers: {}", bundle.tool_servers.len());
    for entry in &bundle.tool_servers {
        match actl_config::resolve_tool_server_spec(&entry.source) {
            Some(_) => println!("  {} OK", entry.reference),
            None => {
                failures += 1;
                println!("  {} INVALID: could not resolve a connection spec", entry.reference);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} resource(s) failed schema validation");
    }

    let watch_namespaces: Vec<String> = bundle
        .agents
        .iter()
        .map(|a| a.reference.namespace.clone())
        .chain(bundle.model_configs.iter().map(|m| m.reference.namespace.clone()))
        .chain(bundle.tool_servers.iter().map(|t| t.reference.namespace.clone()))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let resolver = StaticResolver::from_bundle(&bundle);
    let secrets = EnvSecretResolver;

    for agent in &bundle.agents {
        if agent.agent_type == AgentType::Remote {
            continue;
        }
        match actl_translator::translate(&agent.reference, &watch_namespaces, &resolver, &secrets).await {
            Ok(result) => println!(
                "  {} translates OK (config_hash={})",
                agent.reference, result.config_hash
            ),
            Err(err) => {
                failures += 1;
                println!("  {} translate FAILED: {err}", agent.reference);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} resource(s) failed validation");
    }

    println!("\nAll resources valid.");
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
