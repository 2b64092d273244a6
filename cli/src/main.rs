//! CLI entrypoint for steward
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use steward_application::{
    CommandSessionUseCase, LlmGateway, NoPlannerProgress, PlannerProgressNotifier,
    ResolveIntentUseCase, RunPlannerUseCase, ToolExecutorPort, UnconfiguredDevices,
};
use steward_domain::ToolDefinition;
use steward_infrastructure::{
    BuiltinTools, ConfigLoader, FileConfig, OllamaGateway, StdioBackendTransport, build_registry,
};
use steward_presentation::{ChatRepl, Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting steward");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    if cli.show_config {
        if !cli.no_config {
            ConfigLoader::print_config_sources(cli.config.as_ref());
            println!();
        }
        print!("{}", toml::to_string_pretty(&config).context("failed to render configuration")?);
        return Ok(());
    }

    config.validate().context("invalid configuration")?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    let Some(command) = cli.command.clone() else {
        bail!("No command given. Try `steward --help`.");
    };

    // === Dependency Injection ===
    let gateway: Arc<dyn LlmGateway> = Arc::new(
        OllamaGateway::new(&config.ollama.base_url, config.ollama.timeout())
            .context("failed to create model gateway")?,
    );
    debug!(base_url = %config.ollama.base_url, "Model gateway ready");

    let show_progress = !cli.quiet && cli.output == OutputFormat::Pretty;
    let progress: Arc<dyn PlannerProgressNotifier> = if show_progress && config.repl.show_progress {
        Arc::new(ProgressReporter::new())
    } else {
        Arc::new(NoPlannerProgress)
    };

    let transport = Arc::new(StdioBackendTransport::new(config.backends.clone()));
    let builtins = BuiltinTools::new(
        gateway.clone(),
        config.models.synthesis_model(),
        config.to_planner_config(),
    )
    .with_progress(progress.clone());
    let registry = build_registry(transport, builtins, config.external_tools());
    let stats = registry.stats();
    info!(internal = stats.internal, external = stats.external, "Tool registry ready");
    let tools: Arc<dyn ToolExecutorPort> = registry;

    let entities = config.entity_registry();
    let resolver = ResolveIntentUseCase::new(gateway.clone(), tools.clone(), config.to_resolver_config());

    match command {
        Command::Tools => {
            let output = match cli.output {
                OutputFormat::Pretty => ConsoleFormatter::format_tools(tools.tool_spec()),
                OutputFormat::Json => {
                    let all: Vec<&ToolDefinition> = tools.tool_spec().all().collect();
                    ConsoleFormatter::format_json(&all)
                }
            };
            println!("{}", output);
        }
        Command::Resolve { .. } => {
            let text = command.text().unwrap_or_default();
            let resolution = resolver.resolve(&text, &entities, None).await;
            let output = match cli.output {
                OutputFormat::Pretty => ConsoleFormatter::format_resolution(&text, &resolution),
                OutputFormat::Json => ConsoleFormatter::format_json(&resolution),
            };
            println!("{}", output);
        }
        Command::Run { .. } => {
            let text = command.text().unwrap_or_default();
            let mut session = session(resolver, tools, &config);
            let report = session.handle(&text, &entities).await;
            let output = match cli.output {
                OutputFormat::Pretty => ConsoleFormatter::format_report(&report),
                OutputFormat::Json => ConsoleFormatter::format_json(&report),
            };
            println!("{}", output);
        }
        Command::Automate { .. } => {
            let goal = command.text().unwrap_or_default();
            let outcome = RunPlannerUseCase::new(gateway, tools, config.to_planner_config())
                .with_progress(progress)
                .execute(&goal)
                .await;
            let output = match cli.output {
                OutputFormat::Pretty => ConsoleFormatter::format_planner(&outcome),
                OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
            };
            println!("{}", output);
        }
        Command::Chat => {
            let history_path = config
                .repl
                .history_file
                .as_deref()
                .map(PathBuf::from)
                .or_else(ChatRepl::default_history_path);
            let mut repl = ChatRepl::new(session(resolver, tools.clone(), &config), tools, entities)
                .with_output(cli.output)
                .with_history_path(history_path);
            repl.run().await.context("chat session failed")?;
        }
    }

    Ok(())
}

fn session(
    resolver: ResolveIntentUseCase,
    tools: Arc<dyn ToolExecutorPort>,
    config: &FileConfig,
) -> CommandSessionUseCase {
    CommandSessionUseCase::new(
        resolver,
        tools,
        Arc::new(UnconfiguredDevices),
        config.to_session_config(),
    )
}

/// Console logging filtered by `-v` (or `RUST_LOG`), plus an optional log file.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("--log-file must name a file: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    Ok(guard)
}
