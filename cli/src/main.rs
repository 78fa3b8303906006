//! CLI entrypoint for mcp-conductor
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use conductor_application::{
    ConversationLogger, NoProgress, OrchestrationProgress, RunOrchestrationUseCase,
    RunSessionError, RunSessionUseCase, ToolSessionPort,
};
use conductor_domain::DiscoveryError;
use conductor_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, OpenAiPlanner, PlannerBackend, Severity,
    build_registry,
};
use conductor_presentation::{
    Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    apply_cli_overrides(&mut config, &cli);

    let log_dir = cli.log_dir.clone().or_else(|| config.logging.log_dir.clone());
    let _guard = init_tracing(cli.verbose, log_dir.as_deref())?;

    info!("Starting mcp-conductor");

    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => eprintln!("error: {}: {}", issue.field, issue.message),
            Severity::Warning => eprintln!("warning: {}: {}", issue.field, issue.message),
        }
    }
    if issues.iter().any(|i| i.severity == Severity::Error) {
        bail!("Invalid configuration");
    }

    // === Dependency Injection ===
    let mut registry = build_registry(&config);

    if cli.list_tools {
        return list_tools(&mut registry).await;
    }

    let goal = match cli.goal.as_deref().map(str::trim) {
        Some(goal) if !goal.is_empty() => goal.to_string(),
        _ => bail!("A goal is required. Use --list-tools to inspect the available tools."),
    };

    let planner = OpenAiPlanner::from_config(&config.planner)?;
    info!(
        backend = config.planner.backend.as_str(),
        model = planner.model(),
        "Planner ready"
    );

    let mut use_case = RunOrchestrationUseCase::new(Arc::new(planner))
        .with_params(config.orchestrator.to_params(config.planner.timeout_secs));

    if let Some(path) = cli
        .conversation_log
        .clone()
        .or_else(|| config.logging.conversation_log.clone())
    {
        let logger = JsonlConversationLogger::open(&path)
            .with_context(|| format!("Failed to open conversation log {}", path.display()))?;
        use_case = use_case.with_conversation_logger(Arc::new(logger) as Arc<dyn ConversationLogger>);
    }

    let session = RunSessionUseCase::new(use_case);

    let progress: Box<dyn OrchestrationProgress> = if cli.quiet || cli.output == OutputFormat::Json
    {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let output = match session
        .execute_with_progress(&mut registry, &goal, progress.as_ref())
        .await
    {
        Ok(output) => output,
        Err(RunSessionError::Discovery(DiscoveryError::ProviderUnreachable { report })) => {
            if let Some(warnings) = ConsoleFormatter::format_discovery_warnings(&report) {
                eprintln!("{warnings}");
            }
            bail!("No tool provider could be reached");
        }
        Err(e) => return Err(e.into()),
    };

    if !cli.quiet
        && cli.output != OutputFormat::Json
        && let Some(warnings) = ConsoleFormatter::format_discovery_warnings(&output.discovery)
    {
        eprintln!("{warnings}");
    }

    let rendered = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&output.result, &goal),
        OutputFormat::Answer => ConsoleFormatter::format_answer(&output.result),
        OutputFormat::Json => ConsoleFormatter::format_json(&output.result),
    };
    println!("{rendered}");

    Ok(())
}

/// Command-line flags take precedence over every configuration layer.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(backend) = cli.backend {
        config.planner.backend = match backend {
            conductor_presentation::Backend::Groq => PlannerBackend::Groq,
            conductor_presentation::Backend::Ollama => PlannerBackend::Ollama,
            conductor_presentation::Backend::Openai => PlannerBackend::OpenAi,
        };
    }
    if let Some(model) = &cli.model {
        config.planner.model = Some(model.clone());
    }
    if let Some(max_steps) = cli.max_steps {
        config.orchestrator.max_steps = max_steps;
    }
    if let Some(max_calls) = cli.max_calls_per_tool {
        config.orchestrator.max_calls_per_tool = max_calls;
    }
}

/// Console logging on stderr, plus a daily rotated file when a log
/// directory is configured.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "mcp-conductor.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    Ok(guard)
}

async fn list_tools<T: ToolSessionPort>(registry: &mut T) -> Result<()> {
    let report = match registry.discover().await {
        Ok(report) => report,
        Err(DiscoveryError::ProviderUnreachable { report }) => report,
        Err(e) => {
            registry.shutdown().await;
            return Err(e.into());
        }
    };

    println!(
        "{}",
        ConsoleFormatter::format_catalog(registry.catalog(), &report)
    );
    registry.shutdown().await;

    Ok(())
}
