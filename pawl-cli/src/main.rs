use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use pawl_core::TracingLogSink;
use pawl_execution::{
    serve, CancellationSource, JobExecutor, LocalJobExecutor, StubEngine,
};
use pawl_ipc::{JobDescriptor, StdioTransport};
use pawl_script::{extract_variables, is_legal_variable_name, ScriptMetadata};

mod cli;
mod config;

use cli::{Cli, Commands};
use config::PawlConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = PawlConfig::load(cli.config.as_deref())?;

    let filter = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.filter.clone());
    init_tracing(&filter)?;

    match cli.command {
        Commands::Worker => run_worker().await,
        Commands::Run {
            script,
            variables,
            out_variables,
            debug_logging,
            verbose_logging,
            collect,
            no_log,
        } => {
            run_script(RunArgs {
                script,
                variables,
                out_variables,
                debug_logging: debug_logging || config.execution.debug_logging,
                verbose_logging: verbose_logging || config.execution.verbose_logging,
                collect,
                no_log,
            })
            .await
        }
        Commands::Inspect { script } => inspect(&script),
    }
}

/// Diagnostics go to stderr; in worker mode stdout is the wire
fn init_tracing(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter).context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn run_worker() -> Result<()> {
    let mut transport = StdioTransport::stdio();
    serve(StubEngine::new(), &mut transport, Arc::new(TracingLogSink))
        .await
        .context("worker failed")?;
    Ok(())
}

struct RunArgs {
    script: PathBuf,
    variables: Vec<String>,
    out_variables: Vec<String>,
    debug_logging: bool,
    verbose_logging: bool,
    collect: bool,
    no_log: bool,
}

async fn run_script(args: RunArgs) -> Result<()> {
    let source = std::fs::read_to_string(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;

    let mut descriptor = JobDescriptor::new(source);
    descriptor.debug_logging = args.debug_logging;
    descriptor.verbose_logging = args.verbose_logging;
    descriptor.collect_output = args.collect;
    descriptor.log_output = !args.no_log;

    for binding in &args.variables {
        let (name, value) = binding
            .split_once('=')
            .with_context(|| format!("invalid --var '{}', expected NAME=VALUE", binding))?;
        descriptor.variables.insert(name, value);
    }
    for name in args.out_variables {
        descriptor.push_out_variable(name);
    }

    // Ctrl-C requests a cooperative stop; the partial result still prints
    let source_handle = CancellationSource::new();
    let signal = source_handle.signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping the script");
            source_handle.cancel();
        }
    });

    let mut executor = LocalJobExecutor::new(StubEngine::new(), Arc::new(TracingLogSink));
    let result = executor.execute_job(&descriptor, signal).await?;

    for line in &result.output {
        println!("{line}");
    }
    for (name, value) in result.out_variables.iter() {
        match value {
            Some(value) => println!("{name}={value}"),
            None => println!("{name} is unset"),
        }
    }

    if let Some(code) = result.exit_code {
        tracing::debug!("script exit code: {code}");
        std::process::exit(code);
    }
    Ok(())
}

fn inspect(script: &Path) -> Result<()> {
    let source = std::fs::read_to_string(script)
        .with_context(|| format!("reading script {}", script.display()))?;

    let Some(metadata) = ScriptMetadata::parse(&source) else {
        bail!("script could not be parsed");
    };

    if let Some(description) = &metadata.description {
        println!("{description}");
        println!();
    }

    if metadata.parameters.is_empty() {
        println!("Parameters: none");
    } else {
        println!("Parameters:");
        for parameter in &metadata.parameters {
            let type_name = parameter.type_name.as_deref().unwrap_or("untyped");
            match &parameter.description {
                Some(help) => println!("  ${} [{}] - {}", parameter.name, type_name, help),
                None => println!("  ${} [{}]", parameter.name, type_name),
            }
        }
    }

    let variables = extract_variables(&source);
    if !variables.is_empty() {
        println!();
        println!("Referenced variables:");
        for name in variables {
            if is_legal_variable_name(&name) {
                println!("  ${name}");
            } else {
                println!("  ${name} (not injectable)");
            }
        }
    }

    Ok(())
}
