use std::path::PathBuf;
use std::sync::Arc;

use action_flow::{ExecutionResult, FlowExecutor, WorkflowExecutor};
use action_primitives::BrowserDriver;
use anyhow::{anyhow, bail, Context, Result};
use cdp_adapter::ChromiumDriver;
use clap::Args;
use tracing::{info, warn};
use waymark_core_types::{WorkflowDefinition, WorkflowId};

use super::context::CliContext;
use super::inputs::collect_inputs;
use super::output::OutputFormat;

#[derive(Args, Clone, Debug)]
pub struct ReplayArgs {
    /// Workflow file (.json/.yaml), or a library name/id with --from-library
    pub workflow: String,

    /// Look the workflow up in the library instead of reading a file
    #[arg(long)]
    pub from_library: bool,

    /// Workflow input as key=value (repeatable)
    #[arg(short, long = "input", value_name = "KEY=VALUE")]
    pub inputs: Vec<String>,

    /// JSON or YAML file with workflow inputs
    #[arg(long, value_name = "FILE")]
    pub inputs_file: Option<PathBuf>,

    /// First step number to execute
    #[arg(long, default_value_t = 1)]
    pub start_step: u32,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Save a screenshot after every step
    #[arg(long)]
    pub screenshots: bool,

    /// Fail instead of clicking recorded coordinates when no selector matches
    #[arg(long)]
    pub no_coordinate_fallback: bool,

    /// Write the execution result as JSON
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

fn resolve_workflow(args: &ReplayArgs, ctx: &CliContext) -> Result<WorkflowDefinition> {
    if !args.from_library {
        return workflow_store::load_validated(&PathBuf::from(&args.workflow))
            .with_context(|| format!("Failed to load workflow {}", args.workflow));
    }
    let library = ctx.library(None)?;
    if let Some(workflow) = library.get_by_name(&args.workflow)? {
        return Ok(workflow);
    }
    library
        .get(&WorkflowId::from(args.workflow.as_str()))?
        .ok_or_else(|| anyhow!("No library workflow named or identified by '{}'", args.workflow))
}

pub async fn cmd_replay(args: ReplayArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let workflow = resolve_workflow(&args, ctx)?;
    let inputs = collect_inputs(args.inputs_file.as_deref(), &args.inputs)?;

    let mut executor_config = ctx.config().executor();
    executor_config.screenshots |= args.screenshots;
    if args.no_coordinate_fallback {
        executor_config.allow_coordinate_fallback = false;
    }
    let mut chromium = ctx.config().chromium();
    if args.headed {
        chromium.headless = false;
    }

    info!(workflow = %workflow.name, steps = workflow.steps.len(), "Launching browser for replay");
    let driver = Arc::new(
        ChromiumDriver::launch(&chromium)
            .await
            .context("Failed to start Chromium")?,
    );
    let executor = WorkflowExecutor::new(driver.clone() as Arc<dyn BrowserDriver>, executor_config);
    let outcome = executor.run(&workflow, inputs, args.start_step).await;
    drop(executor);

    match Arc::try_unwrap(driver) {
        Ok(driver) => {
            if let Err(err) = driver.close().await {
                warn!(error = %err, "Failed to close browser");
            }
        }
        Err(_) => warn!("Browser still in use; leaving it to shut down on drop"),
    }

    let result = outcome?;
    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
    }

    output.emit(&result, || print_result(&result))?;
    if !result.success {
        bail!(
            "{}",
            result
                .error_message
                .clone()
                .unwrap_or_else(|| "workflow failed".to_string())
        );
    }
    Ok(())
}

fn print_result(result: &ExecutionResult) {
    println!(
        "Workflow '{}' {} ({}/{} steps, {:.2}s)",
        result.workflow_name,
        if result.success { "succeeded" } else { "failed" },
        result.steps_completed,
        result.total_steps,
        result.execution_time
    );
    for step in &result.step_results {
        let mark = if step.success { "ok" } else { "FAILED" };
        let detail = step
            .result
            .as_deref()
            .or(step.error.as_deref())
            .unwrap_or_default();
        println!(
            "  [{:>3}] {:<14} {:<6} {:.2}s  {}",
            step.step_number, step.action_type, mark, step.duration, detail
        );
        for error in &step.strategy_errors {
            println!("          - {}", error);
        }
    }
    if !result.extracted_data.is_empty() {
        println!("Data:");
        let mut keys: Vec<_> = result.extracted_data.keys().collect();
        keys.sort();
        for key in keys {
            println!("  {} = {}", key, result.extracted_data[key]);
        }
    }
}
