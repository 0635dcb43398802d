use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use waymark_core_types::{ActionKind, WorkflowDefinition};

use super::output::OutputFormat;

#[derive(Args, Clone, Debug)]
pub struct ShowArgs {
    /// Workflow file (.json/.yaml)
    pub file: PathBuf,

    /// List every selector strategy under each step
    #[arg(long)]
    pub strategies: bool,
}

pub fn cmd_show(args: ShowArgs, output: OutputFormat) -> Result<()> {
    let workflow = workflow_store::load(&args.file)
        .with_context(|| format!("Failed to load workflow {}", args.file.display()))?;
    output.emit(&workflow, || print_workflow(&workflow, args.strategies))
}

/// One-line summary of what a step does.
pub fn describe(kind: &ActionKind) -> String {
    match kind {
        ActionKind::Navigation { url } => format!("go to {}", url),
        ActionKind::Click { element } => format!("click '{}'", element.target_text),
        ActionKind::Input { element, value, .. } => {
            format!("type {:?} into '{}'", value, element.target_text)
        }
        ActionKind::SelectChange {
            element,
            selected_text,
        } => format!("select '{}' in '{}'", selected_text, element.target_text),
        ActionKind::KeyPress { key, .. } => format!("press {}", key),
        ActionKind::Scroll { scroll_x, scroll_y } => format!("scroll by ({}, {})", scroll_x, scroll_y),
        ActionKind::GoBack => "go back".to_string(),
        ActionKind::GoForward => "go forward".to_string(),
        ActionKind::Extract { extraction_goal } => format!("extract: {}", extraction_goal),
        ActionKind::Wait { duration } => format!("wait {}s", duration),
    }
}

fn print_workflow(workflow: &WorkflowDefinition, strategies: bool) {
    println!("{} (v{})", workflow.name, workflow.version);
    if !workflow.description.is_empty() {
        println!("{}", workflow.description);
    }
    if !workflow.tags.is_empty() {
        println!("Tags: {}", workflow.tags.join(", "));
    }
    if !workflow.input_schema.is_empty() {
        println!("Inputs:");
        for input in &workflow.input_schema {
            let default = input
                .default
                .as_ref()
                .map(|value| format!(" = {}", value))
                .unwrap_or_default();
            println!(
                "  {} ({:?}{}){}",
                input.name,
                input.kind,
                if input.required { "" } else { ", optional" },
                default
            );
        }
    }

    println!("Steps:");
    for step in workflow.ordered_steps() {
        println!("  {:>3}. {}", step.step_number, describe(&step.action.kind));
        if let Some(description) = step.action.description.as_deref() {
            println!("       {}", description);
        }
        let Some(element) = step.action.kind.element() else {
            continue;
        };
        if strategies {
            for strategy in element.ordered_strategies() {
                println!("       #{} {}", strategy.priority, strategy.describe());
            }
            if element.has_coordinates() {
                println!("       coordinates fallback");
            }
            continue;
        }
        let fallback = if element.has_coordinates() { " + coordinates" } else { "" };
        match element.primary_selector() {
            Some(primary) => println!(
                "       via {} ({} strategies{})",
                primary.describe(),
                element.selector_strategies.len(),
                fallback
            ),
            None => println!("       via coordinates only"),
        }
    }
}
