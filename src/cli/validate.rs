use std::collections::BTreeSet;
use std::path::PathBuf;

use action_flow::placeholders;
use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use waymark_core_types::{ActionKind, WorkflowDefinition};

use super::output::OutputFormat;

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Workflow files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub path: PathBuf,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub steps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

fn templates(kind: &ActionKind) -> Vec<&str> {
    match kind {
        ActionKind::Navigation { url } => vec![url.as_str()],
        ActionKind::Input {
            value,
            default_value,
            ..
        } => std::iter::once(value.as_str())
            .chain(default_value.as_deref())
            .collect(),
        ActionKind::SelectChange { selected_text, .. } => vec![selected_text.as_str()],
        _ => Vec::new(),
    }
}

/// Non-fatal findings: undeclared placeholders and unresolvable elements.
pub fn lint(workflow: &WorkflowDefinition) -> Vec<String> {
    let mut known: BTreeSet<&str> = workflow
        .input_schema
        .iter()
        .map(|input| input.name.as_str())
        .collect();
    let mut warnings = Vec::new();

    for step in workflow.ordered_steps() {
        for template in templates(&step.action.kind) {
            for name in placeholders(template) {
                if !known.contains(name.as_str()) {
                    warnings.push(format!(
                        "step {}: placeholder {{{}}} is not a declared input",
                        step.step_number, name
                    ));
                }
            }
        }
        if let Some(element) = step.action.kind.element() {
            if !element.is_resolvable() {
                warnings.push(format!(
                    "step {}: element '{}' has neither selectors nor coordinates",
                    step.step_number, element.target_text
                ));
            }
        }
        if let Some(output) = step.action.output.as_deref() {
            known.insert(output);
        }
    }
    warnings
}

fn check(path: PathBuf) -> ValidationReport {
    match workflow_store::load_validated(&path) {
        Ok(workflow) => ValidationReport {
            path,
            valid: true,
            steps: workflow.steps.len(),
            warnings: lint(&workflow),
            name: Some(workflow.name),
            error: None,
        },
        Err(err) => ValidationReport {
            path,
            valid: false,
            name: None,
            steps: 0,
            error: Some(err.to_string()),
            warnings: Vec::new(),
        },
    }
}

pub fn cmd_validate(args: ValidateArgs, output: OutputFormat) -> Result<()> {
    let reports: Vec<ValidationReport> = args.files.into_iter().map(check).collect();

    output.emit(&reports, || {
        for report in &reports {
            match (&report.name, &report.error) {
                (Some(name), _) => println!(
                    "OK      {} ({}, {} steps)",
                    report.path.display(),
                    name,
                    report.steps
                ),
                (None, Some(error)) => println!("INVALID {}: {}", report.path.display(), error),
                (None, None) => println!("INVALID {}", report.path.display()),
            }
            for warning in &report.warnings {
                println!("        warning: {}", warning);
            }
        }
    })?;

    let invalid = reports.iter().filter(|r| !r.valid).count();
    if invalid > 0 {
        bail!("{} of {} workflow file(s) are invalid", invalid, reports.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_core_types::{Action, ElementContext, InputVariable, VariableType};

    #[test]
    fn lint_flags_undeclared_placeholders() {
        let workflow = WorkflowDefinition::new("Search", "")
            .with_input(InputVariable::new("query", VariableType::String))
            .with_step(Action::navigation("https://example.com/?q={query}&lang={lang}"))
            .with_step(
                Action::new(ActionKind::Extract {
                    extraction_goal: "title".into(),
                })
                .with_output("title"),
            )
            .with_step(Action::navigation("https://example.com/{title}"))
            .with_step(Action::click(ElementContext::new("Ghost")));

        let warnings = lint(&workflow);
        assert_eq!(warnings.len(), 2, "{warnings:?}");
        assert!(warnings[0].contains("{lang}"));
        assert!(warnings[1].contains("'Ghost'"));
    }
}
