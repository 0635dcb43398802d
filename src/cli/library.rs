use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand};
use waymark_core_types::{WorkflowDefinition, WorkflowId};
use workflow_store::{GenerationMode, SearchFilter, WorkflowLibrary, WorkflowMetadata};

use super::context::CliContext;
use super::output::OutputFormat;

#[derive(Args, Clone, Debug)]
pub struct LibraryArgs {
    /// Library directory (defaults to library.storage_dir)
    #[arg(long, value_name = "DIR", global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: LibraryCommand,
}

#[derive(Subcommand, Clone, Debug)]
pub enum LibraryCommand {
    /// List stored workflows
    List,

    /// Copy a workflow file into the library
    Add {
        file: PathBuf,

        /// How the workflow was produced (manual or ai)
        #[arg(long, default_value = "manual")]
        mode: String,

        /// Task description the workflow was generated from
        #[arg(long)]
        task: Option<String>,
    },

    /// Print a stored workflow
    Get {
        /// Workflow id or name
        workflow: String,
    },

    /// Write a stored workflow to a .json/.yaml file
    Export {
        /// Workflow id or name
        workflow: String,
        path: PathBuf,
    },

    /// Filter workflows by text, tags and generation mode
    Search {
        query: Option<String>,

        /// Required tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long)]
        mode: Option<String>,
    },

    /// Remove a workflow by id
    Delete { id: String },
}

fn find(library: &WorkflowLibrary, key: &str) -> Result<(WorkflowMetadata, WorkflowDefinition)> {
    let wanted = key.to_lowercase();
    let metadata = library
        .metadata(&WorkflowId::from(key))
        .or_else(|| library.list().iter().find(|m| m.name.to_lowercase() == wanted))
        .cloned()
        .ok_or_else(|| anyhow!("No library workflow named or identified by '{}'", key))?;
    let workflow = library
        .get(&metadata.id)?
        .ok_or_else(|| anyhow!("Workflow '{}' vanished from the library", key))?;
    Ok((metadata, workflow))
}

fn print_entries(entries: &[&WorkflowMetadata]) {
    if entries.is_empty() {
        println!("No workflows.");
        return;
    }
    for entry in entries {
        let tags = if entry.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", entry.tags.join(", "))
        };
        println!(
            "{}  {} v{} ({}, updated {}){}",
            entry.id,
            entry.name,
            entry.version,
            entry.generation_mode,
            entry.updated_at.format("%Y-%m-%d %H:%M"),
            tags
        );
    }
}

pub fn cmd_library(args: LibraryArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let mut library = ctx.library(args.dir.as_deref())?;

    match args.command {
        LibraryCommand::List => {
            let entries: Vec<&WorkflowMetadata> = library.list().iter().collect();
            output.emit(&entries, || print_entries(&entries))
        }
        LibraryCommand::Add { file, mode, task } => {
            let mode: GenerationMode = mode.parse()?;
            let workflow = workflow_store::load_validated(&file)
                .with_context(|| format!("Failed to load workflow {}", file.display()))?;
            let metadata = library.save(&workflow, mode, task)?;
            output.emit(&metadata, || {
                println!("Saved '{}' as {}", metadata.name, metadata.id)
            })
        }
        LibraryCommand::Get { workflow } => {
            let (_, workflow) = find(&library, &workflow)?;
            match output {
                OutputFormat::Human => OutputFormat::Yaml.emit(&workflow, || {}),
                other => other.emit(&workflow, || {}),
            }
        }
        LibraryCommand::Export { workflow, path } => {
            let (metadata, workflow) = find(&library, &workflow)?;
            workflow_store::save(&workflow, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output.emit(&metadata, || {
                println!("Exported '{}' to {}", metadata.name, path.display())
            })
        }
        LibraryCommand::Search { query, tags, mode } => {
            let generation_mode = mode.map(|m| m.parse::<GenerationMode>()).transpose()?;
            let filter = SearchFilter {
                query,
                tags,
                generation_mode,
            };
            let entries = library.search(&filter);
            output.emit(&entries, || print_entries(&entries))
        }
        LibraryCommand::Delete { id } => {
            if !library.delete(&WorkflowId::from(id.as_str()))? {
                bail!("No library workflow with id '{}'", id);
            }
            output.emit(&serde_json::json!({ "deleted": id }), || {
                println!("Deleted {}", id)
            })
        }
    }
}
