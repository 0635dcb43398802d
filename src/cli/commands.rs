use clap::Subcommand;

use super::inspect::InspectArgs;
use super::library::LibraryArgs;
use super::replay::ReplayArgs;
use super::show::ShowArgs;
use super::validate::ValidateArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Replay a workflow file (or a library entry) in Chromium
    Replay(ReplayArgs),

    /// Check workflow files for structural problems
    Validate(ValidateArgs),

    /// Print the steps of a workflow
    Show(ShowArgs),

    /// Generate selector strategies for the element under a point
    Inspect(InspectArgs),

    /// Manage the workflow library
    Library(LibraryArgs),

    /// Show version, configuration and browser detection
    Info,
}
