use anyhow::Result;

use super::commands::Commands;
use super::context::CliContext;
use super::env::CliArgs;
use super::info::cmd_info;
use super::inspect::cmd_inspect;
use super::library::cmd_library;
use super::replay::cmd_replay;
use super::show::cmd_show;
use super::validate::cmd_validate;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Replay(args) => cmd_replay(args, ctx, cli.output).await,
        Commands::Validate(args) => cmd_validate(args, cli.output),
        Commands::Show(args) => cmd_show(args, cli.output),
        Commands::Inspect(args) => cmd_inspect(args, ctx, cli.output).await,
        Commands::Library(args) => cmd_library(args, ctx, cli.output),
        Commands::Info => cmd_info(ctx, cli.output),
    }
}
