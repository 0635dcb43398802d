use std::path::PathBuf;

use anyhow::Result;
use cdp_adapter::detect_chrome_executable;
use serde::Serialize;

use super::context::CliContext;
use super::output::OutputFormat;
use crate::config::Config;

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub version: &'static str,
    pub build_date: &'static str,
    pub git_commit: &'static str,
    pub config_path: PathBuf,
    pub config_found: bool,
    pub chrome_executable: Option<PathBuf>,
    pub config: Config,
}

pub fn cmd_info(ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let config = ctx.config().clone();
    let chrome_executable = config
        .browser
        .executable
        .clone()
        .or_else(detect_chrome_executable);
    let info = SystemInfo {
        version: env!("CARGO_PKG_VERSION"),
        build_date: env!("WAYMARK_BUILD_DATE"),
        git_commit: env!("WAYMARK_GIT_HASH"),
        config_path: ctx.config_path().to_path_buf(),
        config_found: ctx.config_path().exists(),
        chrome_executable,
        config,
    };

    output.emit(&info, || {
        println!("Waymark System Information");
        println!("==========================");
        println!("Version: {}", info.version);
        println!("Build Date: {}", info.build_date);
        println!("Git Commit: {}", info.git_commit);
        println!();
        println!(
            "Config: {}{}",
            info.config_path.display(),
            if info.config_found { "" } else { " (not found, using defaults)" }
        );
        match &info.chrome_executable {
            Some(path) => println!("Chrome: {}", path.display()),
            None => println!("Chrome: not found (set WAYMARK_CHROME or browser.executable)"),
        }
        println!("- Headless: {}", info.config.browser.headless);
        println!(
            "- Viewport: {}x{}",
            info.config.browser.viewport.width, info.config.browser.viewport.height
        );
        println!("- Element timeout: {}ms", info.config.replay.element_timeout_ms);
        println!("- Library: {}", info.config.library.storage_dir.display());
    })
}
