use action_locator::{coordinate_info, summarize, SelectorGenerator, StrategySummary};
use action_primitives::{BrowserDriver, Viewport};
use anyhow::{anyhow, Context, Result};
use cdp_adapter::ChromiumDriver;
use clap::Args;
use serde::Serialize;
use tracing::warn;
use waymark_core_types::{CoordinateInfo, ElementSnapshot, SelectorStrategy};

use super::context::CliContext;
use super::output::OutputFormat;

#[derive(Args, Clone, Debug)]
pub struct InspectArgs {
    /// Page to open
    pub url: String,

    /// Horizontal viewport coordinate
    #[arg(long)]
    pub x: i32,

    /// Vertical viewport coordinate
    #[arg(long)]
    pub y: i32,

    /// Leave out the XPath fallback strategy
    #[arg(long)]
    pub no_xpath: bool,

    /// Leave out the CSS fallback strategy
    #[arg(long)]
    pub no_css: bool,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub url: String,
    pub viewport: Viewport,
    pub element: ElementSnapshot,
    pub coordinates: CoordinateInfo,
    pub strategies: Vec<SelectorStrategy>,
    pub summary: StrategySummary,
}

/// Strategy list and coordinate record for an element seen in `viewport`.
pub fn build_report(
    url: String,
    x: i32,
    y: i32,
    viewport: Viewport,
    element: ElementSnapshot,
    generator: &SelectorGenerator,
) -> InspectReport {
    let strategies = generator.generate(&element);
    let summary = summarize(&strategies);
    let coordinates = coordinate_info(x, y, viewport, element.bounding_box);
    InspectReport {
        url,
        viewport,
        element,
        coordinates,
        strategies,
        summary,
    }
}

pub async fn cmd_inspect(args: InspectArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let mut chromium = ctx.config().chromium();
    if args.headed {
        chromium.headless = false;
    }
    let driver = ChromiumDriver::launch(&chromium)
        .await
        .context("Failed to start Chromium")?;

    let probe = async {
        driver.navigate(&args.url).await?;
        let viewport = driver.viewport_size().await?;
        let element = driver.element_at(args.x, args.y).await?;
        Ok::<_, action_primitives::ActionError>((viewport, element))
    }
    .await;
    if let Err(err) = driver.close().await {
        warn!(error = %err, "Failed to close browser");
    }

    let (viewport, element) = probe.with_context(|| format!("Failed to inspect {}", args.url))?;
    let element =
        element.ok_or_else(|| anyhow!("No element at ({}, {}) on {}", args.x, args.y, args.url))?;
    let generator = SelectorGenerator::new(!args.no_xpath, !args.no_css);
    let report = build_report(args.url, args.x, args.y, viewport, element, &generator);

    output.emit(&report, || print_report(&report))
}

fn print_report(report: &InspectReport) {
    let element = &report.element;
    println!("Element <{}> on {}", element.normalized_tag(), report.url);
    if !element.trimmed_text().is_empty() {
        println!("Text: {}", element.trimmed_text());
    }
    if let (Some(nx), Some(ny)) = (report.coordinates.normalized_x, report.coordinates.normalized_y) {
        println!(
            "Normalized: ({}, {}) in {}x{}",
            nx, ny, report.viewport.width, report.viewport.height
        );
    }
    println!("Strategies ({}):", report.summary.total);
    for strategy in &report.strategies {
        println!("  #{:<2} {}", strategy.priority, strategy.describe());
    }
    if let Some(primary) = &report.summary.primary {
        println!("Primary: {}", primary.describe());
    }
}
