#[tokio::main]
async fn main() -> anyhow::Result<()> {
    waymark_cli::cli::app::run().await
}
