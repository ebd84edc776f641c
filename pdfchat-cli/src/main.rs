use clap::Parser;
use pdfchat_cli::app;
use pdfchat_cli::settings::Args;
use pdfchat_cli::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_telemetry(args.log_format)?;

    let settings = args.into_settings()?;
    app::run(settings).await?;
    Ok(())
}
