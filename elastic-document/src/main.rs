use clap::Parser;
use tracing::error;

use elastic_document::cli::{self, Cli};
use elastic_document::telemetry::init_tracing;
use elastic_document::{AppError, Dependencies, Settings};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    init_tracing(settings.log_format);

    if let Err(e) = run(cli, &settings).await {
        error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, settings: &Settings) -> Result<(), AppError> {
    let dependencies = Dependencies::new(settings).await?;

    let result = cli::run(cli.command, &dependencies.document).await;
    dependencies.document.destroy().await;

    result
}
