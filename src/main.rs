use anyhow::Context;
use clap::Parser;
use sales_dw_etl::utils::{logger, validation::Validate};
use sales_dw_etl::{
    CliConfig, EtlConfig, EtlPipeline, Extractor, HttpDocumentSink, Loader, PgSalesDatabase,
    RunStatus,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = CliConfig::parse();

    let config = EtlConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config))?;

    logger::init_cli_logger(config.log_dir(), cli.verbose)?;

    tracing::info!("Starting sales-dw-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let db = PgSalesDatabase::connect(&config.source.database_url, config.max_connections())
        .await
        .context("failed to connect to the sales database")?;

    if cli.init_schema {
        db.ensure_schema()
            .await
            .context("failed to create the source schema")?;
    }

    let sink = HttpDocumentSink::new(
        config.warehouse.endpoint.clone(),
        config.warehouse.api_key.clone(),
    );
    let mut pipeline = EtlPipeline::new(
        Extractor::new(db),
        Loader::new(sink, config.warehouse.database.clone()),
    );

    let report = pipeline.run().await;

    let report_dir = config.report_dir();
    std::fs::create_dir_all(report_dir)?;
    let timestamp = chrono::Local::now().format("%d%m%Y_%H%M");
    let report_path = format!("{}/etl_result_{}.json", report_dir, timestamp);
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;
    tracing::info!("📁 Result report written to {}", report_path);

    match report.status {
        RunStatus::Success => {
            tracing::info!(
                "✅ ETL completed successfully in {:.2} seconds",
                report.total_duration_seconds
            );
        }
        RunStatus::PartialSuccess => {
            tracing::warn!("🔶 ETL completed with partial success");
        }
        RunStatus::Failed => {
            tracing::error!(
                "❌ ETL failed: {}",
                report.error.as_deref().unwrap_or("Unknown error")
            );
            std::process::exit(1);
        }
    }

    Ok(())
}
