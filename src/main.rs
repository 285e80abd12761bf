use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use user_etl::stages::{
    ExtractionStage, PersistenceStage, ReadinessPoller, TransformationStage, ValidationStage,
};
use user_etl::utils::{logger, validation::Validate};
use user_etl::{ApiSource, CliConfig, PipelineRunner, SqliteUserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting user-etl");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // Table bootstrap runs at open, once, before the chain.
    let store = Arc::new(SqliteUserStore::open(Path::new(&config.database_path))?);
    let source = ApiSource::new(config.api_endpoint.clone());
    let artifact_path = PathBuf::from(&config.artifact_path);

    let mut runner = PipelineRunner::new();
    runner.add_stage(Box::new(ReadinessPoller::new(
        source.clone(),
        Duration::from_secs(config.poll_interval_secs),
        Duration::from_secs(config.poll_timeout_secs),
    )));
    runner.add_stage(Box::new(ExtractionStage::new(source)));
    runner.add_stage(Box::new(TransformationStage::new(artifact_path.clone())));
    runner.add_stage(Box::new(PersistenceStage::new(store.clone(), artifact_path)));
    runner.add_stage(Box::new(ValidationStage::new(store)));

    match runner.execute_all().await {
        Ok(report) => {
            tracing::info!("✅ Pipeline run completed successfully!");
            println!("✅ Pipeline run completed successfully!");
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Err(e) => {
            tracing::error!("❌ Pipeline run failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
