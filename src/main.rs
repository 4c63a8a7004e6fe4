//! FoodLens
//!
//! An MCP server for food lookup, nutrition analysis, and meal logging.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use foodlens::build_info;
use foodlens::config::Config;
use foodlens::db::{self, Database};
use foodlens::mcp::FoodLensService;
use foodlens::models::AnalysisCount;
use foodlens::quota::{AnalysisQuota, SqliteAnalysisCounter};
use foodlens::search::HttpFoodSource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("foodlens=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::log_startup_banner();

    let config = Config::from_env()?;
    tracing::info!(
        database = %config.database_path.display(),
        api = %config.api_base_url,
        daily_analysis_limit = config.daily_analysis_limit,
        "loaded configuration"
    );

    // Ensure data directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        db::run_migrations(conn)?;
        let version = db::get_schema_version(conn)?;
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let pruned = AnalysisCount::prune_before(conn, &today)?;
        tracing::info!(version, pruned, "database ready");
        Ok(())
    })?;

    let food_source = Arc::new(HttpFoodSource::new(&config)?);
    let quota = AnalysisQuota::new(
        Box::new(SqliteAnalysisCounter::new(database.clone())),
        config.daily_analysis_limit,
    );

    let service = FoodLensService::new(&config, database, food_source, quota);

    tracing::info!("starting MCP server on stdio");
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
