use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use wsc_cli::{execute_command, logging, Args, Command, CommandContext, Config};
use wsc_registry::db::{backup_database, create_pool, run_migrations};
use wsc_registry::ClusterRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_subscriber(args.debug)?;

    // Load configuration
    let config =
        Config::load(args.config.as_deref())?.with_overrides(args.db, args.application_cluster);
    debug!(
        "Configuration loaded: db_path={}, application_cluster={:?}",
        config.db_path.display(),
        config.application_cluster
    );

    let db_path = &config.db_path;

    if let Command::Migrate = args.command {
        if db_path.exists() {
            let backup_path = backup_database(db_path)?;
            info!("Database backed up to: {}", backup_path.display());
        }
    }

    // Create pool and run migrations
    let pool = create_pool(db_path, &config.pool_settings()).await?;
    run_migrations(&pool).await?;

    if let Command::Migrate = args.command {
        println!("migrations applied to {}", db_path.display());
        pool.close().await;
        return Ok(());
    }

    let registry = ClusterRegistry::new(pool.clone());
    let ctx = CommandContext {
        application_cluster: config.application_cluster.clone(),
        output: args.output,
    };

    let mut stdout = std::io::stdout().lock();
    let result = execute_command(&registry, args.command, &ctx, &mut stdout).await;

    pool.close().await;
    result
}
