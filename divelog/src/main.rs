use std::time::Duration;

use clap::Parser;
use divelog::{
    Config,
    config::{Args, Command},
    db::{
        self,
        handlers::{Divers, Repository},
        models::divers::DiverFilter,
    },
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(&args)?;

    // If --validate flag is set, exit successfully after config validation
    if args.validate {
        println!("Configuration is valid.");
        return Ok(());
    }

    telemetry::init_telemetry(&config.log_filter)?;
    tracing::debug!("{:?}", args);

    let pool = db::connect(
        &config.database,
        Duration::from_millis(config.slow_statement_threshold_ms),
    )
    .await?;
    divelog::migrator().run(&pool).await?;

    let mut conn = pool.acquire().await?;
    let mut divers = Divers::new(&mut conn);

    match args.command.unwrap_or(Command::Migrate) {
        Command::Migrate => {
            tracing::info!("Migrations applied");
        }
        Command::Divers {
            dive_group,
            safety_sheet,
            latest,
        } => {
            let filter = match (dive_group, safety_sheet, latest) {
                (Some(id), _, _) => DiverFilter::DiveGroup(id),
                (_, Some(id), _) => DiverFilter::SafetySheet(id),
                (_, _, Some(count)) => DiverFilter::Latest(count),
                _ => DiverFilter::All,
            };
            let found = divers.list(&filter).await?;
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
        Command::Diver { id } => match divers.get_by_id(id).await? {
            Some(diver) => println!("{}", serde_json::to_string_pretty(&diver)?),
            None => anyhow::bail!("Diver {id} not found"),
        },
        Command::Delete { id } => {
            if !divers.delete(id).await? {
                anyhow::bail!("Diver {id} not found");
            }
            tracing::info!(diver_id = id, "Deleted diver");
        }
    }

    Ok(())
}
