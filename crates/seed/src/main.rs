use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use revdash_seed::{SeedOptions, SeedSummary};

#[derive(Debug, Parser)]
#[command(name = "revdash-seed")]
#[command(about = "Fill the revenue dashboard database with demo data", long_about = None)]
struct Args {
    /// Postgres connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Truncate all dashboard tables before seeding
    #[arg(long)]
    reset: bool,

    /// Seed for the random generator, for reproducible data
    #[arg(long)]
    rng_seed: Option<u64>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "revdash_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match seed(&args).await {
        Ok(summary) => println!("{summary}"),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

async fn seed(args: &Args) -> anyhow::Result<SeedSummary> {
    let pool = revdash_db::create_pool(&args.database_url, 2).await?;
    revdash_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let options = SeedOptions {
        reset: args.reset,
        rng_seed: args.rng_seed,
    };
    let summary = revdash_seed::run(&pool, &options).await?;
    pool.close().await;
    Ok(summary)
}
