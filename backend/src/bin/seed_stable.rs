//! Load the demo stable data into PostgreSQL.
//!
//! ```text
//! seed-stable --database-url postgres://localhost/stable
//! ```

use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use stable_backend::example_data::{ExampleDataSeeder, SeedOutcome};
use stable_backend::outbound::auth::Argon2Hasher;
use stable_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

#[derive(Debug, Parser)]
#[command(name = "seed-stable", about = "Load the demo stable data")]
struct Args {
    /// PostgreSQL connection URL.
    #[arg(long, env = "STABLE_DATABASE_URL")]
    database_url: String,
    /// Skip applying pending migrations first.
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    if !args.skip_migrations {
        run_pending_migrations(args.database_url.clone())
            .await
            .wrap_err("applying migrations")?;
    }
    let pool = DbPool::new(PoolConfig::new(&args.database_url))
        .await
        .wrap_err("connecting to PostgreSQL")?;
    let seeder = ExampleDataSeeder::for_postgres(&pool, Arc::new(Argon2Hasher));
    match seeder
        .seed(Utc::now().date_naive())
        .await
        .wrap_err("seeding stable data")?
    {
        SeedOutcome::Applied(report) => info!(?report, "seed data imported"),
        SeedOutcome::AlreadySeeded => info!("seed data already present; nothing to do"),
    }
    Ok(())
}
