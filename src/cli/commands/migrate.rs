use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde_json::json;
use tracing::info;

use super::serve::load_seed;
use crate::cli::{utils::output_success, OutputFormat};
use crate::config::config;
use crate::database::{migrate, DatabaseManager, PgStore};

#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[arg(long, value_name = "FILE", help = "JSON array of courses to upsert after migrating")]
    pub seed: Option<PathBuf>,
}

pub async fn handle(args: MigrateArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config().database)
        .await
        .context("connecting to PostgreSQL")?;
    migrate(&pool).await.context("applying schema")?;

    let mut seeded = 0;
    if let Some(path) = &args.seed {
        let store = PgStore::new(pool.clone());
        for course in load_seed(path)? {
            store.put_course(&course).await.with_context(|| format!("seeding course {}", course.id))?;
            seeded += 1;
        }
        info!("Seeded {} courses from {}", seeded, path.display());
    }

    output_success(
        output_format,
        "Schema up to date",
        Some(json!({ "seededCourses": seeded })),
        None,
    )
}
