use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::app::{router, AppState};
use crate::config::{config, StorageBackend};
use crate::database::{DatabaseManager, PgStore};
use crate::models::Course;
use crate::store::{MemoryStore, Stores};

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides PORT/API_PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Use the in-memory store regardless of STORAGE_BACKEND")]
    pub memory: bool,

    #[arg(long, value_name = "FILE", help = "JSON array of courses to load at startup")]
    pub seed: Option<PathBuf>,
}

/// Reads a JSON array of courses in wire format.
pub fn load_seed(path: &Path) -> anyhow::Result<Vec<Course>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let courses: Vec<Course> =
        serde_json::from_str(&raw).with_context(|| format!("parsing courses in {}", path.display()))?;
    Ok(courses)
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let mut app_config = config().clone();
    if args.memory {
        app_config.storage.backend = StorageBackend::Memory;
    }
    let seed = match &args.seed {
        Some(path) => load_seed(path)?,
        None => Vec::new(),
    };

    let stores = match app_config.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            Stores::shared(Arc::new(MemoryStore::with_courses(seed)))
        }
        StorageBackend::Postgres => {
            let pool = DatabaseManager::connect(&app_config.database)
                .await
                .context("connecting to PostgreSQL")?;
            let store = Arc::new(PgStore::new(pool));
            for course in &seed {
                store.put_course(course).await.with_context(|| format!("seeding course {}", course.id))?;
            }
            Stores::shared(store)
        }
    };

    let state = AppState::new(stores, &app_config);
    let app = router(state, &app_config);

    let port = args.port.unwrap_or(app_config.api.port);
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding port {}", port))?;
    info!(
        "Listening on http://{} ({:?} environment, {:?} storage)",
        listener.local_addr()?,
        app_config.environment,
        app_config.storage.backend
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_file_uses_wire_names() {
        let dir = std::env::temp_dir().join(format!("course-api-seed-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("courses.json");
        std::fs::write(
            &path,
            r#"[{"_id":"c1","instructorId":"i1","instructorName":"Ada","title":"Intro","pricing":0,"isPublised":true}]"#,
        )
        .unwrap();

        let courses = load_seed(&path).unwrap();
        assert_eq!(courses.len(), 1);
        assert!(courses[0].is_free());
        assert!(courses[0].is_published);
        assert!(courses[0].students.is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
