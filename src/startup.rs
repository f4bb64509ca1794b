use std::sync::Arc;

use crate::{
    config::Config,
    error::Error,
    job::store::InMemoryJobStore,
    model::app::AppState,
    push::PushGateway,
};

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Assemble the shared application state: database, push gateway and the
/// process-lifetime job store.
pub async fn build_app_state(config: &Config) -> Result<AppState, Error> {
    let db = connect_to_database(config).await?;

    Ok(AppState {
        db,
        push: PushGateway::new(),
        jobs: Arc::new(InMemoryJobStore::new()),
        job_stale_after_secs: config.job_stale_after_secs,
    })
}
