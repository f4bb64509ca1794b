use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{job::store::JobStore, push::PushGateway};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub push: PushGateway,
    pub jobs: Arc<dyn JobStore>,
    pub job_stale_after_secs: i64,
}
