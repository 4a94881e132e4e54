use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::analytics::{Dashboard, DateRange};
use crate::config::AppConfig;
use crate::db::{DbPool, OrmConn};

/// Version of the orders collection: row count plus the newest update
/// timestamp. Cheap to read and changes on every order write, so it keys the
/// materialized dashboard cache.
pub type SnapshotVersion = (i64, Option<DateTime<Utc>>);

pub type AnalyticsCache = Arc<RwLock<HashMap<DateRange, (SnapshotVersion, Dashboard)>>>;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: AppConfig,
    pub analytics: AnalyticsCache,
}

impl AppState {
    pub fn new(pool: DbPool, orm: OrmConn, config: AppConfig) -> Self {
        Self {
            pool,
            orm,
            config,
            analytics: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}
