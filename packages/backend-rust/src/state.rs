use std::sync::Arc;

use sqlx::SqlitePool;

use crate::clock::{Clock, SystemClock};

#[derive(Clone)]
pub struct AppState {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}
