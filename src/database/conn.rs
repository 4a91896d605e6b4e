use deadpool_postgres::{Object, Pool, PoolError};
use tracing::error;

use crate::utils::response::AppError;

#[derive(Debug)]
pub enum ResultError {
    Pool(deadpool_postgres::PoolError),
    Query(tokio_postgres::Error),
}

// Database failures are logged with their cause and leave the
// service as opaque 500s.
impl From<ResultError> for AppError {
    fn from(err: ResultError) -> Self {
        error!("Database error: {:?}", err);
        AppError::Internal("INTERNAL_SERVER_ERROR".to_string())
    }
}

impl From<deadpool_postgres::PoolError> for AppError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        error!("Pool error: {:?}", err);
        AppError::Internal("INTERNAL_SERVER_ERROR".to_string())
    }
}

impl From<tokio_postgres::Error> for AppError {
    fn from(err: tokio_postgres::Error) -> Self {
        error!("Postgres error: {:?}", err);
        AppError::Internal("INTERNAL_SERVER_ERROR".to_string())
    }
}

impl From<deadpool_postgres::PoolError> for ResultError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err)
    }
}

impl From<tokio_postgres::Error> for ResultError {
    fn from(err: tokio_postgres::Error) -> Self {
        Self::Query(err)
    }
}

/// Connection checked out from the pool on first use.
/// Every request gets its own; nothing is shared across requests.
pub struct LazyConn {
    pool: Pool,
    client: Option<Object>,
}

impl LazyConn {
    pub fn new(pool: Pool) -> Self {
        Self { pool, client: None }
    }

    pub async fn get_client(&mut self) -> Result<&mut Object, PoolError> {
        if self.client.is_none() {
            let conn = self.pool.get().await?;
            self.client = Some(conn);
        }
        Ok(self.client.as_mut().unwrap())
    }
}
