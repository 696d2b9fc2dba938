use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::error::ApiError;

/// One request-scoped persistence session: a single transaction acquired at
/// the start of handler work and committed exactly once on the success path.
/// On every other exit path the `Session` is dropped and sqlx rolls the
/// transaction back, so no request can leave a partial commit behind.
pub struct Session {
    tx: Transaction<'static, Postgres>,
}

impl Session {
    /// Acquire a connection from the pool and open a transaction. Acquisition
    /// failure (pool exhausted, backend down) is fatal for this request only.
    pub async fn begin(pool: &PgPool) -> Result<Self, ApiError> {
        let tx = pool.begin().await.map_err(|e| {
            tracing::error!("failed to open database session: {}", e);
            ApiError::internal(format!("could not open database session: {}", e))
        })?;
        Ok(Self { tx })
    }

    /// The connection for store calls within this session.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    /// Commit the transaction. Integrity violations raised at commit time
    /// translate to 409 via `ApiError::from`.
    pub async fn commit(self) -> Result<(), ApiError> {
        self.tx.commit().await.map_err(ApiError::from)
    }
}
