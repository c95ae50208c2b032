//! Transactional persistence of parent/children aggregates
//!
//! Every aggregate registration goes through [`persist_aggregate`]: one
//! REPEATABLE READ transaction, parent first, children stamped with the
//! parent id and bulk-inserted, commit. Any failure rolls back so no partial
//! aggregate survives.

use crate::db;
use crate::error::ApiError;
use async_trait::async_trait;
use metrics::counter;
use sqlx::{PgConnection, PgPool};
use tracing::{error, info, warn};

/// A parent record plus its dependent children, written as one unit
#[async_trait]
pub trait Aggregate: Send {
    /// Label used in logs and metrics
    const NAME: &'static str;

    /// Number of child rows this aggregate writes
    fn child_count(&self) -> usize;

    /// Write the parent and children on an open transaction, returning the
    /// parent id
    async fn write(self, conn: &mut PgConnection) -> Result<i64, sqlx::Error>;
}

/// Persist an aggregate atomically
///
/// Write failures are rolled back and returned as [`ApiError::Transaction`]
/// for constraint violations or [`ApiError::Database`] otherwise. A failed
/// rollback is reported as [`ApiError::RollbackFailed`].
pub async fn persist_aggregate<A: Aggregate>(pool: &PgPool, aggregate: A) -> Result<i64, ApiError> {
    let children = aggregate.child_count();
    let mut tx = db::begin_repeatable_read(pool).await?;

    match aggregate.write(&mut *tx).await {
        Ok(parent_id) => {
            tx.commit().await.map_err(|e| {
                counter!("aggregate_rollbacks_total", "aggregate" => A::NAME).increment(1);
                warn!(aggregate = A::NAME, error = %e, "Commit failed");
                ApiError::from_write(e)
            })?;

            counter!("aggregate_registrations_total", "aggregate" => A::NAME).increment(1);
            info!(aggregate = A::NAME, parent_id, children, "Aggregate persisted");
            Ok(parent_id)
        }
        Err(write_err) => {
            counter!("aggregate_rollbacks_total", "aggregate" => A::NAME).increment(1);

            if let Err(rollback_err) = tx.rollback().await {
                error!(
                    aggregate = A::NAME,
                    error = %write_err,
                    rollback_error = %rollback_err,
                    "Rollback failed"
                );
                return Err(ApiError::RollbackFailed {
                    original: write_err.to_string(),
                    rollback: rollback_err.to_string(),
                });
            }

            warn!(aggregate = A::NAME, error = %write_err, "Aggregate rolled back");
            Err(ApiError::from_write(write_err))
        }
    }
}
