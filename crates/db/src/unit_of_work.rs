//! Scoped transactions.
//!
//! A [`UnitOfWork`] owns one database transaction for the duration of a
//! single aggregate write. Work runs against [`UnitOfWork::conn`] and the
//! outcome is handed to [`UnitOfWork::finish`], which commits on `Ok` and
//! rolls back on `Err`. Dropping an unfinished unit (early return, panic,
//! cancelled future) rolls back as well, and in every case the connection
//! goes back to the pool.

use std::fmt::Display;

use sqlx::{PgConnection, PgPool, Postgres, Transaction};

/// One open transaction. Not nestable.
pub struct UnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl UnitOfWork {
    /// Acquire a connection from the pool and open a transaction on it.
    pub async fn begin(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let tx = pool.begin().await?;
        Ok(Self { tx })
    }

    /// Connection bound to this transaction.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    /// Commit if `outcome` is `Ok`, roll back otherwise.
    ///
    /// On failure the original error is returned unchanged; a rollback that
    /// itself fails is logged and does not replace it.
    pub async fn finish<T, E>(self, outcome: Result<T, E>) -> Result<T, E>
    where
        E: From<sqlx::Error> + Display,
    {
        match outcome {
            Ok(value) => {
                self.tx.commit().await?;
                tracing::debug!("Transaction committed");
                Ok(value)
            }
            Err(err) => {
                match self.tx.rollback().await {
                    Ok(()) => tracing::debug!(error = %err, "Transaction rolled back"),
                    Err(rollback_err) => tracing::error!(
                        error = %err,
                        rollback_error = %rollback_err,
                        "Transaction rollback failed"
                    ),
                }
                Err(err)
            }
        }
    }
}
