//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod repository_provider;
pub mod reservation_repository;
pub mod restaurant_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::{DbErr, SqlErr};
use tracing::warn;

use crate::domain::DomainError;
use crate::shared::errors::InfraError;

/// Unique-key clashes can only come from two writers booking the same row.
pub(crate) fn db_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::CapacityConflict,
        _ => InfraError::from(e).into(),
    }
}

/// Lock contention on the booking path means another writer holds the
/// restaurant; the caller retries like any other conflict.
pub(crate) fn booking_err(e: DbErr) -> DomainError {
    if is_lock_contention(&e) {
        warn!(error = %e, "Booking lost the restaurant write lock");
        return DomainError::CapacityConflict;
    }
    db_err(e)
}

fn is_lock_contention(e: &DbErr) -> bool {
    let message = e.to_string().to_lowercase();
    [
        "database is locked",
        "database table is locked",
        "could not serialize access",
        "deadlock detected",
        "lock timeout",
    ]
    .iter()
    .any(|needle| message.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_sqlite_is_a_capacity_conflict() {
        let e = DbErr::Custom("error returned from database: (code: 5) database is locked".into());
        assert!(matches!(booking_err(e), DomainError::CapacityConflict));
    }

    #[test]
    fn postgres_serialization_failure_is_a_capacity_conflict() {
        let e = DbErr::Custom("could not serialize access due to concurrent update".into());
        assert!(matches!(booking_err(e), DomainError::CapacityConflict));
    }

    #[test]
    fn other_booking_failures_stay_storage_errors() {
        let e = DbErr::Custom("disk I/O error".into());
        assert!(matches!(booking_err(e), DomainError::Storage(msg) if msg.contains("disk I/O")));
    }

    #[test]
    fn lock_contention_outside_bookings_is_storage() {
        let e = DbErr::Custom("database is locked".into());
        assert!(matches!(db_err(e), DomainError::Storage(_)));
    }
}
