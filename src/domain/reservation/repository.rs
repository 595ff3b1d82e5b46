//! Reservation repository interfaces
//!
//! Overlap queries live on [`ReservationReader`] so the same code can run
//! against the plain repository (advisory listing) and inside a
//! [`BookingTransaction`] (authoritative re-check before commit).

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::model::{NewReservation, Reservation, ReservationStatus};
use crate::domain::{DomainResult, Table, TimeSlot};

#[async_trait]
pub trait ReservationReader: Send + Sync {
    /// Confirmed reservations on any of `table_ids` overlapping `slot`
    async fn find_overlapping(
        &self,
        table_ids: &[i32],
        slot: &TimeSlot,
    ) -> DomainResult<Vec<Reservation>>;

    /// Number of confirmed reservations on `table_id` overlapping `slot`
    async fn count_overlapping(&self, table_id: i32, slot: &TimeSlot) -> DomainResult<u64>;
}

/// Atomic read-then-write unit against the reservation store.
///
/// Holds the restaurant's write lock from [`ReservationRepository::begin`]
/// until commit or drop, so every read made through it sees the state the
/// insert will be checked against. Dropping the transaction without calling
/// [`commit`](Self::commit) discards every write made through it.
#[async_trait]
pub trait BookingTransaction: ReservationReader {
    /// The locked restaurant's tables, read inside the transaction
    async fn tables(&self) -> DomainResult<Vec<Table>>;

    /// Insert a confirmed reservation. Fails with `CapacityConflict` if the
    /// table already holds an overlapping confirmed reservation.
    async fn insert(&mut self, reservation: NewReservation) -> DomainResult<Reservation>;

    async fn commit(self: Box<Self>) -> DomainResult<()>;
}

#[async_trait]
pub trait ReservationRepository: ReservationReader {
    /// Find reservation by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// Reservations of a restaurant starting in `[from, to)`, any status
    async fn find_for_restaurant(
        &self,
        restaurant_id: i32,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> DomainResult<Vec<Reservation>>;

    /// Move `id` from `from` to `to` only if it is still in `from`.
    ///
    /// Returns `false` when the reservation is unknown or its status has
    /// already moved on; nothing is written in that case.
    async fn transition_status(
        &self,
        id: i32,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> DomainResult<bool>;

    /// Open a booking transaction holding `restaurant_id`'s write lock.
    ///
    /// Contention with another writer surfaces as `CapacityConflict`.
    async fn begin(&self, restaurant_id: i32) -> DomainResult<Box<dyn BookingTransaction>>;
}
