//! Booking transaction guard
//!
//! `createReservation`: re-validates aggregate capacity for the exact slot,
//! picks a table and writes the reservation inside one store transaction.
//! The transaction holds the restaurant's store-level write lock, and
//! bookings for the same restaurant are also serialised in-process, so two
//! requests racing for the last seats are decided one after the other and
//! the loser sees the winner's committed row. Table statuses are re-read
//! under that lock; the snapshot loaded beforehand only gates opening hours.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::assignment::TableAssigner;
use super::availability::NOT_CONFIGURED_MESSAGE;
use super::capacity::{booked_capacity, CapacityModel};
use crate::domain::{
    CustomerDetails, DomainError, DomainResult, NewReservation, RepositoryProvider, Reservation,
    ReservationDefaults,
};

/// Validated input of `createReservation`
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub restaurant_id: i32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: i32,
    pub customer: CustomerDetails,
}

impl BookingRequest {
    fn validate(&self) -> DomainResult<u32> {
        if self.party_size <= 0 {
            return Err(DomainError::validation(
                "Invalid party_size. Must be a positive integer.",
            ));
        }
        self.customer.validate()?;
        Ok(self.party_size as u32)
    }
}

pub struct BookingGuard {
    repos: Arc<dyn RepositoryProvider>,
    capacity: CapacityModel,
    assigner: TableAssigner,
    locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl BookingGuard {
    pub fn new(repos: Arc<dyn RepositoryProvider>, defaults: ReservationDefaults) -> Self {
        Self {
            capacity: CapacityModel::new(repos.clone(), defaults),
            assigner: TableAssigner::new(),
            repos,
            locks: DashMap::new(),
        }
    }

    fn restaurant_lock(&self, restaurant_id: i32) -> Arc<Mutex<()>> {
        self.locks.entry(restaurant_id).or_default().clone()
    }

    pub async fn create_reservation(&self, request: BookingRequest) -> DomainResult<Reservation> {
        let party_size = request.validate()?;
        let restaurant_id = request.restaurant_id;

        let mut snapshot = self.capacity.load(restaurant_id).await?;
        if !snapshot.is_configured_for_reservations() {
            return Err(DomainError::validation(NOT_CONFIGURED_MESSAGE));
        }

        let slot = snapshot.slot_at(request.date, request.time);
        if snapshot.period_accommodating(&slot).is_none() {
            return Err(DomainError::validation(
                "The requested time is outside the restaurant's service hours.",
            ));
        }

        let lock = self.restaurant_lock(restaurant_id);
        let _serialised = lock.lock().await;

        let mut tx = match self.repos.reservations().begin(restaurant_id).await {
            Ok(tx) => tx,
            Err(e) => {
                if matches!(e, DomainError::CapacityConflict) {
                    record_conflict("capacity");
                }
                return Err(e);
            }
        };

        snapshot.tables = tx.tables().await?;
        let table_ids = snapshot.table_ids();
        let total_capacity = snapshot.total_capacity();

        let booked = booked_capacity(&*tx, &table_ids, &slot).await?;
        if total_capacity.saturating_sub(booked) < party_size {
            warn!(
                restaurant_id,
                start = %slot.start,
                party_size,
                total_capacity,
                booked,
                "Slot no longer has capacity"
            );
            record_conflict("capacity");
            return Err(DomainError::CapacityConflict);
        }

        let table = match self
            .assigner
            .assign(&*tx, &snapshot.tables, &slot, party_size)
            .await
        {
            Ok(table) => table,
            Err(e) => {
                if matches!(e, DomainError::FragmentationConflict) {
                    warn!(
                        restaurant_id,
                        start = %slot.start,
                        party_size,
                        "No single table can seat the party"
                    );
                    record_conflict("fragmentation");
                }
                return Err(e);
            }
        };

        let reservation = match tx
            .insert(NewReservation {
                restaurant_id,
                table_id: table.id,
                customer: request.customer,
                number_of_guests: party_size,
                slot,
            })
            .await
        {
            Ok(reservation) => reservation,
            Err(e) => {
                if matches!(e, DomainError::CapacityConflict) {
                    record_conflict("capacity");
                }
                return Err(e);
            }
        };
        if let Err(e) = tx.commit().await {
            if matches!(e, DomainError::CapacityConflict) {
                record_conflict("capacity");
            }
            return Err(e);
        }

        metrics::counter!("reservations_created_total").increment(1);
        info!(
            reservation_id = reservation.id,
            restaurant_id,
            table_id = table.id,
            party_size,
            start = %reservation.start_time,
            end = %reservation.end_time,
            "Reservation confirmed"
        );

        Ok(reservation)
    }
}

fn record_conflict(kind: &'static str) {
    metrics::counter!("reservation_conflicts_total", "kind" => kind).increment(1);
}
