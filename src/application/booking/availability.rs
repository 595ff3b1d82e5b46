//! Availability calculator
//!
//! Walks each service period on the slot grid and keeps the start times
//! where aggregate free capacity still covers the party. The result is
//! advisory: the booking guard re-checks the chosen slot atomically.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, info};

use super::capacity::{booked_capacity, CapacityModel};
use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, ReservationDefaults, ServicePeriod, TimeSlot,
};

pub const NOT_CONFIGURED_MESSAGE: &str = "This restaurant is not configured for reservations.";
pub const INSUFFICIENT_CAPACITY_MESSAGE: &str =
    "The restaurant does not have enough total capacity for a party of this size.";

/// Slots that can take the requested party
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableSlots {
    /// Distinct start times, ascending
    pub slots: Vec<NaiveTime>,
    /// Why the list is empty, when that is known up front
    pub message: Option<String>,
}

impl AvailableSlots {
    fn empty_because(message: &str) -> Self {
        Self {
            slots: Vec::new(),
            message: Some(message.to_string()),
        }
    }
}

/// Candidate start times of one period on `date`: from opening, every
/// `interval`, while the booking still ends by closing time.
pub fn candidate_starts(
    period: &ServicePeriod,
    date: NaiveDate,
    duration: Duration,
    interval: Duration,
) -> Vec<NaiveDateTime> {
    let mut starts = Vec::new();
    if interval <= Duration::zero() {
        return starts;
    }
    let last_booking_time = period.closes_on(date) - duration;
    let mut clock = period.opens_on(date);
    while clock <= last_booking_time {
        starts.push(clock);
        clock += interval;
    }
    starts
}

pub struct AvailabilityCalculator {
    repos: Arc<dyn RepositoryProvider>,
    capacity: CapacityModel,
}

impl AvailabilityCalculator {
    pub fn new(repos: Arc<dyn RepositoryProvider>, defaults: ReservationDefaults) -> Self {
        Self {
            capacity: CapacityModel::new(repos.clone(), defaults),
            repos,
        }
    }

    /// `listAvailableSlots(restaurantId, date, partySize)`; read-only.
    pub async fn list_available_slots(
        &self,
        restaurant_id: i32,
        date: NaiveDate,
        party_size: i32,
    ) -> DomainResult<AvailableSlots> {
        if party_size <= 0 {
            return Err(DomainError::validation(
                "Invalid party_size. Must be a positive integer.",
            ));
        }
        let party_size = party_size as u32;

        metrics::counter!("availability_queries_total").increment(1);

        let snapshot = self.capacity.load(restaurant_id).await?;
        if !snapshot.is_configured_for_reservations() {
            return Ok(AvailableSlots::empty_because(NOT_CONFIGURED_MESSAGE));
        }

        let total_capacity = snapshot.total_capacity();
        if total_capacity < party_size {
            debug!(restaurant_id, total_capacity, party_size, "Party exceeds total capacity");
            return Ok(AvailableSlots::empty_because(INSUFFICIENT_CAPACITY_MESSAGE));
        }

        let table_ids = snapshot.table_ids();
        let reader = self.repos.reservations();
        let mut available = BTreeSet::new();

        for period in &snapshot.service_periods {
            for start in candidate_starts(period, date, snapshot.duration, snapshot.slot_interval) {
                let slot_time = start.time();
                if available.contains(&slot_time) {
                    continue;
                }
                let slot = TimeSlot::from_bounds(start, start + snapshot.duration);
                let booked = booked_capacity(reader, &table_ids, &slot).await?;
                if total_capacity.saturating_sub(booked) >= party_size {
                    available.insert(slot_time);
                }
            }
        }

        info!(
            restaurant_id,
            %date,
            party_size,
            slots = available.len(),
            "Availability computed"
        );

        Ok(AvailableSlots {
            slots: available.into_iter().collect(),
            message: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        BookingTransaction, CustomerDetails, NewReservation, NewRestaurant, NewServicePeriod,
        NewTable, ReservationRepository, ReservationStatus, RestaurantRepository, TableStatus,
    };
    use crate::infrastructure::storage::InMemoryStore;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 24).unwrap()
    }

    fn period(name: &str, open: NaiveTime, close: NaiveTime) -> NewServicePeriod {
        NewServicePeriod {
            name: name.into(),
            opening_time: open,
            closing_time: close,
        }
    }

    fn table(capacity: u32) -> NewTable {
        NewTable {
            name: format!("T{}", capacity),
            capacity,
            status: TableStatus::Available,
        }
    }

    async fn restaurant(
        store: &InMemoryStore,
        duration: u32,
        interval: u32,
        periods: Vec<NewServicePeriod>,
        tables: Vec<NewTable>,
    ) -> i32 {
        store
            .create(NewRestaurant {
                name: "Availability".into(),
                avg_reservation_duration_minutes: duration,
                slot_interval_minutes: interval,
                service_periods: periods,
                tables,
            })
            .await
            .unwrap()
            .id
    }

    async fn book(store: &InMemoryStore, table_id: i32, start: NaiveTime, guests: u32) -> i32 {
        let mut tx = store.begin(1).await.unwrap();
        let r = tx
            .insert(NewReservation {
                restaurant_id: 1,
                table_id,
                customer: CustomerDetails {
                    name: "Guest".into(),
                    email: "guest@example.com".into(),
                    phone: "1".into(),
                },
                number_of_guests: guests,
                slot: TimeSlot::starting_at(day(), start, Duration::minutes(60)),
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();
        r.id
    }

    fn calculator(store: &InMemoryStore) -> AvailabilityCalculator {
        AvailabilityCalculator::new(Arc::new(store.clone()), ReservationDefaults::default())
    }

    fn times(slots: &AvailableSlots) -> Vec<String> {
        slots.slots.iter().map(|t| t.format("%H:%M").to_string()).collect()
    }

    #[test]
    fn candidate_starts_include_last_legal_start() {
        let p = ServicePeriod {
            id: 1,
            restaurant_id: 1,
            name: "Lunch".into(),
            opening_time: hm(12, 0),
            closing_time: hm(14, 0),
        };
        let starts = candidate_starts(&p, day(), Duration::minutes(60), Duration::minutes(30));
        let starts: Vec<NaiveTime> = starts.into_iter().map(|s| s.time()).collect();
        assert_eq!(starts, vec![hm(12, 0), hm(12, 30), hm(13, 0)]);
    }

    #[test]
    fn duration_longer_than_period_yields_no_slots() {
        let p = ServicePeriod {
            id: 1,
            restaurant_id: 1,
            name: "Short".into(),
            opening_time: hm(12, 0),
            closing_time: hm(12, 45),
        };
        assert!(candidate_starts(&p, day(), Duration::minutes(60), Duration::minutes(15)).is_empty());
    }

    #[tokio::test]
    async fn lunch_grid_then_booking_blocks_overlapping_starts() {
        let store = InMemoryStore::new();
        let id = restaurant(&store, 60, 30, vec![period("Lunch", hm(12, 0), hm(14, 0))], vec![table(4)]).await;
        let calc = calculator(&store);

        let before = calc.list_available_slots(id, day(), 2).await.unwrap();
        assert_eq!(times(&before), vec!["12:00", "12:30", "13:00"]);
        assert_eq!(before.message, None);

        book(&store, 1, hm(12, 0), 2).await;

        let after = calc.list_available_slots(id, day(), 4).await.unwrap();
        // [12:00,13:00) is busy; 13:00 starts exactly when it ends
        assert_eq!(times(&after), vec!["13:00"]);
    }

    #[tokio::test]
    async fn no_service_periods_means_not_configured() {
        let store = InMemoryStore::new();
        let id = restaurant(&store, 60, 30, vec![], vec![table(4)]).await;
        let result = calculator(&store).list_available_slots(id, day(), 2).await.unwrap();
        assert!(result.slots.is_empty());
        assert_eq!(result.message.as_deref(), Some(NOT_CONFIGURED_MESSAGE));
    }

    #[tokio::test]
    async fn party_larger_than_all_tables_is_reported() {
        let store = InMemoryStore::new();
        let id = restaurant(
            &store,
            60,
            30,
            vec![period("Lunch", hm(12, 0), hm(14, 0))],
            vec![table(2), table(2)],
        )
        .await;
        let result = calculator(&store).list_available_slots(id, day(), 5).await.unwrap();
        assert!(result.slots.is_empty());
        assert_eq!(result.message.as_deref(), Some(INSUFFICIENT_CAPACITY_MESSAGE));
    }

    #[tokio::test]
    async fn non_positive_party_is_rejected_before_lookup() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);
        let calc = calculator(&store);
        for size in [0, -3] {
            assert!(matches!(
                calc.list_available_slots(1, day(), size).await,
                Err(DomainError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn unknown_restaurant_is_not_found() {
        let store = InMemoryStore::new();
        assert!(matches!(
            calculator(&store).list_available_slots(9, day(), 2).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn overlapping_periods_are_deduplicated() {
        let store = InMemoryStore::new();
        let id = restaurant(
            &store,
            60,
            30,
            vec![
                period("Lunch", hm(12, 0), hm(14, 0)),
                period("Late lunch", hm(13, 0), hm(15, 0)),
            ],
            vec![table(4)],
        )
        .await;
        let result = calculator(&store).list_available_slots(id, day(), 2).await.unwrap();
        assert_eq!(times(&result), vec!["12:00", "12:30", "13:00", "13:30", "14:00"]);
    }

    #[tokio::test]
    async fn every_listed_slot_has_enough_free_capacity() {
        let store = InMemoryStore::new();
        let id = restaurant(
            &store,
            90,
            15,
            vec![period("Dinner", hm(18, 0), hm(22, 0))],
            vec![table(2), table(4), table(6)],
        )
        .await;
        book(&store, 3, hm(19, 0), 6).await;
        book(&store, 2, hm(19, 30), 3).await;

        let snapshot = CapacityModel::new(Arc::new(store.clone()), ReservationDefaults::default())
            .load(id)
            .await
            .unwrap();
        let party = 4;
        let result = calculator(&store).list_available_slots(id, day(), party).await.unwrap();
        assert!(!result.slots.is_empty());
        for time in &result.slots {
            let slot = snapshot.slot_at(day(), *time);
            let booked = booked_capacity(&store, &snapshot.table_ids(), &slot).await.unwrap();
            assert!(snapshot.total_capacity() - booked >= party as u32);
        }
    }

    #[tokio::test]
    async fn listing_is_idempotent_and_monotone() {
        let store = InMemoryStore::new();
        let id = restaurant(
            &store,
            60,
            30,
            vec![period("Dinner", hm(18, 0), hm(22, 0))],
            vec![table(2), table(4)],
        )
        .await;
        let calc = calculator(&store);

        let first = calc.list_available_slots(id, day(), 3).await.unwrap();
        let second = calc.list_available_slots(id, day(), 3).await.unwrap();
        assert_eq!(first, second);

        book(&store, 2, hm(19, 0), 4).await;
        let third = calc.list_available_slots(id, day(), 3).await.unwrap();
        assert!(third.slots.len() < first.slots.len());
        assert!(third.slots.iter().all(|s| first.slots.contains(s)));
    }

    #[tokio::test]
    async fn cancelled_reservation_frees_its_slots() {
        let store = InMemoryStore::new();
        let id = restaurant(&store, 60, 60, vec![period("Lunch", hm(12, 0), hm(14, 0))], vec![table(2)]).await;
        let calc = calculator(&store);
        let reservation_id = book(&store, 1, hm(12, 0), 2).await;
        assert_eq!(times(&calc.list_available_slots(id, day(), 2).await.unwrap()), vec!["13:00"]);

        store
            .transition_status(
                reservation_id,
                ReservationStatus::Confirmed,
                ReservationStatus::Cancelled,
            )
            .await
            .unwrap();
        assert_eq!(
            times(&calc.list_available_slots(id, day(), 2).await.unwrap()),
            vec!["12:00", "13:00"]
        );
    }

    #[tokio::test]
    async fn store_failure_aborts_listing() {
        let store = InMemoryStore::new();
        let id = restaurant(&store, 60, 30, vec![period("Lunch", hm(12, 0), hm(14, 0))], vec![table(4)]).await;
        store.set_unavailable(true);
        assert!(matches!(
            calculator(&store).list_available_slots(id, day(), 2).await,
            Err(DomainError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn other_days_do_not_affect_listing() {
        let store = InMemoryStore::new();
        let id = restaurant(&store, 60, 60, vec![period("Lunch", hm(12, 0), hm(14, 0))], vec![table(2)]).await;
        book(&store, 1, hm(12, 0), 2).await;
        let next_day = day().succ_opt().unwrap();
        let result = calculator(&store).list_available_slots(id, next_day, 2).await.unwrap();
        assert_eq!(times(&result), vec!["12:00", "13:00"]);
    }
}
