//! Capacity model: a restaurant's bookable tables and open hours, loaded
//! once per request, plus the booked-capacity query shared by listing and
//! booking.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::debug;

use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, ReservationDefaults, ReservationReader,
    Restaurant, ServicePeriod, Table, TimeSlot,
};

/// Static view of one restaurant's resources.
#[derive(Debug, Clone)]
pub struct CapacitySnapshot {
    pub restaurant: Restaurant,
    pub service_periods: Vec<ServicePeriod>,
    pub tables: Vec<Table>,
    /// Effective booking length (restaurant setting or default)
    pub duration: Duration,
    /// Effective slot grid (restaurant setting or default)
    pub slot_interval: Duration,
}

impl CapacitySnapshot {
    /// Sum of seats over tables that can currently take bookings.
    /// Saturates instead of wrapping.
    pub fn total_capacity(&self) -> u32 {
        self.tables
            .iter()
            .filter(|t| t.is_bookable())
            .fold(0u32, |seats, t| seats.saturating_add(t.capacity))
    }

    /// Every table of the restaurant, whatever its status.
    pub fn table_ids(&self) -> Vec<i32> {
        self.tables.iter().map(|t| t.id).collect()
    }

    pub fn is_configured_for_reservations(&self) -> bool {
        !self.service_periods.is_empty()
    }

    /// Booking window starting at `time` on `date`.
    pub fn slot_at(&self, date: NaiveDate, time: NaiveTime) -> TimeSlot {
        TimeSlot::starting_at(date, time, self.duration)
    }

    pub fn period_accommodating(&self, slot: &TimeSlot) -> Option<&ServicePeriod> {
        self.service_periods.iter().find(|p| p.accommodates(slot))
    }
}

/// Loads [`CapacitySnapshot`]s from the restaurant repository.
#[derive(Clone)]
pub struct CapacityModel {
    repos: Arc<dyn RepositoryProvider>,
    defaults: ReservationDefaults,
}

impl CapacityModel {
    pub fn new(repos: Arc<dyn RepositoryProvider>, defaults: ReservationDefaults) -> Self {
        Self { repos, defaults }
    }

    pub fn defaults(&self) -> &ReservationDefaults {
        &self.defaults
    }

    /// Fails with `NotFound` for an unknown restaurant and with `Validation`
    /// if any service period does not close after it opens.
    pub async fn load(&self, restaurant_id: i32) -> DomainResult<CapacitySnapshot> {
        let restaurants = self.repos.restaurants();
        let restaurant = restaurants
            .find_by_id(restaurant_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Restaurant", "id", restaurant_id))?;

        let service_periods = restaurants.service_periods(restaurant_id).await?;
        for period in &service_periods {
            period.validate()?;
        }
        let tables = restaurants.tables(restaurant_id).await?;

        let duration = restaurant.reservation_duration(&self.defaults);
        let slot_interval = restaurant.slot_interval(&self.defaults);

        debug!(
            restaurant_id,
            periods = service_periods.len(),
            tables = tables.len(),
            duration_min = duration.num_minutes(),
            interval_min = slot_interval.num_minutes(),
            "Capacity model loaded"
        );

        Ok(CapacitySnapshot {
            restaurant,
            service_periods,
            tables,
            duration,
            slot_interval,
        })
    }
}

/// Guests already seated (confirmed) on any of `table_ids` during `slot`.
///
/// Used by both the availability listing and the booking re-check, so the
/// two can never disagree about what "booked" means.
pub async fn booked_capacity<R>(reader: &R, table_ids: &[i32], slot: &TimeSlot) -> DomainResult<u32>
where
    R: ReservationReader + ?Sized,
{
    if table_ids.is_empty() {
        return Ok(0);
    }
    let overlapping = reader.find_overlapping(table_ids, slot).await?;
    Ok(overlapping
        .iter()
        .fold(0u32, |guests, r| guests.saturating_add(r.number_of_guests)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        BookingTransaction, CustomerDetails, NewReservation, NewRestaurant, NewServicePeriod,
        NewTable, ReservationRepository, RestaurantRepository, TableStatus,
    };
    use crate::infrastructure::storage::InMemoryStore;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    async fn store_with(periods: Vec<NewServicePeriod>, tables: Vec<(u32, TableStatus)>) -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .create(NewRestaurant {
                name: "Capacity".into(),
                avg_reservation_duration_minutes: 0,
                slot_interval_minutes: 0,
                service_periods: periods,
                tables: tables
                    .into_iter()
                    .enumerate()
                    .map(|(i, (capacity, status))| NewTable {
                        name: format!("T{}", i + 1),
                        capacity,
                        status,
                    })
                    .collect(),
            })
            .await
            .unwrap();
        store
    }

    fn lunch() -> NewServicePeriod {
        NewServicePeriod {
            name: "Lunch".into(),
            opening_time: hm(12, 0),
            closing_time: hm(14, 0),
        }
    }

    #[tokio::test]
    async fn total_capacity_counts_only_available_tables() {
        let store = store_with(
            vec![lunch()],
            vec![
                (4, TableStatus::Available),
                (6, TableStatus::OutOfService),
                (2, TableStatus::Occupied),
                (3, TableStatus::Available),
            ],
        )
        .await;
        let model = CapacityModel::new(Arc::new(store), ReservationDefaults::default());
        let snapshot = model.load(1).await.unwrap();
        assert_eq!(snapshot.total_capacity(), 7);
        assert_eq!(snapshot.table_ids(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn unset_restaurant_settings_use_defaults() {
        let store = store_with(vec![lunch()], vec![(4, TableStatus::Available)]).await;
        let defaults = ReservationDefaults {
            duration_minutes: 90,
            slot_interval_minutes: 15,
        };
        let snapshot = CapacityModel::new(Arc::new(store), defaults)
            .load(1)
            .await
            .unwrap();
        assert_eq!(snapshot.duration, Duration::minutes(90));
        assert_eq!(snapshot.slot_interval, Duration::minutes(15));
    }

    #[tokio::test]
    async fn unknown_restaurant_is_not_found() {
        let model = CapacityModel::new(Arc::new(InMemoryStore::new()), ReservationDefaults::default());
        assert!(matches!(
            model.load(42).await,
            Err(DomainError::NotFound {
                entity: "Restaurant",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn slot_must_fit_inside_a_period() {
        let store = store_with(vec![lunch()], vec![(4, TableStatus::Available)]).await;
        let snapshot = CapacityModel::new(Arc::new(store), ReservationDefaults::default())
            .load(1)
            .await
            .unwrap();
        assert!(snapshot.period_accommodating(&snapshot.slot_at(date(), hm(13, 0))).is_some());
        assert!(snapshot.period_accommodating(&snapshot.slot_at(date(), hm(13, 15))).is_none());
    }

    #[tokio::test]
    async fn booked_capacity_sums_confirmed_guests_in_window() {
        let store = store_with(
            vec![lunch()],
            vec![(4, TableStatus::Available), (4, TableStatus::Available)],
        )
        .await;
        let hour = Duration::minutes(60);
        let mut tx = store.begin(1).await.unwrap();
        for (table_id, guests, time) in [(1, 3, hm(12, 0)), (2, 2, hm(12, 30)), (1, 4, hm(13, 0))] {
            tx.insert(NewReservation {
                restaurant_id: 1,
                table_id,
                customer: CustomerDetails {
                    name: "Guest".into(),
                    email: "guest@example.com".into(),
                    phone: "1".into(),
                },
                number_of_guests: guests,
                slot: TimeSlot::starting_at(date(), time, hour),
            })
            .await
            .unwrap();
        }
        tx.commit().await.unwrap();

        let window = TimeSlot::starting_at(date(), hm(12, 0), hour);
        assert_eq!(booked_capacity(&store, &[1, 2], &window).await.unwrap(), 5);
        assert_eq!(booked_capacity(&store, &[2], &window).await.unwrap(), 2);
        assert_eq!(booked_capacity(&store, &[], &window).await.unwrap(), 0);

        let cancelled = store
            .find_overlapping(&[1], &window)
            .await
            .unwrap()
            .remove(0);
        store
            .transition_status(
                cancelled.id,
                crate::domain::ReservationStatus::Confirmed,
                crate::domain::ReservationStatus::Cancelled,
            )
            .await
            .unwrap();
        assert_eq!(booked_capacity(&store, &[1, 2], &window).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn huge_table_capacities_saturate() {
        let store = store_with(
            vec![lunch()],
            vec![
                (u32::MAX, TableStatus::Available),
                (u32::MAX - 1, TableStatus::Available),
                (5, TableStatus::Available),
            ],
        )
        .await;
        let snapshot = CapacityModel::new(Arc::new(store), ReservationDefaults::default())
            .load(1)
            .await
            .unwrap();
        assert_eq!(snapshot.total_capacity(), u32::MAX);
    }

    #[tokio::test]
    async fn huge_parties_saturate_booked_capacity() {
        let store = store_with(
            vec![lunch()],
            vec![(u32::MAX, TableStatus::Available), (u32::MAX, TableStatus::Available)],
        )
        .await;
        let window = TimeSlot::starting_at(date(), hm(12, 0), Duration::minutes(60));
        let mut tx = store.begin(1).await.unwrap();
        for table_id in [1, 2] {
            tx.insert(NewReservation {
                restaurant_id: 1,
                table_id,
                customer: CustomerDetails {
                    name: "Banquet".into(),
                    email: "banquet@example.com".into(),
                    phone: "1".into(),
                },
                number_of_guests: u32::MAX - 1,
                slot: window,
            })
            .await
            .unwrap();
        }
        tx.commit().await.unwrap();

        assert_eq!(booked_capacity(&store, &[1, 2], &window).await.unwrap(), u32::MAX);
    }
}
