//! In-memory storage implementation
//!
//! All state sits behind one `tokio::sync::Mutex`. A booking transaction
//! owns the lock from `begin()` until it is committed or dropped, so
//! concurrent bookings are fully serialised; writes are buffered and only
//! applied on commit.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    BookingTransaction, DomainError, DomainResult, NewReservation, NewRestaurant, RepositoryProvider,
    Reservation, ReservationReader, ReservationRepository, ReservationStatus, Restaurant,
    RestaurantRepository, ServicePeriod, Table, TableStatus, TimeSlot,
};

#[derive(Default)]
struct MemoryState {
    restaurants: BTreeMap<i32, Restaurant>,
    service_periods: BTreeMap<i32, ServicePeriod>,
    tables: BTreeMap<i32, Table>,
    reservations: BTreeMap<i32, Reservation>,
    last_restaurant_id: i32,
    last_period_id: i32,
    last_table_id: i32,
    last_reservation_id: i32,
}

impl MemoryState {
    fn overlapping(&self, table_ids: &[i32], slot: &TimeSlot) -> Vec<Reservation> {
        self.reservations
            .values()
            .filter(|r| table_ids.contains(&r.table_id) && r.blocks(slot))
            .cloned()
            .collect()
    }
}

/// In-memory storage for development and testing
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent store call fail with a storage error until
    /// switched back. Lets callers exercise their failure paths.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> DomainResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::Storage("in-memory store is unavailable".into()));
        }
        Ok(())
    }
}

impl RepositoryProvider for InMemoryStore {
    fn restaurants(&self) -> &dyn RestaurantRepository {
        self
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        self
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryStore {
    async fn create(&self, new: NewRestaurant) -> DomainResult<Restaurant> {
        self.check_available()?;
        new.validate()?;
        let mut state = self.state.lock().await;

        state.last_restaurant_id += 1;
        let restaurant = Restaurant {
            id: state.last_restaurant_id,
            name: new.name,
            avg_reservation_duration_minutes: new.avg_reservation_duration_minutes,
            slot_interval_minutes: new.slot_interval_minutes,
        };

        for period in new.service_periods {
            state.last_period_id += 1;
            let id = state.last_period_id;
            state.service_periods.insert(
                id,
                ServicePeriod {
                    id,
                    restaurant_id: restaurant.id,
                    name: period.name,
                    opening_time: period.opening_time,
                    closing_time: period.closing_time,
                },
            );
        }

        for table in new.tables {
            state.last_table_id += 1;
            let id = state.last_table_id;
            state.tables.insert(
                id,
                Table {
                    id,
                    restaurant_id: restaurant.id,
                    name: table.name,
                    capacity: table.capacity,
                    status: table.status,
                },
            );
        }

        state.restaurants.insert(restaurant.id, restaurant.clone());
        Ok(restaurant)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Restaurant>> {
        self.check_available()?;
        Ok(self.state.lock().await.restaurants.get(&id).cloned())
    }

    async fn count(&self) -> DomainResult<u64> {
        self.check_available()?;
        Ok(self.state.lock().await.restaurants.len() as u64)
    }

    async fn service_periods(&self, restaurant_id: i32) -> DomainResult<Vec<ServicePeriod>> {
        self.check_available()?;
        let state = self.state.lock().await;
        let mut periods: Vec<ServicePeriod> = state
            .service_periods
            .values()
            .filter(|p| p.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        periods.sort_by_key(|p| (p.opening_time, p.id));
        Ok(periods)
    }

    async fn tables(&self, restaurant_id: i32) -> DomainResult<Vec<Table>> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state
            .tables
            .values()
            .filter(|t| t.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn find_table(&self, table_id: i32) -> DomainResult<Option<Table>> {
        self.check_available()?;
        Ok(self.state.lock().await.tables.get(&table_id).cloned())
    }

    async fn update_table_status(&self, table_id: i32, status: TableStatus) -> DomainResult<()> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        let table = state
            .tables
            .get_mut(&table_id)
            .ok_or_else(|| DomainError::not_found("Table", "id", table_id))?;
        table.status = status;
        Ok(())
    }
}

#[async_trait]
impl ReservationReader for InMemoryStore {
    async fn find_overlapping(
        &self,
        table_ids: &[i32],
        slot: &TimeSlot,
    ) -> DomainResult<Vec<Reservation>> {
        self.check_available()?;
        Ok(self.state.lock().await.overlapping(table_ids, slot))
    }

    async fn count_overlapping(&self, table_id: i32, slot: &TimeSlot) -> DomainResult<u64> {
        self.check_available()?;
        Ok(self.state.lock().await.overlapping(&[table_id], slot).len() as u64)
    }
}

#[async_trait]
impl ReservationRepository for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        self.check_available()?;
        Ok(self.state.lock().await.reservations.get(&id).cloned())
    }

    async fn find_for_restaurant(
        &self,
        restaurant_id: i32,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> DomainResult<Vec<Reservation>> {
        self.check_available()?;
        let state = self.state.lock().await;
        let mut found: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|r| r.restaurant_id == restaurant_id && r.start_time >= from && r.start_time < to)
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.start_time, r.id));
        Ok(found)
    }

    async fn transition_status(
        &self,
        id: i32,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> DomainResult<bool> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        match state.reservations.get_mut(&id) {
            Some(reservation) if reservation.status == from => {
                reservation.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn begin(&self, restaurant_id: i32) -> DomainResult<Box<dyn BookingTransaction>> {
        self.check_available()?;
        let guard = self.state.clone().lock_owned().await;
        if !guard.restaurants.contains_key(&restaurant_id) {
            return Err(DomainError::not_found("Restaurant", "id", restaurant_id));
        }
        Ok(Box::new(InMemoryBookingTransaction {
            guard,
            restaurant_id,
            pending: Vec::new(),
            unavailable: self.unavailable.clone(),
        }))
    }
}

/// Booking transaction holding the store lock for its whole lifetime.
struct InMemoryBookingTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    restaurant_id: i32,
    pending: Vec<Reservation>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryBookingTransaction {
    fn check_available(&self) -> DomainResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::Storage("in-memory store is unavailable".into()));
        }
        Ok(())
    }

    fn overlapping(&self, table_ids: &[i32], slot: &TimeSlot) -> Vec<Reservation> {
        let mut found = self.guard.overlapping(table_ids, slot);
        found.extend(
            self.pending
                .iter()
                .filter(|r| table_ids.contains(&r.table_id) && r.blocks(slot))
                .cloned(),
        );
        found
    }
}

#[async_trait]
impl ReservationReader for InMemoryBookingTransaction {
    async fn find_overlapping(
        &self,
        table_ids: &[i32],
        slot: &TimeSlot,
    ) -> DomainResult<Vec<Reservation>> {
        self.check_available()?;
        Ok(self.overlapping(table_ids, slot))
    }

    async fn count_overlapping(&self, table_id: i32, slot: &TimeSlot) -> DomainResult<u64> {
        self.check_available()?;
        Ok(self.overlapping(&[table_id], slot).len() as u64)
    }
}

#[async_trait]
impl BookingTransaction for InMemoryBookingTransaction {
    async fn tables(&self) -> DomainResult<Vec<Table>> {
        self.check_available()?;
        Ok(self
            .guard
            .tables
            .values()
            .filter(|t| t.restaurant_id == self.restaurant_id)
            .cloned()
            .collect())
    }

    async fn insert(&mut self, new: NewReservation) -> DomainResult<Reservation> {
        self.check_available()?;
        if !self.overlapping(&[new.table_id], &new.slot).is_empty() {
            return Err(DomainError::CapacityConflict);
        }
        let id = self.guard.last_reservation_id + self.pending.len() as i32 + 1;
        let reservation = new.into_reservation(id, Utc::now());
        self.pending.push(reservation.clone());
        Ok(reservation)
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.check_available()?;
        let mut this = self;
        let pending = std::mem::take(&mut this.pending);
        for reservation in pending {
            this.guard.last_reservation_id = this.guard.last_reservation_id.max(reservation.id);
            this.guard.reservations.insert(reservation.id, reservation);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomerDetails, NewServicePeriod, NewTable};
    use chrono::{Duration, NaiveDate, NaiveTime};

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn slot(h: u32) -> TimeSlot {
        TimeSlot::starting_at(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            hm(h, 0),
            Duration::minutes(60),
        )
    }

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .create(NewRestaurant {
                name: "Le Test".into(),
                avg_reservation_duration_minutes: 60,
                slot_interval_minutes: 30,
                service_periods: vec![NewServicePeriod {
                    name: "Lunch".into(),
                    opening_time: hm(12, 0),
                    closing_time: hm(14, 0),
                }],
                tables: vec![
                    NewTable {
                        name: "T1".into(),
                        capacity: 2,
                        status: TableStatus::Available,
                    },
                    NewTable {
                        name: "T2".into(),
                        capacity: 4,
                        status: TableStatus::Available,
                    },
                ],
            })
            .await
            .unwrap();
        store
    }

    fn booking(table_id: i32, h: u32) -> NewReservation {
        NewReservation {
            restaurant_id: 1,
            table_id,
            customer: CustomerDetails {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                phone: "0600000000".into(),
            },
            number_of_guests: 2,
            slot: slot(h),
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = seeded().await;
        let tables = store.tables(1).await.unwrap();
        assert_eq!(tables.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(store.service_periods(1).await.unwrap().len(), 1);
        assert_eq!(RestaurantRepository::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn uncommitted_transaction_leaves_no_trace() {
        let store = seeded().await;
        {
            let mut tx = store.begin(1).await.unwrap();
            tx.insert(booking(1, 12)).await.unwrap();
            assert_eq!(tx.count_overlapping(1, &slot(12)).await.unwrap(), 1);
        }
        assert_eq!(store.count_overlapping(1, &slot(12)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn committed_transaction_is_visible() {
        let store = seeded().await;
        let mut tx = store.begin(1).await.unwrap();
        let r = tx.insert(booking(2, 12)).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(
            ReservationRepository::find_by_id(&store, r.id)
                .await
                .unwrap()
                .unwrap()
                .table_id,
            2
        );
        assert_eq!(store.find_overlapping(&[1, 2], &slot(12)).await.unwrap().len(), 1);
        assert!(store.find_overlapping(&[1], &slot(12)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_rejects_overlap_on_same_table() {
        let store = seeded().await;
        let mut tx = store.begin(1).await.unwrap();
        tx.insert(booking(1, 12)).await.unwrap();
        let err = tx.insert(booking(1, 12)).await.unwrap_err();
        assert!(matches!(err, DomainError::CapacityConflict));
        // back-to-back is fine
        tx.insert(booking(1, 13)).await.unwrap();
    }

    #[tokio::test]
    async fn cancelled_reservations_do_not_overlap() {
        let store = seeded().await;
        let mut tx = store.begin(1).await.unwrap();
        let r = tx.insert(booking(1, 12)).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store
            .transition_status(r.id, ReservationStatus::Confirmed, ReservationStatus::Cancelled)
            .await
            .unwrap());
        assert_eq!(store.count_overlapping(1, &slot(12)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn status_transition_only_applies_from_expected_status() {
        let store = seeded().await;
        let mut tx = store.begin(1).await.unwrap();
        let r = tx.insert(booking(1, 12)).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store
            .transition_status(r.id, ReservationStatus::Confirmed, ReservationStatus::Cancelled)
            .await
            .unwrap());
        // a second writer that read "confirmed" earlier loses
        assert!(!store
            .transition_status(r.id, ReservationStatus::Confirmed, ReservationStatus::Completed)
            .await
            .unwrap());
        let stored = ReservationRepository::find_by_id(&store, r.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Cancelled);
    }

    #[tokio::test]
    async fn transaction_sees_tables_of_its_restaurant() {
        let store = seeded().await;
        let tx = store.begin(1).await.unwrap();
        let tables = tx.tables().await.unwrap();
        assert_eq!(tables.iter().map(|t| t.capacity).collect::<Vec<_>>(), vec![2, 4]);
    }

    #[tokio::test]
    async fn begin_for_unknown_restaurant_is_not_found() {
        let store = seeded().await;
        assert!(matches!(
            store.begin(7).await.err(),
            Some(DomainError::NotFound { entity: "Restaurant", .. })
        ));
    }

    #[tokio::test]
    async fn unavailable_store_fails_reads() {
        let store = seeded().await;
        store.set_unavailable(true);
        assert!(matches!(
            store.count_overlapping(1, &slot(12)).await,
            Err(DomainError::Storage(_))
        ));
        store.set_unavailable(false);
        assert!(store.count_overlapping(1, &slot(12)).await.is_ok());
    }

    #[tokio::test]
    async fn transition_of_unknown_reservation_changes_nothing() {
        let store = seeded().await;
        let moved = store
            .transition_status(99, ReservationStatus::Confirmed, ReservationStatus::Cancelled)
            .await
            .unwrap();
        assert!(!moved);
    }
}
