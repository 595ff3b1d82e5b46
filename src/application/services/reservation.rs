//! Reservation lifecycle service

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::application::booking::{BookingGuard, BookingRequest};
use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, Reservation, ReservationDefaults,
    ReservationStatus,
};

/// Service for reservation business operations
pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    guard: BookingGuard,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, defaults: ReservationDefaults) -> Self {
        Self {
            guard: BookingGuard::new(repos.clone(), defaults),
            repos,
        }
    }

    /// Book a table (`createReservation`)
    pub async fn create(&self, request: BookingRequest) -> DomainResult<Reservation> {
        self.guard.create_reservation(request).await
    }

    pub async fn get(&self, id: i32) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", id))
    }

    /// All reservations starting on `date`, whatever their status
    pub async fn list_for_day(
        &self,
        restaurant_id: i32,
        date: NaiveDate,
    ) -> DomainResult<Vec<Reservation>> {
        if self.repos.restaurants().find_by_id(restaurant_id).await?.is_none() {
            return Err(DomainError::not_found("Restaurant", "id", restaurant_id));
        }
        let from = date.and_time(chrono::NaiveTime::MIN);
        let to = from + chrono::Duration::days(1);
        self.repos
            .reservations()
            .find_for_restaurant(restaurant_id, from, to)
            .await
    }

    /// Confirmed → cancelled; frees the table for the slot
    pub async fn cancel(&self, id: i32) -> DomainResult<Reservation> {
        let reservation = self.transition(id, ReservationStatus::Cancelled).await?;
        info!(reservation_id = id, table_id = reservation.table_id, "Reservation cancelled");
        Ok(reservation)
    }

    /// Confirmed → completed
    pub async fn complete(&self, id: i32) -> DomainResult<Reservation> {
        let reservation = self.transition(id, ReservationStatus::Completed).await?;
        info!(reservation_id = id, table_id = reservation.table_id, "Reservation completed");
        Ok(reservation)
    }

    /// Applies the lifecycle rule, then writes only if the stored status is
    /// still the one the rule was checked against.
    async fn transition(&self, id: i32, to: ReservationStatus) -> DomainResult<Reservation> {
        let mut reservation = self.get(id).await?;
        let from = reservation.status;
        match to {
            ReservationStatus::Cancelled => reservation.cancel()?,
            _ => reservation.complete()?,
        }

        if self
            .repos
            .reservations()
            .transition_status(id, from, to)
            .await?
        {
            return Ok(reservation);
        }

        // lost a race with another status change
        let current = self.get(id).await?;
        Err(DomainError::InvalidTransition {
            id,
            from: current.status.as_str(),
            to: to.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::AvailabilityCalculator;
    use crate::domain::{
        BookingTransaction, CustomerDetails, NewRestaurant, NewServicePeriod, NewTable,
        ReservationReader, ReservationRepository, RestaurantRepository, TableStatus, TimeSlot,
    };
    use crate::infrastructure::storage::InMemoryStore;
    use async_trait::async_trait;
    use chrono::{NaiveDateTime, NaiveTime};

    /// Completes the reservation behind the caller's back just before any
    /// status write, like a second staff member acting at the same moment.
    struct CompletedConcurrently {
        store: InMemoryStore,
    }

    impl RepositoryProvider for CompletedConcurrently {
        fn restaurants(&self) -> &dyn RestaurantRepository {
            &self.store
        }

        fn reservations(&self) -> &dyn ReservationRepository {
            self
        }
    }

    #[async_trait]
    impl ReservationReader for CompletedConcurrently {
        async fn find_overlapping(
            &self,
            table_ids: &[i32],
            slot: &TimeSlot,
        ) -> DomainResult<Vec<Reservation>> {
            self.store.find_overlapping(table_ids, slot).await
        }

        async fn count_overlapping(&self, table_id: i32, slot: &TimeSlot) -> DomainResult<u64> {
            self.store.count_overlapping(table_id, slot).await
        }
    }

    #[async_trait]
    impl ReservationRepository for CompletedConcurrently {
        async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
            ReservationRepository::find_by_id(&self.store, id).await
        }

        async fn find_for_restaurant(
            &self,
            restaurant_id: i32,
            from: NaiveDateTime,
            to: NaiveDateTime,
        ) -> DomainResult<Vec<Reservation>> {
            self.store.find_for_restaurant(restaurant_id, from, to).await
        }

        async fn transition_status(
            &self,
            id: i32,
            from: ReservationStatus,
            to: ReservationStatus,
        ) -> DomainResult<bool> {
            self.store
                .transition_status(id, ReservationStatus::Confirmed, ReservationStatus::Completed)
                .await?;
            self.store.transition_status(id, from, to).await
        }

        async fn begin(&self, restaurant_id: i32) -> DomainResult<Box<dyn BookingTransaction>> {
            self.store.begin(restaurant_id).await
        }
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    async fn setup() -> (InMemoryStore, ReservationService) {
        let store = InMemoryStore::new();
        store
            .create(NewRestaurant {
                name: "Lifecycle".into(),
                avg_reservation_duration_minutes: 60,
                slot_interval_minutes: 30,
                service_periods: vec![NewServicePeriod {
                    name: "Dinner".into(),
                    opening_time: hm(18, 0),
                    closing_time: hm(22, 0),
                }],
                tables: vec![NewTable {
                    name: "T1".into(),
                    capacity: 4,
                    status: TableStatus::Available,
                }],
            })
            .await
            .unwrap();
        let service = ReservationService::new(Arc::new(store.clone()), ReservationDefaults::default());
        (store, service)
    }

    fn request(time: NaiveTime, date: NaiveDate) -> BookingRequest {
        BookingRequest {
            restaurant_id: 1,
            date,
            time,
            party_size: 4,
            customer: CustomerDetails {
                name: "Linus".into(),
                email: "linus@example.com".into(),
                phone: "555".into(),
            },
        }
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let (_, service) = setup().await;
        assert!(matches!(
            service.get(5).await,
            Err(DomainError::NotFound { entity: "Reservation", .. })
        ));
    }

    #[tokio::test]
    async fn cancel_frees_the_slot() {
        let (store, service) = setup().await;
        let r = service.create(request(hm(19, 0), day())).await.unwrap();

        let availability = AvailabilityCalculator::new(Arc::new(store), ReservationDefaults::default());
        let before = availability.list_available_slots(1, day(), 4).await.unwrap();
        assert!(!before.slots.contains(&hm(19, 0)));

        let cancelled = service.cancel(r.id).await.unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        assert_eq!(service.get(r.id).await.unwrap().status, ReservationStatus::Cancelled);

        let after = availability.list_available_slots(1, day(), 4).await.unwrap();
        assert!(after.slots.contains(&hm(19, 0)));

        // the slot can be booked again
        service.create(request(hm(19, 0), day())).await.unwrap();
    }

    #[tokio::test]
    async fn only_confirmed_reservations_change_status() {
        let (_, service) = setup().await;
        let r = service.create(request(hm(18, 0), day())).await.unwrap();
        service.complete(r.id).await.unwrap();

        assert!(matches!(
            service.cancel(r.id).await,
            Err(DomainError::InvalidTransition { from: "completed", .. })
        ));
        assert!(matches!(
            service.complete(r.id).await,
            Err(DomainError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn list_for_day_filters_by_date() {
        let (_, service) = setup().await;
        service.create(request(hm(20, 0), day())).await.unwrap();
        service.create(request(hm(18, 0), day())).await.unwrap();
        service
            .create(request(hm(18, 0), day().succ_opt().unwrap()))
            .await
            .unwrap();

        let listed = service.list_for_day(1, day()).await.unwrap();
        let starts: Vec<NaiveTime> = listed.iter().map(|r| r.start_time.time()).collect();
        assert_eq!(starts, vec![hm(18, 0), hm(20, 0)]);

        assert!(matches!(
            service.list_for_day(9, day()).await,
            Err(DomainError::NotFound { entity: "Restaurant", .. })
        ));
    }

    #[tokio::test]
    async fn cancel_racing_a_completion_is_rejected() {
        let (store, service) = setup().await;
        let r = service.create(request(hm(19, 0), day())).await.unwrap();

        let racing = ReservationService::new(
            Arc::new(CompletedConcurrently {
                store: store.clone(),
            }),
            ReservationDefaults::default(),
        );
        assert!(matches!(
            racing.cancel(r.id).await,
            Err(DomainError::InvalidTransition {
                from: "completed",
                to: "cancelled",
                ..
            })
        ));
        assert_eq!(service.get(r.id).await.unwrap().status, ReservationStatus::Completed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_cancel_and_complete_apply_once() {
        let (_, service) = setup().await;
        let service = Arc::new(service);
        let r = service.create(request(hm(18, 0), day())).await.unwrap();

        let cancel = {
            let service = service.clone();
            tokio::spawn(async move { service.cancel(r.id).await })
        };
        let complete = {
            let service = service.clone();
            tokio::spawn(async move { service.complete(r.id).await })
        };
        let cancelled = cancel.await.unwrap();
        let completed = complete.await.unwrap();

        assert!(cancelled.is_ok() != completed.is_ok());
        let winner = if cancelled.is_ok() {
            ReservationStatus::Cancelled
        } else {
            ReservationStatus::Completed
        };
        assert_eq!(service.get(r.id).await.unwrap().status, winner);
    }
}
