//! SeaORM implementation of ReservationRepository
//!
//! Overlap queries are generic over `ConnectionTrait` so they run unchanged
//! on the pool and inside a [`SeaOrmBookingTransaction`].
//!
//! A booking transaction opens with a no-op `UPDATE` of its restaurant row.
//! Writing first makes SQLite take the write lock through its busy handler
//! instead of failing a later lock upgrade, and on PostgreSQL it holds the
//! row lock, so bookings for one restaurant serialize across processes.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use super::restaurant_repository::table_to_domain;
use super::{booking_err, db_err};
use crate::domain::reservation::{
    BookingTransaction, CustomerDetails, NewReservation, Reservation, ReservationReader,
    ReservationRepository, ReservationStatus,
};
use crate::domain::{DomainError, DomainResult, Table, TimeSlot};
use crate::infrastructure::database::entities::{dining_table, reservation, restaurant};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        restaurant_id: m.restaurant_id,
        table_id: m.table_id,
        customer: CustomerDetails {
            name: m.customer_name,
            email: m.customer_email,
            phone: m.customer_phone,
        },
        number_of_guests: m.number_of_guests.max(0) as u32,
        start_time: m.start_time,
        end_time: m.end_time,
        status: ReservationStatus::from_str(&m.status),
        created_at: m.created_at,
    }
}

// ── Shared queries ──────────────────────────────────────────────

/// Half-open overlap: existing.start < slot.end && existing.end > slot.start
fn overlapping_query(table_ids: &[i32], slot: &TimeSlot) -> sea_orm::Select<reservation::Entity> {
    reservation::Entity::find()
        .filter(reservation::Column::TableId.is_in(table_ids.iter().copied()))
        .filter(reservation::Column::Status.eq(ReservationStatus::Confirmed.as_str()))
        .filter(reservation::Column::StartTime.lt(slot.end))
        .filter(reservation::Column::EndTime.gt(slot.start))
}

async fn find_overlapping_on<C: ConnectionTrait>(
    conn: &C,
    table_ids: &[i32],
    slot: &TimeSlot,
) -> DomainResult<Vec<Reservation>> {
    if table_ids.is_empty() {
        return Ok(Vec::new());
    }
    let models = overlapping_query(table_ids, slot)
        .order_by_asc(reservation::Column::StartTime)
        .all(conn)
        .await
        .map_err(db_err)?;
    Ok(models.into_iter().map(model_to_domain).collect())
}

async fn count_overlapping_on<C: ConnectionTrait>(
    conn: &C,
    table_id: i32,
    slot: &TimeSlot,
) -> DomainResult<u64> {
    overlapping_query(&[table_id], slot)
        .count(conn)
        .await
        .map_err(db_err)
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationReader for SeaOrmReservationRepository {
    async fn find_overlapping(
        &self,
        table_ids: &[i32],
        slot: &TimeSlot,
    ) -> DomainResult<Vec<Reservation>> {
        find_overlapping_on(&self.db, table_ids, slot).await
    }

    async fn count_overlapping(&self, table_id: i32, slot: &TimeSlot) -> DomainResult<u64> {
        count_overlapping_on(&self.db, table_id, slot).await
    }
}

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_for_restaurant(
        &self,
        restaurant_id: i32,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::RestaurantId.eq(restaurant_id))
            .filter(reservation::Column::StartTime.gte(from))
            .filter(reservation::Column::StartTime.lt(to))
            .order_by_asc(reservation::Column::StartTime)
            .order_by_asc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn transition_status(
        &self,
        id: i32,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> DomainResult<bool> {
        debug!("Moving reservation {} from {} to {}", id, from, to);

        let result = reservation::Entity::update_many()
            .col_expr(reservation::Column::Status, Expr::value(to.as_str()))
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn begin(&self, restaurant_id: i32) -> DomainResult<Box<dyn BookingTransaction>> {
        let txn = self.db.begin().await.map_err(booking_err)?;

        let locked = restaurant::Entity::update_many()
            .col_expr(restaurant::Column::Name, Expr::col(restaurant::Column::Name).into())
            .filter(restaurant::Column::Id.eq(restaurant_id))
            .exec(&txn)
            .await
            .map_err(booking_err)?;
        if locked.rows_affected == 0 {
            return Err(DomainError::not_found("Restaurant", "id", restaurant_id));
        }

        Ok(Box::new(SeaOrmBookingTransaction { txn, restaurant_id }))
    }
}

// ── Booking transaction ─────────────────────────────────────────

/// Booking unit of work over a `DatabaseTransaction`; rolled back on drop.
pub struct SeaOrmBookingTransaction {
    txn: DatabaseTransaction,
    restaurant_id: i32,
}

#[async_trait]
impl ReservationReader for SeaOrmBookingTransaction {
    async fn find_overlapping(
        &self,
        table_ids: &[i32],
        slot: &TimeSlot,
    ) -> DomainResult<Vec<Reservation>> {
        find_overlapping_on(&self.txn, table_ids, slot).await
    }

    async fn count_overlapping(&self, table_id: i32, slot: &TimeSlot) -> DomainResult<u64> {
        count_overlapping_on(&self.txn, table_id, slot).await
    }
}

#[async_trait]
impl BookingTransaction for SeaOrmBookingTransaction {
    async fn tables(&self) -> DomainResult<Vec<Table>> {
        let models = dining_table::Entity::find()
            .filter(dining_table::Column::RestaurantId.eq(self.restaurant_id))
            .order_by_asc(dining_table::Column::Id)
            .all(&self.txn)
            .await
            .map_err(booking_err)?;
        Ok(models.into_iter().map(table_to_domain).collect())
    }

    async fn insert(&mut self, new: NewReservation) -> DomainResult<Reservation> {
        let table_id = new.table_id;
        let slot = new.slot;

        if count_overlapping_on(&self.txn, table_id, &slot).await? > 0 {
            return Err(DomainError::CapacityConflict);
        }

        let model = reservation::ActiveModel {
            restaurant_id: Set(new.restaurant_id),
            table_id: Set(table_id),
            customer_name: Set(new.customer.name),
            customer_email: Set(new.customer.email),
            customer_phone: Set(new.customer.phone),
            number_of_guests: Set(new.number_of_guests as i32),
            start_time: Set(slot.start),
            end_time: Set(slot.end),
            status: Set(ReservationStatus::Confirmed.as_str().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.txn)
        .await
        .map_err(booking_err)?;

        Ok(model_to_domain(model))
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.txn.commit().await.map_err(booking_err)
    }
}
