//! SeaORM implementation of RestaurantRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use super::db_err;
use crate::domain::restaurant::{
    NewRestaurant, Restaurant, RestaurantRepository, ServicePeriod, Table, TableStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{dining_table, restaurant, service_period};

pub struct SeaOrmRestaurantRepository {
    db: DatabaseConnection,
}

impl SeaOrmRestaurantRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn minutes(value: i32) -> u32 {
    value.max(0) as u32
}

fn restaurant_to_domain(m: restaurant::Model) -> Restaurant {
    Restaurant {
        id: m.id,
        name: m.name,
        avg_reservation_duration_minutes: minutes(m.avg_reservation_duration_minutes),
        slot_interval_minutes: minutes(m.slot_interval_minutes),
    }
}

fn period_to_domain(m: service_period::Model) -> ServicePeriod {
    ServicePeriod {
        id: m.id,
        restaurant_id: m.restaurant_id,
        name: m.name,
        opening_time: m.opening_time,
        closing_time: m.closing_time,
    }
}

pub(crate) fn table_to_domain(m: dining_table::Model) -> Table {
    Table {
        id: m.id,
        restaurant_id: m.restaurant_id,
        name: m.name,
        capacity: m.capacity.max(0) as u32,
        status: TableStatus::from_str(&m.status),
    }
}

// ── RestaurantRepository impl ───────────────────────────────────

#[async_trait]
impl RestaurantRepository for SeaOrmRestaurantRepository {
    async fn create(&self, new: NewRestaurant) -> DomainResult<Restaurant> {
        new.validate()?;
        debug!("Creating restaurant: {}", new.name);

        let txn = self.db.begin().await.map_err(db_err)?;

        let created = restaurant::ActiveModel {
            name: Set(new.name),
            avg_reservation_duration_minutes: Set(new.avg_reservation_duration_minutes as i32),
            slot_interval_minutes: Set(new.slot_interval_minutes as i32),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        for period in new.service_periods {
            service_period::ActiveModel {
                restaurant_id: Set(created.id),
                name: Set(period.name),
                opening_time: Set(period.opening_time),
                closing_time: Set(period.closing_time),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
        }

        for table in new.tables {
            dining_table::ActiveModel {
                restaurant_id: Set(created.id),
                name: Set(table.name),
                capacity: Set(table.capacity as i32),
                status: Set(table.status.as_str().to_string()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        Ok(restaurant_to_domain(created))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Restaurant>> {
        let model = restaurant::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(restaurant_to_domain))
    }

    async fn count(&self) -> DomainResult<u64> {
        restaurant::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn service_periods(&self, restaurant_id: i32) -> DomainResult<Vec<ServicePeriod>> {
        let models = service_period::Entity::find()
            .filter(service_period::Column::RestaurantId.eq(restaurant_id))
            .order_by_asc(service_period::Column::OpeningTime)
            .order_by_asc(service_period::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(period_to_domain).collect())
    }

    async fn tables(&self, restaurant_id: i32) -> DomainResult<Vec<Table>> {
        let models = dining_table::Entity::find()
            .filter(dining_table::Column::RestaurantId.eq(restaurant_id))
            .order_by_asc(dining_table::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(table_to_domain).collect())
    }

    async fn find_table(&self, table_id: i32) -> DomainResult<Option<Table>> {
        let model = dining_table::Entity::find_by_id(table_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(table_to_domain))
    }

    async fn update_table_status(&self, table_id: i32, status: TableStatus) -> DomainResult<()> {
        let Some(existing) = dining_table::Entity::find_by_id(table_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Err(DomainError::not_found("Table", "id", table_id));
        };

        let mut active: dining_table::ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
