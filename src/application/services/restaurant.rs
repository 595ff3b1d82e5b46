//! Restaurant read model and table administration

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::application::booking::{
    AvailabilityCalculator, AvailableSlots, CapacityModel, CapacitySnapshot,
};
use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, ReservationDefaults, Table, TableStatus,
};

/// Service for restaurant capacity queries
pub struct RestaurantService {
    repos: Arc<dyn RepositoryProvider>,
    capacity: CapacityModel,
    availability: AvailabilityCalculator,
}

impl RestaurantService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, defaults: ReservationDefaults) -> Self {
        Self {
            capacity: CapacityModel::new(repos.clone(), defaults),
            availability: AvailabilityCalculator::new(repos.clone(), defaults),
            repos,
        }
    }

    /// Tables, service periods and effective booking settings
    pub async fn capacity(&self, restaurant_id: i32) -> DomainResult<CapacitySnapshot> {
        self.capacity.load(restaurant_id).await
    }

    /// `listAvailableSlots`
    pub async fn availability(
        &self,
        restaurant_id: i32,
        date: NaiveDate,
        party_size: i32,
    ) -> DomainResult<AvailableSlots> {
        self.availability
            .list_available_slots(restaurant_id, date, party_size)
            .await
    }

    /// Take a table in or out of the bookable pool. Existing reservations
    /// on the table are left untouched.
    pub async fn set_table_status(
        &self,
        restaurant_id: i32,
        table_id: i32,
        status: TableStatus,
    ) -> DomainResult<Table> {
        let restaurants = self.repos.restaurants();
        let mut table = restaurants
            .find_table(table_id)
            .await?
            .filter(|t| t.restaurant_id == restaurant_id)
            .ok_or_else(|| DomainError::not_found("Table", "id", table_id))?;

        restaurants.update_table_status(table_id, status).await?;
        info!(
            restaurant_id,
            table_id,
            from = table.status.as_str(),
            to = status.as_str(),
            "Table status changed"
        );
        table.status = status;
        Ok(table)
    }
}
