//! Restaurant repository interface

use async_trait::async_trait;

use super::model::{NewRestaurant, Restaurant, ServicePeriod, Table, TableStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Insert a restaurant together with its service periods and tables
    async fn create(&self, restaurant: NewRestaurant) -> DomainResult<Restaurant>;

    /// Find restaurant by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Restaurant>>;

    /// Number of restaurants in the store
    async fn count(&self) -> DomainResult<u64>;

    /// Service periods of a restaurant, ordered by opening time
    async fn service_periods(&self, restaurant_id: i32) -> DomainResult<Vec<ServicePeriod>>;

    /// Tables of a restaurant in insertion (id) order
    async fn tables(&self, restaurant_id: i32) -> DomainResult<Vec<Table>>;

    /// Find table by ID
    async fn find_table(&self, table_id: i32) -> DomainResult<Option<Table>>;

    /// Change a table's status
    async fn update_table_status(&self, table_id: i32, status: TableStatus) -> DomainResult<()>;
}
