//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;
use crate::domain::restaurant::RestaurantRepository;

use super::reservation_repository::SeaOrmReservationRepository;
use super::restaurant_repository::SeaOrmRestaurantRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let tables = repos.restaurants().tables(1).await?;
/// let mut tx = repos.reservations().begin(1).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    restaurants: SeaOrmRestaurantRepository,
    reservations: SeaOrmReservationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            restaurants: SeaOrmRestaurantRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn restaurants(&self) -> &dyn RestaurantRepository {
        &self.restaurants
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }
}
