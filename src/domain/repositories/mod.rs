//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::reservation::ReservationRepository;
use super::restaurant::RestaurantRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Services receive an `Arc<dyn RepositoryProvider>` at construction time
/// and request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let tables = repos.restaurants().tables(1).await?;
///     let booked = repos.reservations().find_overlapping(&[1, 2], &slot).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn restaurants(&self) -> &dyn RestaurantRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
}
