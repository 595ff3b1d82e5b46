//! Shared handler state

use std::sync::Arc;

use crate::application::{ReservationService, RestaurantService};

#[derive(Clone)]
pub struct AppState {
    pub restaurants: Arc<RestaurantService>,
    pub reservations: Arc<ReservationService>,
}
