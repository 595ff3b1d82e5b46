//! Restaurant entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    /// Booking length in minutes; 0 means "use the configured default"
    pub avg_reservation_duration_minutes: i32,

    /// Slot grid in minutes; 0 means "use the configured default"
    pub slot_interval_minutes: i32,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::service_period::Entity")]
    ServicePeriods,
    #[sea_orm(has_many = "super::dining_table::Entity")]
    DiningTables,
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
}

impl Related<super::service_period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServicePeriods.def()
    }
}

impl Related<super::dining_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiningTables.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
