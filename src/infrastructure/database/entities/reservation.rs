//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub restaurant_id: i32,
    pub table_id: i32,

    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,

    pub number_of_guests: i32,

    /// Local wall-clock time of the restaurant
    pub start_time: DateTime,
    pub end_time: DateTime,

    /// Reservation status: confirmed, cancelled, completed
    pub status: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::restaurant::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurant::Column::Id"
    )]
    Restaurant,
    #[sea_orm(
        belongs_to = "super::dining_table::Entity",
        from = "Column::TableId",
        to = "super::dining_table::Column::Id"
    )]
    DiningTable,
}

impl Related<super::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl Related<super::dining_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiningTable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
