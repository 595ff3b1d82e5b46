//! Create reservations table
//!
//! One row per booked table and time window. Overlap lookups go through
//! the (table_id, start_time, end_time) index.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_restaurants::Restaurants;
use super::m20250101_000003_create_dining_tables::DiningTables;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Reservations::RestaurantId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::TableId).integer().not_null())
                    .col(
                        ColumnDef::new(Reservations::CustomerName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::CustomerEmail)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::CustomerPhone)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::NumberOfGuests)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::StartTime)
                            .date_time()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::EndTime).date_time().not_null())
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string()
                            .not_null()
                            .default("confirmed"),
                    )
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_restaurant")
                            .from(Reservations::Table, Reservations::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_dining_table")
                            .from(Reservations::Table, Reservations::TableId)
                            .to(DiningTables::Table, DiningTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_restaurant_start")
                    .table(Reservations::Table)
                    .col(Reservations::RestaurantId)
                    .col(Reservations::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_table_window")
                    .table(Reservations::Table)
                    .col(Reservations::TableId)
                    .col(Reservations::StartTime)
                    .col(Reservations::EndTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_status")
                    .table(Reservations::Table)
                    .col(Reservations::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    RestaurantId,
    TableId,
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    NumberOfGuests,
    StartTime,
    EndTime,
    Status,
    CreatedAt,
}
