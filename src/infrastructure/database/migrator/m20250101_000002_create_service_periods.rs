//! Create service_periods table

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_restaurants::Restaurants;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServicePeriods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServicePeriods::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ServicePeriods::RestaurantId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServicePeriods::Name).string().not_null())
                    .col(ColumnDef::new(ServicePeriods::OpeningTime).time().not_null())
                    .col(ColumnDef::new(ServicePeriods::ClosingTime).time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_periods_restaurant")
                            .from(ServicePeriods::Table, ServicePeriods::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_periods_restaurant")
                    .table(ServicePeriods::Table)
                    .col(ServicePeriods::RestaurantId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServicePeriods::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ServicePeriods {
    Table,
    Id,
    RestaurantId,
    Name,
    OpeningTime,
    ClosingTime,
}
