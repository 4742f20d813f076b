use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `providers` table and its columns.
#[derive(DeriveIden)]
enum Providers {
    Table,
    Id,
    FullName,
    Phone,
    Gender,
    PhotoUrl,
    Latitude,
    Longitude,
    CommuteDistanceKm,
    SubscriptionStatus,
    ServiceCategories,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Providers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Providers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Providers::FullName).string().not_null())
                    .col(ColumnDef::new(Providers::Phone).string().not_null())
                    .col(ColumnDef::new(Providers::Gender).string().not_null())
                    .col(ColumnDef::new(Providers::PhotoUrl).string())
                    .col(ColumnDef::new(Providers::Latitude).double())
                    .col(ColumnDef::new(Providers::Longitude).double())
                    .col(
                        ColumnDef::new(Providers::CommuteDistanceKm)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Providers::SubscriptionStatus)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Providers::ServiceCategories)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Providers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Providers::Table).to_owned())
            .await
    }
}
