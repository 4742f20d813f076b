use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `broadcasts` table and its columns.
#[derive(DeriveIden)]
enum Broadcasts {
    Table,
    Id,
    GigId,
    ProviderId,
    Status,
    CreatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Gigs {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Providers {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Broadcasts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Broadcasts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Broadcasts::GigId).uuid().not_null())
                    .col(ColumnDef::new(Broadcasts::ProviderId).uuid().not_null())
                    .col(ColumnDef::new(Broadcasts::Status).string().not_null())
                    .col(
                        ColumnDef::new(Broadcasts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_broadcasts_gig_id")
                            .from(Broadcasts::Table, Broadcasts::GigId)
                            .to(Gigs::Table, Gigs::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_broadcasts_provider_id")
                            .from(Broadcasts::Table, Broadcasts::ProviderId)
                            .to(Providers::Table, Providers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Broadcasts::Table).to_owned())
            .await
    }
}
