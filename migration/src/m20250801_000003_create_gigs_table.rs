use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `gigs` table and its columns. The allocation fields
/// (`selected_provider_id`, `accepted_provider_id`, `broadcast_at`, ...) are
/// all nullable: the gig's phase is derived from them, never stored.
#[derive(DeriveIden)]
enum Gigs {
    Table,
    Id,
    ClientId,
    Category,
    Latitude,
    Longitude,
    PreferredGender,
    PaymentOffer,
    DurationDays,
    DurationHours,
    Address,
    Description,
    SelectedProviderId,
    AcceptedProviderId,
    SelectionExpiresAt,
    DirectOfferSentAt,
    BroadcastAt,
    CreatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Gigs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Gigs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Gigs::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Gigs::Category).string().not_null())
                    .col(ColumnDef::new(Gigs::Latitude).double())
                    .col(ColumnDef::new(Gigs::Longitude).double())
                    .col(ColumnDef::new(Gigs::PreferredGender).string().not_null())
                    .col(ColumnDef::new(Gigs::PaymentOffer).integer().not_null())
                    .col(ColumnDef::new(Gigs::DurationDays).integer().not_null())
                    .col(ColumnDef::new(Gigs::DurationHours).integer().not_null())
                    .col(ColumnDef::new(Gigs::Address).string().not_null())
                    .col(ColumnDef::new(Gigs::Description).text().not_null())
                    .col(ColumnDef::new(Gigs::SelectedProviderId).uuid())
                    .col(ColumnDef::new(Gigs::AcceptedProviderId).uuid())
                    .col(
                        ColumnDef::new(Gigs::SelectionExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Gigs::DirectOfferSentAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Gigs::BroadcastAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Gigs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gigs_client_id")
                            .from(Gigs::Table, Gigs::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Gigs::Table).to_owned())
            .await
    }
}
