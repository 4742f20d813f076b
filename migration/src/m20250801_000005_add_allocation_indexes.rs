use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Gigs {
    Table,
    ClientId,
}

#[derive(DeriveIden)]
enum Broadcasts {
    Table,
    GigId,
    ProviderId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on gigs.client_id for fetching a client's gigs
        manager
            .create_index(
                Index::create()
                    .name("idx_gigs_client_id")
                    .table(Gigs::Table)
                    .col(Gigs::ClientId)
                    .to_owned(),
            )
            .await?;

        // Index on broadcasts.provider_id for a provider's pending offers
        manager
            .create_index(
                Index::create()
                    .name("idx_broadcasts_provider_id")
                    .table(Broadcasts::Table)
                    .col(Broadcasts::ProviderId)
                    .to_owned(),
            )
            .await?;

        // One broadcast record per provider per gig
        manager
            .create_index(
                Index::create()
                    .name("idx_broadcasts_gig_provider_unique")
                    .table(Broadcasts::Table)
                    .col(Broadcasts::GigId)
                    .col(Broadcasts::ProviderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_gigs_client_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_broadcasts_provider_id").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_broadcasts_gig_provider_unique")
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
