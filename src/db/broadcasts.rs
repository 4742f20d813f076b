use sea_orm::prelude::Expr;
use sea_orm::*;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::broadcasts::{self, BroadcastStatus};

/// Fan out one pending record per eligible provider. Called only by the
/// winner of the `broadcast_at` CAS, so the unique `(gig_id, provider_id)`
/// index never trips.
pub async fn insert_pending(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_ids: &[Uuid],
    now: DateTime<Utc>,
) -> Result<(), DbErr> {
    if provider_ids.is_empty() {
        return Ok(());
    }

    let rows: Vec<broadcasts::ActiveModel> = provider_ids
        .iter()
        .map(|provider_id| broadcasts::ActiveModel {
            id: Set(Uuid::new_v4()),
            gig_id: Set(gig_id),
            provider_id: Set(*provider_id),
            status: Set(BroadcastStatus::Pending),
            created_at: Set(now),
        })
        .collect();

    broadcasts::Entity::insert_many(rows).exec(db).await?;
    Ok(())
}

/// Fetch the provider's pending record on a gig, if any.
pub async fn find_pending(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_id: Uuid,
) -> Result<Option<broadcasts::Model>, DbErr> {
    broadcasts::Entity::find()
        .filter(broadcasts::Column::GigId.eq(gig_id))
        .filter(broadcasts::Column::ProviderId.eq(provider_id))
        .filter(broadcasts::Column::Status.eq(BroadcastStatus::Pending))
        .one(db)
        .await
}

/// Fetch every pending record a provider holds, newest first.
pub async fn get_pending_for_provider(
    db: &DatabaseConnection,
    provider_id: Uuid,
) -> Result<Vec<broadcasts::Model>, DbErr> {
    broadcasts::Entity::find()
        .filter(broadcasts::Column::ProviderId.eq(provider_id))
        .filter(broadcasts::Column::Status.eq(BroadcastStatus::Pending))
        .order_by_desc(broadcasts::Column::CreatedAt)
        .all(db)
        .await
}

/// Flip a record out of pending. Returns 0 if the record is absent or was
/// already resolved.
pub async fn set_status_if_pending(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_id: Uuid,
    status: BroadcastStatus,
) -> Result<u64, DbErr> {
    let result = broadcasts::Entity::update_many()
        .col_expr(broadcasts::Column::Status, Expr::value(status))
        .filter(broadcasts::Column::GigId.eq(gig_id))
        .filter(broadcasts::Column::ProviderId.eq(provider_id))
        .filter(broadcasts::Column::Status.eq(BroadcastStatus::Pending))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
