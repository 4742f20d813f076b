//! Gig queries and the conditional-update primitives the allocation engine
//! races through. Every `try_*` function returns the affected-row count; a
//! zero means the guarded condition no longer held when the update ran.

use chrono::{DateTime, Duration, Utc};
use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::engine::phase::{OFFER_WINDOW_SECS, SELECTION_WINDOW_SECS};
use crate::models::gigs::{self, CreateGig};

/// Insert a new gig with a fresh selection window.
pub async fn insert_gig(
    db: &DatabaseConnection,
    input: CreateGig,
    now: DateTime<Utc>,
) -> Result<gigs::Model, DbErr> {
    let new_gig = gigs::ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(input.client_id),
        category: Set(input.category),
        latitude: Set(input.latitude),
        longitude: Set(input.longitude),
        preferred_gender: Set(input.preferred_gender),
        payment_offer: Set(input.payment_offer),
        duration_days: Set(input.duration_days),
        duration_hours: Set(input.duration_hours),
        address: Set(input.address),
        description: Set(input.description),
        selected_provider_id: Set(None),
        accepted_provider_id: Set(None),
        selection_expires_at: Set(now + Duration::seconds(SELECTION_WINDOW_SECS)),
        direct_offer_sent_at: Set(None),
        broadcast_at: Set(None),
        created_at: Set(now),
    };

    new_gig.insert(db).await
}

/// Fetch a single gig by ID.
pub async fn get_gig_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<gigs::Model>, DbErr> {
    gigs::Entity::find_by_id(id).one(db).await
}

/// Fetch a client's gigs, newest first.
pub async fn get_gigs_by_client_id(
    db: &DatabaseConnection,
    client_id: Uuid,
) -> Result<Vec<gigs::Model>, DbErr> {
    gigs::Entity::find()
        .filter(gigs::Column::ClientId.eq(client_id))
        .order_by_desc(gigs::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch every gig still in the open phase, newest first.
pub async fn get_open_gigs(db: &DatabaseConnection) -> Result<Vec<gigs::Model>, DbErr> {
    gigs::Entity::find()
        .filter(gigs::Column::AcceptedProviderId.is_null())
        .filter(gigs::Column::SelectedProviderId.is_null())
        .filter(gigs::Column::BroadcastAt.is_null())
        .order_by_desc(gigs::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch the given gigs, skipping any that have been accepted meanwhile.
pub async fn get_unaccepted_by_ids(
    db: &DatabaseConnection,
    ids: Vec<Uuid>,
) -> Result<Vec<gigs::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    gigs::Entity::find()
        .filter(gigs::Column::Id.is_in(ids))
        .filter(gigs::Column::AcceptedProviderId.is_null())
        .order_by_desc(gigs::Column::CreatedAt)
        .all(db)
        .await
}

/// CAS: stamp a direct offer onto a still-open gig inside its selection
/// window.
pub async fn try_select(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_id: Uuid,
    now: DateTime<Utc>,
) -> Result<u64, DbErr> {
    let result = gigs::Entity::update_many()
        .col_expr(gigs::Column::SelectedProviderId, Expr::value(Some(provider_id)))
        .col_expr(gigs::Column::DirectOfferSentAt, Expr::value(Some(now)))
        .filter(gigs::Column::Id.eq(gig_id))
        .filter(gigs::Column::SelectedProviderId.is_null())
        .filter(gigs::Column::AcceptedProviderId.is_null())
        .filter(gigs::Column::BroadcastAt.is_null())
        .filter(gigs::Column::SelectionExpiresAt.gt(now))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// CAS: the selected provider accepts inside the offer window. Clears the
/// selection in the same update, making acceptance terminal.
pub async fn try_accept_direct(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_id: Uuid,
    now: DateTime<Utc>,
) -> Result<u64, DbErr> {
    let offer_cutoff = now - Duration::seconds(OFFER_WINDOW_SECS);
    let result = gigs::Entity::update_many()
        .col_expr(gigs::Column::AcceptedProviderId, Expr::value(Some(provider_id)))
        .col_expr(gigs::Column::SelectedProviderId, Expr::value(Option::<Uuid>::None))
        .filter(gigs::Column::Id.eq(gig_id))
        .filter(gigs::Column::AcceptedProviderId.is_null())
        .filter(gigs::Column::SelectedProviderId.eq(provider_id))
        .filter(gigs::Column::BroadcastAt.is_null())
        .filter(gigs::Column::DirectOfferSentAt.gt(offer_cutoff))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// CAS: first acceptance wins on a broadcast gig — set the winner only where
/// no winner exists yet.
pub async fn try_accept(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_id: Uuid,
) -> Result<u64, DbErr> {
    let result = gigs::Entity::update_many()
        .col_expr(gigs::Column::AcceptedProviderId, Expr::value(Some(provider_id)))
        .filter(gigs::Column::Id.eq(gig_id))
        .filter(gigs::Column::AcceptedProviderId.is_null())
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// CAS: legacy open-pool claim — only valid while the gig is untouched and
/// the selection window still runs.
pub async fn try_accept_open(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_id: Uuid,
    now: DateTime<Utc>,
) -> Result<u64, DbErr> {
    let result = gigs::Entity::update_many()
        .col_expr(gigs::Column::AcceptedProviderId, Expr::value(Some(provider_id)))
        .filter(gigs::Column::Id.eq(gig_id))
        .filter(gigs::Column::AcceptedProviderId.is_null())
        .filter(gigs::Column::SelectedProviderId.is_null())
        .filter(gigs::Column::BroadcastAt.is_null())
        .filter(gigs::Column::SelectionExpiresAt.gt(now))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// CAS: stamp `broadcast_at` on a gig that has neither been broadcast nor
/// accepted, clearing any leftover selection. The caller that wins this
/// update is the one that fans out the broadcast records.
pub async fn try_mark_broadcast(
    db: &DatabaseConnection,
    gig_id: Uuid,
    now: DateTime<Utc>,
) -> Result<u64, DbErr> {
    let result = gigs::Entity::update_many()
        .col_expr(gigs::Column::BroadcastAt, Expr::value(Some(now)))
        .col_expr(gigs::Column::SelectedProviderId, Expr::value(Option::<Uuid>::None))
        .filter(gigs::Column::Id.eq(gig_id))
        .filter(gigs::Column::BroadcastAt.is_null())
        .filter(gigs::Column::AcceptedProviderId.is_null())
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// CAS: the selected provider declines — clear the offer fields, but only
/// while that provider still holds the selection.
pub async fn try_clear_direct_offer(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_id: Uuid,
) -> Result<u64, DbErr> {
    let result = gigs::Entity::update_many()
        .col_expr(gigs::Column::SelectedProviderId, Expr::value(Option::<Uuid>::None))
        .col_expr(gigs::Column::DirectOfferSentAt, Expr::value(Option::<DateTime<Utc>>::None))
        .filter(gigs::Column::Id.eq(gig_id))
        .filter(gigs::Column::SelectedProviderId.eq(provider_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
