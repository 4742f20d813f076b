use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::gigs as gig_db;
use crate::engine;
use crate::engine::error::AllocationError;
use crate::engine::geo::ScoredMatch;
use crate::models::gigs::{CreateGig, ProviderAction};

/// POST /api/gigs — create a gig and return its ranked matches.
pub async fn create_gig(
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateGig>,
) -> Result<HttpResponse, AllocationError> {
    let (gig, matches) = engine::create_gig(db.get_ref(), body.into_inner()).await?;
    let matched_providers: Vec<_> = matches.into_iter().map(ScoredMatch::into_matched).collect();
    Ok(HttpResponse::Created().json(serde_json::json!({
        "gig": gig,
        "matchedProviders": matched_providers,
    })))
}

/// GET /api/gigs/{gig_id} — fetch a single gig.
pub async fn get_gig(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AllocationError> {
    let gig_id = path.into_inner();
    let gig = gig_db::get_gig_by_id(db.get_ref(), gig_id)
        .await?
        .ok_or_else(|| AllocationError::NotFound(format!("Gig {gig_id} not found")))?;
    Ok(HttpResponse::Ok().json(gig))
}

/// GET /api/gigs/client/{client_id} — a client's gigs, newest first.
pub async fn get_gigs_by_client(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AllocationError> {
    let gigs = gig_db::get_gigs_by_client_id(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(gigs))
}

/// GET /api/gigs/matches/{provider_id} — open gigs the provider is eligible
/// for.
pub async fn get_matches_for_provider(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AllocationError> {
    let gigs = engine::matches_for_provider(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(gigs))
}

/// GET /api/gigs/broadcast-offers/{provider_id} — gigs the provider may race
/// to accept.
pub async fn get_broadcast_offers(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AllocationError> {
    let gigs = engine::broadcast_offers_for_provider(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(gigs))
}

/// GET /api/gigs/{gig_id}/matched-providers — the ranked top-5 list.
pub async fn get_matched_providers(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AllocationError> {
    let matched = engine::matched_providers(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(matched))
}

/// POST /api/gigs/{gig_id}/select-provider — direct-select a candidate.
pub async fn select_provider(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<ProviderAction>,
) -> Result<HttpResponse, AllocationError> {
    let gig = engine::select_provider(db.get_ref(), path.into_inner(), body.provider_id).await?;
    Ok(HttpResponse::Ok().json(gig))
}

/// POST /api/gigs/{gig_id}/accept-direct-offer — the selected provider takes
/// the gig and receives the client's contact details.
pub async fn accept_direct_offer(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<ProviderAction>,
) -> Result<HttpResponse, AllocationError> {
    let (_gig, contact) =
        engine::accept_direct_offer(db.get_ref(), path.into_inner(), body.provider_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "clientContact": contact,
    })))
}

/// POST /api/gigs/{gig_id}/decline-direct-offer — the selected provider turns
/// the gig down; it is broadcast immediately.
pub async fn decline_direct_offer(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<ProviderAction>,
) -> Result<HttpResponse, AllocationError> {
    let gig_id = path.into_inner();
    engine::decline_direct_offer(db.get_ref(), gig_id, body.provider_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Offer declined, gig {gig_id} broadcast"),
    })))
}

/// POST /api/gigs/{gig_id}/broadcast — open the gig to all eligible
/// providers.
pub async fn broadcast(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AllocationError> {
    let count = engine::broadcast(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "broadcastCount": count,
    })))
}

/// POST /api/gigs/{gig_id}/decline-broadcast-offer — bow out of the race.
pub async fn decline_broadcast_offer(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<ProviderAction>,
) -> Result<HttpResponse, AllocationError> {
    let gig_id = path.into_inner();
    engine::decline_broadcast_offer(db.get_ref(), gig_id, body.provider_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Broadcast offer on gig {gig_id} declined"),
    })))
}

/// GET /api/gigs/{gig_id}/status — derived phase and timer state.
pub async fn get_status(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AllocationError> {
    let status = engine::get_status(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(status))
}

/// POST /api/gigs/{gig_id}/accept-broadcast-offer — race to take a broadcast
/// gig; first acceptance wins.
pub async fn accept_broadcast_offer(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<ProviderAction>,
) -> Result<HttpResponse, AllocationError> {
    let gig =
        engine::accept_broadcast_offer(db.get_ref(), path.into_inner(), body.provider_id).await?;
    Ok(HttpResponse::Ok().json(gig))
}

/// PUT /api/gigs/{gig_id}/accept — provider claim: the legacy open-pool path
/// while the gig is open, the broadcast race once it has been broadcast.
pub async fn accept(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<ProviderAction>,
) -> Result<HttpResponse, AllocationError> {
    let gig = engine::accept(db.get_ref(), path.into_inner(), body.provider_id).await?;
    Ok(HttpResponse::Ok().json(gig))
}
