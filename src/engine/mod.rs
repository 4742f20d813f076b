//! The gig allocation engine.
//!
//! Commands validate against a snapshot of the gig, then mutate it through
//! row-level conditional updates in `db::gigs` — a zero-row result always
//! means another caller won the race, never a silent overwrite. Deadlines are
//! not enforced by a background process: every command and the status read
//! first run [`resolve_timeouts`], which performs the broadcast cascade for a
//! crossed deadline as part of handling the call.

pub mod error;
pub mod geo;
pub mod phase;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db;
use crate::models::broadcasts::BroadcastStatus;
use crate::models::clients::{self, ClientContact};
use crate::models::gigs::{self, CreateGig};
use crate::models::providers::{self, MatchedProvider};
use error::AllocationError;
use geo::ScoredMatch;

async fn require_gig(
    db: &DatabaseConnection,
    gig_id: Uuid,
) -> Result<gigs::Model, AllocationError> {
    db::gigs::get_gig_by_id(db, gig_id)
        .await?
        .ok_or_else(|| AllocationError::NotFound(format!("Gig {gig_id} not found")))
}

async fn require_provider(
    db: &DatabaseConnection,
    provider_id: Uuid,
) -> Result<providers::Model, AllocationError> {
    db::providers::get_provider_by_id(db, provider_id)
        .await?
        .ok_or_else(|| AllocationError::NotFound(format!("Provider {provider_id} not found")))
}

async fn require_client(
    db: &DatabaseConnection,
    client_id: Uuid,
) -> Result<clients::Model, AllocationError> {
    db::clients::get_client_by_id(db, client_id)
        .await?
        .ok_or_else(|| AllocationError::NotFound(format!("Client {client_id} not found")))
}

/// The broadcast transition. Exactly one caller wins the `broadcast_at` CAS;
/// the winner recomputes the full eligible set (no ranking, no truncation),
/// fans out one pending record per provider, and reports the count.
async fn run_broadcast(
    db: &DatabaseConnection,
    gig: &gigs::Model,
    now: DateTime<Utc>,
) -> Result<u64, AllocationError> {
    phase::ensure_broadcastable(gig)?;
    let rows = db::gigs::try_mark_broadcast(db, gig.id, now).await?;
    if rows == 0 {
        let current = require_gig(db, gig.id).await?;
        return Err(if current.accepted_provider_id.is_some() {
            AllocationError::NotOpen
        } else {
            AllocationError::AlreadyBroadcast
        });
    }
    let pool = db::providers::get_all_providers(db).await?;
    let eligible = geo::eligible_provider_ids(gig, &pool);
    db::broadcasts::insert_pending(db, gig.id, &eligible, now).await?;
    Ok(eligible.len() as u64)
}

/// Lazy timer evaluation: if the gig's active deadline has passed, perform
/// the same cascade a decline would, then return the fresh row. Losing the
/// cascade race to a concurrent observer is fine — the effect happened.
async fn resolve_timeouts(
    db: &DatabaseConnection,
    gig: gigs::Model,
    now: DateTime<Utc>,
) -> Result<gigs::Model, AllocationError> {
    if !phase::timeout_due(&gig, now) {
        return Ok(gig);
    }
    match run_broadcast(db, &gig, now).await {
        Ok(count) => {
            tracing::info!(
                "gig {} deadline passed, broadcast to {count} providers",
                gig.id
            );
        }
        Err(AllocationError::AlreadyBroadcast) => {}
        Err(e) => return Err(e),
    }
    require_gig(db, gig.id).await
}

/// CreateGig: validate, persist with a fresh 180s selection window, and rank
/// up to five candidate providers.
pub async fn create_gig(
    db: &DatabaseConnection,
    input: CreateGig,
) -> Result<(gigs::Model, Vec<ScoredMatch>), AllocationError> {
    input.validate()?;
    require_client(db, input.client_id).await?;
    let now = Utc::now();
    let gig = db::gigs::insert_gig(db, input, now).await?;
    let pool = db::providers::get_all_providers(db).await?;
    let matches = geo::rank_providers(&gig, &pool);
    tracing::info!("gig {} created, {} ranked matches", gig.id, matches.len());
    Ok((gig, matches))
}

/// SelectProvider: send a direct offer while the selection window is open.
pub async fn select_provider(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_id: Uuid,
) -> Result<gigs::Model, AllocationError> {
    let gig = require_gig(db, gig_id).await?;
    require_provider(db, provider_id).await?;
    let now = Utc::now();
    // The pre-cascade snapshot decides the caller's error; the cascade for a
    // crossed deadline still runs either way.
    let guard = phase::ensure_selectable(&gig, now);
    resolve_timeouts(db, gig, now).await?;
    guard?;
    let rows = db::gigs::try_select(db, gig_id, provider_id, now).await?;
    if rows == 0 {
        return Err(AllocationError::ConcurrencyConflict);
    }
    tracing::info!("gig {gig_id}: direct offer sent to provider {provider_id}");
    require_gig(db, gig_id).await
}

/// AcceptDirectOffer: the selected provider takes the gig within the offer
/// window. Terminal on success; returns the client's contact details.
pub async fn accept_direct_offer(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_id: Uuid,
) -> Result<(gigs::Model, ClientContact), AllocationError> {
    let gig = require_gig(db, gig_id).await?;
    require_provider(db, provider_id).await?;
    let now = Utc::now();
    let guard = phase::ensure_direct_offer_acceptable(&gig, provider_id, now);
    resolve_timeouts(db, gig, now).await?;
    guard?;
    let rows = db::gigs::try_accept_direct(db, gig_id, provider_id, now).await?;
    if rows == 0 {
        return Err(AllocationError::ConcurrencyConflict);
    }
    let gig = require_gig(db, gig_id).await?;
    let contact = require_client(db, gig.client_id).await?.into();
    tracing::info!("gig {gig_id}: direct offer accepted by provider {provider_id}");
    Ok((gig, contact))
}

/// DeclineDirectOffer: the selected provider turns the gig down, which
/// immediately cascades into a broadcast.
pub async fn decline_direct_offer(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_id: Uuid,
) -> Result<(), AllocationError> {
    let gig = require_gig(db, gig_id).await?;
    phase::ensure_declinable(&gig, provider_id)?;
    let now = Utc::now();
    let rows = db::gigs::try_clear_direct_offer(db, gig_id, provider_id).await?;
    if rows == 0 {
        return Err(AllocationError::ConcurrencyConflict);
    }
    match run_broadcast(db, &gig, now).await {
        Ok(count) => {
            tracing::info!(
                "gig {gig_id}: offer declined by provider {provider_id}, broadcast to {count} providers"
            );
            Ok(())
        }
        // A concurrent observer already ran the cascade.
        Err(AllocationError::AlreadyBroadcast) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Broadcast: open the gig to every eligible provider, first acceptance wins.
pub async fn broadcast(db: &DatabaseConnection, gig_id: Uuid) -> Result<u64, AllocationError> {
    let gig = require_gig(db, gig_id).await?;
    let now = Utc::now();
    let count = run_broadcast(db, &gig, now).await?;
    tracing::info!("gig {gig_id} broadcast to {count} providers");
    Ok(count)
}

/// AcceptBroadcastOffer: a provider holding a pending broadcast record races
/// to take the gig. Exactly one conditional update can win.
pub async fn accept_broadcast_offer(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_id: Uuid,
) -> Result<gigs::Model, AllocationError> {
    let gig = require_gig(db, gig_id).await?;
    require_provider(db, provider_id).await?;
    let now = Utc::now();
    let gig = resolve_timeouts(db, gig, now).await?;
    if gig.accepted_provider_id.is_some() {
        return Err(AllocationError::ConcurrencyConflict);
    }
    db::broadcasts::find_pending(db, gig_id, provider_id)
        .await?
        .ok_or_else(|| {
            AllocationError::NotFound(format!(
                "No pending broadcast offer for provider {provider_id} on gig {gig_id}"
            ))
        })?;
    let rows = db::gigs::try_accept(db, gig_id, provider_id).await?;
    if rows == 0 {
        return Err(AllocationError::ConcurrencyConflict);
    }
    db::broadcasts::set_status_if_pending(db, gig_id, provider_id, BroadcastStatus::Accepted)
        .await?;
    tracing::info!("gig {gig_id} accepted by provider {provider_id} from broadcast");
    require_gig(db, gig_id).await
}

/// DeclineBroadcastOffer: a provider bows out of the race; other pending
/// records are untouched.
pub async fn decline_broadcast_offer(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_id: Uuid,
) -> Result<(), AllocationError> {
    require_gig(db, gig_id).await?;
    let rows =
        db::broadcasts::set_status_if_pending(db, gig_id, provider_id, BroadcastStatus::Declined)
            .await?;
    if rows == 0 {
        return Err(AllocationError::NotFound(format!(
            "No pending broadcast offer for provider {provider_id} on gig {gig_id}"
        )));
    }
    Ok(())
}

/// Legacy open-pool claim: any provider may take a gig still in the open
/// phase, without a selection or broadcast in between.
pub async fn accept_open(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_id: Uuid,
) -> Result<gigs::Model, AllocationError> {
    let gig = require_gig(db, gig_id).await?;
    require_provider(db, provider_id).await?;
    let now = Utc::now();
    let gig = resolve_timeouts(db, gig, now).await?;
    phase::ensure_open(&gig)?;
    let rows = db::gigs::try_accept_open(db, gig_id, provider_id, now).await?;
    if rows == 0 {
        return Err(AllocationError::ConcurrencyConflict);
    }
    tracing::info!("gig {gig_id} claimed by provider {provider_id} from the open pool");
    require_gig(db, gig_id).await
}

/// Unified accept: an open-pool claim while the gig is open, a first-wins
/// broadcast claim once it has been broadcast. The post-cascade phase picks
/// the path.
pub async fn accept(
    db: &DatabaseConnection,
    gig_id: Uuid,
    provider_id: Uuid,
) -> Result<gigs::Model, AllocationError> {
    let gig = require_gig(db, gig_id).await?;
    let now = Utc::now();
    let gig = resolve_timeouts(db, gig, now).await?;
    match phase::phase_of(&gig) {
        phase::Phase::Broadcast | phase::Phase::Accepted => {
            accept_broadcast_offer(db, gig_id, provider_id).await
        }
        _ => accept_open(db, gig_id, provider_id).await,
    }
}

/// GetStatus: derived phase plus timer state. Crossing a deadline triggers
/// the same cascade a command would; the computation itself writes nothing.
pub async fn get_status(
    db: &DatabaseConnection,
    gig_id: Uuid,
) -> Result<phase::GigStatus, AllocationError> {
    let gig = require_gig(db, gig_id).await?;
    let now = Utc::now();
    let gig = resolve_timeouts(db, gig, now).await?;
    Ok(phase::status_of(&gig, now))
}

/// Open-phase gigs the provider is eligible for, newest first.
pub async fn matches_for_provider(
    db: &DatabaseConnection,
    provider_id: Uuid,
) -> Result<Vec<gigs::Model>, AllocationError> {
    let provider = require_provider(db, provider_id).await?;
    let open = db::gigs::get_open_gigs(db).await?;
    Ok(open
        .into_iter()
        .filter(|gig| geo::eligible_distance(gig, &provider).is_some())
        .collect())
}

/// The ranked top-5 suggestion list for a gig, recomputed from the current
/// provider pool.
pub async fn matched_providers(
    db: &DatabaseConnection,
    gig_id: Uuid,
) -> Result<Vec<MatchedProvider>, AllocationError> {
    let gig = require_gig(db, gig_id).await?;
    let pool = db::providers::get_all_providers(db).await?;
    Ok(geo::rank_providers(&gig, &pool)
        .into_iter()
        .map(ScoredMatch::into_matched)
        .collect())
}

/// Gigs on which the provider holds a pending broadcast record and which no
/// one has accepted yet.
pub async fn broadcast_offers_for_provider(
    db: &DatabaseConnection,
    provider_id: Uuid,
) -> Result<Vec<gigs::Model>, AllocationError> {
    require_provider(db, provider_id).await?;
    let records = db::broadcasts::get_pending_for_provider(db, provider_id).await?;
    let gig_ids: Vec<Uuid> = records.iter().map(|r| r.gig_id).collect();
    Ok(db::gigs::get_unaccepted_by_ids(db, gig_ids).await?)
}
