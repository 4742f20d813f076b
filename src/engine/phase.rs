//! Derived gig phase and deadline arithmetic.
//!
//! The gig row stores no status column. Its phase is computed from the
//! nullable allocation fields, so it can never drift from them. Everything in
//! this module is a pure function over a [`gigs::Model`] and a caller-supplied
//! `now`.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::error::AllocationError;
use crate::models::gigs;

/// Seconds a client has to direct-select a provider after creating a gig.
pub const SELECTION_WINDOW_SECS: i64 = 180;
/// Seconds a selected provider has to resolve a direct offer.
pub const OFFER_WINDOW_SECS: i64 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Open,
    PendingDirectOffer,
    Broadcast,
    Accepted,
}

/// Derive the gig's phase. Acceptance is terminal and wins over everything;
/// a stamped `broadcast_at` wins over a leftover selection (the transient
/// state mid-cascade).
pub fn phase_of(gig: &gigs::Model) -> Phase {
    if gig.accepted_provider_id.is_some() {
        Phase::Accepted
    } else if gig.broadcast_at.is_some() {
        Phase::Broadcast
    } else if gig.selected_provider_id.is_some() {
        Phase::PendingDirectOffer
    } else {
        Phase::Open
    }
}

/// The instant the active direct offer lapses, if one was ever sent.
pub fn offer_deadline(gig: &gigs::Model) -> Option<DateTime<Utc>> {
    gig.direct_offer_sent_at
        .map(|sent| sent + Duration::seconds(OFFER_WINDOW_SECS))
}

pub fn selection_expired(gig: &gigs::Model, now: DateTime<Utc>) -> bool {
    now >= gig.selection_expires_at
}

pub fn offer_expired(gig: &gigs::Model, now: DateTime<Utc>) -> bool {
    matches!(offer_deadline(gig), Some(deadline) if now >= deadline)
}

/// True when the gig sits in a phase whose deadline has passed, i.e. the
/// lazy broadcast cascade is due.
pub fn timeout_due(gig: &gigs::Model, now: DateTime<Utc>) -> bool {
    match phase_of(gig) {
        Phase::Open => selection_expired(gig, now),
        Phase::PendingDirectOffer => offer_expired(gig, now),
        Phase::Broadcast | Phase::Accepted => false,
    }
}

/// Wire shape of `GET /gigs/{id}/status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GigStatus {
    pub phase: Phase,
    pub selection_time_remaining_seconds: i64,
    pub accept_offer_time_remaining_seconds: i64,
    pub is_broadcast: bool,
}

pub fn status_of(gig: &gigs::Model, now: DateTime<Utc>) -> GigStatus {
    let phase = phase_of(gig);
    let offer_remaining = match (phase, offer_deadline(gig)) {
        (Phase::PendingDirectOffer, Some(deadline)) => (deadline - now).num_seconds().max(0),
        _ => 0,
    };
    GigStatus {
        phase,
        selection_time_remaining_seconds: (gig.selection_expires_at - now).num_seconds().max(0),
        accept_offer_time_remaining_seconds: offer_remaining,
        is_broadcast: gig.broadcast_at.is_some(),
    }
}

// ── Transition guards ──
//
// Each guard decides, from a snapshot of the gig, which typed error a command
// must fail with. They are evaluated against the pre-cascade snapshot so the
// caller sees the error matching the state they raced against; the actual
// mutation is still protected by a conditional update in `db::gigs`.

/// Guard for `SelectProvider`.
pub fn ensure_selectable(gig: &gigs::Model, now: DateTime<Utc>) -> Result<(), AllocationError> {
    match phase_of(gig) {
        Phase::Open if !selection_expired(gig, now) => Ok(()),
        Phase::Open => Err(AllocationError::SelectionWindowClosed),
        _ => Err(AllocationError::AlreadySelected),
    }
}

/// Guard for `AcceptDirectOffer`. A provider mismatch wins over expiry: the
/// wrong provider is rejected even when otherwise eligible.
pub fn ensure_direct_offer_acceptable(
    gig: &gigs::Model,
    provider_id: uuid::Uuid,
    now: DateTime<Utc>,
) -> Result<(), AllocationError> {
    if gig.selected_provider_id != Some(provider_id) {
        return Err(AllocationError::NotSelectedProvider);
    }
    if offer_expired(gig, now) {
        return Err(AllocationError::OfferExpired);
    }
    Ok(())
}

/// Guard for `DeclineDirectOffer` — only the selected provider may decline.
pub fn ensure_declinable(
    gig: &gigs::Model,
    provider_id: uuid::Uuid,
) -> Result<(), AllocationError> {
    if gig.selected_provider_id != Some(provider_id) {
        return Err(AllocationError::NotSelectedProvider);
    }
    Ok(())
}

/// Guard for the legacy open-pool claim, evaluated after the cascade.
pub fn ensure_open(gig: &gigs::Model) -> Result<(), AllocationError> {
    match phase_of(gig) {
        Phase::Open => Ok(()),
        _ => Err(AllocationError::NotOpen),
    }
}

/// Guard for `Broadcast`.
pub fn ensure_broadcastable(gig: &gigs::Model) -> Result<(), AllocationError> {
    if gig.accepted_provider_id.is_some() {
        return Err(AllocationError::NotOpen);
    }
    if gig.broadcast_at.is_some() {
        return Err(AllocationError::AlreadyBroadcast);
    }
    Ok(())
}
