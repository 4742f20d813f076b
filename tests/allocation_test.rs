///! Tests for gig validation bounds and the allocation transition guards.
///! The guards are pure functions over a gig snapshot, so every wrong-phase,
///! wrong-provider, and expired-deadline outcome can be pinned down without
///! a database.
///!
///! Run with: `cargo test --test allocation_test`
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use kazilink_backend::engine::error::AllocationError;
use kazilink_backend::engine::phase::{
    SELECTION_WINDOW_SECS, ensure_broadcastable, ensure_declinable,
    ensure_direct_offer_acceptable, ensure_open, ensure_selectable,
};
use kazilink_backend::models::gigs::{self, Category, CreateGig, PreferredGender};
use kazilink_backend::models::providers::{CreateProvider, Gender};

/// Helper: a request that passes every validation bound.
fn valid_create_gig() -> CreateGig {
    CreateGig {
        client_id: Uuid::new_v4(),
        category: Category::Gardening,
        latitude: Some(-0.0917),
        longitude: Some(34.7680),
        preferred_gender: PreferredGender::None,
        payment_offer: 300,
        duration_days: 0,
        duration_hours: 3,
        address: "Milimani, Kisumu".to_string(),
        description: "Trim the hedge and mow the lawn".to_string(),
    }
}

/// Helper: a fresh open gig created at `now`.
fn open_gig(now: DateTime<Utc>) -> gigs::Model {
    gigs::Model {
        id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        category: Category::Gardening,
        latitude: Some(-0.0917),
        longitude: Some(34.7680),
        preferred_gender: PreferredGender::None,
        payment_offer: 300,
        duration_days: 0,
        duration_hours: 3,
        address: "Milimani, Kisumu".to_string(),
        description: "Trim the hedge and mow the lawn".to_string(),
        selected_provider_id: None,
        accepted_provider_id: None,
        selection_expires_at: now + Duration::seconds(SELECTION_WINDOW_SECS),
        direct_offer_sent_at: None,
        broadcast_at: None,
        created_at: now,
    }
}

// ── Validation bounds ──

#[test]
fn test_address_bound_is_thirty_chars() {
    let mut input = valid_create_gig();
    input.address = "a".repeat(30);
    assert!(input.validate().is_ok());

    input.address = "a".repeat(31);
    assert!(matches!(
        input.validate(),
        Err(AllocationError::Validation(_))
    ));
}

#[test]
fn test_description_bound_is_one_sixty_chars() {
    let mut input = valid_create_gig();
    input.description = "d".repeat(160);
    assert!(input.validate().is_ok());

    input.description = "d".repeat(161);
    assert!(matches!(
        input.validate(),
        Err(AllocationError::Validation(_))
    ));
}

#[test]
fn test_payment_offer_must_be_at_least_one() {
    let mut input = valid_create_gig();
    input.payment_offer = 1;
    assert!(input.validate().is_ok());

    input.payment_offer = 0;
    assert!(matches!(
        input.validate(),
        Err(AllocationError::Validation(_))
    ));
}

#[test]
fn test_duration_must_be_positive_in_some_unit() {
    let mut input = valid_create_gig();
    input.duration_days = 0;
    input.duration_hours = 0;
    assert!(matches!(
        input.validate(),
        Err(AllocationError::Validation(_))
    ));

    input.duration_days = 2;
    assert!(input.validate().is_ok());

    input.duration_hours = -1;
    assert!(matches!(
        input.validate(),
        Err(AllocationError::Validation(_))
    ));
}

#[test]
fn test_coordinates_must_come_as_a_pair() {
    let mut input = valid_create_gig();
    input.latitude = None;
    input.longitude = None;
    assert!(input.validate().is_ok());

    input.latitude = Some(-1.3);
    assert!(matches!(
        input.validate(),
        Err(AllocationError::Validation(_))
    ));

    input.longitude = Some(480.0);
    assert!(matches!(
        input.validate(),
        Err(AllocationError::Validation(_))
    ));
}

#[test]
fn test_provider_commute_distance_bounds() {
    let mut input = CreateProvider {
        full_name: "Otieno Test".to_string(),
        phone: "+254711000000".to_string(),
        gender: Gender::Male,
        photo_url: None,
        latitude: None,
        longitude: None,
        commute_distance_km: 1,
        service_categories: vec![Category::Moving],
        subscription_status: None,
    };
    assert!(input.validate().is_ok());

    input.commute_distance_km = 100;
    assert!(input.validate().is_ok());

    input.commute_distance_km = 0;
    assert!(matches!(
        input.validate(),
        Err(AllocationError::Validation(_))
    ));

    input.commute_distance_km = 101;
    assert!(matches!(
        input.validate(),
        Err(AllocationError::Validation(_))
    ));
}

// ── Transition guards ──

#[test]
fn test_select_allowed_only_inside_open_window() {
    let now = Utc::now();
    let gig = open_gig(now);
    assert!(ensure_selectable(&gig, now).is_ok());

    let past_deadline = now + Duration::seconds(SELECTION_WINDOW_SECS + 1);
    assert!(matches!(
        ensure_selectable(&gig, past_deadline),
        Err(AllocationError::SelectionWindowClosed)
    ));
}

#[test]
fn test_select_rejected_once_a_provider_is_selected() {
    let now = Utc::now();
    let mut gig = open_gig(now);
    gig.selected_provider_id = Some(Uuid::new_v4());
    gig.direct_offer_sent_at = Some(now);
    assert!(matches!(
        ensure_selectable(&gig, now),
        Err(AllocationError::AlreadySelected)
    ));

    let mut broadcast = open_gig(now);
    broadcast.broadcast_at = Some(now);
    assert!(matches!(
        ensure_selectable(&broadcast, now),
        Err(AllocationError::AlreadySelected)
    ));
}

#[test]
fn test_accept_direct_offer_happy_path() {
    let now = Utc::now();
    let provider_id = Uuid::new_v4();
    let mut gig = open_gig(now);
    gig.selected_provider_id = Some(provider_id);
    gig.direct_offer_sent_at = Some(now);

    assert!(ensure_direct_offer_acceptable(&gig, provider_id, now).is_ok());
}

#[test]
fn test_accept_direct_offer_rejects_wrong_provider_even_if_eligible() {
    let now = Utc::now();
    let mut gig = open_gig(now);
    gig.selected_provider_id = Some(Uuid::new_v4());
    gig.direct_offer_sent_at = Some(now);

    let someone_else = Uuid::new_v4();
    assert!(matches!(
        ensure_direct_offer_acceptable(&gig, someone_else, now),
        Err(AllocationError::NotSelectedProvider)
    ));

    // The mismatch wins even after the window lapses.
    let late = now + Duration::seconds(500);
    assert!(matches!(
        ensure_direct_offer_acceptable(&gig, someone_else, late),
        Err(AllocationError::NotSelectedProvider)
    ));
}

#[test]
fn test_accept_direct_offer_rejects_expired_window() {
    let now = Utc::now();
    let provider_id = Uuid::new_v4();
    let mut gig = open_gig(now);
    gig.selected_provider_id = Some(provider_id);
    gig.direct_offer_sent_at = Some(now);

    let late = now + Duration::seconds(181);
    assert!(matches!(
        ensure_direct_offer_acceptable(&gig, provider_id, late),
        Err(AllocationError::OfferExpired)
    ));
}

#[test]
fn test_decline_requires_holding_the_selection() {
    let now = Utc::now();
    let provider_id = Uuid::new_v4();
    let mut gig = open_gig(now);
    gig.selected_provider_id = Some(provider_id);

    assert!(ensure_declinable(&gig, provider_id).is_ok());
    assert!(matches!(
        ensure_declinable(&gig, Uuid::new_v4()),
        Err(AllocationError::NotSelectedProvider)
    ));

    gig.selected_provider_id = None;
    assert!(matches!(
        ensure_declinable(&gig, provider_id),
        Err(AllocationError::NotSelectedProvider)
    ));
}

#[test]
fn test_open_pool_claim_requires_open_phase() {
    let now = Utc::now();
    assert!(ensure_open(&open_gig(now)).is_ok());

    let mut broadcast = open_gig(now);
    broadcast.broadcast_at = Some(now);
    assert!(matches!(
        ensure_open(&broadcast),
        Err(AllocationError::NotOpen)
    ));

    let mut accepted = open_gig(now);
    accepted.accepted_provider_id = Some(Uuid::new_v4());
    assert!(matches!(
        ensure_open(&accepted),
        Err(AllocationError::NotOpen)
    ));
}

#[test]
fn test_broadcast_is_guarded_against_repeats_and_terminal_gigs() {
    let now = Utc::now();
    assert!(ensure_broadcastable(&open_gig(now)).is_ok());

    let mut broadcast = open_gig(now);
    broadcast.broadcast_at = Some(now);
    assert!(matches!(
        ensure_broadcastable(&broadcast),
        Err(AllocationError::AlreadyBroadcast)
    ));

    let mut accepted = open_gig(now);
    accepted.accepted_provider_id = Some(Uuid::new_v4());
    assert!(matches!(
        ensure_broadcastable(&accepted),
        Err(AllocationError::NotOpen)
    ));
}

// ── Error surface ──

#[test]
fn test_error_kinds_are_stable() {
    assert_eq!(AllocationError::SelectionWindowClosed.kind(), "SelectionWindowClosed");
    assert_eq!(AllocationError::OfferExpired.kind(), "OfferExpired");
    assert_eq!(AllocationError::AlreadyBroadcast.kind(), "AlreadyBroadcast");
    assert_eq!(AllocationError::AlreadySelected.kind(), "AlreadySelected");
    assert_eq!(AllocationError::NotSelectedProvider.kind(), "NotSelectedProvider");
    assert_eq!(AllocationError::NotOpen.kind(), "NotOpen");
    assert_eq!(AllocationError::ConcurrencyConflict.kind(), "ConcurrencyConflict");
    assert_eq!(AllocationError::NotFound("x".into()).kind(), "NotFound");
    assert_eq!(AllocationError::Validation("x".into()).kind(), "ValidationError");
}

#[test]
fn test_error_status_codes_follow_the_surface_contract() {
    use actix_web::ResponseError;

    assert_eq!(AllocationError::NotFound("x".into()).status_code(), 404);
    assert_eq!(AllocationError::NotSelectedProvider.status_code(), 403);
    assert_eq!(AllocationError::ConcurrencyConflict.status_code(), 409);
    assert_eq!(AllocationError::SelectionWindowClosed.status_code(), 400);
    assert_eq!(AllocationError::AlreadyBroadcast.status_code(), 400);
}
