///! Tests for the geo scorer: haversine distance, eligibility, scoring, and
///! ranking. Pure functions only — no server or database needed.
///!
///! Run with: `cargo test --test geo_test`
use chrono::{Duration, Utc};
use uuid::Uuid;

use kazilink_backend::engine::geo::{
    MAX_MATCHES, eligible_distance, eligible_provider_ids, gender_satisfied, haversine_km,
    rank_providers, score,
};
use kazilink_backend::models::gigs::{self, Category, PreferredGender};
use kazilink_backend::models::providers::{self, CategoryList, Gender, SubscriptionStatus};

/// Helper: a fresh open gig at the given coordinates.
fn gig_at(latitude: Option<f64>, longitude: Option<f64>) -> gigs::Model {
    let now = Utc::now();
    gigs::Model {
        id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        category: Category::Cleaning,
        latitude,
        longitude,
        preferred_gender: PreferredGender::None,
        payment_offer: 500,
        duration_days: 0,
        duration_hours: 4,
        address: "Kilimani, Nairobi".to_string(),
        description: "Deep clean a two-bedroom apartment".to_string(),
        selected_provider_id: None,
        accepted_provider_id: None,
        selection_expires_at: now + Duration::seconds(180),
        direct_offer_sent_at: None,
        broadcast_at: None,
        created_at: now,
    }
}

/// Helper: an active, in-range provider at the given coordinates.
fn provider_at(latitude: Option<f64>, longitude: Option<f64>) -> providers::Model {
    providers::Model {
        id: Uuid::new_v4(),
        full_name: "Wanjiku Test".to_string(),
        phone: "+254700000001".to_string(),
        gender: Gender::Female,
        photo_url: None,
        latitude,
        longitude,
        commute_distance_km: 20,
        subscription_status: SubscriptionStatus::Active,
        service_categories: CategoryList(vec![Category::Cleaning]),
        created_at: Utc::now(),
    }
}

#[test]
fn test_haversine_zero_distance() {
    let d = haversine_km(-1.2864, 36.8172, -1.2864, 36.8172);
    assert!(d.abs() < 1e-9);
}

#[test]
fn test_haversine_one_degree_of_longitude_at_equator() {
    // One degree of longitude on the equator is ~111.19 km.
    let d = haversine_km(0.0, 0.0, 0.0, 1.0);
    assert!((111.0..111.4).contains(&d), "got {d}");
}

#[test]
fn test_haversine_nairobi_cbd_to_westlands() {
    let d = haversine_km(-1.2864, 36.8172, -1.2676, 36.8108);
    assert!((2.0..2.4).contains(&d), "got {d}");
}

#[test]
fn test_score_at_zero_distance_with_gender_match() {
    assert_eq!(score(0.0, true), 150.0);
}

#[test]
fn test_score_falloff_per_kilometre() {
    assert_eq!(score(5.0, true), 100.0);
    assert_eq!(score(10.0, true), 50.0);
    assert_eq!(score(0.0, false), 100.0);
}

#[test]
fn test_score_base_clamps_at_zero() {
    // Beyond 10 km the proximity base bottoms out; only the bonus remains.
    assert_eq!(score(15.0, true), 50.0);
    assert_eq!(score(15.0, false), 0.0);
}

#[test]
fn test_gender_none_preference_always_satisfied() {
    assert!(gender_satisfied(&PreferredGender::None, &Gender::Male));
    assert!(gender_satisfied(&PreferredGender::None, &Gender::Female));
    assert!(gender_satisfied(&PreferredGender::Female, &Gender::Female));
    assert!(!gender_satisfied(&PreferredGender::Female, &Gender::Male));
}

#[test]
fn test_provider_beyond_commute_range_is_excluded() {
    let gig = gig_at(Some(0.0), Some(0.0));
    // ~5.6 km north of the gig, but only willing to commute 4 km.
    let mut provider = provider_at(Some(0.05), Some(0.0));
    provider.commute_distance_km = 4;
    assert!(eligible_distance(&gig, &provider).is_none());

    provider.commute_distance_km = 10;
    assert!(eligible_distance(&gig, &provider).is_some());
}

#[test]
fn test_missing_coordinates_exclude_outright() {
    let gig = gig_at(Some(0.0), Some(0.0));
    assert!(eligible_distance(&gig, &provider_at(None, None)).is_none());

    let bare_gig = gig_at(None, None);
    assert!(eligible_distance(&bare_gig, &provider_at(Some(0.0), Some(0.0))).is_none());
}

#[test]
fn test_expired_subscription_excludes_outright() {
    let gig = gig_at(Some(0.0), Some(0.0));
    let mut provider = provider_at(Some(0.0), Some(0.0));
    provider.subscription_status = SubscriptionStatus::Expired;
    assert!(eligible_distance(&gig, &provider).is_none());
}

#[test]
fn test_gender_mismatch_excludes_outright() {
    let mut gig = gig_at(Some(0.0), Some(0.0));
    gig.preferred_gender = PreferredGender::Male;
    let provider = provider_at(Some(0.0), Some(0.0)); // female
    assert!(eligible_distance(&gig, &provider).is_none());
}

#[test]
fn test_ranking_orders_by_score_then_distance() {
    let gig = gig_at(Some(0.0), Some(0.0));
    let near = provider_at(Some(0.009), Some(0.0)); // ~1 km
    let mid = provider_at(Some(0.045), Some(0.0)); // ~5 km
    let far = provider_at(Some(0.09), Some(0.0)); // ~10 km

    let ranked = rank_providers(&gig, &[mid.clone(), far.clone(), near.clone()]);
    let ids: Vec<_> = ranked.iter().map(|m| m.provider.id).collect();
    assert_eq!(ids, vec![near.id, mid.id, far.id]);
    assert!(ranked[0].score > ranked[1].score);
    assert!(ranked[0].distance_km < ranked[1].distance_km);
}

#[test]
fn test_ranking_breaks_exact_ties_by_provider_id() {
    let gig = gig_at(Some(0.0), Some(0.0));
    // All co-located with the gig: identical score and distance.
    let pool: Vec<_> = (0..4).map(|_| provider_at(Some(0.0), Some(0.0))).collect();

    let ranked = rank_providers(&gig, &pool);
    let ids: Vec<_> = ranked.iter().map(|m| m.provider.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[test]
fn test_ranking_truncates_to_top_five() {
    let gig = gig_at(Some(0.0), Some(0.0));
    let pool: Vec<_> = (0..8).map(|_| provider_at(Some(0.0), Some(0.0))).collect();

    let ranked = rank_providers(&gig, &pool);
    assert_eq!(ranked.len(), MAX_MATCHES);

    // The broadcast fan-out never truncates.
    assert_eq!(eligible_provider_ids(&gig, &pool).len(), 8);
}

#[test]
fn test_ranking_skips_ineligible_candidates() {
    let gig = gig_at(Some(0.0), Some(0.0));
    let eligible = provider_at(Some(0.009), Some(0.0));
    let mut lapsed = provider_at(Some(0.0), Some(0.0));
    lapsed.subscription_status = SubscriptionStatus::Expired;

    let ranked = rank_providers(&gig, &[lapsed, eligible.clone()]);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].provider.id, eligible.id);
}

#[test]
fn test_gig_without_coordinates_matches_nobody() {
    let gig = gig_at(None, None);
    let pool: Vec<_> = (0..3).map(|_| provider_at(Some(0.0), Some(0.0))).collect();
    assert!(rank_providers(&gig, &pool).is_empty());
    assert!(eligible_provider_ids(&gig, &pool).is_empty());
}
