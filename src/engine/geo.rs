//! GeoScorer: distance, eligibility, and ranking for (gig, provider) pairs.
//! Pure functions, no store access.

use uuid::Uuid;

use crate::models::gigs::{self, PreferredGender};
use crate::models::providers::{self, Gender, MatchedProvider, SubscriptionStatus};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Length of the ranked suggestion list.
pub const MAX_MATCHES: usize = 5;
/// Below this many candidates the pool is logged as thin; the gig proceeds.
pub const MIN_EXPECTED_MATCHES: usize = 3;

/// Great-circle distance between two coordinates via the haversine formula.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// A `none` preference always satisfies the constraint.
pub fn gender_satisfied(preferred: &PreferredGender, gender: &Gender) -> bool {
    match preferred {
        PreferredGender::None => true,
        PreferredGender::Male => *gender == Gender::Male,
        PreferredGender::Female => *gender == Gender::Female,
    }
}

/// Ranking score for an eligible candidate. Proximity dominates; the gender
/// bonus rewards a satisfied preference.
pub fn score(distance_km: f64, gender_matched: bool) -> f64 {
    let base = (100.0 - distance_km * 10.0).max(0.0);
    if gender_matched { base + 50.0 } else { base }
}

/// Distance to the provider if they are eligible for the gig, `None` if they
/// are excluded outright: inactive subscription, a missing coordinate pair on
/// either side, an unsatisfied gender constraint, or out of commute range.
pub fn eligible_distance(gig: &gigs::Model, provider: &providers::Model) -> Option<f64> {
    if provider.subscription_status != SubscriptionStatus::Active {
        return None;
    }
    let (gig_lat, gig_lon) = match (gig.latitude, gig.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return None,
    };
    let (prov_lat, prov_lon) = match (provider.latitude, provider.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return None,
    };
    if !gender_satisfied(&gig.preferred_gender, &provider.gender) {
        return None;
    }
    let distance_km = haversine_km(gig_lat, gig_lon, prov_lat, prov_lon);
    if distance_km > provider.commute_distance_km as f64 {
        return None;
    }
    Some(distance_km)
}

/// Ids of every provider in the pool eligible for the gig, in pool order.
/// Used by the broadcast fan-out, which ranks and truncates nothing.
pub fn eligible_provider_ids(gig: &gigs::Model, pool: &[providers::Model]) -> Vec<Uuid> {
    pool.iter()
        .filter(|p| eligible_distance(gig, p).is_some())
        .map(|p| p.id)
        .collect()
}

/// One ranked candidate for a gig.
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    pub provider: providers::Model,
    pub distance_km: f64,
    pub score: f64,
}

impl ScoredMatch {
    pub fn into_matched(self) -> MatchedProvider {
        MatchedProvider {
            id: self.provider.id,
            gender: self.provider.gender,
            photo_url: self.provider.photo_url,
            distance_km: self.distance_km,
        }
    }
}

/// Rank the eligible candidates for a gig: score descending, ties broken by
/// distance ascending then provider id ascending, truncated to the top 5.
pub fn rank_providers(gig: &gigs::Model, pool: &[providers::Model]) -> Vec<ScoredMatch> {
    let mut candidates: Vec<ScoredMatch> = pool
        .iter()
        .filter_map(|provider| {
            eligible_distance(gig, provider).map(|distance_km| ScoredMatch {
                score: score(
                    distance_km,
                    gender_satisfied(&gig.preferred_gender, &provider.gender),
                ),
                distance_km,
                provider: provider.clone(),
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.distance_km.total_cmp(&b.distance_km))
            .then(a.provider.id.cmp(&b.provider.id))
    });

    if candidates.len() < MIN_EXPECTED_MATCHES {
        tracing::warn!(
            "gig {} matched only {} candidate providers",
            gig.id,
            candidates.len()
        );
    }

    candidates.truncate(MAX_MATCHES);
    candidates
}
