use sea_orm::*;
use uuid::Uuid;

use crate::models::providers::{self, CategoryList, CreateProvider, SubscriptionStatus};

/// Insert a new provider. Subscription status defaults to active unless the
/// billing collaborator says otherwise.
pub async fn insert_provider(
    db: &DatabaseConnection,
    input: CreateProvider,
) -> Result<providers::Model, DbErr> {
    let new_provider = providers::ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set(input.full_name),
        phone: Set(input.phone),
        gender: Set(input.gender),
        photo_url: Set(input.photo_url),
        latitude: Set(input.latitude),
        longitude: Set(input.longitude),
        commute_distance_km: Set(input.commute_distance_km),
        subscription_status: Set(input
            .subscription_status
            .unwrap_or(SubscriptionStatus::Active)),
        service_categories: Set(CategoryList(input.service_categories)),
        created_at: Set(chrono::Utc::now()),
    };

    new_provider.insert(db).await
}

/// Fetch a single provider by ID.
pub async fn get_provider_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<providers::Model>, DbErr> {
    providers::Entity::find_by_id(id).one(db).await
}

/// Fetch the whole provider pool. Eligibility is decided by the scorer, not
/// the query.
pub async fn get_all_providers(db: &DatabaseConnection) -> Result<Vec<providers::Model>, DbErr> {
    providers::Entity::find().all(db).await
}
