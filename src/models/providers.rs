use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::gigs::{Category, validate_coordinates};
use crate::engine::error::AllocationError;

/// Provider gender stored as a lowercase string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
}

/// Subscription state supplied by the billing collaborator. Only `Active`
/// providers are eligible for allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "expired")]
    Expired,
}

/// Typed JSONB column: the set of categories a provider offers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct CategoryList(pub Vec<Category>);

/// SeaORM entity for the `providers` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "providers")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub gender: Gender,
    pub photo_url: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub latitude: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub longitude: Option<f64>,
    pub commute_distance_km: i32,
    pub subscription_status: SubscriptionStatus,
    #[sea_orm(column_type = "JsonBinary")]
    pub service_categories: CategoryList,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::broadcasts::Entity")]
    Broadcasts,
}

impl Related<super::broadcasts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Broadcasts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProvider {
    pub full_name: String,
    pub phone: String,
    pub gender: Gender,
    pub photo_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub commute_distance_km: i32,
    #[serde(default)]
    pub service_categories: Vec<Category>,
    /// Normally written by the billing collaborator; new providers default
    /// to an active subscription.
    pub subscription_status: Option<SubscriptionStatus>,
}

impl CreateProvider {
    pub fn validate(&self) -> Result<(), AllocationError> {
        if !(1..=100).contains(&self.commute_distance_km) {
            return Err(AllocationError::Validation(
                "commute distance must be between 1 and 100 km".to_string(),
            ));
        }
        validate_coordinates(self.latitude, self.longitude)
    }
}

/// One row of the ranked top-5 suggestion list for a gig.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedProvider {
    pub id: Uuid,
    pub gender: Gender,
    pub photo_url: Option<String>,
    pub distance_km: f64,
}
