use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::error::AllocationError;

/// Hard bounds on client-supplied gig fields.
pub const ADDRESS_MAX_CHARS: usize = 30;
pub const DESCRIPTION_MAX_CHARS: usize = 160;

/// Service categories stored as lowercase strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[sea_orm(string_value = "cleaning")]
    Cleaning,
    #[sea_orm(string_value = "plumbing")]
    Plumbing,
    #[sea_orm(string_value = "electrical")]
    Electrical,
    #[sea_orm(string_value = "gardening")]
    Gardening,
    #[sea_orm(string_value = "moving")]
    Moving,
    #[sea_orm(string_value = "tutoring")]
    Tutoring,
    #[sea_orm(string_value = "beauty")]
    Beauty,
    #[sea_orm(string_value = "other")]
    Other,
}

/// A client's gender preference for the gig. `None` imposes no constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum PreferredGender {
    #[sea_orm(string_value = "none")]
    None,
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
}

impl Default for PreferredGender {
    fn default() -> Self {
        Self::None
    }
}

/// SeaORM entity for the `gigs` table.
///
/// There is no stored status column: the gig's phase is derived from the
/// nullable allocation fields by `engine::phase::phase_of`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gigs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub category: Category,
    #[sea_orm(column_type = "Double", nullable)]
    pub latitude: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub longitude: Option<f64>,
    pub preferred_gender: PreferredGender,
    pub payment_offer: i32,
    pub duration_days: i32,
    pub duration_hours: i32,
    pub address: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub selected_provider_id: Option<Uuid>,
    pub accepted_provider_id: Option<Uuid>,
    pub selection_expires_at: DateTimeUtc,
    pub direct_offer_sent_at: Option<DateTimeUtc>,
    pub broadcast_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::broadcasts::Entity")]
    Broadcasts,
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Client,
}

impl Related<super::broadcasts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Broadcasts.def()
    }
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGig {
    pub client_id: Uuid,
    pub category: Category,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub preferred_gender: PreferredGender,
    pub payment_offer: i32,
    #[serde(default)]
    pub duration_days: i32,
    #[serde(default)]
    pub duration_hours: i32,
    pub address: String,
    pub description: String,
}

impl CreateGig {
    /// Check every client-supplied bound before anything touches the store.
    pub fn validate(&self) -> Result<(), AllocationError> {
        if self.address.chars().count() > ADDRESS_MAX_CHARS {
            return Err(AllocationError::Validation(format!(
                "address must be at most {ADDRESS_MAX_CHARS} characters"
            )));
        }
        if self.description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(AllocationError::Validation(format!(
                "description must be at most {DESCRIPTION_MAX_CHARS} characters"
            )));
        }
        if self.payment_offer < 1 {
            return Err(AllocationError::Validation(
                "payment offer must be at least 1".to_string(),
            ));
        }
        if self.duration_days < 0 || self.duration_hours < 0 {
            return Err(AllocationError::Validation(
                "durations cannot be negative".to_string(),
            ));
        }
        if self.duration_days == 0 && self.duration_hours == 0 {
            return Err(AllocationError::Validation(
                "duration must be positive in days or hours".to_string(),
            ));
        }
        validate_coordinates(self.latitude, self.longitude)
    }
}

/// A coordinate pair must be complete and within range, or absent entirely.
pub fn validate_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), AllocationError> {
    match (latitude, longitude) {
        (None, None) => Ok(()),
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(AllocationError::Validation(
                    "coordinates out of range".to_string(),
                ));
            }
            Ok(())
        }
        _ => Err(AllocationError::Validation(
            "latitude and longitude must be provided together".to_string(),
        )),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAction {
    pub provider_id: Uuid,
}
