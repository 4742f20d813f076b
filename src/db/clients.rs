use sea_orm::*;
use uuid::Uuid;

use crate::models::clients::{self, CreateClient};

/// Insert a new client.
pub async fn insert_client(
    db: &DatabaseConnection,
    input: CreateClient,
) -> Result<clients::Model, DbErr> {
    let new_client = clients::ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set(input.full_name),
        phone: Set(input.phone),
        county: Set(input.county),
        created_at: Set(chrono::Utc::now()),
    };

    new_client.insert(db).await
}

/// Fetch a single client by ID.
pub async fn get_client_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<clients::Model>, DbErr> {
    clients::Entity::find_by_id(id).one(db).await
}
