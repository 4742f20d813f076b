use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::providers as provider_db;
use crate::engine::error::AllocationError;
use crate::models::providers::CreateProvider;

/// POST /api/providers — register a provider.
pub async fn create_provider(
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateProvider>,
) -> Result<HttpResponse, AllocationError> {
    let input = body.into_inner();
    input.validate()?;
    let provider = provider_db::insert_provider(db.get_ref(), input).await?;
    Ok(HttpResponse::Created().json(provider))
}

/// GET /api/providers/{id} — fetch a single provider.
pub async fn get_provider(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AllocationError> {
    let id = path.into_inner();
    let provider = provider_db::get_provider_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AllocationError::NotFound(format!("Provider {id} not found")))?;
    Ok(HttpResponse::Ok().json(provider))
}
