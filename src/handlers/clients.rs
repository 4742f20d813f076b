use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::clients as client_db;
use crate::engine::error::AllocationError;
use crate::models::clients::CreateClient;

/// POST /api/clients — register a client.
pub async fn create_client(
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateClient>,
) -> Result<HttpResponse, AllocationError> {
    let client = client_db::insert_client(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(client))
}

/// GET /api/clients/{id} — fetch a single client.
pub async fn get_client(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AllocationError> {
    let id = path.into_inner();
    let client = client_db::get_client_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AllocationError::NotFound(format!("Client {id} not found")))?;
    Ok(HttpResponse::Ok().json(client))
}
