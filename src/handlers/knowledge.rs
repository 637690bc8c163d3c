use actix_web::{web, HttpResponse, Responder};
use log::{debug, info};
use serde_json::json;

use crate::{
    models::{CreateKnowledgeDto, KnowledgeQueryParams, UpdateKnowledgeDto},
    repositories::InMemoryKnowledgeRepository,
    services::{KnowledgeService, KnowledgeServiceTrait},
    types::Result,
};

pub type KnowledgeServiceType = KnowledgeService<InMemoryKnowledgeRepository>;

/// Create knowledge route handler
pub async fn create_handler(
    dto: web::Json<CreateKnowledgeDto>,
    service: web::Data<KnowledgeServiceType>,
) -> Result<impl Responder> {
    let item = service.create(dto.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({
        "data": item,
        "message": "Successfully created knowledge",
    })))
}

/// Search knowledge route handler
pub async fn search_handler(
    query: web::Query<KnowledgeQueryParams>,
    service: web::Data<KnowledgeServiceType>,
) -> Result<impl Responder> {
    let page = service.search(&query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": page,
        "message": "Successfully retrieved knowledge",
    })))
}

/// Get knowledge by ID route handler
pub async fn get_by_id_handler(
    id: web::Path<i64>,
    service: web::Data<KnowledgeServiceType>,
) -> Result<impl Responder> {
    let item = service.get_by_id(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": item,
        "message": "Successfully retrieved knowledge",
    })))
}

/// Update knowledge route handler
pub async fn update_handler(
    id: web::Path<i64>,
    params: web::Json<UpdateKnowledgeDto>,
    service: web::Data<KnowledgeServiceType>,
) -> Result<impl Responder> {
    let item = service.update(id.into_inner(), params.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": item,
        "message": "Successfully updated knowledge",
    })))
}

/// Delete knowledge route handler
pub async fn delete_handler(
    id: web::Path<i64>,
    service: web::Data<KnowledgeServiceType>,
) -> Result<impl Responder> {
    let id = id.into_inner();
    service.delete(id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "deleted_id": id,
        "message": format!("Successfully deleted knowledge with ID '{}'", id),
    })))
}

/// Like knowledge route handler
pub async fn like_handler(
    id: web::Path<i64>,
    service: web::Data<KnowledgeServiceType>,
) -> Result<impl Responder> {
    let item = service.like(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": item,
        "message": "Successfully liked knowledge",
    })))
}

/// Share link route handler
pub async fn share_info_handler(
    id: web::Path<i64>,
    service: web::Data<KnowledgeServiceType>,
) -> Result<impl Responder> {
    let info = service.share_info(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": info,
        "message": "Successfully generated share link",
    })))
}

/// Resolve share code route handler
pub async fn share_code_handler(
    path: web::Path<String>,
    service: web::Data<KnowledgeServiceType>,
) -> Result<impl Responder> {
    let share_code = path.into_inner();
    debug!("Share lookup requested for code: {}", share_code);

    // Fails with 400 for a malformed code and 404 for an unknown one
    let item = service.get_by_share_code(&share_code).await?;

    info!("Resolved share code '{}' to knowledge {}", share_code, item.id);
    Ok(HttpResponse::Ok().json(json!({
        "data": item,
        "message": "Successfully retrieved shared knowledge",
    })))
}

/// List categories route handler
pub async fn categories_handler(service: web::Data<KnowledgeServiceType>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "data": service.categories(),
        "message": "Successfully retrieved categories",
    }))
}
