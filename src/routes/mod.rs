use actix_web::{web, HttpResponse, Responder};
use log::warn;

use crate::{
    models::KnowledgeQueryParams, repositories::KnowledgeRepositoryTrait, types::AppState,
};

mod knowledge;

async fn index(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.service_info())
}

// Reports the stored article count alongside uptime, still 200 when the store is unreadable
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let articles = match state
        .repository
        .count(&KnowledgeQueryParams::default())
        .await
    {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("Health check could not count articles: {}", e);
            None
        }
    };

    HttpResponse::Ok().json(state.health(articles))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health_check));
    knowledge::configure_routes(cfg);
}
