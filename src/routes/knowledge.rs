use actix_web::web;

use crate::handlers::{
    categories_handler, create_handler, delete_handler, get_by_id_handler, like_handler,
    search_handler, share_code_handler, share_info_handler, update_handler,
};

// Configure knowledge routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/categories", web::get().to(categories_handler));
    cfg.service(
        web::scope("/api/knowledge")
            .route("", web::post().to(create_handler))
            .route("", web::get().to(search_handler))
            // `.*` also matches an empty code so it is rejected as malformed, not unrouted
            .route("/share/{share_code:.*}", web::get().to(share_code_handler))
            .route("/{id}", web::get().to(get_by_id_handler))
            .route("/{id}", web::patch().to(update_handler))
            .route("/{id}", web::delete().to(delete_handler))
            .route("/{id}/like", web::post().to(like_handler))
            .route("/{id}/share", web::get().to(share_info_handler)),
    );
}
