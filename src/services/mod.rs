use std::sync::Arc;

use actix_web::web;

mod knowledge;

pub use knowledge::{KnowledgeService, KnowledgeServiceTrait};

use crate::{fixtures, repositories::InMemoryKnowledgeRepository};

/// Service Register
pub fn register(
    repository: Arc<InMemoryKnowledgeRepository>,
    share_base_url: String,
    cfg: &mut web::ServiceConfig,
) {
    let knowledge_service =
        KnowledgeService::new(repository, fixtures::categories(), share_base_url);
    cfg.app_data(web::Data::new(knowledge_service));
}
