// src/services/knowledge.rs - Business logic
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use validator::Validate;

use crate::errors::AppError;
use crate::models::{
    Category, CreateKnowledgeDto, Knowledge, KnowledgeQueryParams, KnowledgeResponseDto,
    NewKnowledge, Page, ShareInfoDto, UpdateKnowledgeDto,
};
use crate::repositories::KnowledgeRepositoryTrait;
use crate::utils::{decode_share_code, is_valid_share_code, ShareCodeError};

type Result<T> = std::result::Result<T, AppError>;

#[async_trait]
pub trait KnowledgeServiceTrait {
    async fn create(&self, dto: CreateKnowledgeDto) -> Result<KnowledgeResponseDto>;
    async fn get_by_id(&self, id: i64) -> Result<KnowledgeResponseDto>;
    async fn search(&self, params: &KnowledgeQueryParams) -> Result<Page<KnowledgeResponseDto>>;
    async fn update(&self, id: i64, dto: UpdateKnowledgeDto) -> Result<KnowledgeResponseDto>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn like(&self, id: i64) -> Result<KnowledgeResponseDto>;
    async fn get_by_share_code(&self, code: &str) -> Result<KnowledgeResponseDto>;
    async fn share_info(&self, id: i64) -> Result<ShareInfoDto>;
    fn categories(&self) -> Vec<Category>;
}

pub struct KnowledgeService<T: KnowledgeRepositoryTrait> {
    repository: Arc<T>,
    categories: Arc<Vec<Category>>,
    share_base_url: String,
}

impl<T: KnowledgeRepositoryTrait> KnowledgeService<T> {
    pub fn new(repository: Arc<T>, categories: Vec<Category>, share_base_url: String) -> Self {
        Self {
            repository,
            categories: Arc::new(categories),
            share_base_url,
        }
    }

    fn to_response(&self, item: Knowledge) -> KnowledgeResponseDto {
        KnowledgeResponseDto::new(item, &self.share_base_url, Utc::now())
    }

    fn ensure_category(&self, category_id: i64) -> Result<()> {
        if self.categories.iter().any(|c| c.id == category_id) {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Unknown category id {}",
                category_id
            )))
        }
    }

    fn not_found(id: i64) -> AppError {
        AppError::NotFound(format!("Knowledge with ID {} not found", id))
    }

    // Counts the visit but still serves the article if it vanished in between
    async fn record_view(&self, item: Knowledge) -> Result<Knowledge> {
        Ok(self.repository.increment_views(item.id).await?.unwrap_or(item))
    }
}

#[async_trait]
impl<T: KnowledgeRepositoryTrait> KnowledgeServiceTrait for KnowledgeService<T> {
    async fn create(&self, dto: CreateKnowledgeDto) -> Result<KnowledgeResponseDto> {
        dto.validate()?;
        self.ensure_category(dto.category_id)?;

        let record = self.repository.save(NewKnowledge::from(dto)).await?;
        info!(
            "Created knowledge {} with share code {}",
            record.id, record.share_code
        );

        Ok(self.to_response(record))
    }

    async fn get_by_id(&self, id: i64) -> Result<KnowledgeResponseDto> {
        let item = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Self::not_found(id))?;

        let item = self.record_view(item).await?;
        Ok(self.to_response(item))
    }

    async fn search(&self, params: &KnowledgeQueryParams) -> Result<Page<KnowledgeResponseDto>> {
        let (items, total) = self.repository.search(params).await?;
        debug!("Search {:?} matched {} articles", params, total);

        Ok(Page {
            items: items.into_iter().map(|k| self.to_response(k)).collect(),
            total,
            page: params.page(),
            size: params.size(),
        })
    }

    async fn update(&self, id: i64, dto: UpdateKnowledgeDto) -> Result<KnowledgeResponseDto> {
        dto.validate()?;
        if dto.is_empty() {
            return Err(AppError::Validation(
                "At least one field must be provided".to_string(),
            ));
        }
        if let Some(category_id) = dto.category_id {
            self.ensure_category(category_id)?;
        }

        let item = self
            .repository
            .update(id, &dto)
            .await?
            .ok_or_else(|| Self::not_found(id))?;

        Ok(self.to_response(item))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.repository.delete(id, true).await?;
        info!("Deleted knowledge {}", id);
        Ok(())
    }

    async fn like(&self, id: i64) -> Result<KnowledgeResponseDto> {
        let item = self
            .repository
            .increment_likes(id)
            .await?
            .ok_or_else(|| Self::not_found(id))?;

        Ok(self.to_response(item))
    }

    async fn get_by_share_code(&self, code: &str) -> Result<KnowledgeResponseDto> {
        // Reject malformed codes before touching the store
        if !is_valid_share_code(code) {
            debug!("Rejected malformed share code '{}'", code);
            return Err(AppError::Validation(
                "Invalid share code format".to_string(),
            ));
        }

        // Well-formed but never generated, no record can carry it
        if let Err(e @ ShareCodeError::NotIssued(_)) = decode_share_code(code) {
            debug!("{}", e);
            return Err(e.into());
        }

        let item = self
            .repository
            .find_by_share_code(code)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No knowledge shared under code '{}'", code))
            })?;

        let item = self.record_view(item).await?;
        Ok(self.to_response(item))
    }

    async fn share_info(&self, id: i64) -> Result<ShareInfoDto> {
        let item = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Self::not_found(id))?;

        Ok(ShareInfoDto {
            id: item.id,
            share_url: item.share_code.url(&self.share_base_url),
            share_code: item.share_code,
        })
    }

    fn categories(&self) -> Vec<Category> {
        self.categories.as_ref().clone()
    }
}

#[cfg(test)]
mod tests {
    use fake::faker::lorem::en::{Paragraph, Sentence};
    use fake::faker::name::en::Name;
    use fake::Fake;

    use super::*;
    use crate::errors::RepositoryError;
    use crate::fixtures;
    use crate::repositories::{InMemoryKnowledgeRepository, MockKnowledgeRepositoryTrait};
    use crate::utils::generate_share_code;

    const BASE_URL: &str = "https://kb.example.com/s";

    fn service_with<T: KnowledgeRepositoryTrait>(repo: T) -> KnowledgeService<T> {
        KnowledgeService::new(Arc::new(repo), fixtures::categories(), BASE_URL.to_string())
    }

    fn fake_dto() -> CreateKnowledgeDto {
        let title: String = Sentence(2..5).fake();
        let author: String = Name().fake();
        CreateKnowledgeDto {
            title: title.chars().take(200).collect(),
            summary: None,
            content: Paragraph(2..4).fake(),
            category_id: 1,
            author: author.chars().take(50).collect(),
            tags: vec!["science".into()],
        }
    }

    fn stored(id: i64) -> Knowledge {
        Knowledge::from_new(
            id,
            generate_share_code(id).unwrap(),
            NewKnowledge::from(fake_dto()),
        )
    }

    #[tokio::test]
    async fn test_create_assigns_share_code_and_url() {
        let service = service_with(InMemoryKnowledgeRepository::new());

        let created = service.create(fake_dto()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.share_code.as_str(), "EKJF");
        assert_eq!(created.share_url, "https://kb.example.com/s/EKJF");
        assert_eq!(created.created_ago, "just now");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let service = service_with(InMemoryKnowledgeRepository::new());

        let blank = CreateKnowledgeDto {
            title: String::new(),
            ..fake_dto()
        };
        assert!(matches!(
            service.create(blank).await,
            Err(AppError::Validation(_))
        ));

        let unknown_category = CreateKnowledgeDto {
            category_id: 999,
            ..fake_dto()
        };
        match service.create(unknown_category).await {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Unknown category id 999"),
            other => panic!("unexpected result: {:?}", other.map(|d| d.id)),
        }
    }

    #[tokio::test]
    async fn test_share_code_lookup_distinguishes_invalid_from_missing() {
        let service = service_with(InMemoryKnowledgeRepository::new());
        let created = service.create(fake_dto()).await.unwrap();

        let found = service
            .get_by_share_code(created.share_code.as_str())
            .await
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.view_count, 1);

        // Valid format, no record
        let unknown = generate_share_code(9).unwrap();
        assert!(matches!(
            service.get_by_share_code(unknown.as_str()).await,
            Err(AppError::NotFound(_))
        ));

        for malformed in ["", "XK123", "EK", "EK0OIl", "ekAbc123"] {
            assert!(
                matches!(
                    service.get_by_share_code(malformed).await,
                    Err(AppError::Validation(_))
                ),
                "accepted {:?}",
                malformed
            );
        }
    }

    #[tokio::test]
    async fn test_malformed_share_code_never_reaches_repository() {
        let mut repo = MockKnowledgeRepositoryTrait::new();
        repo.expect_find_by_share_code().never();
        let service = service_with(repo);

        assert!(matches!(
            service.get_by_share_code("EK0OIl").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unissued_share_code_skips_the_scan() {
        let mut repo = MockKnowledgeRepositoryTrait::new();
        repo.expect_find_by_share_code().never();
        let service = service_with(repo);

        // "EKAbc123" is well formed but decodes to no entity id
        assert!(matches!(
            service.get_by_share_code("EKAbc123").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_share_code_lookup_uses_stored_code() {
        let mut repo = MockKnowledgeRepositoryTrait::new();
        repo.expect_find_by_share_code()
            .times(1)
            .returning(|_| Ok(Some(stored(9))));
        repo.expect_increment_views()
            .times(1)
            .returning(|_| Ok(None));
        let service = service_with(repo);

        let found = service.get_by_share_code("EK3gB").await.unwrap();
        assert_eq!(found.id, 9);
        assert_eq!(found.share_url, "https://kb.example.com/s/EK3gB");
    }

    #[tokio::test]
    async fn test_search_returns_page_metadata() {
        let service = service_with(InMemoryKnowledgeRepository::new());
        for _ in 0..5 {
            service.create(fake_dto()).await.unwrap();
        }

        let params = KnowledgeQueryParams {
            page: Some(2),
            size: Some(2),
            ..Default::default()
        };
        let page = service.search(&params).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!((page.page, page.size), (2, 2));
    }

    #[tokio::test]
    async fn test_search_reads_page_and_total_in_one_call() {
        let mut repo = MockKnowledgeRepositoryTrait::new();
        repo.expect_find().never();
        repo.expect_count().never();
        repo.expect_search()
            .times(1)
            .returning(|_| Ok((vec![stored(4)], 7)));
        let service = service_with(repo);

        let page = service
            .search(&KnowledgeQueryParams::default())
            .await
            .unwrap();
        assert_eq!(page.total, 7);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].share_code.as_str(), "EK2By");
    }

    #[tokio::test]
    async fn test_update_like_and_delete() {
        let service = service_with(InMemoryKnowledgeRepository::new());
        let created = service.create(fake_dto()).await.unwrap();

        assert!(matches!(
            service.update(created.id, UpdateKnowledgeDto::default()).await,
            Err(AppError::Validation(_))
        ));

        let updated = service
            .update(
                created.id,
                UpdateKnowledgeDto {
                    title: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.share_code, created.share_code);

        let liked = service.like(created.id).await.unwrap();
        assert_eq!(liked.like_count, 1);

        service.delete(created.id).await.unwrap();
        assert!(matches!(
            service.get_by_id(created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(created.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_share_info() {
        let service = service_with(InMemoryKnowledgeRepository::new());
        let created = service.create(fake_dto()).await.unwrap();

        let info = service.share_info(created.id).await.unwrap();
        assert_eq!(info.share_code.as_str(), "EKJF");
        assert_eq!(info.share_url, "https://kb.example.com/s/EKJF");
        assert!(matches!(
            service.share_info(77).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_repository_errors_are_mapped() {
        let mut repo = MockKnowledgeRepositoryTrait::new();
        repo.expect_find_by_id()
            .returning(|_| Err(RepositoryError::Conflict("busy".into())));
        let service = service_with(repo);

        assert!(matches!(
            service.get_by_id(1).await,
            Err(AppError::Conflict(_))
        ));
    }
}
