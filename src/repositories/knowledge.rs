// src/repositories/knowledge.rs - Data access
use std::cmp::Ordering;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;

use crate::errors::RepositoryError;
use crate::models::{
    Knowledge, KnowledgeQueryParams, NewKnowledge, SortDirection, SortField, UpdateKnowledgeDto,
};
use crate::utils::generate_share_code;

type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KnowledgeRepositoryTrait: Send + Sync {
    /// Stores a new article, assigning it the next id and its share code
    ///
    /// ### Arguments
    /// * `new` - The article fields known before an id exists
    ///
    /// ### Returns
    /// * `Result<Knowledge>` - The stored article
    ///
    /// ### Errors
    /// * `RepositoryError::Conflict` - If the id space is exhausted and no share code can be derived
    async fn save(&self, new: NewKnowledge) -> Result<Knowledge>;

    /// Finds the articles matching the filters, ordered and paginated
    ///
    /// ### Arguments
    /// * `params` - KnowledgeQueryParams object with filters
    ///
    /// ### Returns
    /// * `Result<Vec<Knowledge>>` - The requested page of matches
    async fn find(&self, params: &KnowledgeQueryParams) -> Result<Vec<Knowledge>>;

    /// Counts the articles matching the filters, ignoring pagination
    async fn count(&self, params: &KnowledgeQueryParams) -> Result<usize>;

    /// Finds one page of matches together with the total match count,
    /// both taken from the same snapshot of the store
    ///
    /// ### Returns
    /// * `Result<(Vec<Knowledge>, usize)>` - The requested page and the unpaginated total
    async fn search(&self, params: &KnowledgeQueryParams) -> Result<(Vec<Knowledge>, usize)>;

    /// Finds an article by its id
    ///
    /// ### Returns
    /// * `Result<Option<Knowledge>>` - The article if found, or `None` if not found
    async fn find_by_id(&self, id: i64) -> Result<Option<Knowledge>>;

    /// Finds an article by the share code stored on it
    ///
    /// ### Returns
    /// * `Result<Option<Knowledge>>` - The article if found, or `None` if not found
    async fn find_by_share_code(&self, code: &str) -> Result<Option<Knowledge>>;

    /// Applies the provided fields of `params` to an article
    ///
    /// ### Returns
    /// * `Result<Option<Knowledge>>` - The updated article, or `None` if the id is unknown
    async fn update(&self, id: i64, params: &UpdateKnowledgeDto) -> Result<Option<Knowledge>>;

    /// Deletes an article by its id
    ///
    /// ### Arguments
    /// * `id` - The id of the article to delete
    /// * `require_exists` - If `true`, an error will be returned if the article does not exist
    ///
    /// ### Returns
    /// * `Result<bool>` - Whether an article was removed
    ///
    /// ### Errors
    /// * `RepositoryError::NotFound` - If the article doesn't exist and `require_exists` is `true`
    async fn delete(&self, id: i64, require_exists: bool) -> Result<bool>;

    /// Adds one to the view counter
    async fn increment_views(&self, id: i64) -> Result<Option<Knowledge>>;

    /// Adds one to the like counter
    async fn increment_likes(&self, id: i64) -> Result<Option<Knowledge>>;
}

// Implementation kept in process memory
pub struct InMemoryKnowledgeRepository {
    items: RwLock<Vec<Knowledge>>,
    next_id: AtomicI64,
}

impl Default for InMemoryKnowledgeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryKnowledgeRepository {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    // Helper for the counter updates
    async fn modify<F>(&self, id: i64, f: F) -> Option<Knowledge>
    where
        F: FnOnce(&mut Knowledge),
    {
        let mut items = self.items.write().await;
        let item = items.iter_mut().find(|k| k.id == id)?;
        f(item);
        Some(item.clone())
    }
}

fn compare(a: &Knowledge, b: &Knowledge, field: SortField) -> Ordering {
    let primary = match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::ViewCount => a.view_count.cmp(&b.view_count),
        SortField::LikeCount => a.like_count.cmp(&b.like_count),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    };
    primary.then(a.id.cmp(&b.id))
}

// Filters, sorts and paginates; returns the page and the total before pagination
fn select_page(items: &[Knowledge], params: &KnowledgeQueryParams) -> (Vec<Knowledge>, usize) {
    let mut matches: Vec<&Knowledge> = items.iter().filter(|k| params.matches(k)).collect();
    let total = matches.len();

    let field = params.sort_by.unwrap_or_default();
    let direction = params.order.unwrap_or_default();
    debug!("Sorting {} matches by {:?} {}", total, field, direction);

    matches.sort_by(|a, b| match direction {
        SortDirection::Asc => compare(a, b, field),
        SortDirection::Desc => compare(b, a, field),
    });

    let page = matches
        .into_iter()
        .skip(params.offset())
        .take(params.size())
        .cloned()
        .collect();

    (page, total)
}

#[async_trait]
impl KnowledgeRepositoryTrait for InMemoryKnowledgeRepository {
    async fn save(&self, new: NewKnowledge) -> Result<Knowledge> {
        // Hold the write lock so ids are assigned in insertion order
        let mut items = self.items.write().await;

        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        let share_code = generate_share_code(id).map_err(|e| {
            log::error!("Failed to derive share code for id {}: {}", id, e);
            RepositoryError::from(e)
        })?;

        let record = Knowledge::from_new(id, share_code, new);
        items.push(record.clone());

        debug!("Saved knowledge {} with share code {}", record.id, record.share_code);
        Ok(record)
    }

    async fn find(&self, params: &KnowledgeQueryParams) -> Result<Vec<Knowledge>> {
        let items = self.items.read().await;
        Ok(select_page(&items, params).0)
    }

    async fn count(&self, params: &KnowledgeQueryParams) -> Result<usize> {
        let items = self.items.read().await;
        Ok(items.iter().filter(|k| params.matches(k)).count())
    }

    async fn search(&self, params: &KnowledgeQueryParams) -> Result<(Vec<Knowledge>, usize)> {
        let items = self.items.read().await;
        Ok(select_page(&items, params))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Knowledge>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|k| k.id == id).cloned())
    }

    async fn find_by_share_code(&self, code: &str) -> Result<Option<Knowledge>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|k| k.share_code.as_str() == code).cloned())
    }

    async fn update(&self, id: i64, params: &UpdateKnowledgeDto) -> Result<Option<Knowledge>> {
        debug!("Updating knowledge with id: {} and params: {:?}", id, params);
        Ok(self.modify(id, |item| item.apply(params)).await)
    }

    async fn delete(&self, id: i64, require_exists: bool) -> Result<bool> {
        let mut items = self.items.write().await;

        let before = items.len();
        items.retain(|k| k.id != id);
        let is_deleted = items.len() < before;

        // Check if we should require the record to exist
        if require_exists && !is_deleted {
            return Err(RepositoryError::NotFound(format!(
                "Knowledge with ID {} not found",
                id
            )));
        }

        Ok(is_deleted)
    }

    async fn increment_views(&self, id: i64) -> Result<Option<Knowledge>> {
        Ok(self.modify(id, |item| item.view_count += 1).await)
    }

    async fn increment_likes(&self, id: i64) -> Result<Option<Knowledge>> {
        Ok(self.modify(id, |item| item.like_count += 1).await)
    }
}
