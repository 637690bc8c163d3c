// src/models/knowledge.rs - Pure data structures
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::{format_relative, ShareCode};
use crate::validations::{validate_not_blank, validate_tags};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

// DTO for creating a new knowledge article
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateKnowledgeDto {
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,

    #[validate(length(max = 500, message = "Summary must be at most 500 characters"))]
    pub summary: Option<String>,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    #[validate(range(min = 1, message = "Category id must be positive"))]
    pub category_id: i64,

    #[validate(length(min = 1, max = 50, message = "Author must be between 1 and 50 characters"))]
    pub author: String,

    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,
}

// DTO for partial updates, only the provided fields change
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateKnowledgeDto {
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,

    #[validate(length(max = 500, message = "Summary must be at most 500 characters"))]
    pub summary: Option<String>,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: Option<String>,

    #[validate(range(min = 1, message = "Category id must be positive"))]
    pub category_id: Option<i64>,

    #[validate(custom(function = "validate_tags"))]
    pub tags: Option<Vec<String>>,
}

impl UpdateKnowledgeDto {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.summary.is_none()
            && self.content.is_none()
            && self.category_id.is_none()
            && self.tags.is_none()
    }
}

/// Article fields known before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewKnowledge {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub category_id: i64,
    pub author: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CreateKnowledgeDto> for NewKnowledge {
    fn from(dto: CreateKnowledgeDto) -> Self {
        let summary = match dto.summary {
            Some(s) if !s.trim().is_empty() => s,
            _ => summarize(&dto.content),
        };

        NewKnowledge {
            title: dto.title.trim().to_string(),
            summary,
            content: dto.content,
            category_id: dto.category_id,
            author: dto.author,
            tags: dto.tags,
            created_at: Utc::now(),
        }
    }
}

/// First 120 characters of the content, used when no summary is given
fn summarize(content: &str) -> String {
    const LEN: usize = 120;

    let trimmed = content.trim();
    if trimmed.chars().count() <= LEN {
        return trimmed.to_string();
    }
    let mut summary: String = trimmed.chars().take(LEN).collect();
    summary.push('…');
    summary
}

/// A knowledge article as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Knowledge {
    /// Store-assigned id, starting at 1
    pub id: i64,

    pub title: String,
    pub summary: String,
    pub content: String,
    pub category_id: i64,
    pub author: String,
    pub tags: Vec<String>,

    /// Public identifier derived from `id`, used in share links
    pub share_code: ShareCode,

    pub view_count: u64,
    pub like_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Knowledge {
    /// Builds a stored article from a draft and its assigned identity
    pub fn from_new(id: i64, share_code: ShareCode, new: NewKnowledge) -> Self {
        Knowledge {
            id,
            share_code,
            title: new.title,
            summary: new.summary,
            content: new.content,
            category_id: new.category_id,
            author: new.author,
            tags: new.tags,
            view_count: 0,
            like_count: 0,
            created_at: new.created_at,
            updated_at: new.created_at,
        }
    }

    /// Case-insensitive match against title, summary and content
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        [&self.title, &self.summary, &self.content]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Applies the provided fields of an update and bumps `updated_at`
    pub fn apply(&mut self, params: &UpdateKnowledgeDto) {
        if let Some(title) = &params.title {
            self.title = title.trim().to_string();
        }
        if let Some(summary) = &params.summary {
            self.summary = summary.clone();
        }
        if let Some(content) = &params.content {
            self.content = content.clone();
        }
        if let Some(category_id) = params.category_id {
            self.category_id = category_id;
        }
        if let Some(tags) = &params.tags {
            self.tags = tags.clone();
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    ViewCount,
    LikeCount,
    Title,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Filters, ordering and pagination for listing articles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeQueryParams {
    pub keyword: Option<String>,
    pub category_id: Option<i64>,
    pub tag: Option<String>,
    pub author: Option<String>,
    pub sort_by: Option<SortField>,
    pub order: Option<SortDirection>,
    /// 1-based page number
    pub page: Option<usize>,
    pub size: Option<usize>,
}

impl KnowledgeQueryParams {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn size(&self) -> usize {
        self.size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> usize {
        (self.page() - 1).saturating_mul(self.size())
    }

    /// Whether an article passes every filter that is set
    pub fn matches(&self, item: &Knowledge) -> bool {
        if let Some(keyword) = self.keyword.as_deref().map(str::trim) {
            if !keyword.is_empty() && !item.matches_keyword(keyword) {
                return false;
            }
        }

        if let Some(category_id) = self.category_id {
            if item.category_id != category_id {
                return false;
            }
        }

        if let Some(tag) = &self.tag {
            if !item.has_tag(tag) {
                return false;
            }
        }

        if let Some(author) = &self.author {
            if &item.author != author {
                return false;
            }
        }

        true
    }
}

// DTO for response with article details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeResponseDto {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub category_id: i64,
    pub author: String,
    pub tags: Vec<String>,
    pub share_code: ShareCode,
    pub share_url: String,
    pub view_count: u64,
    pub like_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_ago: String,
}

impl KnowledgeResponseDto {
    pub fn new(item: Knowledge, base_url: &str, now: DateTime<Utc>) -> Self {
        KnowledgeResponseDto {
            share_url: item.share_code.url(base_url),
            created_ago: format_relative(item.created_at, now),
            id: item.id,
            title: item.title,
            summary: item.summary,
            content: item.content,
            category_id: item.category_id,
            author: item.author,
            tags: item.tags,
            share_code: item.share_code,
            view_count: item.view_count,
            like_count: item.like_count,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// Share link details of an article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareInfoDto {
    pub id: i64,
    pub share_code: ShareCode,
    pub share_url: String,
}

/// One page of a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub size: usize,
}
