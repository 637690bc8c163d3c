mod category;
mod knowledge;

pub use category::Category;
pub use knowledge::{
    CreateKnowledgeDto, Knowledge, KnowledgeQueryParams, KnowledgeResponseDto, NewKnowledge,
    Page, ShareInfoDto, SortDirection, SortField, UpdateKnowledgeDto, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
