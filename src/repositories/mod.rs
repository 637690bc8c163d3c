mod knowledge;

#[cfg(test)]
pub use knowledge::MockKnowledgeRepositoryTrait;
pub use knowledge::{InMemoryKnowledgeRepository, KnowledgeRepositoryTrait};
