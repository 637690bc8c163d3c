//! Demo data loaded at startup when `APP_SEED_FIXTURES` is enabled.

use chrono::{Duration, Utc};
use log::info;

use crate::errors::RepositoryError;
use crate::models::{Category, NewKnowledge};
use crate::repositories::KnowledgeRepositoryTrait;

pub fn categories() -> Vec<Category> {
    [
        (1, "Mathematics", "Arithmetic, algebra, geometry and beyond"),
        (2, "Science", "Physics, chemistry and biology"),
        (3, "Computer Science", "Programming, algorithms and systems"),
        (4, "Languages", "Grammar, vocabulary and writing"),
        (5, "Teaching Methods", "Classroom practice and lesson design"),
    ]
    .into_iter()
    .map(|(id, name, description)| Category {
        id,
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
}

struct Article {
    title: &'static str,
    summary: &'static str,
    content: &'static str,
    category_id: i64,
    author: &'static str,
    tags: &'static [&'static str],
    age_days: i64,
}

const ARTICLES: &[Article] = &[
    Article {
        title: "Understanding fractions with area models",
        summary: "Visual ways to introduce equivalent fractions",
        content: "Area models let students see that 2/4 and 1/2 cover the same part of a whole. \
                  Start with rectangles, then move to number lines.",
        category_id: 1,
        author: "Li Wei",
        tags: &["fractions", "primary"],
        age_days: 40,
    },
    Article {
        title: "Photosynthesis in five steps",
        summary: "From light absorption to glucose",
        content: "Chlorophyll absorbs light, water is split, ATP and NADPH are produced, \
                  carbon dioxide is fixed and glucose is assembled in the Calvin cycle.",
        category_id: 2,
        author: "Maria Santos",
        tags: &["biology", "plants"],
        age_days: 12,
    },
    Article {
        title: "Recursion explained with Russian dolls",
        summary: "A base case and a smaller problem",
        content: "Every recursive function needs a case that stops and a step that shrinks \
                  the problem. Opening nested dolls is a recursion that ends at the smallest doll.",
        category_id: 3,
        author: "Sam Okafor",
        tags: &["algorithms", "programming"],
        age_days: 5,
    },
    Article {
        title: "Using exit tickets effectively",
        summary: "Quick formative checks at the end of a lesson",
        content: "Ask one question tied to the lesson goal, sort the answers into three piles \
                  and plan the next lesson around the middle pile.",
        category_id: 5,
        author: "Li Wei",
        tags: &["assessment"],
        age_days: 1,
    },
    Article {
        title: "Irregular English verbs cheat sheet",
        summary: "The forty verbs learners meet first",
        content: "Be, have, do, go, get, make, say, see, take and come cover most early \
                  reading. Group them by vowel change to make them stick.",
        category_id: 4,
        author: "Emma Clarke",
        tags: &["grammar", "esl"],
        age_days: 0,
    },
];

/// Saves the demo articles through the repository so they receive ids and share codes
pub async fn seed<R: KnowledgeRepositoryTrait + ?Sized>(repo: &R) -> Result<usize, RepositoryError> {
    let now = Utc::now();

    for article in ARTICLES {
        let saved = repo
            .save(NewKnowledge {
                title: article.title.to_string(),
                summary: article.summary.to_string(),
                content: article.content.to_string(),
                category_id: article.category_id,
                author: article.author.to_string(),
                tags: article.tags.iter().map(|t| t.to_string()).collect(),
                created_at: now - Duration::days(article.age_days),
            })
            .await?;
        info!("Seeded '{}' as {}", saved.title, saved.share_code);
    }

    Ok(ARTICLES.len())
}
