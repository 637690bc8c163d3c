mod knowledge;

pub use knowledge::{validate_not_blank, validate_tags};
