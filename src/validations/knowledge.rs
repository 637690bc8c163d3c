use validator::ValidationError;

const MAX_TAGS: usize = 10;
const MAX_TAG_LEN: usize = 20;

/// Validates the tag list of an article:
/// - At most 10 tags
/// - Each tag between 1-20 characters, letters, digits, hyphens and spaces only
#[allow(clippy::ptr_arg)]
pub fn validate_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        let mut err = ValidationError::new("tags_count");
        err.message = Some(format!("At most {} tags are allowed", MAX_TAGS).into());
        return Err(err);
    }

    for tag in tags {
        let len = tag.chars().count();
        if tag.trim().is_empty() || len > MAX_TAG_LEN {
            let mut err = ValidationError::new("tag_length");
            err.message = Some(format!("Tags must be between 1 and {} characters", MAX_TAG_LEN).into());
            return Err(err);
        }

        if !tag
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == ' ')
        {
            let mut err = ValidationError::new("tag_charset");
            err.message =
                Some("Tags can only contain letters, digits, hyphens and spaces".into());
            return Err(err);
        }
    }

    Ok(())
}

/// Validates that a title is not just whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }

    Ok(())
}
