//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates a requested display name against the configured limits.
///
/// A name is rejected when it is empty, longer than `max_len` characters, or
/// contains the reserved group tag that leaderboard rendering appends to
/// group entries.
pub fn validate_display_name(
    name: &str,
    max_len: usize,
    reserved_tag: &str,
) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("display_name_empty");
        err.message = Some("Display name must not be empty".into());
        return Err(err);
    }

    if trimmed.chars().count() > max_len {
        let mut err = ValidationError::new("display_name_length");
        err.message = Some(
            format!(
                "Display name must be at most {} characters (got {})",
                max_len,
                trimmed.chars().count()
            )
            .into(),
        );
        return Err(err);
    }

    if trimmed.contains(reserved_tag) {
        let mut err = ValidationError::new("display_name_reserved");
        err.message = Some(format!("Display name must not contain `{reserved_tag}`").into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        assert!(validate_display_name("laymonage", 20, "(group)").is_ok());
        assert!(validate_display_name("Exactly twenty chars", 20, "(group)").is_ok());
    }

    #[test]
    fn rejects_names_over_the_limit() {
        let err = validate_display_name("twenty-one characters", 20, "(group)").unwrap_err();
        assert_eq!(err.code, "display_name_length");
    }

    #[test]
    fn rejects_the_reserved_tag() {
        let err = validate_display_name("sneaky (group)", 20, "(group)").unwrap_err();
        assert_eq!(err.code, "display_name_reserved");
    }

    #[test]
    fn rejects_empty_names() {
        assert!(validate_display_name("   ", 20, "(group)").is_err());
    }
}
