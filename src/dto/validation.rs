//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest alias accepted from the bridge, in characters.
pub const MAX_ALIAS_CHARS: usize = 64;

/// Validates that a player alias is non-blank, short, and free of control characters.
///
/// # Examples
///
/// ```ignore
/// validate_alias("Dragon Slayer") // Ok
/// validate_alias("   ")           // Err - blank
/// validate_alias("tab\there")     // Err - control character
/// ```
pub fn validate_alias(alias: &str) -> Result<(), ValidationError> {
    if alias.trim().is_empty() {
        let mut err = ValidationError::new("alias_blank");
        err.message = Some("Player alias must not be blank".into());
        return Err(err);
    }

    let length = alias.chars().count();
    if length > MAX_ALIAS_CHARS {
        let mut err = ValidationError::new("alias_length");
        err.message = Some(
            format!("Player alias must be at most {MAX_ALIAS_CHARS} characters (got {length})")
                .into(),
        );
        return Err(err);
    }

    if alias.chars().any(char::is_control) {
        let mut err = ValidationError::new("alias_format");
        err.message = Some("Player alias must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}
