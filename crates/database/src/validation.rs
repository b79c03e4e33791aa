//! Input validation for storage keys.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
    /// Character outside the allowed set.
    InvalidCharacter { field: String, character: char },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::InvalidCharacter { field, character } => {
                write!(f, "{} contains invalid character {:?}", field, character)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for storage keys.
pub const MAX_STORAGE_KEY_LENGTH: usize = 128;

/// Validate a storage key.
///
/// Keys are non-empty, at most [`MAX_STORAGE_KEY_LENGTH`] characters, and
/// limited to ASCII letters, digits, `-`, `_`, `.` and `:`.
pub fn validate_storage_key(key: &str) -> Result<(), ValidationError> {
    let key = key.trim();

    if key.is_empty() {
        return Err(ValidationError::Empty("storage key".to_string()));
    }

    if key.len() > MAX_STORAGE_KEY_LENGTH {
        return Err(ValidationError::TooLong {
            field: "storage key".to_string(),
            max: MAX_STORAGE_KEY_LENGTH,
            actual: key.len(),
        });
    }

    if let Some(character) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')))
    {
        return Err(ValidationError::InvalidCharacter {
            field: "storage key".to_string(),
            character,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        assert!(validate_storage_key("dealer-store").is_ok());
        assert!(validate_storage_key("tenant:42.store_v1").is_ok());
    }

    #[test]
    fn test_empty_key() {
        assert!(matches!(validate_storage_key("  "), Err(ValidationError::Empty(_))));
    }

    #[test]
    fn test_long_key() {
        let key = "k".repeat(MAX_STORAGE_KEY_LENGTH + 1);
        assert!(matches!(
            validate_storage_key(&key),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(
            validate_storage_key("dealer store"),
            Err(ValidationError::InvalidCharacter {
                field: "storage key".to_string(),
                character: ' ',
            })
        );
    }
}
