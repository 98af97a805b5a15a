//! User Name Value Object
//!
//! A user name is the public handle identifying a user, used for lookup
//! and display.
//!
//! Processing order: NFKC normalization, validation, lowercasing. The
//! original (as typed) form is kept for display; the canonical lowercase
//! form is what uniqueness and lookups are based on.
//!
//! Invariants:
//! - 3 to 30 characters after normalization
//! - ASCII letters, digits and `_ . - +` only
//! - Starts and ends with an alphanumeric or `_`
//! - No consecutive dots, at least one alphanumeric character

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 30;

/// Allowed special characters in user name
const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-', '+'];

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    /// User name is empty after normalization
    Empty,

    /// Too short (minimum: USER_NAME_MIN_LENGTH)
    TooShort { length: usize, min: usize },

    /// Too long (maximum: USER_NAME_MAX_LENGTH)
    TooLong { length: usize, max: usize },

    /// Contains an invalid character
    InvalidCharacter { char: char, position: usize },

    /// Starts with an invalid character
    InvalidStart { char: char },

    /// Ends with an invalid character
    InvalidEnd { char: char },

    /// Contains consecutive dots (..)
    ConsecutiveDots,

    /// Contains no alphanumeric characters
    NoAlphanumeric,
}

impl fmt::Display for UserNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "User name cannot be empty"),
            Self::TooShort { length, min } => {
                write!(f, "User name is too short ({length} chars, minimum {min})")
            }
            Self::TooLong { length, max } => {
                write!(f, "User name is too long ({length} chars, maximum {max})")
            }
            Self::InvalidCharacter { char, position } => {
                write!(
                    f,
                    "Invalid character '{char}' at position {position}. Only a-z, 0-9, _, ., -, + are allowed"
                )
            }
            Self::InvalidStart { char } => {
                write!(
                    f,
                    "User name cannot start with '{char}'. Must start with a-z, 0-9, or _"
                )
            }
            Self::InvalidEnd { char } => {
                write!(
                    f,
                    "User name cannot end with '{char}'. Must end with a-z, 0-9, or _"
                )
            }
            Self::ConsecutiveDots => write!(f, "User name cannot contain consecutive dots"),
            Self::NoAlphanumeric => {
                write!(f, "User name must contain at least one letter or digit")
            }
        }
    }
}

impl std::error::Error for UserNameError {}

/// User name value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName {
    /// As entered by the user (display form)
    original: String,
    /// Lowercase canonical form (uniqueness and lookups)
    canonical: String,
}

impl UserName {
    /// Create a new user name with validation
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserNameError> {
        let normalized: String = raw.as_ref().trim().nfkc().collect();

        if normalized.is_empty() {
            return Err(UserNameError::Empty);
        }

        let length = normalized.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                length,
                min: USER_NAME_MIN_LENGTH,
            });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        let chars: Vec<char> = normalized.chars().collect();

        for (position, &char) in chars.iter().enumerate() {
            let lower = char.to_ascii_lowercase();
            let valid =
                lower.is_ascii_lowercase() || lower.is_ascii_digit() || ALLOWED_SPECIAL_CHARS.contains(&lower);
            if !valid {
                return Err(UserNameError::InvalidCharacter { char, position });
            }
        }

        let first = chars[0];
        if !(first.is_ascii_alphanumeric() || first == '_') {
            return Err(UserNameError::InvalidStart { char: first });
        }

        let last = chars[chars.len() - 1];
        if !(last.is_ascii_alphanumeric() || last == '_') {
            return Err(UserNameError::InvalidEnd { char: last });
        }

        if normalized.contains("..") {
            return Err(UserNameError::ConsecutiveDots);
        }

        if !chars.iter().any(|c| c.is_ascii_alphanumeric()) {
            return Err(UserNameError::NoAlphanumeric);
        }

        let canonical = normalized.to_lowercase();

        Ok(Self {
            original: normalized,
            canonical,
        })
    }

    /// Restore from database values (assumed already validated)
    pub fn from_db(original: impl Into<String>) -> Result<Self, UserNameError> {
        // Re-validate so corrupt rows are caught on read
        Self::new(original.into())
    }

    /// Display form
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lowercase canonical form
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_names() {
        assert!(UserName::new("alice").is_ok());
        assert!(UserName::new("alice_01").is_ok());
        assert!(UserName::new("a.l-i+ce").is_ok());
        assert!(UserName::new("Alice").is_ok());
    }

    #[test]
    fn test_canonical_is_lowercase() {
        let name = UserName::new("Alice.B").unwrap();
        assert_eq!(name.original(), "Alice.B");
        assert_eq!(name.canonical(), "alice.b");
    }

    #[test]
    fn test_length_bounds() {
        assert!(matches!(
            UserName::new("ab"),
            Err(UserNameError::TooShort { .. })
        ));
        assert!(matches!(
            UserName::new("a".repeat(31)),
            Err(UserNameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_invalid_characters() {
        assert!(matches!(
            UserName::new("ali ce"),
            Err(UserNameError::InvalidCharacter { .. })
        ));
        assert!(matches!(
            UserName::new("ali@ce"),
            Err(UserNameError::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn test_start_and_end() {
        assert!(matches!(
            UserName::new(".alice"),
            Err(UserNameError::InvalidStart { .. })
        ));
        assert!(matches!(
            UserName::new("alice-"),
            Err(UserNameError::InvalidEnd { .. })
        ));
    }

    #[test]
    fn test_consecutive_dots() {
        assert!(matches!(
            UserName::new("ali..ce"),
            Err(UserNameError::ConsecutiveDots)
        ));
    }

    #[test]
    fn test_empty() {
        assert!(matches!(UserName::new("   "), Err(UserNameError::Empty)));
    }
}
