//! Vietnamese phone number type.
//!
//! The checkout form requires a phone number because orders are confirmed by
//! a call from the sales team before delivery.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains characters other than digits, separators or a leading +.
    #[error("phone number contains invalid characters")]
    InvalidCharacter,
    /// Too few or too many digits in national form.
    #[error("phone number must have between {min} and {max} digits")]
    InvalidLength {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// A phone number normalized to its national form (leading `0`).
///
/// Accepts `0912 345 678`, `0912.345.678`, `+84 912 345 678` and `84912345678`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    const MIN_DIGITS: usize = 10;
    const MAX_DIGITS: usize = 11;

    /// Parse a `Phone` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other than
    /// digits and the separators ` .-()`, or has the wrong number of digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let (international, rest) = s
            .strip_prefix('+')
            .map_or((false, s), |rest| (true, rest));

        let mut digits = String::with_capacity(rest.len());
        for ch in rest.chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                ' ' | '.' | '-' | '(' | ')' => {}
                _ => return Err(PhoneError::InvalidCharacter),
            }
        }

        let national = if international || (digits.starts_with("84") && digits.len() > 10) {
            let subscriber = digits.strip_prefix("84").ok_or(PhoneError::InvalidCharacter)?;
            format!("0{subscriber}")
        } else if digits.starts_with('0') {
            digits
        } else {
            format!("0{digits}")
        };

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&national.len()) {
            return Err(PhoneError::InvalidLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(national))
    }

    /// Returns the national form (e.g., "0912345678").
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_national_forms() {
        assert_eq!(Phone::parse("0912345678").unwrap().as_str(), "0912345678");
        assert_eq!(Phone::parse("0912 345 678").unwrap().as_str(), "0912345678");
        assert_eq!(Phone::parse("0912.345.678").unwrap().as_str(), "0912345678");
        assert_eq!(Phone::parse("(028) 3822-1234").unwrap().as_str(), "02838221234");
    }

    #[test]
    fn test_parse_international_forms() {
        assert_eq!(Phone::parse("+84 912 345 678").unwrap().as_str(), "0912345678");
        assert_eq!(Phone::parse("84912345678").unwrap().as_str(), "0912345678");
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
        assert_eq!(Phone::parse("0912abc678"), Err(PhoneError::InvalidCharacter));
        assert!(matches!(
            Phone::parse("091234"),
            Err(PhoneError::InvalidLength { .. })
        ));
        assert!(matches!(
            Phone::parse("091234567890123"),
            Err(PhoneError::InvalidLength { .. })
        ));
    }
}
