//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The number does not start with a digit (after an optional +).
    #[error("phone number must start with a digit")]
    MissingLeadingDigit,
    /// The number is too short to be dialable.
    #[error("phone number is too short")]
    TooShort,
    /// The number contains a character outside the allowed set.
    #[error("phone number contains an invalid character: {0:?}")]
    InvalidCharacter(char),
}

/// A loosely validated international phone number.
///
/// Accepts an optional leading `+`, a first digit, and at least 7 more
/// characters drawn from digits, spaces, hyphens, and parentheses. This
/// matches how shoppers actually type numbers ("+1 (555) 123-4567") while
/// still rejecting free text.
///
/// ## Examples
///
/// ```
/// use tealeaf_core::Phone;
///
/// assert!(Phone::parse("+1 (555) 123-4567").is_ok());
/// assert!(Phone::parse("0661234567").is_ok());
///
/// assert!(Phone::parse("").is_err());
/// assert!(Phone::parse("call me").is_err());
/// assert!(Phone::parse("12345").is_err()); // too short
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum number of characters after the leading digit.
    const MIN_REST_LENGTH: usize = 7;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, does not start with a digit
    /// (after an optional `+`), is shorter than 8 significant characters,
    /// or contains characters outside digits/space/hyphen/parentheses.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits = s.strip_prefix('+').unwrap_or(s);

        let mut chars = digits.chars();
        match chars.next() {
            Some(c) if c.is_ascii_digit() => {}
            _ => return Err(PhoneError::MissingLeadingDigit),
        }

        let rest = chars.as_str();
        if rest.len() < Self::MIN_REST_LENGTH {
            return Err(PhoneError::TooShort);
        }

        for c in rest.chars() {
            if !c.is_ascii_digit() && !matches!(c, ' ' | '-' | '(' | ')') {
                return Err(PhoneError::InvalidCharacter(c));
            }
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as typed by the shopper.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
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
    fn test_parse_valid_numbers() {
        assert!(Phone::parse("+380501234567").is_ok());
        assert!(Phone::parse("0501234567").is_ok());
        assert!(Phone::parse("+1 (555) 123-4567").is_ok());
        assert!(Phone::parse("5551234567").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_parse_not_a_number() {
        assert!(matches!(
            Phone::parse("call me"),
            Err(PhoneError::MissingLeadingDigit)
        ));
        assert!(matches!(
            Phone::parse("+"),
            Err(PhoneError::MissingLeadingDigit)
        ));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(Phone::parse("12345"), Err(PhoneError::TooShort)));
        // 1 digit + 6 more is still one short
        assert!(matches!(Phone::parse("1234567"), Err(PhoneError::TooShort)));
        // 1 digit + 7 more is the minimum
        assert!(Phone::parse("12345678").is_ok());
    }

    #[test]
    fn test_parse_invalid_character() {
        assert!(matches!(
            Phone::parse("1234567x9"),
            Err(PhoneError::InvalidCharacter('x'))
        ));
    }
}
