//! Friend code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`FriendCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FriendCodeError {
    /// The input contains no letters or digits.
    #[error("friend code cannot be empty")]
    Empty,
    /// The input does not contain exactly six letters or digits.
    #[error("friend code must contain exactly {expected} letters or digits (got {got})")]
    WrongLength {
        /// Required number of alphanumeric characters.
        expected: usize,
        /// Number of alphanumeric characters found.
        got: usize,
    },
}

/// A destination account code in the external game.
///
/// Codes are entered by users in free form ("g14-d1t", "G14 D1T", ...).
/// Parsing uppercases the input, strips everything that is not an ASCII
/// letter or digit, and requires exactly six characters. The canonical
/// rendering is `XXX-XXX`, which is also what the ownership ledger stores.
///
/// ## Examples
///
/// ```
/// use avkn_gifts_core::FriendCode;
///
/// let code = FriendCode::parse("g14-d1t").unwrap();
/// assert_eq!(code.as_str(), "G14-D1T");
///
/// assert!(FriendCode::parse("").is_err());
/// assert!(FriendCode::parse("AB-CD").is_err()); // only 4 characters
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct FriendCode(String);

impl FriendCode {
    /// Number of alphanumeric characters in a friend code.
    pub const LENGTH: usize = 6;

    /// Parse and normalize a `FriendCode` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input contains no alphanumeric characters, or
    /// a number other than six of them.
    pub fn parse(input: &str) -> Result<Self, FriendCodeError> {
        let cleaned: String = input
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if cleaned.is_empty() {
            return Err(FriendCodeError::Empty);
        }
        if cleaned.len() != Self::LENGTH {
            return Err(FriendCodeError::WrongLength {
                expected: Self::LENGTH,
                got: cleaned.len(),
            });
        }

        let (head, tail) = cleaned.split_at(Self::LENGTH / 2);
        Ok(Self(format!("{head}-{tail}")))
    }

    /// Returns the canonical `XXX-XXX` rendering.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the code and returns its canonical string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FriendCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercase_with_dash() {
        let code = FriendCode::parse("g14-d1t").unwrap();
        assert_eq!(code.as_str(), "G14-D1T");
    }

    #[test]
    fn test_parse_strips_noise() {
        let code = FriendCode::parse("  a b c / 1-2-3 ").unwrap();
        assert_eq!(code.as_str(), "ABC-123");
    }

    #[test]
    fn test_parse_already_canonical() {
        let code = FriendCode::parse("ABC-DEF").unwrap();
        assert_eq!(code.as_str(), "ABC-DEF");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(FriendCode::parse(""), Err(FriendCodeError::Empty));
        assert_eq!(FriendCode::parse(" -- "), Err(FriendCodeError::Empty));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            FriendCode::parse("ABCDE"),
            Err(FriendCodeError::WrongLength {
                expected: 6,
                got: 5
            })
        );
        assert_eq!(
            FriendCode::parse("ABCDEFG"),
            Err(FriendCodeError::WrongLength {
                expected: 6,
                got: 7
            })
        );
    }
}
