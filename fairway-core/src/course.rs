//! Identifiers and the qualitative play-again signal.
//!
//! # Examples
//! ```
//! use fairway_core::{CourseId, PlayAgainResponse};
//!
//! let id = CourseId::new("pebble-beach");
//! assert_eq!(id.as_str(), "pebble-beach");
//! assert_eq!(PlayAgainResponse::Definitely.to_string(), "definitely");
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Opaque identifier of a golf course.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CourseId(String);

impl CourseId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for CourseId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Opaque identifier of the user who owns a ranked list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UserId(String);

impl UserId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for UserId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Would the user play this course again?
///
/// Variants are ordered from the weakest to the strongest endorsement, so
/// `No < Maybe < Definitely`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlayAgainResponse {
    /// The user would not go back.
    No,
    /// The user might go back.
    Maybe,
    /// The user would definitely go back.
    Definitely,
}

impl PlayAgainResponse {
    /// Every response, weakest first.
    pub const ALL: [Self; 3] = [Self::No, Self::Maybe, Self::Definitely];

    /// Return the response as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Maybe => "maybe",
            Self::Definitely => "definitely",
        }
    }
}

impl fmt::Display for PlayAgainResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`PlayAgainResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown play-again response: {0}")]
pub struct UnknownPlayAgainResponse(pub String);

impl FromStr for PlayAgainResponse {
    type Err = UnknownPlayAgainResponse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no" => Ok(Self::No),
            "maybe" => Ok(Self::Maybe),
            "definitely" => Ok(Self::Definitely),
            _ => Err(UnknownPlayAgainResponse(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("definitely", PlayAgainResponse::Definitely)]
    #[case("Maybe", PlayAgainResponse::Maybe)]
    #[case(" no ", PlayAgainResponse::No)]
    fn parses_responses_case_insensitively(
        #[case] raw: &str,
        #[case] expected: PlayAgainResponse,
    ) {
        assert_eq!(raw.parse::<PlayAgainResponse>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_response() {
        let err = "sometimes"
            .parse::<PlayAgainResponse>()
            .expect_err("unknown response");
        assert_eq!(err, UnknownPlayAgainResponse("sometimes".into()));
    }

    #[rstest]
    fn responses_order_from_weakest_to_strongest() {
        assert!(PlayAgainResponse::No < PlayAgainResponse::Maybe);
        assert!(PlayAgainResponse::Maybe < PlayAgainResponse::Definitely);
    }
}
