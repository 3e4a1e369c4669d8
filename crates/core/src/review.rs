//! Product reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rating given when a draft leaves it unset.
pub const DEFAULT_RATING: u8 = 5;

/// Review validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("reviewer name is required")]
    MissingName,

    #[error("review comment is required")]
    MissingComment,

    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
}

/// A submitted review. Reviews are stored per product, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub name: String,
    pub rating: u8,
    pub comment: String,
    pub date: DateTime<Utc>,
}

/// Unvalidated review input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub comment: String,
}

impl ReviewDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, rating: u8, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rating: Some(rating),
            comment: comment.into(),
        }
    }

    /// Validate the draft and stamp it with `date`.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError` if the name or comment is blank or the rating is
    /// outside 1..=5.
    pub fn submit(self, date: DateTime<Utc>) -> Result<Review, ReviewError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ReviewError::MissingName);
        }
        let comment = self.comment.trim();
        if comment.is_empty() {
            return Err(ReviewError::MissingComment);
        }
        let rating = self.rating.unwrap_or(DEFAULT_RATING);
        if !(1..=5).contains(&rating) {
            return Err(ReviewError::RatingOutOfRange(rating));
        }
        Ok(Review {
            name: name.to_string(),
            rating,
            comment: comment.to_string(),
            date,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_trims_and_defaults_rating() {
        let draft = ReviewDraft {
            name: "  Ravi ".to_string(),
            rating: None,
            comment: "Great phone".to_string(),
        };
        let review = draft.submit(Utc::now()).unwrap();
        assert_eq!(review.name, "Ravi");
        assert_eq!(review.rating, DEFAULT_RATING);
    }

    #[test]
    fn test_submit_requires_name_and_comment() {
        let now = Utc::now();
        assert_eq!(
            ReviewDraft::new("", 4, "ok").submit(now).unwrap_err(),
            ReviewError::MissingName
        );
        assert_eq!(
            ReviewDraft::new("Ravi", 4, " ").submit(now).unwrap_err(),
            ReviewError::MissingComment
        );
    }

    #[test]
    fn test_submit_checks_rating_range() {
        let now = Utc::now();
        assert!(ReviewDraft::new("Ravi", 1, "meh").submit(now).is_ok());
        assert_eq!(
            ReviewDraft::new("Ravi", 0, "meh").submit(now).unwrap_err(),
            ReviewError::RatingOutOfRange(0)
        );
        assert_eq!(
            ReviewDraft::new("Ravi", 6, "meh").submit(now).unwrap_err(),
            ReviewError::RatingOutOfRange(6)
        );
    }
}
