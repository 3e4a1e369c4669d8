//! Product reviews, stored per product under `reviews:{product_id}`.

use chrono::Utc;
use tracing::instrument;

use shopfront_core::{ProductId, Review, ReviewDraft, ReviewError};

use crate::store::{Store, StoreError, keys};

/// Errors from the review book.
#[derive(Debug, thiserror::Error)]
pub enum ReviewBookError {
    /// The draft failed validation.
    #[error(transparent)]
    Invalid(#[from] ReviewError),

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Append-only reviews, newest first.
pub struct ReviewBook<'a> {
    store: &'a Store,
}

impl<'a> ReviewBook<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Reviews for `product_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ReviewBookError::Store` if the store cannot be read.
    pub fn list(&self, product_id: ProductId) -> Result<Vec<Review>, ReviewBookError> {
        Ok(self.store.get_or_default(&keys::reviews(product_id))?)
    }

    /// Validate `draft` and put it in front of the existing reviews.
    ///
    /// # Errors
    ///
    /// Returns `ReviewBookError::Invalid` if the draft is incomplete.
    /// Returns `ReviewBookError::Store` if the store cannot be read or written.
    #[instrument(skip(self, draft))]
    pub fn add(&self, product_id: ProductId, draft: ReviewDraft) -> Result<Review, ReviewBookError> {
        let review = draft.submit(Utc::now())?;
        let mut reviews = self.list(product_id)?;
        reviews.insert(0, review.clone());
        self.store.set(&keys::reviews(product_id), &reviews)?;
        tracing::info!(rating = review.rating, "Review added");
        Ok(review)
    }
}
