//! Review and wishlist commands.
//!
//! # Usage
//!
//! ```bash
//! shopfront review add 12 --name Ravi --rating 4 --comment "Solid phone"
//! shopfront review list 12
//! shopfront wishlist toggle 12
//! shopfront wishlist show
//! ```

use std::io::Write;

use shopfront_core::{ProductId, ReviewDraft};
use shopfront_storefront::services::reviews::ReviewBook;
use shopfront_storefront::services::wishlist::WishlistService;

use super::{CommandError, Context};

/// Add a review. The rating defaults to 5.
///
/// # Errors
///
/// Returns `CommandError::Review` for an incomplete review or a store failure.
pub fn add_review(
    ctx: &Context,
    id: ProductId,
    draft: ReviewDraft,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let review = ReviewBook::new(&ctx.store).add(id, draft)?;
    writeln!(out, "Thanks, {}! Rated {}/5", review.name, review.rating)?;
    Ok(())
}

/// List reviews of a product, newest first.
///
/// # Errors
///
/// Returns `CommandError::Review` if the store cannot be read.
pub fn list_reviews(ctx: &Context, id: ProductId, out: &mut dyn Write) -> Result<(), CommandError> {
    let reviews = ReviewBook::new(&ctx.store).list(id)?;
    if reviews.is_empty() {
        writeln!(out, "No reviews yet")?;
    }
    for review in &reviews {
        writeln!(
            out,
            "{} {}/5 on {}: {}",
            review.name,
            review.rating,
            review.date.format("%Y-%m-%d"),
            review.comment
        )?;
    }
    Ok(())
}

/// Show wishlisted products, resolving names through the catalog when it
/// is reachable.
///
/// # Errors
///
/// Returns `CommandError::Store` if the store cannot be read.
pub async fn show_wishlist(ctx: &Context, out: &mut dyn Write) -> Result<(), CommandError> {
    let ids = WishlistService::new(&ctx.store).items(&ctx.session)?;
    if ids.is_empty() {
        writeln!(out, "Your wishlist is empty")?;
        return Ok(());
    }
    for id in ids {
        match ctx.catalog.fetch_product(id).await {
            Some(product) => writeln!(out, "#{id} {}  {}", product.name, product.price)?,
            None => writeln!(out, "#{id}")?,
        }
    }
    Ok(())
}

/// Toggle a product on the wishlist.
///
/// # Errors
///
/// Returns `CommandError::Store` if the store cannot be read or written.
pub fn toggle_wishlist(ctx: &Context, id: ProductId, out: &mut dyn Write) -> Result<(), CommandError> {
    if !ctx.session.is_authenticated() {
        writeln!(out, "Not signed in: the wishlist will not be kept")?;
    }
    if WishlistService::new(&ctx.store).toggle(&ctx.session, id)? {
        writeln!(out, "Added #{id} to your wishlist")?;
    } else {
        writeln!(out, "Removed #{id} from your wishlist")?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::{offline_context, output};
    use super::*;

    #[test]
    fn test_reviews_newest_first() {
        let ctx = offline_context();
        let id = ProductId::new(4);
        let mut out = Vec::new();

        add_review(&ctx, id, ReviewDraft::new("Ravi", 4, "Solid"), &mut out).unwrap();
        let draft = ReviewDraft {
            name: "Meera".to_string(),
            rating: None,
            comment: "Love it".to_string(),
        };
        add_review(&ctx, id, draft, &mut out).unwrap();
        assert!(output(out).contains("Thanks, Meera! Rated 5/5"));

        let mut out = Vec::new();
        list_reviews(&ctx, id, &mut out).unwrap();
        let text = output(out);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Meera 5/5"));
        assert!(lines[1].starts_with("Ravi 4/5"));
    }

    #[tokio::test]
    async fn test_guest_wishlist_is_not_kept() {
        let ctx = offline_context();
        let mut out = Vec::new();
        toggle_wishlist(&ctx, ProductId::new(9), &mut out).unwrap();
        show_wishlist(&ctx, &mut out).await.unwrap();

        let text = output(out);
        assert!(text.contains("Added #9"));
        assert!(text.trim_end().ends_with("Your wishlist is empty"));
    }
}
