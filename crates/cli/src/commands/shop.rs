//! Cart, checkout and order commands.
//!
//! # Usage
//!
//! ```bash
//! shopfront cart add 12 --quantity 2
//! shopfront cart show
//! shopfront checkout --name "Asha Rao" --city Pune --state MH --postal-code 411001
//! shopfront orders
//! ```

use std::io::Write;

use shopfront_core::{Cart, Order, ProductId, ShippingAddress};
use shopfront_storefront::services::cart::CartService;
use shopfront_storefront::services::orders::OrderService;

use super::{CommandError, Context, product_line};

fn print_cart(cart: &Cart, out: &mut dyn Write) -> Result<(), CommandError> {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty")?;
        return Ok(());
    }
    for product in cart.items() {
        writeln!(out, "{}", product_line(product))?;
    }
    writeln!(out, "{} item(s), total {}", cart.len(), cart.total())?;
    Ok(())
}

fn print_order(order: &Order, out: &mut dyn Write) -> Result<(), CommandError> {
    let address = order.address();
    writeln!(
        out,
        "Order {} placed {}: {} item(s), total {}",
        order.id(),
        order.placed_at().format("%Y-%m-%d %H:%M"),
        order.items().len(),
        order.total()
    )?;
    writeln!(
        out,
        "  Ship to {}, {}, {} {}",
        address.name, address.city, address.state, address.postal_code
    )?;
    Ok(())
}

/// Show the cart.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the store cannot be read.
pub fn show(ctx: &Context, out: &mut dyn Write) -> Result<(), CommandError> {
    let cart = CartService::new(&ctx.store).cart(&ctx.session)?;
    print_cart(&cart, out)
}

/// Add `quantity` snapshots of a product.
///
/// # Errors
///
/// Returns `CommandError::ProductNotFound` if the catalog has no such product.
/// Returns `CommandError::Cart` for a zero quantity or a store failure.
pub async fn add(
    ctx: &Context,
    id: ProductId,
    quantity: u32,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    if !ctx.session.is_authenticated() {
        writeln!(out, "Not signed in: the cart will not be kept")?;
    }
    let product = ctx.product(id).await?;
    let name = product.name.clone();
    let cart = CartService::new(&ctx.store).add_quantity(&ctx.session, product, quantity)?;
    writeln!(out, "Added {quantity} x {name}")?;
    writeln!(out, "{} item(s), total {}", cart.len(), cart.total())?;
    Ok(())
}

/// Remove every entry of a product.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the store cannot be read or written.
pub fn remove(ctx: &Context, id: ProductId, out: &mut dyn Write) -> Result<(), CommandError> {
    let service = CartService::new(&ctx.store);
    let before = service.count(&ctx.session)?;
    let cart = service.remove_item(&ctx.session, id)?;
    writeln!(out, "Removed {} item(s)", before.saturating_sub(cart.len()))?;
    print_cart(&cart, out)
}

/// Empty the cart.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the cart cannot be removed.
pub fn clear(ctx: &Context, out: &mut dyn Write) -> Result<(), CommandError> {
    CartService::new(&ctx.store).clear(&ctx.session)?;
    writeln!(out, "Cart cleared")?;
    Ok(())
}

/// Place an order for the cart.
///
/// # Errors
///
/// Returns `CommandError::Order` if nobody is signed in, the address is
/// incomplete, the cart is empty or persisting fails.
pub fn checkout(
    ctx: &Context,
    address: ShippingAddress,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let order = OrderService::new(&ctx.store).place_order(&ctx.session, address)?;
    writeln!(out, "Thank you for your order!")?;
    print_order(&order, out)
}

/// List past orders, oldest first.
///
/// # Errors
///
/// Returns `CommandError::Order` if the store cannot be read.
pub fn orders(ctx: &Context, out: &mut dyn Write) -> Result<(), CommandError> {
    if !ctx.session.is_authenticated() {
        writeln!(out, "Sign in to see your orders")?;
        return Ok(());
    }
    let orders = OrderService::new(&ctx.store).history(&ctx.session)?;
    if orders.is_empty() {
        writeln!(out, "No orders yet")?;
    }
    for order in &orders {
        print_order(order, out)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::super::account::signup;
    use super::super::test_support::{offline_context, output, product};
    use super::*;

    #[test]
    fn test_checkout_flow() {
        let mut ctx = offline_context();
        let mut out = Vec::new();
        signup(
            &mut ctx,
            "Asha",
            "asha@example.com",
            &SecretString::from("secret1".to_string()),
            &mut out,
        )
        .unwrap();

        let cart = CartService::new(&ctx.store);
        cart.add_quantity(&ctx.session, product(1, 500), 2).unwrap();
        cart.add_item(&ctx.session, product(2, 250)).unwrap();

        let mut out = Vec::new();
        show(&ctx, &mut out).unwrap();
        assert!(output(out).contains("3 item(s), total ₹1,250"));

        let mut out = Vec::new();
        remove(&ctx, ProductId::new(1), &mut out).unwrap();
        assert!(output(out).starts_with("Removed 2 item(s)"));

        let mut out = Vec::new();
        checkout(&ctx, ShippingAddress::new("Asha", "Pune", "MH", "411001"), &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("1 item(s), total ₹250"));
        assert!(text.contains("Ship to Asha, Pune, MH 411001"));

        let mut out = Vec::new();
        show(&ctx, &mut out).unwrap();
        assert_eq!(output(out), "Your cart is empty\n");

        let mut out = Vec::new();
        orders(&ctx, &mut out).unwrap();
        assert_eq!(output(out).lines().count(), 2);
    }

    #[test]
    fn test_checkout_without_identity_fails() {
        let ctx = offline_context();
        let mut out = Vec::new();
        let result = checkout(&ctx, ShippingAddress::new("A", "B", "C", "D"), &mut out);
        assert!(matches!(result, Err(CommandError::Order(_))));
    }
}
