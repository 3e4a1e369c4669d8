//! Identity commands.
//!
//! # Usage
//!
//! ```bash
//! shopfront signup -n "Asha Rao" -e asha@example.com -p secret1
//! shopfront login -e asha@example.com -p secret1
//! shopfront whoami
//! shopfront logout
//! ```

use std::io::Write;

use secrecy::{ExposeSecret, SecretString};

use shopfront_storefront::services::auth::AuthService;
use shopfront_storefront::services::cart::CartService;
use shopfront_storefront::services::orders::OrderService;

use super::{CommandError, Context};

/// Register an identity and sign in as it.
///
/// # Errors
///
/// Returns `CommandError::Auth` for invalid input or a duplicate email.
pub fn signup(
    ctx: &mut Context,
    name: &str,
    email: &str,
    password: &SecretString,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let identity = AuthService::new(&ctx.store).signup(
        &mut ctx.session,
        name,
        email,
        password.expose_secret(),
    )?;
    writeln!(out, "Welcome, {}! Signed in as {}", identity.name, identity.email)?;
    Ok(())
}

/// Sign in.
///
/// # Errors
///
/// Returns `CommandError::Auth` if the credentials do not match.
pub fn login(
    ctx: &mut Context,
    email: &str,
    password: &SecretString,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let identity =
        AuthService::new(&ctx.store).login(&mut ctx.session, email, password.expose_secret())?;
    writeln!(out, "Signed in as {}", identity.email)?;
    Ok(())
}

/// Sign out.
///
/// # Errors
///
/// Returns `CommandError::Auth` if the session cannot be removed.
pub fn logout(ctx: &mut Context, out: &mut dyn Write) -> Result<(), CommandError> {
    let was_signed_in = ctx.session.is_authenticated();
    AuthService::new(&ctx.store).logout(&mut ctx.session)?;
    if was_signed_in {
        writeln!(out, "Signed out")?;
    } else {
        writeln!(out, "Nobody was signed in")?;
    }
    Ok(())
}

/// Show the current identity with cart and order counts.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn whoami(ctx: &Context, out: &mut dyn Write) -> Result<(), CommandError> {
    let Some(identity) = ctx.session.identity() else {
        writeln!(out, "Not signed in")?;
        return Ok(());
    };

    let cart = CartService::new(&ctx.store).count(&ctx.session)?;
    let orders = OrderService::new(&ctx.store).history(&ctx.session)?;

    writeln!(out, "{} <{}>", identity.display_name(), identity.email)?;
    writeln!(out, "Role: {}", identity.display_role())?;
    writeln!(out, "Cart: {cart} item(s), Orders: {}", orders.len())?;
    Ok(())
}
