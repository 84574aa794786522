//! Email account command handlers.

use anyhow::Result;
use trueneed_core::auth::AuthResponse;
use trueneed_core::profile::{ProfileUpdate, avatar_color_for};

use super::{print_user, read_otp, read_password};
use crate::cli::App;

pub async fn register(
    app: &App,
    name: &str,
    email: &str,
    password: Option<String>,
    avatar_color: Option<&str>,
) -> Result<()> {
    let password = read_password(password)?;
    let ack = app
        .auth
        .register(name, email, &password, avatar_color)
        .await?;

    println!("{}", ack.message_or("Verification code sent to your email."));
    println!("  Finish with: trueneed verify-otp --email {email} --code <DIGITS>");
    Ok(())
}

pub async fn verify_otp(app: &App, email: &str, code: &str) -> Result<()> {
    let code = read_otp(code)?;
    let response = app.auth.verify_otp(email, &code).await?;
    signed_in(app, &response).await
}

pub async fn resend_otp(app: &App, email: &str) -> Result<()> {
    let ack = app.auth.resend_otp(email).await?;
    println!("{}", ack.message_or("New OTP sent to your email"));
    Ok(())
}

pub async fn login(app: &App, email: &str, password: Option<String>) -> Result<()> {
    let password = read_password(password)?;
    let response = app.auth.login(email, &password).await?;
    signed_in(app, &response).await
}

pub async fn logout(app: &App) -> Result<()> {
    let had_session = app.store.session()?.is_some();
    app.auth.logout().await?;

    if had_session {
        println!("✓ Logged out");
    } else {
        println!("Not logged in (no session found).");
    }
    Ok(())
}

async fn signed_in(app: &App, response: &AuthResponse) -> Result<()> {
    if response.tokens.is_none() {
        println!(
            "{}",
            response.message.as_deref().unwrap_or("No session was issued.")
        );
        return Ok(());
    }

    let Some(user) = app.store.user()? else {
        println!("✓ Logged in");
        return Ok(());
    };
    println!("✓ Logged in as {}", user.display_name());

    // older accounts may predate avatar colors
    if user.avatar_color.as_deref().is_none_or(str::is_empty) {
        let update = ProfileUpdate::default().avatar_color(avatar_color_for(&user.name));
        if let Err(e) = app.auth.update_profile(&update).await {
            tracing::warn!(error = %e, "failed to assign avatar color");
        }
    }

    if let Some(user) = app.store.user()? {
        print_user(&user);
    }
    Ok(())
}
