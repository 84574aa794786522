//! Profile and account command handlers.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use trueneed_core::profile::{ProfileUpdate, encode_profile_image};

use super::{print_user, read_password};
use crate::cli::App;

pub struct ProfileArgs {
    pub name: Option<String>,
    pub avatar_color: Option<String>,
    pub image: Option<PathBuf>,
    pub remove_image: bool,
}

pub async fn whoami(app: &App, refresh: bool) -> Result<()> {
    let user = if refresh {
        Some(app.auth.current_user().await?)
    } else {
        app.store.restore()?
    };

    match user {
        Some(user) => print_user(&user),
        None => println!("Not logged in."),
    }
    Ok(())
}

pub async fn update_profile(app: &App, args: ProfileArgs) -> Result<()> {
    let mut update = ProfileUpdate::default();
    if let Some(name) = args.name {
        update = update.name(name);
    }
    if let Some(color) = args.avatar_color {
        update = update.avatar_color(color);
    }
    if let Some(path) = args.image {
        let bytes =
            fs::read(&path).with_context(|| format!("read image {}", path.display()))?;
        update = update.profile_image(encode_profile_image(&bytes)?);
    } else if args.remove_image {
        update = update.remove_profile_image();
    }

    let response = app.auth.update_profile(&update).await?;
    println!(
        "✓ {}",
        response.message.as_deref().unwrap_or("Profile updated")
    );
    if let Some(user) = &response.user {
        print_user(user);
    }
    Ok(())
}

pub async fn delete_account(app: &App, password: Option<&str>, agreed: bool) -> Result<()> {
    if !agreed {
        bail!("Account deletion is permanent and irreversible. Re-run with --yes to confirm.");
    }
    let ack = app.auth.delete_account(password).await?;
    println!("✓ {}", ack.message_or("Account deleted"));
    Ok(())
}

pub async fn forgot_password(app: &App, email: &str) -> Result<()> {
    let ack = app.auth.forgot_password(email).await?;
    println!(
        "{}",
        ack.message_or("If an account exists, a reset link has been sent to your email.")
    );
    Ok(())
}

pub async fn reset_password(app: &App, token: &str, password: Option<String>) -> Result<()> {
    let password = read_password(password)?;
    let ack = app.auth.reset_password(token, &password).await?;
    println!("✓ {}", ack.message_or("Password reset. You can now log in."));
    Ok(())
}
