//! OAuth command handlers.

use anyhow::Result;
use trueneed_core::oauth::OAuthProvider;

use super::print_user;
use crate::cli::App;

pub async fn url(app: &App, provider: &str) -> Result<()> {
    let provider: OAuthProvider = provider.parse()?;
    let start = app.auth.oauth_login(provider).await?;

    println!("To sign in with {provider}, open this URL in a browser:");
    println!("  {}", start.auth_url);
    println!();
    println!("Then run: trueneed oauth complete '<URL you were redirected to>'");
    Ok(())
}

pub async fn callback(app: &App, provider: &str, code: &str, state: &str) -> Result<()> {
    let provider: OAuthProvider = provider.parse()?;
    let response = app.auth.oauth_callback(provider, code, state).await?;

    match response.user {
        Some(user) => {
            println!("✓ Logged in with {provider}");
            print_user(&user);
        }
        None => println!(
            "{}",
            response.message.as_deref().unwrap_or("No session was issued.")
        ),
    }
    Ok(())
}

pub fn complete(app: &App, url: &str) -> Result<()> {
    let user = app.auth.complete_oauth_redirect(url)?;
    println!("✓ Logged in as {}", user.display_name());
    print_user(&user);
    Ok(())
}
