//! Phone sign-in command handlers.

use anyhow::{Result, bail};
use trueneed_core::auth::{PhoneAuthResponse, requires_registration};

use super::{print_user, read_otp, read_password};
use crate::cli::App;

pub async fn register(
    app: &App,
    phone: &str,
    name: &str,
    password: Option<String>,
    avatar_color: Option<&str>,
) -> Result<()> {
    let password = read_password(password)?;
    let ack = app
        .auth
        .phone_register(phone, name, &password, avatar_color)
        .await?;

    println!("{}", ack.message_or("Verification code sent to your phone."));
    println!("  Finish with: trueneed phone verify --phone {phone} --code <DIGITS>");
    Ok(())
}

pub async fn login(app: &App, phone: &str) -> Result<()> {
    let ack = app.auth.phone_login(phone).await?;
    println!("{}", ack.message_or("Verification code sent to your phone."));
    Ok(())
}

pub async fn verify(app: &App, phone: &str, code: &str) -> Result<()> {
    let code = read_otp(code)?;
    let response = app.auth.phone_verify_otp(phone, &code).await?;
    signed_in(&response);
    Ok(())
}

pub async fn firebase(
    app: &App,
    id_token: &str,
    name: Option<&str>,
    password: Option<&str>,
) -> Result<()> {
    match app.auth.firebase_phone_auth(id_token, name, password).await {
        Ok(response) => {
            signed_in(&response);
            Ok(())
        }
        Err(e) if name.is_none() && requires_registration(&e) => {
            bail!("This number has no account yet. Re-run with --name to create one.")
        }
        Err(e) => Err(e.into()),
    }
}

fn signed_in(response: &PhoneAuthResponse) {
    if response.session().is_none() {
        println!(
            "{}",
            response.message.as_deref().unwrap_or("No session was issued.")
        );
        return;
    }
    match &response.user {
        Some(user) => {
            println!("✓ Logged in as {}", user.display_name());
            print_user(user);
        }
        None => println!("✓ Logged in"),
    }
}
