//! CLI command handlers.

pub mod account;
pub mod auth;
pub mod chat;
pub mod config;
pub mod oauth;
pub mod phone;
pub mod theme;

use std::io::{self, BufRead};

use anyhow::{Result, bail};
use trueneed_core::ValidationError;
use trueneed_core::profile::UserProfile;
use trueneed_shell::OtpEntry;

/// Uses the flag value, or reads one line from stdin.
fn read_password(flag: Option<String>) -> Result<String> {
    if let Some(password) = flag {
        return Ok(password);
    }
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        bail!("Password cannot be empty (pass --password or pipe it on stdin)");
    }
    Ok(password.to_string())
}

/// Runs the code through the same six-box entry the dialogs use.
fn read_otp(code: &str) -> Result<String> {
    let mut entry = OtpEntry::new();
    entry.paste(code);
    match entry.code() {
        Some(code) => Ok(code),
        None => Err(ValidationError::IncompleteOtp.into()),
    }
}

fn print_user(user: &UserProfile) {
    println!("  Name:   {}", user.display_name());
    if let Some(email) = &user.email {
        println!("  Email:  {email}");
    }
    if let Some(phone) = &user.phone_number {
        println!("  Phone:  {phone}");
    }
    println!("  Avatar: {}", user.display_color());
    if let Some(provider) = &user.oauth_provider {
        println!("  Signed up with: {provider}");
    }
    if let Some(joined) = &user.date_joined {
        println!("  Joined: {joined}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_otp_accepts_six_digits() {
        assert_eq!(read_otp(" 123456 ").unwrap(), "123456");
    }

    #[test]
    fn test_read_otp_rejects_short_code() {
        let err = read_otp("12345").unwrap_err();
        assert_eq!(err.to_string(), "Please enter all 6 digits");
    }

    #[test]
    fn test_read_password_prefers_flag() {
        assert_eq!(read_password(Some("Secr3t!pw".into())).unwrap(), "Secr3t!pw");
    }
}
