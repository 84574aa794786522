//! Client-side password rules, checked before any request leaves the client.

use thiserror::Error;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Characters that satisfy the symbol rule.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// The first rule a password fails. Rules are checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordRule {
    #[error("Password must be at least 8 characters long.")]
    TooShort,
    #[error("Password must contain at least one uppercase letter.")]
    MissingUppercase,
    #[error("Password must contain at least one lowercase letter.")]
    MissingLowercase,
    #[error("Password must contain at least one number.")]
    MissingDigit,
    #[error("Password must contain at least one special character (!@#$%^&*(),.?\":{{}}|<>).")]
    MissingSymbol,
}

/// Checks a new password against every rule.
///
/// # Errors
/// Returns the first unmet [`PasswordRule`].
pub fn validate_password(password: &str) -> Result<(), PasswordRule> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordRule::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordRule::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordRule::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordRule::MissingDigit);
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        return Err(PasswordRule::MissingSymbol);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_password_meeting_every_rule() {
        assert_eq!(validate_password("Secret1!"), Ok(()));
        assert_eq!(validate_password("aB3{longer-one}"), Ok(()));
    }

    #[test]
    fn test_reports_first_unmet_rule() {
        assert_eq!(validate_password("Se1!"), Err(PasswordRule::TooShort));
        assert_eq!(
            validate_password("secret1!"),
            Err(PasswordRule::MissingUppercase)
        );
        assert_eq!(
            validate_password("SECRET1!"),
            Err(PasswordRule::MissingLowercase)
        );
        assert_eq!(
            validate_password("Secrets!"),
            Err(PasswordRule::MissingDigit)
        );
        assert_eq!(
            validate_password("Secret12"),
            Err(PasswordRule::MissingSymbol)
        );
    }

    /// Short passwords report length even when other rules also fail.
    #[test]
    fn test_length_checked_before_character_classes() {
        assert_eq!(validate_password("abc"), Err(PasswordRule::TooShort));
    }

    /// Symbols outside the fixed set do not count.
    #[test]
    fn test_symbol_outside_set_rejected() {
        assert_eq!(
            validate_password("Secret12-_"),
            Err(PasswordRule::MissingSymbol)
        );
    }

    #[test]
    fn test_symbol_message_lists_the_set() {
        let message = PasswordRule::MissingSymbol.to_string();
        assert!(message.contains("!@#$%^&*(),.?\":{}|<>"));
    }
}
