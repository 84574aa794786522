//! Modal dialogs and their stacking rules.
//!
//! Login and signup are mutually exclusive; every switch between auth
//! dialogs clears the shared auth error. The delete confirmation sits on top
//! of settings and forgets the terms checkbox whenever it closes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Login,
    Signup,
    ForgotPassword,
    OtpVerification,
    Settings,
    Personalization,
    Help,
    DeleteConfirmation,
}

impl Modal {
    fn is_auth(self) -> bool {
        matches!(self, Modal::Login | Modal::Signup)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalStack {
    open: Vec<Modal>,
    auth_error: Option<String>,
    delete_terms_agreed: bool,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Topmost open modal.
    pub fn top(&self) -> Option<Modal> {
        self.open.last().copied()
    }

    pub fn is_open(&self, modal: Modal) -> bool {
        self.open.contains(&modal)
    }

    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    pub fn set_auth_error(&mut self, message: impl Into<String>) {
        self.auth_error = Some(message.into());
    }

    pub fn delete_terms_agreed(&self) -> bool {
        self.delete_terms_agreed
    }

    pub fn set_delete_terms_agreed(&mut self, agreed: bool) {
        self.delete_terms_agreed = agreed;
    }

    /// Opens `modal` on top. Opening one auth dialog closes the other.
    pub fn open(&mut self, modal: Modal) {
        if modal.is_auth() {
            self.open.retain(|m| !m.is_auth());
        }
        self.open.retain(|m| *m != modal);
        self.open.push(modal);
    }

    pub fn close(&mut self, modal: Modal) {
        self.open.retain(|m| *m != modal);
        if modal == Modal::DeleteConfirmation {
            self.delete_terms_agreed = false;
        }
    }

    pub fn close_all(&mut self) {
        self.open.clear();
        self.auth_error = None;
        self.delete_terms_agreed = false;
    }

    pub fn switch_to_signup(&mut self) {
        self.open(Modal::Signup);
        self.auth_error = None;
    }

    pub fn switch_to_login(&mut self) {
        self.open(Modal::Login);
        self.auth_error = None;
    }

    /// Closes both auth dialogs and clears the error.
    pub fn close_auth(&mut self) {
        self.open.retain(|m| !m.is_auth());
        self.auth_error = None;
    }

    /// Replaces the login dialog with the forgot-password dialog.
    pub fn open_forgot_password(&mut self) {
        self.close(Modal::Login);
        self.open(Modal::ForgotPassword);
        self.auth_error = None;
    }

    pub fn back_to_login(&mut self) {
        self.close(Modal::ForgotPassword);
        self.switch_to_login();
    }

    /// Replaces the signup dialog with code verification.
    pub fn open_otp_verification(&mut self) {
        self.close(Modal::Signup);
        self.open(Modal::OtpVerification);
        self.auth_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_and_signup_are_exclusive() {
        let mut modals = ModalStack::new();
        modals.open(Modal::Login);
        modals.open(Modal::Signup);

        assert!(!modals.is_open(Modal::Login));
        assert_eq!(modals.top(), Some(Modal::Signup));
    }

    #[test]
    fn test_switch_clears_auth_error() {
        let mut modals = ModalStack::new();
        modals.open(Modal::Login);
        modals.set_auth_error("Invalid email or password");

        modals.switch_to_signup();

        assert_eq!(modals.auth_error(), None);
        assert_eq!(modals.top(), Some(Modal::Signup));
    }

    #[test]
    fn test_closing_delete_confirmation_resets_terms() {
        let mut modals = ModalStack::new();
        modals.open(Modal::Settings);
        modals.open(Modal::DeleteConfirmation);
        modals.set_delete_terms_agreed(true);

        modals.close(Modal::DeleteConfirmation);

        assert!(!modals.delete_terms_agreed());
        assert_eq!(modals.top(), Some(Modal::Settings));
    }

    #[test]
    fn test_forgot_password_round_trip() {
        let mut modals = ModalStack::new();
        modals.open(Modal::Login);
        modals.open_forgot_password();
        assert_eq!(modals.top(), Some(Modal::ForgotPassword));
        assert!(!modals.is_open(Modal::Login));

        modals.back_to_login();
        assert_eq!(modals.top(), Some(Modal::Login));
        assert!(!modals.is_open(Modal::ForgotPassword));
    }

    #[test]
    fn test_reopening_moves_to_top() {
        let mut modals = ModalStack::new();
        modals.open(Modal::Help);
        modals.open(Modal::Settings);
        modals.open(Modal::Help);
        assert_eq!(modals.top(), Some(Modal::Help));

        modals.close_all();
        assert_eq!(modals.top(), None);
    }
}
