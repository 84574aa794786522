//! Presentation state for TrueNeed front ends.
//!
//! Everything here is plain data plus reducers: hosts feed in input and
//! session events, then render whatever the state says. Nothing in this crate
//! performs I/O other than persisting the theme through the session store.

pub mod chat;
pub mod headline;
pub mod modals;
pub mod otp;
pub mod panels;
pub mod toast;

use std::time::Instant;

pub use chat::{ChatView, Conversation};
pub use headline::Headline;
pub use modals::{Modal, ModalStack};
pub use otp::OtpEntry;
pub use panels::{PanelSide, Panels};
pub use toast::{Toast, ToastKind, ToastSlot};
use trueneed_core::SessionEvent;
use trueneed_core::profile::UserProfile;
use trueneed_core::session::{SessionStore, StoreError};
pub use trueneed_core::theme::Theme;

/// Toast shown when the backend session could not be renewed.
pub const SESSION_EXPIRED_TOAST: &str = "Session expired. Please log in again.";

/// Top-level view state.
#[derive(Debug, Clone, Default)]
pub struct ShellState {
    pub theme: Theme,
    pub user: Option<UserProfile>,
    pub modals: ModalStack,
    pub panels: Panels,
    pub otp: OtpEntry,
    pub headline: Headline,
    pub chat: ChatView,
    pub toast: ToastSlot,
}

impl ShellState {
    /// Restores the theme and the signed-in profile from `store`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn load(store: &SessionStore) -> Result<Self, StoreError> {
        Ok(Self {
            theme: store.theme()?,
            user: store.restore()?,
            ..Self::default()
        })
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Flips the theme and persists the choice.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn toggle_theme(&mut self, store: &SessionStore) -> Result<Theme, StoreError> {
        self.theme = self.theme.toggled();
        store.set_theme(self.theme)?;
        Ok(self.theme)
    }

    /// Logo click: back to the landing page. Archived chats are kept.
    pub fn go_home(&mut self) {
        self.chat.reset();
        self.panels.analysis_open = false;
    }

    /// Reacts to a session transition published by the API client.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn apply_session_event(
        &mut self,
        event: SessionEvent,
        store: &SessionStore,
        now: Instant,
    ) -> Result<(), StoreError> {
        match event {
            SessionEvent::SignedIn | SessionEvent::ProfileUpdated => {
                self.user = store.user()?;
                if event == SessionEvent::SignedIn {
                    self.modals.close_auth();
                    self.otp.reset();
                }
            }
            SessionEvent::SignedOut => {
                self.user = None;
                // an explicit sign-out supersedes the expiry notice
                let expiry_shown = self
                    .toast
                    .visible(now)
                    .is_some_and(|t| t.message == SESSION_EXPIRED_TOAST);
                if expiry_shown {
                    self.toast.dismiss();
                }
                if self.chat.is_active() {
                    self.chat.clear_all();
                }
            }
            SessionEvent::Invalidated => {
                self.user = None;
                self.modals.close_all();
                self.chat.reset();
                self.toast.show(SESSION_EXPIRED_TOAST, ToastKind::Error, now);
            }
        }
        tracing::debug!(?event, signed_in = self.is_signed_in(), "applied session event");
        Ok(())
    }
}
