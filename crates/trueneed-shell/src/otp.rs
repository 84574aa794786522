//! Six-box verification code entry.

use trueneed_core::auth::OTP_LENGTH;

const LAST: usize = OTP_LENGTH - 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpEntry {
    digits: [Option<char>; OTP_LENGTH],
    focus: usize,
}

impl OtpEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the focused box.
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn set_focus(&mut self, index: usize) {
        self.focus = index.min(LAST);
    }

    pub fn digits(&self) -> &[Option<char>; OTP_LENGTH] {
        &self.digits
    }

    /// Types one character into the focused box.
    ///
    /// Non-digits are ignored and return `false`. A digit fills the box and
    /// moves focus to the next one, staying on the last box.
    pub fn input(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() {
            return false;
        }
        self.digits[self.focus] = Some(c);
        if self.focus < LAST {
            self.focus += 1;
        }
        true
    }

    /// Clears the focused box, or moves back one box when it is already empty.
    pub fn backspace(&mut self) {
        if self.digits[self.focus].take().is_none() && self.focus > 0 {
            self.focus -= 1;
        }
    }

    /// Fills every box from pasted text holding exactly six digits.
    ///
    /// Anything else leaves the entry untouched and returns `false`.
    pub fn paste(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.len() != OTP_LENGTH || !text.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        for (slot, c) in self.digits.iter_mut().zip(text.chars()) {
            *slot = Some(c);
        }
        self.focus = LAST;
        true
    }

    /// The full code once all six boxes are filled.
    pub fn code(&self) -> Option<String> {
        self.digits.iter().copied().collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
