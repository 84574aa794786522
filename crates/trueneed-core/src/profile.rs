//! User profile record, avatar colors and profile image encoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Largest accepted profile image, in bytes.
pub const MAX_PROFILE_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Avatar palette, indexed by the first character of the name.
pub const AVATAR_PALETTE: [&str; 10] = [
    "#10b981", // emerald
    "#3b82f6", // blue
    "#8b5cf6", // violet
    "#ec4899", // pink
    "#f59e0b", // amber
    "#06b6d4", // cyan
    "#14b8a6", // teal
    "#f97316", // orange
    "#a855f7", // purple
    "#22c55e", // green
];

/// Cached copy of the backend's user record.
///
/// Fields the client does not model are kept in `extra` so a cached profile
/// round-trips without loss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_color: Option<String>,
    /// Inline image as a `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_joined: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Stored avatar color, or the palette color for the name.
    pub fn display_color(&self) -> &str {
        match self.avatar_color.as_deref() {
            Some(color) if !color.is_empty() => color,
            _ => avatar_color_for(&self.name),
        }
    }

    /// Best label for the person: name, then email, then phone number.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        self.email
            .as_deref()
            .or(self.phone_number.as_deref())
            .unwrap_or("")
    }
}

/// Palette color derived from the first character of `name`.
pub fn avatar_color_for(name: &str) -> &'static str {
    let index = name
        .chars()
        .next()
        .map_or(0, |c| c as usize % AVATAR_PALETTE.len());
    AVATAR_PALETTE[index]
}

/// Partial profile update. Unset fields are left untouched by the backend;
/// `profile_image: Some(None)` removes the image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.avatar_color.is_none() && self.profile_image.is_none()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn avatar_color(mut self, color: impl Into<String>) -> Self {
        self.avatar_color = Some(color.into());
        self
    }

    #[must_use]
    pub fn profile_image(mut self, data_url: impl Into<String>) -> Self {
        self.profile_image = Some(Some(data_url.into()));
        self
    }

    #[must_use]
    pub fn remove_profile_image(mut self) -> Self {
        self.profile_image = Some(None);
        self
    }
}

/// Encodes raw image bytes as a `data:` URL suitable for `profile_image`.
///
/// # Errors
/// Returns [`ValidationError::NotAnImage`] when the bytes are not a known
/// image format and [`ValidationError::ImageTooLarge`] above 2 MiB.
pub fn encode_profile_image(bytes: &[u8]) -> Result<String, ValidationError> {
    let mime = infer::get(bytes)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .map(|kind| kind.mime_type())
        .ok_or(ValidationError::NotAnImage)?;

    if bytes.len() > MAX_PROFILE_IMAGE_BYTES {
        return Err(ValidationError::ImageTooLarge);
    }

    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
