//! Recipient normalization to WhatsApp chat identifiers.

use thiserror::Error;

/// Server suffix for personal chats.
const CHAT_SUFFIX: &str = "s.whatsapp.net";

/// Minimum digit count for a plausible international number.
pub const MIN_DIGITS: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatIdError {
    #[error("phone number `{0}` is too short, need at least {MIN_DIGITS} digits")]
    TooShort(String),

    #[error("phone number `{0}` contains characters other than digits and formatting")]
    InvalidCharacters(String),
}

/// Normalized recipient address understood by the session client,
/// `<digits>@s.whatsapp.net`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatId(String);

impl ChatId {
    /// Normalize a caller-supplied phone number into a chat id.
    ///
    /// Strips the formatting characters `+`, space, `-`, `(`, `)`; what
    /// remains must be at least [`MIN_DIGITS`] ASCII digits.
    pub fn from_phone(phone: &str) -> Result<Self, ChatIdError> {
        let stripped: String = phone
            .chars()
            .filter(|c| !matches!(c, '+' | ' ' | '-' | '(' | ')'))
            .collect();

        if stripped.chars().any(|c| !c.is_ascii_digit()) {
            return Err(ChatIdError::InvalidCharacters(phone.to_string()));
        }
        if stripped.len() < MIN_DIGITS {
            return Err(ChatIdError::TooShort(phone.to_string()));
        }

        Ok(Self(format!("{stripped}@{CHAT_SUFFIX}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
