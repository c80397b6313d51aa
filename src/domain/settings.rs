//! Application settings and assistant chat history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User-tweakable application settings.
///
/// Logo and favicon are opaque data-URL strings supplied by the UI; the
/// core never interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_favicon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Masks currency digits on report surfaces
    #[serde(default)]
    pub privacy_mode_enabled: bool,
    #[serde(default)]
    pub google_calendar_connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splash_screen_background_color: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            custom_logo: None,
            custom_favicon: None,
            user_name: Some("Advogado(a)".to_string()),
            privacy_mode_enabled: false,
            google_calendar_connected: false,
            splash_screen_background_color: None,
        }
    }
}

/// Partial settings overlay; unset fields leave the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub custom_logo: Option<String>,
    pub custom_favicon: Option<String>,
    pub user_name: Option<String>,
    pub privacy_mode_enabled: Option<bool>,
    pub google_calendar_connected: Option<bool>,
    pub splash_screen_background_color: Option<String>,
}

impl AppSettings {
    /// Merge a patch into the current settings.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.custom_logo {
            self.custom_logo = Some(v);
        }
        if let Some(v) = patch.custom_favicon {
            self.custom_favicon = Some(v);
        }
        if let Some(v) = patch.user_name {
            self.user_name = Some(v);
        }
        if let Some(v) = patch.privacy_mode_enabled {
            self.privacy_mode_enabled = v;
        }
        if let Some(v) = patch.google_calendar_connected {
            self.google_calendar_connected = v;
        }
        if let Some(v) = patch.splash_screen_background_color {
            self.splash_screen_background_color = Some(v);
        }
    }
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    User,
    Ai,
}

/// One message in the assistant chat history. The history is owned by the
/// caller; the assistant itself is stateless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: ChatSender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(sender: ChatSender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_leaves_unset_fields_alone() {
        let mut settings = AppSettings::default();
        settings.apply(SettingsPatch {
            privacy_mode_enabled: Some(true),
            ..Default::default()
        });

        assert!(settings.privacy_mode_enabled);
        assert_eq!(settings.user_name.as_deref(), Some("Advogado(a)"));
    }

    #[test]
    fn test_chat_sender_labels() {
        let msg = ChatMessage::new(ChatSender::Ai, "Olá");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "ai");
    }
}
