//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::capture::Duration;
use crate::domain::chat::session_id::DEFAULT_SESSION_ID;
use crate::domain::chat::SessionId;

/// Default agent backend base URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server_url: Option<String>,
    pub session_id: Option<String>,
    pub max_duration: Option<String>,
    pub notify: Option<bool>,
    pub playback: Option<bool>,
    pub cues: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            server_url: Some(DEFAULT_SERVER_URL.to_string()),
            session_id: Some(DEFAULT_SESSION_ID.to_string()),
            max_duration: Some("60s".to_string()),
            notify: Some(false),
            playback: Some(true),
            cues: Some(true),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            server_url: other.server_url.or(self.server_url),
            session_id: other.session_id.or(self.session_id),
            max_duration: other.max_duration.or(self.max_duration),
            notify: other.notify.or(self.notify),
            playback: other.playback.or(self.playback),
            cues: other.cues.or(self.cues),
        }
    }

    /// Get server URL, or the default if not set.
    /// A trailing slash is trimmed so path joining stays predictable.
    pub fn server_url_or_default(&self) -> String {
        self.server_url
            .as_deref()
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    /// Get session id, or the default if not set
    pub fn session_id_or_default(&self) -> SessionId {
        self.session_id
            .as_deref()
            .map(SessionId::from)
            .unwrap_or_default()
    }

    /// Get max capture duration as parsed Duration, or default if not set/invalid
    pub fn max_duration_or_default(&self) -> Duration {
        self.max_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_capture)
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    /// Get playback setting, or true if not set
    pub fn playback_or_default(&self) -> bool {
        self.playback.unwrap_or(true)
    }

    /// Get cues setting, or true if not set
    pub fn cues_or_default(&self) -> bool {
        self.cues.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.server_url, Some(DEFAULT_SERVER_URL.to_string()));
        assert_eq!(config.session_id, Some("12345".to_string()));
        assert_eq!(config.max_duration, Some("60s".to_string()));
        assert_eq!(config.notify, Some(false));
        assert_eq!(config.playback, Some(true));
        assert_eq!(config.cues, Some(true));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.server_url.is_none());
        assert!(config.session_id.is_none());
        assert!(config.max_duration.is_none());
        assert!(config.notify.is_none());
        assert!(config.playback.is_none());
        assert!(config.cues.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            server_url: Some("http://base:5000".to_string()),
            session_id: Some("base".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            server_url: Some("http://other:5000".to_string()),
            session_id: None, // Should not override
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.server_url, Some("http://other:5000".to_string()));
        assert_eq!(merged.session_id, Some("base".to_string())); // Kept from base
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            session_id: Some("keep-me".to_string()),
            notify: Some(true),
            ..Default::default()
        };

        let merged = base.merge(AppConfig::empty());

        assert_eq!(merged.session_id, Some("keep-me".to_string()));
        assert_eq!(merged.notify, Some(true));
    }

    #[test]
    fn server_url_trims_trailing_slash() {
        let config = AppConfig {
            server_url: Some("http://agent.local:5000/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.server_url_or_default(), "http://agent.local:5000");
    }

    #[test]
    fn session_id_or_default() {
        let config = AppConfig::empty();
        assert_eq!(config.session_id_or_default().as_str(), "12345");

        let config = AppConfig {
            session_id: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(config.session_id_or_default().as_str(), "abc");
    }

    #[test]
    fn max_duration_or_default_parses() {
        let config = AppConfig {
            max_duration: Some("90s".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_duration_or_default().as_secs(), 90);
    }

    #[test]
    fn max_duration_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            max_duration: Some("invalid".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_duration_or_default().as_secs(), 60);
    }

    #[test]
    fn boolean_defaults() {
        let config = AppConfig::empty();
        assert!(!config.notify_or_default());
        assert!(config.playback_or_default());
        assert!(config.cues_or_default());
    }
}
