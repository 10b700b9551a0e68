//! Backend exchange reply value object

use serde::Deserialize;

/// Deserialized body of one exchange with the agent backend.
///
/// The backend signals failure by populating `error`; all other fields are
/// then meaningless. `transcription` may be null even on success when the
/// backend substituted a spoken fallback for an inaudible recording.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExchangeReply {
    pub error: Option<String>,
    pub transcription: Option<String>,
    pub llm_response: Option<String>,
    pub audio_url: Option<String>,
}

impl ExchangeReply {
    /// Check whether the backend reported an application error
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_success_body() {
        let reply: ExchangeReply = serde_json::from_str(
            r#"{"transcription":"hi","llm_response":"hello","audio_url":"https://cdn.example/r.mp3"}"#,
        )
        .unwrap();

        assert!(!reply.is_error());
        assert_eq!(reply.transcription.as_deref(), Some("hi"));
        assert_eq!(reply.llm_response.as_deref(), Some("hello"));
        assert_eq!(reply.audio_url.as_deref(), Some("https://cdn.example/r.mp3"));
    }

    #[test]
    fn parses_error_body() {
        let reply: ExchangeReply =
            serde_json::from_str(r#"{"error":"no speech detected"}"#).unwrap();

        assert!(reply.is_error());
        assert_eq!(reply.error.as_deref(), Some("no speech detected"));
    }

    #[test]
    fn parses_null_transcription_fallback() {
        // The backend's fallback path returns a spoken message with no transcription
        let reply: ExchangeReply = serde_json::from_str(
            r#"{"transcription":null,"llm_response":"Sorry, I couldn't understand that.","audio_url":null}"#,
        )
        .unwrap();

        assert!(!reply.is_error());
        assert!(reply.transcription.is_none());
        assert!(reply.audio_url.is_none());
    }

    #[test]
    fn ignores_unknown_fields() {
        let reply: ExchangeReply = serde_json::from_str(
            r#"{"transcription":"hi","llm_response":"hello","history":[{"role":"user","text":"hi"}]}"#,
        )
        .unwrap();

        assert_eq!(reply.transcription.as_deref(), Some("hi"));
    }
}
