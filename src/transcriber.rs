//! Speech-to-text capability and the transcribe-then-score step

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::scorer::{validate_transcription, ComparisonResult};
use crate::thresholds::Thresholds;

/// Opaque reference to a recorded audio sample (usually a file or URL)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioRef(pub String);

impl AudioRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Request for transcription
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub audio: AudioRef,
    /// Optional language hint (ISO 639-1 code, e.g., "es")
    pub language: Option<String>,
}

impl TranscriptionRequest {
    pub fn new(audio: AudioRef) -> Self {
        Self {
            audio,
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Trait for speech-to-text providers
pub trait Transcriber: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Transcribe audio to text. Failures map to `Error::TranscriptionUnavailable`.
    fn transcribe(&self, request: &TranscriptionRequest) -> Result<String>;
}

/// Transcribe `audio` and score the text against `expected`.
///
/// The scorer only runs once a transcription exists; provider failures are
/// returned as is.
pub fn transcribe_and_validate(
    transcriber: &dyn Transcriber,
    audio: &AudioRef,
    expected: &str,
    language: &str,
    thresholds: &Thresholds,
) -> Result<ComparisonResult> {
    debug!(
        provider = transcriber.name(),
        expected, language, "Transcribing and validating audio"
    );

    let request = TranscriptionRequest::new(audio.clone()).with_language(language);
    let transcription = transcriber.transcribe(&request).map_err(|e| {
        warn!(provider = transcriber.name(), error = %e, "Transcription failed");
        e
    })?;

    let result = validate_transcription(&transcription, expected, thresholds);
    debug!(
        transcription = %result.transcription,
        similarity = result.similarity,
        is_correct = result.is_correct,
        "Validated transcription"
    );
    Ok(result)
}

/// Phrases returned by [`CannedTranscriber::default`]
pub const DEFAULT_CANNED_PHRASES: &[&str] = &[
    "Hola, ¿cómo estás?",
    "Gracias por tu ayuda",
    "Me gusta aprender español",
    "Hasta luego",
];

/// Stand-in provider that answers with a random phrase from a fixed list
#[derive(Debug, Clone)]
pub struct CannedTranscriber {
    phrases: Vec<String>,
}

impl CannedTranscriber {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

impl Default for CannedTranscriber {
    fn default() -> Self {
        Self::new(DEFAULT_CANNED_PHRASES.iter().copied())
    }
}

impl Transcriber for CannedTranscriber {
    fn name(&self) -> &'static str {
        "canned"
    }

    fn transcribe(&self, request: &TranscriptionRequest) -> Result<String> {
        let mut rng = rand::thread_rng();
        let phrase = self.phrases.choose(&mut rng).ok_or_else(|| {
            Error::TranscriptionUnavailable("canned transcriber has no phrases".to_string())
        })?;
        debug!(
            audio = request.audio.as_str(),
            language = request.language.as_deref().unwrap_or("auto"),
            "Returning canned transcription"
        );
        Ok(phrase.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Returns a fixed answer and remembers the last request
    struct FixedTranscriber {
        text: String,
        last_language: Mutex<Option<String>>,
    }

    impl FixedTranscriber {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                last_language: Mutex::new(None),
            }
        }
    }

    impl Transcriber for FixedTranscriber {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn transcribe(&self, request: &TranscriptionRequest) -> Result<String> {
            *self.last_language.lock().unwrap() = request.language.clone();
            Ok(self.text.clone())
        }
    }

    struct OfflineTranscriber;

    impl Transcriber for OfflineTranscriber {
        fn name(&self) -> &'static str {
            "offline"
        }

        fn transcribe(&self, _request: &TranscriptionRequest) -> Result<String> {
            Err(Error::TranscriptionUnavailable("network unreachable".to_string()))
        }
    }

    #[test]
    fn test_transcribe_and_validate_lowercases() {
        let transcriber = FixedTranscriber::new("HOLA");
        let result = transcribe_and_validate(
            &transcriber,
            &AudioRef::new("file:///tmp/take1.m4a"),
            "Hola",
            "es",
            &Thresholds::default(),
        )
        .unwrap();

        assert_eq!(result.transcription, "HOLA");
        assert_eq!(result.similarity, 1.0);
        assert!(result.is_correct);
        assert_eq!(
            transcriber.last_language.lock().unwrap().as_deref(),
            Some("es")
        );
    }

    #[test]
    fn test_transcribe_and_validate_empty_transcription() {
        let transcriber = FixedTranscriber::new("");
        let result = transcribe_and_validate(
            &transcriber,
            &AudioRef::new("take"),
            "agua",
            "es",
            &Thresholds::default(),
        )
        .unwrap();

        assert_eq!(result.similarity, 0.0);
        assert!(!result.is_correct);
    }

    #[test]
    fn test_transcription_failure_is_surfaced() {
        let err = transcribe_and_validate(
            &OfflineTranscriber,
            &AudioRef::new("take"),
            "agua",
            "es",
            &Thresholds::default(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::TranscriptionUnavailable(_)));
    }

    #[test]
    fn test_canned_transcriber_picks_known_phrase() {
        let transcriber = CannedTranscriber::default();
        let request = TranscriptionRequest::new(AudioRef::new("mock-audio-url")).with_language("es");
        for _ in 0..20 {
            let text = transcriber.transcribe(&request).unwrap();
            assert!(DEFAULT_CANNED_PHRASES.contains(&text.as_str()));
        }
    }

    #[test]
    fn test_canned_transcriber_without_phrases() {
        let transcriber = CannedTranscriber::new(Vec::<String>::new());
        let request = TranscriptionRequest::new(AudioRef::new("mock-audio-url"));
        assert!(matches!(
            transcriber.transcribe(&request),
            Err(Error::TranscriptionUnavailable(_))
        ));
    }
}
