//! Speech engine trait and outcome types

use crate::error::SpeechError;
use async_trait::async_trait;
use std::path::Path;

/// Result of a phoneme extraction attempt.
///
/// The external tool can run successfully and still produce nothing
/// usable; in that case the word is marked unresolved with a `/word/`
/// placeholder instead of being conflated with real output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhonemeOutcome {
    /// The tool produced a non-empty phoneme string
    Extracted(String),
    /// The tool produced nothing usable; `/word/` stands in
    Placeholder(String),
}

impl PhonemeOutcome {
    /// Build the placeholder outcome for a word
    pub fn placeholder_for(word: &str) -> Self {
        Self::Placeholder(format!("/{}/", word))
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Extracted(s) | Self::Placeholder(s) => s,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Extracted(s) | Self::Placeholder(s) => s,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// Audio rendering parameters
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Voice identifier (e.g. "en", "en-us")
    pub voice: String,
    /// Speech rate in words per minute
    pub speed: u32,
    /// Pitch, 0-99 where 50 is normal
    pub pitch: u32,
}

/// Trait for speech engines
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Extract a phoneme string for a single word.
    ///
    /// A missing executable is fatal; a timeout or empty output is a
    /// soft failure recovered as a placeholder.
    async fn extract_phonemes(&self, word: &str) -> Result<PhonemeOutcome, SpeechError>;

    /// Render spoken audio for `text` into a WAV file at `output`.
    ///
    /// Never panics; the caller must still verify the output file
    /// exists after an `Ok` return.
    async fn render_audio(
        &self,
        text: &str,
        output: &Path,
        options: &RenderOptions,
    ) -> Result<(), SpeechError>;

    /// Check if the engine is available
    fn is_available(&self) -> bool;

    /// Path of the underlying executable
    fn executable(&self) -> &Path;
}
