//! Pronunciation service: training, prediction, and audio generation

use crate::engine::{RenderOptions, SpeechEngine};
use crate::error::SpeechError;
use crate::store::{PhonemeStore, StoreStats};
use bytes::Bytes;
use parking_lot::RwLock;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};
use vocalis_core::ServiceConfig;

/// One successfully trained word
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TrainedWord {
    pub word: String,
    pub phonemes: String,
}

/// Result of generating a pronunciation
#[derive(Debug, Clone)]
pub struct Pronunciation {
    pub phonemes: String,
    pub audio: Bytes,
}

/// Pronunciation service.
///
/// One instance is constructed at startup and shared for the process
/// lifetime. Store mutations go through a lock, and the lock is never
/// held across an engine call, so concurrent trainers cannot leave a
/// word mapped to two phoneme strings.
pub struct PronunciationService {
    config: ServiceConfig,
    engine: Arc<dyn SpeechEngine>,
    store: RwLock<PhonemeStore>,
    training_words: RwLock<Vec<String>>,
}

impl PronunciationService {
    pub fn new(config: ServiceConfig, engine: Arc<dyn SpeechEngine>) -> Self {
        Self {
            config,
            engine,
            store: RwLock::new(PhonemeStore::new()),
            training_words: RwLock::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<dyn SpeechEngine> {
        &self.engine
    }

    /// Learn the phoneme string for one word.
    ///
    /// A placeholder outcome is still stored; only a missing executable
    /// propagates as an error.
    pub async fn learn(&self, word: &str) -> Result<String, SpeechError> {
        let outcome = self.engine.extract_phonemes(word).await?;
        if outcome.is_placeholder() {
            debug!("Stored placeholder for '{}'", word);
        }
        let phonemes = outcome.into_text();
        self.store.write().insert(word, &phonemes);
        Ok(phonemes)
    }

    /// Train on a batch of words.
    ///
    /// Results preserve input order, filtered to words that produced a
    /// phoneme string. A word the engine cannot process is skipped;
    /// no failure aborts the batch or unwinds what earlier words
    /// already committed to the store.
    pub async fn train(&self, words: &[String]) -> Result<Vec<TrainedWord>, SpeechError> {
        let mut results = Vec::new();

        for word in words {
            match self.learn(word).await {
                Ok(phonemes) => {
                    self.training_words.write().push(word.clone());
                    results.push(TrainedWord {
                        word: word.clone(),
                        phonemes,
                    });
                }
                Err(SpeechError::ToolMissing { path }) => {
                    warn!(
                        "Skipping '{}': eSpeak NG not found at {}",
                        word,
                        path.display()
                    );
                }
                Err(e) => {
                    warn!("Skipping '{}': {}", word, e);
                }
            }
        }

        Ok(results)
    }

    /// Predict the phoneme string for a word.
    ///
    /// Returns the stored value if the word has been learned; otherwise
    /// asks the engine directly without touching the store.
    pub async fn predict(&self, word: &str) -> Result<String, SpeechError> {
        if let Some(phonemes) = self.store.read().lookup(word) {
            return Ok(phonemes);
        }

        let outcome = self.engine.extract_phonemes(word).await?;
        Ok(outcome.into_text())
    }

    /// Generate a pronunciation: phoneme string plus rendered WAV bytes.
    ///
    /// The engine speaks the literal word text, not the phoneme string.
    /// The temporary WAV file is removed on every exit path.
    pub async fn generate(
        &self,
        word: &str,
        voice: &str,
        speed: u32,
        pitch: u32,
    ) -> Result<Pronunciation, SpeechError> {
        let phonemes = self.predict(word).await.map_err(|e| match e {
            SpeechError::ToolMissing { .. } => {
                SpeechError::InvalidInput("Could not generate phonemes".to_string())
            }
            other => other,
        })?;

        // Reserve a path for the WAV output; the file itself is created
        // by the engine
        let wav_path = tempfile::Builder::new()
            .prefix("vocalis-")
            .suffix(".wav")
            .tempfile()?
            .path()
            .to_path_buf();

        let options = RenderOptions {
            voice: voice.to_string(),
            speed,
            pitch,
        };

        if let Err(e) = self.engine.render_audio(word, &wav_path, &options).await {
            remove_quietly(&wav_path).await;
            return Err(e);
        }

        // "Tool reported success" and "file actually exists" can
        // disagree; trust neither alone
        if !wav_path.exists() {
            return Err(SpeechError::Engine(
                "Audio file missing after rendering".to_string(),
            ));
        }

        let metadata = match tokio::fs::metadata(&wav_path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                remove_quietly(&wav_path).await;
                return Err(SpeechError::Io(e));
            }
        };

        if metadata.len() > self.config.max_audio_bytes as u64 {
            remove_quietly(&wav_path).await;
            return Err(SpeechError::Engine(format!(
                "Generated audio too large ({} bytes, max {} bytes)",
                metadata.len(),
                self.config.max_audio_bytes
            )));
        }

        let audio = match tokio::fs::read(&wav_path).await {
            Ok(data) => Bytes::from(data),
            Err(e) => {
                remove_quietly(&wav_path).await;
                return Err(SpeechError::Io(e));
            }
        };

        remove_quietly(&wav_path).await;

        Ok(Pronunciation { phonemes, audio })
    }

    /// Current store statistics
    pub fn stats(&self) -> StoreStats {
        self.store.read().stats()
    }

    /// Words successfully trained so far, in training order
    pub fn training_words(&self) -> Vec<String> {
        self.training_words.read().clone()
    }
}

/// Best-effort temp file removal; failure must not fail the call
async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove temporary file {}: {}", path.display(), e);
        }
    }
}
