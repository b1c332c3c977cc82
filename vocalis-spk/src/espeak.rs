//! eSpeak NG invoked as an external process

use crate::engine::{PhonemeOutcome, RenderOptions, SpeechEngine};
use crate::error::SpeechError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{info, warn};
use vocalis_core::ServiceConfig;

/// eSpeak NG engine
pub struct EspeakEngine {
    path: PathBuf,
    extract_timeout: Duration,
    render_timeout: Duration,
    max_text_len: usize,
}

impl EspeakEngine {
    pub fn new(config: &ServiceConfig) -> Self {
        let engine = Self {
            path: config.espeak_path.clone(),
            extract_timeout: Duration::from_secs(config.extract_timeout_secs),
            render_timeout: Duration::from_secs(config.render_timeout_secs),
            max_text_len: config.max_word_len,
        };

        if engine.probe() {
            info!("eSpeak NG engine initialized ({})", engine.path.display());
        } else {
            warn!("eSpeak NG not found at {}", engine.path.display());
        }

        engine
    }

    /// Probe the executable. Availability can change while the service
    /// runs (the tool installed or removed after startup), so this is
    /// asked fresh on every health check rather than cached.
    fn probe(&self) -> bool {
        std::process::Command::new(&self.path)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run one phoneme-extraction invocation with a single flag.
    ///
    /// `Ok(None)` means the tool ran but printed nothing usable.
    async fn run_phoneme_flag(
        &self,
        flag: &str,
        word: &str,
    ) -> Result<Option<String>, SpeechError> {
        let mut cmd = Command::new(&self.path);
        cmd.arg("-q")
            .arg(flag)
            .arg(word)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed-out child is killed, not orphaned
            .kill_on_drop(true);

        let output = match timeout(self.extract_timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SpeechError::ToolMissing {
                    path: self.path.clone(),
                });
            }
            Ok(Err(e)) => return Err(SpeechError::Io(e)),
            Err(_) => {
                return Err(SpeechError::Timeout {
                    seconds: self.extract_timeout.as_secs(),
                });
            }
        };

        // Exit code is deliberately ignored here: only usable stdout counts
        let phonemes = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if phonemes.is_empty() {
            Ok(None)
        } else {
            Ok(Some(phonemes))
        }
    }
}

#[async_trait]
impl SpeechEngine for EspeakEngine {
    async fn extract_phonemes(&self, word: &str) -> Result<PhonemeOutcome, SpeechError> {
        // A missing executable surfaces as ToolMissing from the spawn
        // itself; no separate probe needed here
        let sanitized = sanitize_text(word, self.max_text_len)?;

        // First attempt: IPA output
        match self.run_phoneme_flag("--ipa", &sanitized).await {
            Ok(Some(phonemes)) => return Ok(PhonemeOutcome::Extracted(phonemes)),
            Ok(None) => {}
            Err(e @ SpeechError::ToolMissing { .. }) => return Err(e),
            Err(SpeechError::Timeout { seconds }) => {
                warn!("Timeout ({}s) extracting phonemes for '{}'", seconds, word);
                return Ok(PhonemeOutcome::placeholder_for(word));
            }
            Err(e) => {
                warn!("Error extracting phonemes for '{}': {}", word, e);
                return Ok(PhonemeOutcome::placeholder_for(word));
            }
        }

        // Fallback: simple phoneme mnemonics
        match self.run_phoneme_flag("-x", &sanitized).await {
            Ok(Some(phonemes)) => Ok(PhonemeOutcome::Extracted(phonemes)),
            Ok(None) => {
                warn!("No phoneme output for '{}', using placeholder", word);
                Ok(PhonemeOutcome::placeholder_for(word))
            }
            Err(e @ SpeechError::ToolMissing { .. }) => Err(e),
            Err(SpeechError::Timeout { seconds }) => {
                warn!("Timeout ({}s) extracting phonemes for '{}'", seconds, word);
                Ok(PhonemeOutcome::placeholder_for(word))
            }
            Err(e) => {
                warn!("Error extracting phonemes for '{}': {}", word, e);
                Ok(PhonemeOutcome::placeholder_for(word))
            }
        }
    }

    async fn render_audio(
        &self,
        text: &str,
        output: &Path,
        options: &RenderOptions,
    ) -> Result<(), SpeechError> {
        // Rendering fails before invocation when the tool is absent
        if !self.probe() {
            return Err(SpeechError::ToolMissing {
                path: self.path.clone(),
            });
        }

        let sanitized = sanitize_text(text, self.max_text_len)?;

        let mut cmd = Command::new(&self.path);
        cmd.arg("-v")
            .arg(&options.voice)
            .arg("-s")
            .arg(options.speed.to_string())
            .arg("-p")
            .arg(options.pitch.to_string())
            .arg("-w")
            .arg(output)
            .arg(&sanitized)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let result = match timeout(self.render_timeout, cmd.output()).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SpeechError::ToolMissing {
                    path: self.path.clone(),
                });
            }
            Ok(Err(e)) => {
                return Err(SpeechError::Engine(format!(
                    "Failed to run eSpeak NG: {}",
                    e
                )));
            }
            Err(_) => {
                return Err(SpeechError::Timeout {
                    seconds: self.render_timeout.as_secs(),
                });
            }
        };

        if !result.status.success() {
            return Err(SpeechError::Engine(format!(
                "eSpeak NG failed: {}",
                String::from_utf8_lossy(&result.stderr)
            )));
        }

        Ok(())
    }

    fn is_available(&self) -> bool {
        self.probe()
    }

    fn executable(&self) -> &Path {
        &self.path
    }
}

/// Strip control characters and cap length before the text reaches argv
fn sanitize_text(text: &str, max_len: usize) -> Result<String, SpeechError> {
    let sanitized: String = text
        .chars()
        .filter(|c| !c.is_control())
        .take(max_len)
        .collect();

    if sanitized.trim().is_empty() {
        return Err(SpeechError::InvalidInput(
            "Text is empty after sanitization".to_string(),
        ));
    }

    Ok(sanitized)
}
