//! vocalis-spk: pronunciation learning and synthesis
//!
//! Wraps the eSpeak NG binary to extract phoneme strings and render
//! audio pronunciations, and keeps an in-memory store of learned
//! word → phoneme mappings with per-character statistics.

pub mod engine;
pub mod error;
pub mod espeak;
pub mod service;
pub mod store;

pub use engine::{PhonemeOutcome, RenderOptions, SpeechEngine};
pub use error::SpeechError;
pub use espeak::EspeakEngine;
pub use service::{Pronunciation, PronunciationService, TrainedWord};
pub use store::{PhonemeStore, StoreStats};
