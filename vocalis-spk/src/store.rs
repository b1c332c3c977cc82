//! In-memory store of learned word → phoneme mappings

use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Aggregate statistics reported by the stats endpoint
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StoreStats {
    pub words_learned: usize,
    pub unique_phonemes: usize,
    pub phoneme_patterns: usize,
}

/// In-memory phoneme store.
///
/// Keys are lowercase words. Entries are never deleted; re-learning a
/// word overwrites its phoneme string. The per-character tally pairs
/// the input character at position `i` with the phoneme-string
/// character at the same position. That positional alignment is
/// linguistically meaningless once lengths diverge; it only feeds the
/// reported statistics and is kept as-is.
#[derive(Debug, Default)]
pub struct PhonemeStore {
    learned: HashMap<String, String>,
    grapheme_tally: HashMap<char, HashMap<char, u64>>,
    sequence: Vec<(String, String)>,
}

impl PhonemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a phoneme string for a word, overwriting any previous entry
    pub fn insert(&mut self, word: &str, phonemes: &str) {
        let word_lower = word.to_lowercase();

        self.learned
            .insert(word_lower.clone(), phonemes.to_string());
        self.sequence.push((word_lower.clone(), phonemes.to_string()));

        for (grapheme, phoneme_char) in word_lower.chars().zip(phonemes.chars()) {
            *self
                .grapheme_tally
                .entry(grapheme)
                .or_default()
                .entry(phoneme_char)
                .or_default() += 1;
        }
    }

    /// Look up a learned phoneme string, case-insensitively
    pub fn lookup(&self, word: &str) -> Option<String> {
        self.learned.get(&word.to_lowercase()).cloned()
    }

    /// Compute statistics over the current contents.
    ///
    /// `unique_phonemes` is recomputed on every call, never cached.
    pub fn stats(&self) -> StoreStats {
        let unique_phonemes: HashSet<char> = self
            .learned
            .values()
            .flat_map(|phonemes| phonemes.chars())
            .collect();

        StoreStats {
            words_learned: self.learned.len(),
            unique_phonemes: unique_phonemes.len(),
            phoneme_patterns: self.grapheme_tally.len(),
        }
    }
}
