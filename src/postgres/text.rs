use crate::transform::{Transform, full_column_name};
use rand::Rng;
use rand::seq::SliceRandom;

/// Characters substituted by [`TextScramble`].
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZßüäöÜÄÖ0123456789";

/// Substitute every alphabet character through a random permutation.
///
/// Keeps length, spacing and punctuation of the value. The permutation is
/// drawn once, at construction: one instance always emits the same SQL,
/// two instances almost never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextScramble {
    mapping: String,
}

impl TextScramble {
    /// Scramble with a permutation drawn from the thread-local generator.
    pub fn new() -> Self {
        Self::with_rng(&mut rand::thread_rng())
    }

    /// Scramble with a permutation drawn from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut chars: Vec<char> = ALPHABET.chars().collect();
        chars.shuffle(rng);
        Self {
            mapping: chars.into_iter().collect(),
        }
    }

    /// The substitute for each [`ALPHABET`] character, position by position.
    pub fn mapping(&self) -> &str {
        &self.mapping
    }
}

impl Default for TextScramble {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for TextScramble {
    fn emit(&self, table: &str, column: &str) -> String {
        format!(
            "translate({}::TEXT, '{}'::TEXT, '{}'::TEXT)",
            full_column_name(table, column),
            ALPHABET,
            self.mapping
        )
    }
}
