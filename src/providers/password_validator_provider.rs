use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Minimum estimated entropy accepted for a password
pub const MIN_ENTROPY_BITS: f64 = 50.0;

const REPLACE_CHARS: &str = "!@$&*";
const SEPARATOR_CHARS: &str = "_-., ";
const OTHER_SPECIAL_CHARS: &str = "\"#%'()+/:;<=>?[\\]^{|}~";
const LOWER_CHARS: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGIT_CHARS: &str = "0123456789";

const SEQUENCES: [&str; 6] = [
    "0123456789",
    "abcdefghijklmnopqrstuvwxyz",
    "qwertyuiop",
    "asdfghjkl",
    "zxcvbnm",
    "1qaz2wsx3edc4rfv5tgb6yhn7ujm8ik,9ol.0p;/-['=]\\",
];

/// Runs longer than this are collapsed when measuring effective length
const MAX_RUN: usize = 2;

/// Strategy for estimating the entropy of a password in bits
///
/// Implementations must be deterministic and side-effect free, and must never
/// score a password lower after a character is appended.
pub trait EntropyEstimator: Send + Sync {
    fn estimate(&self, password: &str) -> f64;
}

/// Charset-size entropy estimator
///
/// `bits = effective_length * log2(charset_base)`, where the base sums the
/// sizes of the character groups the password draws from and the effective
/// length ignores long repeats and keyboard or alphabet sequences.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharsetEntropyEstimator;

impl CharsetEntropyEstimator {
    fn charset_base(password: &str) -> usize {
        let groups = [
            REPLACE_CHARS,
            SEPARATOR_CHARS,
            OTHER_SPECIAL_CHARS,
            LOWER_CHARS,
            UPPER_CHARS,
            DIGIT_CHARS,
        ];
        let mut present = [false; 6];
        let mut base = 0;

        let distinct: HashSet<char> = password.chars().collect();
        for c in distinct {
            match groups.iter().position(|group| group.contains(c)) {
                Some(index) => present[index] = true,
                // Characters outside every group count once each
                None => base += 1,
            }
        }

        base + groups
            .iter()
            .zip(present)
            .filter(|(_, present)| *present)
            .map(|(group, _)| group.chars().count())
            .sum::<usize>()
    }

    fn effective_length(password: &str) -> usize {
        let mut chars = collapse_repeats(password.chars().collect());
        for sequence in SEQUENCES {
            chars = collapse_sequence(chars, sequence);
        }
        chars.len()
    }
}

impl EntropyEstimator for CharsetEntropyEstimator {
    fn estimate(&self, password: &str) -> f64 {
        let base = Self::charset_base(password);
        if base == 0 {
            return 0.0;
        }
        Self::effective_length(password) as f64 * (base as f64).log2()
    }
}

fn collapse_repeats(chars: Vec<char>) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len());
    let mut run = 0;
    let mut previous = None;

    for c in chars {
        run = if previous == Some(c) { run + 1 } else { 1 };
        previous = Some(c);
        if run <= MAX_RUN {
            out.push(c);
        }
    }
    out
}

/// Drop characters that extend an ascending run from `sequence` past two
fn collapse_sequence(chars: Vec<char>, sequence: &str) -> Vec<char> {
    let sequence: Vec<char> = sequence.chars().collect();
    let position = |c: char| sequence.iter().position(|&s| s == c.to_ascii_lowercase());

    let mut out = Vec::with_capacity(chars.len());
    let mut run = 0;
    let mut previous: Option<usize> = None;

    for c in chars {
        let current = position(c);
        run = match (previous, current) {
            (Some(p), Some(q)) if q == p + 1 => run + 1,
            (_, Some(_)) => 1,
            _ => 0,
        };
        previous = current;
        if run <= MAX_RUN {
            out.push(c);
        }
    }
    out
}

/// Password validator provider that enforces the entropy threshold
#[derive(Clone)]
pub struct PasswordValidatorProvider {
    estimator: Arc<dyn EntropyEstimator>,
    min_entropy_bits: f64,
}

impl PasswordValidatorProvider {
    /// Create a validator using the charset estimator and the default threshold
    pub fn new() -> Self {
        Self::with_estimator(Arc::new(CharsetEntropyEstimator), MIN_ENTROPY_BITS)
    }

    pub fn with_estimator(estimator: Arc<dyn EntropyEstimator>, min_entropy_bits: f64) -> Self {
        Self {
            estimator,
            min_entropy_bits,
        }
    }

    /// Estimated entropy of `password` in bits
    pub fn entropy(&self, password: &str) -> f64 {
        self.estimator.estimate(password)
    }

    /// Validate a password against the entropy threshold
    ///
    /// # Returns
    /// * `Ok(())` - Password is strong enough
    /// * `Err(PasswordValidationError::Weak)` - Estimated entropy is below the threshold
    pub fn validate(&self, password: &str) -> Result<(), PasswordValidationError> {
        let bits = self.entropy(password);
        if bits < self.min_entropy_bits {
            return Err(PasswordValidationError::Weak {
                bits,
                required: self.min_entropy_bits,
            });
        }
        Ok(())
    }
}

impl Default for PasswordValidatorProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Password validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PasswordValidationError {
    #[error("weak password: {bits:.1} bits of entropy, {required:.0} required")]
    Weak { bits: f64, required: f64 },
}
