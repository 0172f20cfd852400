/*!
 * Text encoding detection for subtitle files.
 *
 * Episode files are mostly UTF-8, but some releases ship single-byte
 * Latin-1/Windows-1252 text. The detector looks at a byte sample and returns
 * its best guess with a confidence score. A low score is reported, never
 * fatal: decoding goes ahead with the guess.
 */

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use log::{debug, warn};

/// Default number of leading bytes inspected
pub const DEFAULT_SAMPLE_SIZE: usize = 100_000;

/// Best-guess encoding for a byte sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodingGuess {
    pub encoding: &'static Encoding,
    /// 0.0 (no idea) to 1.0 (certain)
    pub confidence: f32,
    /// Length of a byte order mark at the start of the sample, if any
    pub bom_length: usize,
}

impl EncodingGuess {
    /// WHATWG label of the guessed encoding
    pub fn label(&self) -> &'static str {
        self.encoding.name()
    }

    /// Whether the guess falls below the given confidence threshold
    pub fn is_ambiguous(&self, min_confidence: f32) -> bool {
        self.confidence < min_confidence
    }
}

/// Decoded file text and how it was obtained
#[derive(Debug, Clone)]
pub struct DecodedText<'a> {
    pub text: Cow<'a, str>,
    pub guess: EncodingGuess,
    /// Malformed sequences were replaced with U+FFFD
    pub had_errors: bool,
}

/// Guesses the text encoding of subtitle files
#[derive(Debug, Clone)]
pub struct EncodingDetector {
    sample_size: usize,
}

impl Default for EncodingDetector {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_SIZE)
    }
}

impl EncodingDetector {
    pub fn new(sample_size: usize) -> Self {
        Self { sample_size: sample_size.max(1) }
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Guess the encoding of the first `sample_size` bytes of `bytes`
    pub fn detect(&self, bytes: &[u8]) -> EncodingGuess {
        let sample = &bytes[..bytes.len().min(self.sample_size)];

        if let Some((encoding, bom_length)) = Encoding::for_bom(sample) {
            return EncodingGuess { encoding, confidence: 1.0, bom_length };
        }

        match std::str::from_utf8(sample) {
            Ok(text) => {
                // Plain ASCII decodes the same under every candidate
                let confidence = if text.is_ascii() { 1.0 } else { 0.99 };
                EncodingGuess { encoding: UTF_8, confidence, bom_length: 0 }
            }
            // The sample may end in the middle of a multi-byte sequence
            Err(e) if e.error_len().is_none() && e.valid_up_to() > 0 => {
                EncodingGuess { encoding: UTF_8, confidence: 0.9, bom_length: 0 }
            }
            Err(_) => EncodingGuess {
                encoding: WINDOWS_1252,
                confidence: single_byte_confidence(sample),
                bom_length: 0,
            },
        }
    }

    /// Detect and decode in one go. The BOM, if any, is stripped.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> DecodedText<'a> {
        let guess = self.detect(bytes);
        debug!("Encoding guess: {} (confidence {:.2})", guess.label(), guess.confidence);

        let (text, had_errors) = guess
            .encoding
            .decode_without_bom_handling(&bytes[guess.bom_length..]);

        if had_errors {
            warn!(
                "Decoding as {} replaced malformed byte sequences with U+FFFD",
                guess.label()
            );
        }

        DecodedText { text, guess, had_errors }
    }
}

// Windows-1252 leaves five byte values unassigned; text that uses them is
// unlikely to be 1252 at all. Accented letters (0xC0..=0xFF) and curly
// punctuation (0x91..=0x97) are what real Latin-1 dialogue contains.
fn single_byte_confidence(sample: &[u8]) -> f32 {
    let mut high = 0usize;
    let mut plausible = 0usize;
    let mut unassigned = 0usize;

    for &b in sample.iter().filter(|b| **b >= 0x80) {
        high += 1;
        match b {
            0x81 | 0x8D | 0x8F | 0x90 | 0x9D => unassigned += 1,
            0x91..=0x97 | 0xA0..=0xFF => plausible += 1,
            _ => {}
        }
    }

    if high == 0 {
        return 0.5;
    }

    let score = (plausible as f32 - unassigned as f32 * 2.0) / high as f32;
    (0.3 + 0.5 * score).clamp(0.05, 0.8)
}
