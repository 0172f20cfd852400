/*!
 * Tests for encoding detection and decoding
 */

use encoding_rs::{UTF_16LE, UTF_8, WINDOWS_1252};
use subtitle_dialogue::encoding::{DEFAULT_SAMPLE_SIZE, EncodingDetector};

fn utf16le_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

#[test]
fn test_detector_default_shouldUseHundredThousandByteSample() {
    assert_eq!(EncodingDetector::default().sample_size(), DEFAULT_SAMPLE_SIZE);
    assert_eq!(DEFAULT_SAMPLE_SIZE, 100_000);
}

#[test]
fn test_decode_withUtf16Bom_shouldDecodeAndStripBom() {
    let bytes = utf16le_with_bom("1\n00:00:01,000 --> 00:00:02,000\nHola\n");
    let decoded = EncodingDetector::default().decode(&bytes);

    assert_eq!(decoded.guess.encoding, UTF_16LE);
    assert_eq!(decoded.guess.bom_length, 2);
    assert_eq!(decoded.text, "1\n00:00:01,000 --> 00:00:02,000\nHola\n");
}

#[test]
fn test_decode_withWindows1252Punctuation_shouldMapCurlyQuotes() {
    // Curly quotes around "Dolores" in Windows-1252
    let decoded = EncodingDetector::default().decode(b"\x93Dolores\x94 caf\xe9");

    assert_eq!(decoded.guess.encoding, WINDOWS_1252);
    assert_eq!(decoded.text, "\u{201c}Dolores\u{201d} café");
    assert!(!decoded.guess.is_ambiguous(0.5));
}

#[test]
fn test_detect_withLatin1AfterLongAsciiPrefix_shouldStillSeeIt() {
    let mut bytes = b"1\n00:00:01,000 --> 00:00:02,000\n".repeat(50);
    bytes.extend_from_slice(b"Se\xf1or\n");

    let guess = EncodingDetector::default().detect(&bytes);
    assert_eq!(guess.encoding, WINDOWS_1252);
}

#[test]
fn test_detect_withLatin1BeyondSample_shouldGuessFromSampleOnly() {
    let mut bytes = b"plain ascii ".to_vec();
    bytes.extend_from_slice(b"Se\xf1or");

    let guess = EncodingDetector::new(8).detect(&bytes);
    assert_eq!(guess.encoding, UTF_8);
    assert_eq!(guess.confidence, 1.0);
}

#[test]
fn test_decode_withUtf8Text_shouldBorrowWithoutErrors() {
    let text = "BERNARD: ¿Qué?";
    let decoded = EncodingDetector::default().decode(text.as_bytes());

    assert_eq!(decoded.guess.label(), "UTF-8");
    assert_eq!(decoded.text, text);
    assert!(!decoded.had_errors);
}
