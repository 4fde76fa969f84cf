//! Integration tests for charset-nose

use charset_nose::{
    Detection, Detector, InputState, LanguageFilter, SampleSize, Sniffer, SnifferError, detect,
};
use encoding_rs::{EUC_KR, Encoding, ISO_2022_JP, SHIFT_JIS, WINDOWS_1251};
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

const JAPANESE: &str = "これは日本語の文章です。私は東京に住んでいます。";
const RUSSIAN: &str = "В начале было слово, и слово было у Бога. Оно было в начале у Бога.";
const KOREAN: &str = "안녕하세요 저는 한국사람입니다.";

fn encode(encoding: &'static Encoding, text: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = encoding.encode(text);
    assert!(!had_errors);
    bytes.into_owned()
}

fn detect_chunked(data: &[u8], chunk_size: usize) -> Option<Detection> {
    let mut detector = Detector::new();
    for chunk in data.chunks(chunk_size) {
        detector.feed(chunk);
    }
    detector.finish();
    detector.detection().copied()
}

#[test]
fn test_byte_order_marks() {
    let cases: [(&[u8], &str); 7] = [
        (&[0xEF, 0xBB, 0xBF, b'a', b'b'], "UTF-8"),
        (&[0xFE, 0xFF, 0x00, b'a'], "UTF-16BE"),
        (&[0xFF, 0xFE, b'a', 0x00], "UTF-16LE"),
        (&[0x00, 0x00, 0xFE, 0xFF, 0x00], "UTF-32BE"),
        (&[0xFF, 0xFE, 0x00, 0x00, b'a'], "UTF-32LE"),
        (&[0xFE, 0xFF, 0x00, 0x00, b'a'], "X-ISO-10646-UCS-4-3412"),
        (&[0x00, 0x00, 0xFF, 0xFE, 0x00], "X-ISO-10646-UCS-4-2143"),
    ];

    for (data, charset) in cases {
        let mut detector = Detector::new();
        detector.feed(data);
        assert!(detector.is_done(), "{charset}");
        detector.finish();
        assert_eq!(detector.detection(), Some(&Detection::new(charset, 1.0)));
    }
}

#[test]
fn test_bom_needs_more_than_three_bytes() {
    let mut detector = Detector::new();
    detector.feed(&[0xEF, 0xBB, 0xBF]);
    assert!(!detector.is_done());
    assert_eq!(detector.input_state(), InputState::HighByte);
}

#[test]
fn test_ascii_across_chunks() {
    let detection = detect_chunked(b"The quick brown fox jumps over the lazy dog.\r\n", 5);
    assert_eq!(detection, Some(Detection::new("ASCII", 1.0)));
}

#[test]
fn test_nbsp_stays_ascii() {
    let detection = detect(b"price:\xA010\xA0EUR");
    assert_eq!(detection.map(|d| d.charset), Some("ASCII"));
}

#[test]
fn test_utf8_fed_byte_by_byte() {
    let mut detector = Detector::new();
    for &byte in JAPANESE.as_bytes() {
        detector.feed(&[byte]);
    }
    assert!(detector.is_done());
    detector.finish();
    assert_eq!(detector.detection(), Some(&Detection::new("UTF-8", 1.0)));
}

#[test]
fn test_shift_jis() {
    let data = encode(SHIFT_JIS, JAPANESE);
    let detection = detect_chunked(&data, 16).unwrap();
    assert_eq!(detection.charset, "Shift_JIS");
    assert!(detection.confidence > 0.5);
    assert_eq!(detection.encoding(), Some(SHIFT_JIS));
}

#[test]
fn test_windows_1251() {
    let data = encode(WINDOWS_1251, RUSSIAN);
    let detection = detect(&data).unwrap();
    assert_eq!(detection.charset, "windows-1251");
    assert!(detection.confidence > 0.5);
}

#[test]
fn test_windows_1252() {
    let detection =
        detect(b"Le gar\xe7on \xe9tait tr\xe8s content de voir sa s\x9cur \xe0 No\xebl.").unwrap();
    assert_eq!(detection.charset, "windows-1252");
}

#[test]
fn test_korean_with_language_filter() {
    let data = encode(EUC_KR, KOREAN);
    let mut detector = Detector::new();
    detector.language_filter(LanguageFilter::KOREAN);
    detector.feed(&data);
    detector.finish();
    assert_eq!(detector.detection().map(|d| d.charset), Some("EUC-KR"));
}

#[test]
fn test_iso_2022_jp() {
    let data = encode(ISO_2022_JP, JAPANESE);
    let mut detector = Detector::new();
    for chunk in data.chunks(2) {
        detector.feed(chunk);
    }
    assert_eq!(detector.input_state(), InputState::EscAscii);
    assert!(detector.is_done());
    detector.finish();
    assert_eq!(detector.detection(), Some(&Detection::new("ISO-2022-JP", 1.0)));
}

#[test]
fn test_hz_shift_split_across_chunks() {
    let detection = detect_chunked(b"HZ text: ~{<:Ky2;S{#,NpJ)l6HK!#~} end", 9);
    assert_eq!(detection, Some(Detection::new("HZ-GB-2312", 1.0)));
}

#[test]
fn test_unresolved_escape_gives_nothing() {
    let mut detector = Detector::new();
    detector.feed(b"\x1b(Bplain text");
    assert_eq!(detector.input_state(), InputState::EscAscii);
    detector.finish();
    assert_eq!(detector.detection(), None);
}

#[test]
fn test_empty_input() {
    let mut detector = Detector::new();
    detector.finish();
    assert_eq!(detector.detection(), None);

    detector.feed(b"");
    detector.feed(&[]);
    detector.finish();
    assert_eq!(detector.detection(), None);
    assert_eq!(detect(b""), None);
}

#[test]
fn test_input_ignored_once_done() {
    let mut detector = Detector::new();
    detector.feed(&[0xFF, 0xFE, b'h', 0x00]);
    detector.feed(&encode(SHIFT_JIS, JAPANESE));
    detector.finish();
    assert_eq!(detector.detection(), Some(&Detection::new("UTF-16LE", 1.0)));
}

#[test]
fn test_reset_repeats_the_same_verdict() {
    let data = encode(SHIFT_JIS, JAPANESE);
    let mut detector = Detector::new();
    detector.feed(&data);
    detector.finish();
    let first = detector.detection().copied();
    assert!(first.is_some());

    detector.reset();
    assert_eq!(detector.detection(), None);
    assert_eq!(detector.input_state(), InputState::PureAscii);

    detector.feed(&data);
    detector.finish();
    assert_eq!(detector.detection().copied(), first);

    // a new session on the same detector sees plain text afresh
    detector.reset();
    detector.feed(b"plain");
    detector.finish();
    assert_eq!(detector.detection().map(|d| d.charset), Some("ASCII"));
}

#[test]
fn test_closure_reporter_called_once() {
    let mut seen = Vec::new();
    {
        let mut detector = Detector::with_reporter(|d: Detection| seen.push(d));
        detector.feed(b"hello");
        detector.finish();
        detector.finish();
    }
    assert_eq!(seen, vec![Detection::new("ASCII", 1.0)]);
}

#[test]
fn test_feed_range() {
    let buf = b"xx\xEF\xBB\xBFabcxx";
    let mut detector = Detector::new();
    detector.feed_range(buf, 2, 7).unwrap();
    assert!(detector.is_done());

    let err = Detector::new().feed_range(buf, 8, 10).unwrap_err();
    assert!(matches!(err, SnifferError::InvalidRange { buf_len: 10, .. }));
}

#[test]
fn test_sniff_path() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&encode(WINDOWS_1251, RUSSIAN)).unwrap();
    file.flush().unwrap();

    let sniffer = Sniffer::new();
    let detection = sniffer.sniff_path(file.path()).unwrap().unwrap();
    assert_eq!(detection.charset, "windows-1251");
}

#[test]
fn test_sniff_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let result = Sniffer::new().sniff_path(dir.path().join("missing.txt"));
    assert!(matches!(result, Err(SnifferError::Io(_))));
}

#[test]
fn test_sniff_reader_with_small_chunks() {
    let data = encode(SHIFT_JIS, JAPANESE);
    let mut sniffer = Sniffer::new();
    sniffer.chunk_size(3).sample_size(SampleSize::All);
    let detection = sniffer.sniff_reader(Cursor::new(data)).unwrap().unwrap();
    assert_eq!(detection.charset, "Shift_JIS");
}
