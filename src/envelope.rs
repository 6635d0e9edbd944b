//! Data-URL envelope handling.
//!
//! Images travel between the caller and the pipeline as base64 text, either
//! bare (`/9j/4AAQ...`) or wrapped in a data URL
//! (`data:image/jpeg;base64,/9j/4AAQ...`). Both forms are accepted
//! everywhere; results always come back as a complete data URL usable
//! directly as an image source or a download.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use thiserror::Error;

pub const JPEG_MIME: &str = "image/jpeg";
pub const PNG_MIME: &str = "image/png";

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];

/// Standard alphabet, padding optional on decode, always written on encode.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

pub fn is_data_url(input: &str) -> bool {
    input.trim_start().starts_with("data:")
}

/// The base64 payload without any data-URL header.
pub fn strip_prefix(input: &str) -> &str {
    let input = input.trim();
    if !is_data_url(input) {
        return input;
    }
    input.split_once(',').map(|(_, payload)| payload).unwrap_or("")
}

/// Media type declared by a data URL, if any.
pub fn mime_type(input: &str) -> Option<&str> {
    let header = input.trim().strip_prefix("data:")?.split(',').next()?;
    let mime = header.split(';').next().unwrap_or("");
    (!mime.is_empty()).then_some(mime)
}

/// Wrap bare base64 in a JPEG data URL; data URLs pass through untouched.
pub fn normalize(input: &str) -> String {
    let input = input.trim();
    if is_data_url(input) {
        input.to_string()
    } else {
        format!("data:{JPEG_MIME};base64,{input}")
    }
}

pub fn decode_payload(input: &str) -> Result<Vec<u8>, EnvelopeError> {
    Ok(BASE64.decode(strip_prefix(input))?)
}

/// Encode JPEG bytes as a data URL.
pub fn to_data_url(bytes: &[u8]) -> String {
    to_data_url_with_mime(bytes, JPEG_MIME)
}

fn to_data_url_with_mime(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Exact decoded length of a well-formed base64 payload, computed from its text length.
pub fn payload_len(input: &str) -> usize {
    let payload = strip_prefix(input);
    let padding = payload.bytes().rev().take_while(|&b| b == b'=').count();
    (payload.len() - padding) * 3 / 4
}

/// Turn file contents into a data URL.
///
/// Text files holding a data URL or bare base64 are used as-is (normalised);
/// anything else is treated as raw image bytes and encoded.
pub fn from_file_contents(contents: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(contents) {
        let text = text.trim();
        if is_data_url(text) || (!text.is_empty() && looks_like_base64(text)) {
            return normalize(text);
        }
    }
    let mime = if contents.starts_with(PNG_MAGIC) {
        PNG_MIME
    } else {
        JPEG_MIME
    };
    to_data_url_with_mime(contents, mime)
}

fn looks_like_base64(text: &str) -> bool {
    text.bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_prefix_handles_both_forms() {
        assert_eq!(strip_prefix("data:image/jpeg;base64,AAAA"), "AAAA");
        assert_eq!(strip_prefix("AAAA"), "AAAA");
        assert_eq!(strip_prefix("  AAAA\n"), "AAAA");
        assert_eq!(strip_prefix("data:image/jpeg;base64"), "");
    }

    #[test]
    fn normalize_adds_prefix_only_when_missing() {
        assert_eq!(normalize("AAAA"), "data:image/jpeg;base64,AAAA");
        assert_eq!(
            normalize("data:image/png;base64,AAAA"),
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn mime_type_reads_header() {
        assert_eq!(mime_type("data:image/png;base64,AAAA"), Some("image/png"));
        assert_eq!(mime_type("AAAA"), None);
        assert_eq!(mime_type("data:;base64,AAAA"), None);
    }

    #[test]
    fn decode_accepts_unpadded_payloads() {
        assert_eq!(decode_payload("aGk=").unwrap(), b"hi");
        assert_eq!(decode_payload("aGk").unwrap(), b"hi");
        assert_eq!(decode_payload("data:image/jpeg;base64,aGk=").unwrap(), b"hi");
    }

    #[test]
    fn decode_rejects_invalid_characters() {
        assert!(matches!(
            decode_payload("not base64!"),
            Err(EnvelopeError::Base64(_))
        ));
    }

    #[test]
    fn to_data_url_wraps_jpeg() {
        assert_eq!(to_data_url(b"hi"), "data:image/jpeg;base64,aGk=");
    }

    #[test]
    fn payload_len_matches_decoded_length() {
        for bytes in [&b""[..], b"a", b"ab", b"abc", b"abcd", b"abcde"] {
            let url = to_data_url(bytes);
            assert_eq!(payload_len(&url), bytes.len(), "for {bytes:?}");
            let bare = strip_prefix(&url).trim_end_matches('=').to_string();
            assert_eq!(payload_len(&bare), bytes.len(), "unpadded {bytes:?}");
        }
    }

    #[test]
    fn file_contents_sniffs_text_and_binary() {
        assert_eq!(from_file_contents(b"aGk=\n"), "data:image/jpeg;base64,aGk=");
        assert_eq!(
            from_file_contents(b"data:image/jpeg;base64,aGk="),
            "data:image/jpeg;base64,aGk="
        );
        assert_eq!(
            from_file_contents(&[0xFF, 0xD8, 0xFF]),
            "data:image/jpeg;base64,/9j/"
        );
        assert!(from_file_contents(&[0x89, b'P', b'N', b'G']).starts_with("data:image/png;"));
    }
}
