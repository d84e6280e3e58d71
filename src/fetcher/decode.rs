use crate::fetcher::{errors::FetchError, types::Charset};
use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

/// Bytes of the body inspected for a `<meta charset>` declaration.
const SNIFF_LEN: usize = 4096;

pub fn detect_charset(content_type: &str, body: &[u8]) -> Charset {
    // 1. Content-Type header
    if let Some(charset) = label_charset(&CHARSET_REGEX, content_type) {
        return charset;
    }

    // 2. <meta charset> / http-equiv in the head of the document
    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_LEN)]);
    if let Some(charset) = label_charset(&META_CHARSET_REGEX, &head) {
        return charset;
    }

    // 3. Statistical guess with a Cyrillic TLD hint
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(&body[..body.len().min(SNIFF_LEN)], body.len() <= SNIFF_LEN);
    Charset::from_encoding(detector.guess(Some(b"ru"), true))
}

fn label_charset(regex: &Regex, haystack: &str) -> Option<Charset> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes()).map(Charset::from_encoding)
}

pub fn decode_body(body: &[u8], charset: &Charset) -> Result<String, FetchError> {
    let encoding = charset.encoding();
    let (decoded, _, had_errors) = encoding.decode(body);

    if had_errors {
        return Err(FetchError::Charset(format!(
            "body is not valid {}",
            encoding.name()
        )));
    }

    Ok(decoded.into_owned())
}
