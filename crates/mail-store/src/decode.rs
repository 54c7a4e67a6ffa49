//! Payload decoding helpers.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::MailStoreError;

/// Decode a base64url payload into text.
///
/// The store uses the URL-safe alphabet and frequently omits padding, so
/// the input is normalized to the standard alphabet and re-padded before
/// decoding.
pub fn decode_base64url(data: &str) -> Result<String, MailStoreError> {
    let mut normalized: String = data
        .trim()
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }

    let bytes = BASE64
        .decode(normalized.as_bytes())
        .map_err(|e| MailStoreError::Decode(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| MailStoreError::Decode(e.to_string()))
}

/// Strip markup from an HTML body down to collapsed plain text.
pub fn html_to_text(html: &str) -> Result<String, MailStoreError> {
    let text = html2text::from_read(html.as_bytes(), 80)
        .map_err(|e| MailStoreError::Decode(e.to_string()))?;
    Ok(collapse_whitespace(&text))
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use super::*;

    #[test]
    fn test_decode_round_trips_unicode() {
        let original = "Grüße! The café opens at 9 — see you there 🎉";
        let encoded = URL_SAFE_NO_PAD.encode(original.as_bytes());

        let decoded = decode_base64url(&encoded).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_accepts_padded_input() {
        let encoded = base64::engine::general_purpose::URL_SAFE.encode("padded?");
        assert_eq!(decode_base64url(&encoded).unwrap(), "padded?");
    }

    #[test]
    fn test_decode_substitutes_url_safe_alphabet() {
        // ">>>" encodes to "Pj4+" in the standard alphabet, so its url-safe
        // form carries a '-' that must be substituted before decoding.
        let encoded = URL_SAFE_NO_PAD.encode(">>>");
        assert_eq!(encoded, "Pj4-");
        assert_eq!(decode_base64url(&encoded).unwrap(), ">>>");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_base64url("!!not base64!!"),
            Err(MailStoreError::Decode(_))
        ));
    }

    #[test]
    fn test_html_to_text_strips_markup() {
        let text = html_to_text("<div><p>Hello <b>world</b></p><br></div>").unwrap();
        assert_eq!(text, "Hello world");
    }
}
