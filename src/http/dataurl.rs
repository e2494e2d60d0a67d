//! `data:` URL decoding (RFC 2397).
//!
//! Follows the rules of Chromium's `net::DataURL::Parse`: the media type is
//! lowercased and defaults to `text/plain`, a missing charset is `US-ASCII`
//! whatever the media type, a media type without a `/` is rejected, and
//! base64 payloads tolerate whitespace and missing padding.

use crate::base::neterror::NetError;
use base64::alphabet;
use base64::engine::general_purpose::GeneralPurpose;
use base64::engine::{DecodePaddingMode, GeneralPurposeConfig};
use base64::Engine;
use bytes::Bytes;
use percent_encoding::{percent_decode_str, percent_encode, AsciiSet, CONTROLS};

const SCHEME: &str = "data:";
const DEFAULT_MIME_TYPE: &str = "text/plain";
const DEFAULT_CHARSET: &str = "US-ASCII";

const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

// `%` and `#` must be escaped so an arbitrary payload survives decoding.
const PAYLOAD: &AsciiSet = &CONTROLS.add(b'%').add(b'#');

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime_type: String,
    charset: String,
    data: Bytes,
}

impl DataUrl {
    /// Decode a complete `data:` URL.
    ///
    /// Returns `NetError::InvalidUrl` when the scheme is wrong, the `,`
    /// separator is missing, the media type is malformed, or the base64
    /// payload does not decode.
    pub fn parse(url: &str) -> Result<Self, NetError> {
        let rest = match url.get(..SCHEME.len()) {
            Some(scheme) if scheme.eq_ignore_ascii_case(SCHEME) => &url[SCHEME.len()..],
            _ => return Err(NetError::InvalidUrl),
        };
        // The fragment is not part of the payload.
        let rest = rest.split_once('#').map_or(rest, |(content, _)| content);
        let (meta, body) = rest.split_once(',').ok_or(NetError::InvalidUrl)?;

        let mut params = meta.split(';');
        let mut mime_type = params
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let mut charset = String::new();
        let mut base64 = false;
        for param in params.map(str::trim) {
            if param.eq_ignore_ascii_case("base64") {
                base64 = true;
            } else if let Some((name, value)) = param.split_once('=') {
                if name.trim().eq_ignore_ascii_case("charset") {
                    charset = value.trim().to_string();
                }
            }
        }

        if mime_type.is_empty() {
            mime_type = DEFAULT_MIME_TYPE.to_string();
        } else if !mime_type.contains('/') {
            return Err(NetError::InvalidUrl);
        }
        if charset.is_empty() {
            charset = DEFAULT_CHARSET.to_string();
        }

        let decoded: Vec<u8> = percent_decode_str(body).collect();
        let data = if base64 {
            let compact: Vec<u8> = decoded
                .into_iter()
                .filter(|b| !b.is_ascii_whitespace())
                .collect();
            LENIENT_BASE64
                .decode(compact)
                .map_err(|_| NetError::InvalidUrl)?
        } else {
            decoded
        };

        Ok(Self {
            mime_type,
            charset,
            data: Bytes::from(data),
        })
    }

    /// Build a `data:` URL whose payload decodes back to `data` exactly.
    pub fn encode(mime_type: &str, charset: &str, data: &[u8]) -> String {
        let mut url = format!("{SCHEME}{mime_type}");
        if !charset.is_empty() {
            url.push_str(";charset=");
            url.push_str(charset);
        }
        url.push(',');
        url.extend(percent_encode(data, PAYLOAD));
        url
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn charset(&self) -> &str {
        &self.charset
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Split into `(mime_type, charset, data)`.
    pub fn into_parts(self) -> (String, String, Bytes) {
        (self.mime_type, self.charset, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_with_charset() {
        let url = DataUrl::parse("data:text/plain;charset=utf-8,hello").unwrap();
        assert_eq!(url.mime_type(), "text/plain");
        assert_eq!(url.charset(), "utf-8");
        assert_eq!(url.data().as_ref(), b"hello");
    }

    #[test]
    fn test_empty_payload() {
        let url = DataUrl::parse("data:text/plain,").unwrap();
        assert!(url.data().is_empty());
        assert_eq!(url.charset(), "US-ASCII");
    }

    #[test]
    fn test_charset_defaults_for_explicit_media_type() {
        let url = DataUrl::parse("data:text/html,<p>").unwrap();
        assert_eq!(url.mime_type(), "text/html");
        assert_eq!(url.charset(), "US-ASCII");
    }

    #[test]
    fn test_defaults_when_media_type_missing() {
        let url = DataUrl::parse("data:,A%20brief%20note").unwrap();
        assert_eq!(url.mime_type(), "text/plain");
        assert_eq!(url.charset(), "US-ASCII");
        assert_eq!(url.data().as_ref(), b"A brief note");
    }

    #[test]
    fn test_base64_tolerates_whitespace_and_missing_padding() {
        let url = DataUrl::parse("data:image/png;base64,aGVs bG8").unwrap();
        assert_eq!(url.mime_type(), "image/png");
        assert_eq!(url.data().as_ref(), b"hello");

        let padded = DataUrl::parse("data:;base64,aGVsbG8%3D").unwrap();
        assert_eq!(padded.data().as_ref(), b"hello");
        assert_eq!(padded.mime_type(), "text/plain");
    }

    #[test]
    fn test_media_type_is_lowercased() {
        let url = DataUrl::parse("DATA:Text/HTML;Charset=UTF-8,<p>").unwrap();
        assert_eq!(url.mime_type(), "text/html");
        assert_eq!(url.charset(), "UTF-8");
    }

    #[test]
    fn test_fragment_is_dropped() {
        let url = DataUrl::parse("data:text/plain,abc#frag").unwrap();
        assert_eq!(url.data().as_ref(), b"abc");
    }

    #[test]
    fn test_malformed() {
        assert_eq!(DataUrl::parse("data:text/plain"), Err(NetError::InvalidUrl));
        assert_eq!(DataUrl::parse("http://x/,y"), Err(NetError::InvalidUrl));
        assert_eq!(DataUrl::parse("data:plain,x"), Err(NetError::InvalidUrl));
        assert_eq!(DataUrl::parse("data:;base64,!!!"), Err(NetError::InvalidUrl));
        assert_eq!(DataUrl::parse("dat"), Err(NetError::InvalidUrl));
    }

    #[test]
    fn test_encode_preserves_arbitrary_payload() {
        let html = b"<p>100% #1\n\tdone</p>";
        let url = DataUrl::encode("text/html", "utf-8", html);
        assert!(url.starts_with("data:text/html;charset=utf-8,"));

        let parsed = DataUrl::parse(&url).unwrap();
        assert_eq!(parsed.data().as_ref(), html);
        assert_eq!(parsed.charset(), "utf-8");
    }
}
