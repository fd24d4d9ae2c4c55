//! Decoders for machine-obfuscated email addresses
//!
//! Cloudflare's email protection replaces each address with a hex payload in
//! which the first byte is an XOR key for the remaining bytes. The decoder is a
//! trait so other schemes can be plugged into the extractor.

use thiserror::Error;

/// Path prefix Cloudflare uses for protected `mailto` links
pub const CLOUDFLARE_PROTECTION_PATH: &str = "/cdn-cgi/l/email-protection";

/// Errors raised while undoing an obfuscation
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("payload is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("payload is too short")]
    TooShort,

    #[error("decoded bytes are not UTF-8")]
    InvalidUtf8,
}

/// Turns an obfuscated payload back into an address
pub trait EmailDecoder: Send + Sync {
    /// Decodes `payload`; the result is not yet validated as an email
    fn decode(&self, payload: &str) -> Result<String, DecodeError>;
}

/// XOR-with-first-byte decoder used by Cloudflare (`data-cfemail`)
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudflareDecoder;

impl EmailDecoder for CloudflareDecoder {
    fn decode(&self, payload: &str) -> Result<String, DecodeError> {
        let bytes = hex::decode(payload.trim())?;
        let (key, body) = bytes.split_first().ok_or(DecodeError::TooShort)?;
        if body.is_empty() {
            return Err(DecodeError::TooShort);
        }

        let decoded: Vec<u8> = body.iter().map(|b| b ^ key).collect();
        String::from_utf8(decoded).map_err(|_| DecodeError::InvalidUtf8)
    }
}

/// Returns the payload of a Cloudflare-protected href, if it is one
///
/// ```
/// use contact_ripple::extract::cloudflare_payload;
///
/// assert_eq!(
///     cloudflare_payload("/cdn-cgi/l/email-protection#1a2b3c"),
///     Some("1a2b3c")
/// );
/// assert_eq!(cloudflare_payload("/contact"), None);
/// ```
pub fn cloudflare_payload(href: &str) -> Option<&str> {
    let index = href.find(CLOUDFLARE_PROTECTION_PATH)?;
    let (_, fragment) = href[index..].split_once('#')?;
    let fragment = fragment.trim();
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}

#[cfg(test)]
pub(crate) fn encode_cloudflare(email: &str, key: u8) -> String {
    let mut bytes = vec![key];
    bytes.extend(email.bytes().map(|b| b ^ key));
    hex::encode(bytes)
}
