//! PNG data URLs, the string form snapshots take inside the key-value store.

use super::StorageError;
use base64::{Engine as _, engine::general_purpose::STANDARD};

const PNG_PREFIX: &str = "data:image/png;base64,";
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Wraps PNG bytes as `data:image/png;base64,...`.
pub fn encode_png(png: &[u8]) -> String {
    let mut url = String::with_capacity(PNG_PREFIX.len() + png.len().div_ceil(3) * 4);
    url.push_str(PNG_PREFIX);
    STANDARD.encode_string(png, &mut url);
    url
}

/// Extracts PNG bytes from a data URL produced by [`encode_png`].
///
/// The media type is matched case-insensitively; the payload must carry the
/// PNG signature.
pub fn decode_png(url: &str) -> Result<Vec<u8>, StorageError> {
    let url = url.trim();
    let prefix = url.get(..PNG_PREFIX.len()).ok_or(StorageError::NotPngDataUrl)?;
    if !prefix.eq_ignore_ascii_case(PNG_PREFIX) {
        return Err(StorageError::NotPngDataUrl);
    }

    let bytes = STANDARD.decode(&url[PNG_PREFIX.len()..])?;
    if !bytes.starts_with(&PNG_SIGNATURE) {
        return Err(StorageError::NotPngDataUrl);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_png() -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(b"IHDR-ish payload");
        bytes
    }

    #[test]
    fn encoded_value_looks_like_a_browser_data_url() {
        let url = encode_png(&fake_png());
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert_eq!(decode_png(&url).unwrap(), fake_png());
    }

    #[test]
    fn other_media_types_are_rejected() {
        let url = encode_png(&fake_png()).replace("image/png", "image/jpeg");
        assert!(matches!(decode_png(&url), Err(StorageError::NotPngDataUrl)));
        assert!(matches!(decode_png("data:"), Err(StorageError::NotPngDataUrl)));
    }

    #[test]
    fn payload_must_be_png() {
        let url = format!("{PNG_PREFIX}{}", STANDARD.encode(b"GIF89a"));
        assert!(matches!(decode_png(&url), Err(StorageError::NotPngDataUrl)));
        assert!(matches!(
            decode_png("data:image/png;base64,***"),
            Err(StorageError::Base64(_))
        ));
    }
}
